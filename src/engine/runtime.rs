use std::collections::HashMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::time::Duration;

use crate::animation::mode::ModeState;
use crate::animation::state::{Lifespan, rotation_delta};
use crate::elements::registry::{ElementConfig, ElementConfigPatch, ElementDescriptor, ElementRegistry};
use crate::engine::clock::{FrameClock, MonotonicClock};
use crate::engine::config::{EngineConfig, EngineConfigPatch};
use crate::foundation::core::Canvas;
use crate::foundation::error::{MossError, MossResult};
use crate::foundation::math::Fnv1a64;
use crate::foundation::rng::Mulberry32;
use crate::instances::store::{Instance, InstanceId, InstanceStore};
use crate::render::target::{DrawCommand, RenderTarget};
use crate::spawn::cluster::ClusterBook;
use crate::spawn::factory::{InstanceFactory, SpawnEnv, resolve_mode, swap_state};
use crate::spawn::scheduler::{SchedulerParams, SpawnScheduler};

/// Smallest simulated step per tick, seconds.
pub const MIN_DT: f64 = 1.0 / 240.0;
/// Largest simulated step per tick, seconds.
pub const MAX_DT: f64 = 1.0 / 30.0;

/// Counters for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Stats {
    /// Ticks since the last reset.
    pub tick_count: u64,
    /// Live instances.
    pub instance_count: usize,
    /// Configured capacity.
    pub max_instances: usize,
}

/// Result of one [`Engine::tick`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was simulated and drawn.
    Rendered,
    /// The engine is stopped; nothing happened.
    Idle,
}

/// The generative animation engine.
///
/// Owns its configuration, RNG, registry, instance store, and render target. All mutation goes
/// through its methods and happens on the caller's thread, so a run is reproducible from its
/// seed and the sequence of calls made on it.
pub struct Engine<T: RenderTarget, C: FrameClock = MonotonicClock> {
    config: EngineConfig,
    canvas: Canvas,
    rng: Mulberry32,
    registry: ElementRegistry,
    store: InstanceStore,
    factory: InstanceFactory,
    book: ClusterBook,
    scheduler: SpawnScheduler,
    clock: C,
    target: T,
    running: bool,
    spawning: bool,
    tick_count: u64,
    last_time: Option<Duration>,
    fingerprint: Fnv1a64,
}

impl<T: RenderTarget> Engine<T, MonotonicClock> {
    /// Create an engine drawing onto `target`, timed by the wall clock.
    pub fn new(target: T, patch: EngineConfigPatch) -> MossResult<Self> {
        Self::with_clock(target, patch, MonotonicClock::new())
    }
}

impl<T: RenderTarget, C: FrameClock> Engine<T, C> {
    /// Create an engine with an explicit clock.
    ///
    /// The canvas defaults to the target size. Fails with [`MossError::Surface`] when the target
    /// has no usable area; this is the only fatal condition.
    pub fn with_clock(mut target: T, patch: EngineConfigPatch, clock: C) -> MossResult<Self> {
        let (w, h) = target.size();
        if w == 0 || h == 0 {
            return Err(MossError::surface(format!(
                "render target unavailable ({w}x{h})"
            )));
        }

        let mut config = EngineConfig {
            canvas_width: w,
            canvas_height: h,
            ..EngineConfig::default()
        };
        patch.apply_to(&mut config);
        let canvas = config.canvas()?;
        if (canvas.width, canvas.height) != (w, h) {
            target.resize(canvas.width, canvas.height)?;
        }

        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            seed = config.seed,
            max_instances = config.max_instances,
            "engine created"
        );

        Ok(Self {
            rng: Mulberry32::new(config.seed),
            config,
            canvas,
            registry: ElementRegistry::new(),
            store: InstanceStore::new(),
            factory: InstanceFactory::new(),
            book: ClusterBook::new(),
            scheduler: SpawnScheduler::new(),
            clock,
            target,
            running: false,
            spawning: false,
            tick_count: 0,
            last_time: None,
            fingerprint: Fnv1a64::new_default(),
        })
    }

    /// Replace the registered elements, inferring configs from names.
    pub fn register_elements(&mut self, descriptors: Vec<ElementDescriptor>) {
        self.registry.register(descriptors);
    }

    /// Replace the registered elements with explicit configs where given.
    pub fn register_elements_with(
        &mut self,
        descriptors: Vec<ElementDescriptor>,
        configs: HashMap<String, ElementConfig>,
    ) {
        self.registry.register_with(descriptors, configs);
    }

    /// Begin ticking. No-op when already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_time = Some(self.clock.now());
        tracing::info!("engine started");
    }

    /// Stop ticking; subsequent [`Engine::tick`] calls are idle.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            tracing::info!("engine stopped");
        }
    }

    /// `true` while started.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Allow the population to grow. The spawn ramp and title sequence start now.
    pub fn enable_spawning(&mut self) {
        if self.spawning {
            return;
        }
        self.spawning = true;
        self.scheduler.reset();
        tracing::info!("spawning enabled");
    }

    /// `true` once [`Engine::enable_spawning`] was called.
    pub fn is_spawning_enabled(&self) -> bool {
        self.spawning
    }

    /// Clear every instance and counter. Restarts immediately when the engine was running.
    pub fn reset(&mut self) {
        let was_running = self.running;
        self.stop();
        self.store.clear();
        self.book.clear();
        self.scheduler.reset();
        self.tick_count = 0;
        self.last_time = None;
        self.fingerprint = Fnv1a64::new_default();
        tracing::info!(was_running, "engine reset");
        if was_running {
            self.start();
        }
    }

    /// Merge a partial engine configuration.
    ///
    /// A seed takes effect on the next spawn decision. A lowered capacity is enforced at the
    /// start of the next tick.
    pub fn update_config(&mut self, patch: EngineConfigPatch) -> MossResult<()> {
        let mut next = self.config.clone();
        let reseed = patch.apply_to(&mut next);
        let canvas = next.canvas()?;
        if canvas != self.canvas {
            self.target.resize(canvas.width, canvas.height)?;
            self.canvas = canvas;
        }
        self.config = next;
        if reseed {
            self.rng.reseed(self.config.seed);
            tracing::info!(seed = self.config.seed, "rng reseeded");
        }
        Ok(())
    }

    /// Merge a partial element configuration and propagate it to live instances.
    ///
    /// Mode changes hot-swap every live instance of the element in place, keeping age,
    /// position, size, and rotation. Speed changes retime them. Color changes drop cached tints.
    pub fn update_element_config(
        &mut self,
        element_id: &str,
        patch: ElementConfigPatch,
    ) -> MossResult<()> {
        let change = self.registry.update(element_id, patch)?;
        let Some(cfg) = self.registry.config(element_id) else {
            return Ok(());
        };
        let policy = self.config.retirement;
        let speed = cfg.effective_speed();

        if let Some((old, new)) = change.mode {
            let ids = self.store.ids_of(element_id);
            for id in &ids {
                let Some(inst) = self.store.get_mut(*id) else {
                    continue;
                };
                let concrete = resolve_mode(new, cfg, &mut self.rng);
                inst.state = swap_state(concrete, inst, &mut self.rng);
                inst.animation_mode = new;
                inst.speed = speed;
                inst.lifespan = policy.lifespan(concrete, speed);
            }
            tracing::info!(
                element = element_id,
                from = old.as_str(),
                to = new.as_str(),
                instances = ids.len(),
                "animation mode hot-swapped"
            );
        } else if change.speed_changed {
            for inst in self.store.iter_mut().filter(|i| i.element_id == element_id) {
                inst.speed = speed;
                if matches!(inst.lifespan, Lifespan::Ticks(_)) {
                    inst.lifespan = policy.lifespan(inst.actual_mode(), speed);
                }
            }
            tracing::debug!(element = element_id, speed, "animation speed propagated");
        }

        if change.color_changed {
            self.target.invalidate_element(element_id);
        }
        Ok(())
    }

    /// Advance one frame: enforce capacity, spawn, age, draw.
    #[tracing::instrument(level = "trace", skip(self), fields(tick = self.tick_count))]
    pub fn tick(&mut self) -> MossResult<TickOutcome> {
        if !self.running {
            return Ok(TickOutcome::Idle);
        }

        let now = self.clock.now();
        let raw = self
            .last_time
            .map_or(MIN_DT, |prev| now.saturating_sub(prev).as_secs_f64());
        let dt = raw.clamp(MIN_DT, MAX_DT);
        self.last_time = Some(now);

        self.enforce_capacity();
        if self.spawning {
            self.spawn_step(dt);
        }
        self.advance(dt);
        self.draw()?;

        self.tick_count += 1;
        Ok(TickOutcome::Rendered)
    }

    fn enforce_capacity(&mut self) {
        let max = self.config.max_instances;
        if self.store.len() > max {
            let evicted = self.store.evict_oldest(self.store.len() - max);
            tracing::debug!(evicted, max, "capacity eviction");
        }
    }

    fn spawn_step(&mut self, dt: f64) {
        let params = SchedulerParams {
            max_instances: self.config.max_instances,
            spawn_speed: self.config.effective_spawn_speed(),
            reset_interval_seconds: self.config.reset_interval_seconds,
        };
        let mut env = SpawnEnv {
            canvas: self.canvas,
            rng: &mut self.rng,
            book: &mut self.book,
            retirement: self.config.retirement,
        };
        let report = self.scheduler.step(
            dt,
            params,
            &self.registry,
            &mut self.store,
            &mut self.factory,
            &mut env,
        );
        for id in report.spawned {
            if let Some(inst) = self.store.get(id) {
                fold_spawn(&mut self.fingerprint, inst);
            }
        }
    }

    fn advance(&mut self, dt: f64) {
        for inst in self.store.iter_mut() {
            inst.age += 1;
            if let ModeState::Rotate(r) = inst.state {
                inst.rotation += rotation_delta(dt, r.direction, inst.speed);
            }
            inst.opacity = inst.transform().opacity;
        }
        let retired = self.store.retire_expired();
        if retired > 0 {
            tracing::debug!(retired, "instances retired");
        }
    }

    fn draw(&mut self) -> MossResult<()> {
        self.target.begin_frame(self.config.background)?;
        for inst in self.store.sorted() {
            let Some(desc) = self.registry.descriptor(&inst.element_id) else {
                continue;
            };
            let t = inst.transform();
            if t.is_invisible() {
                continue;
            }
            let reach = inst.size * t.scale * FRAC_1_SQRT_2;
            if !self.canvas.contains_with_margin(inst.position + t.offset, reach) {
                continue;
            }
            let color = self.registry.color(&desc.id).unwrap_or(desc.default_color);
            self.target.draw(&DrawCommand {
                element_id: &desc.id,
                shape: &desc.shape,
                color,
                transform: t.to_affine(inst.position),
                size: inst.size,
                opacity: t.opacity as f32,
            })?;
        }
        self.target.present()
    }

    /// Display counters.
    pub fn stats(&self) -> Stats {
        Stats {
            tick_count: self.tick_count,
            instance_count: self.store.len(),
            max_instances: self.config.max_instances,
        }
    }

    /// FNV-1a digest of every spawn decision since creation or the last reset.
    pub fn spawn_fingerprint(&self) -> u64 {
        self.fingerprint.finish()
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered elements.
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Live instances.
    pub fn instances(&self) -> &InstanceStore {
        &self.store
    }

    /// Look up one live instance.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.store.get(id)
    }

    /// The render target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// The render target, mutably.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Consume the engine, returning its target.
    pub fn into_target(self) -> T {
        self.target
    }
}

fn fold_spawn(h: &mut Fnv1a64, inst: &Instance) {
    h.write_str(&inst.element_id);
    h.write_u8(inst.actual_mode() as u8);
    h.write_f64(inst.position.x);
    h.write_f64(inst.position.y);
    h.write_f64(inst.size);
    h.write_f64(inst.rotation);
}

#[cfg(test)]
#[path = "../../tests/unit/engine/runtime.rs"]
mod tests;
