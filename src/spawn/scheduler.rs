use crate::animation::ease::Ease;
use crate::animation::mode::AnimationMode;
use crate::elements::registry::ElementRegistry;
use crate::instances::store::{InstanceId, InstanceStore};
use crate::spawn::factory::{InstanceFactory, SpawnEnv, TitleSlot};

/// Ramp window used when no reset interval is configured, seconds.
pub const DEFAULT_RAMP_SECONDS: f64 = 12.0;
/// Ramp multiplier at the moment spawning is enabled.
pub const RAMP_FLOOR: f64 = 0.01;
/// Spawn-chance factor applied to non-title elements while titles are pending.
pub const TITLE_PRIORITY_FACTOR: f64 = 0.2;

const TITLE_START_TICKS: f64 = 4.0;
const TITLE_INTERVAL_TICKS: f64 = 12.0;

/// Per-tick inputs read from the engine configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerParams {
    /// Capacity checked before every spawn.
    pub max_instances: usize,
    /// Global spawn speed multiplier, already coerced to a finite value `>= 0`.
    pub spawn_speed: f64,
    /// Periodic reset interval in seconds, if the host resets on a timer.
    pub reset_interval_seconds: Option<f64>,
}

/// What one scheduler step did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnReport {
    /// Instances created this step, in creation order.
    pub spawned: Vec<InstanceId>,
    /// Spawn chance computed for the probabilistic path, if it ran.
    pub chance: Option<f64>,
}

/// Decides once per tick whether new instances appear.
#[derive(Debug, Default)]
pub struct SpawnScheduler {
    titles_done: usize,
    ticks: u64,
    elapsed: f64,
}

impl SpawnScheduler {
    /// Scheduler at the start of a run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the title sequence and the ramp.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Simulated seconds since spawning was enabled.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Scheduler steps taken since spawning was enabled.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// `true` while some title element has not been introduced yet.
    pub fn titles_pending(&self, registry: &ElementRegistry) -> bool {
        self.titles_done < registry.title_order().len()
    }

    /// Ramp multiplier at the current elapsed time.
    pub fn ramp(&self, reset_interval_seconds: Option<f64>) -> f64 {
        ramp_multiplier(self.elapsed, reset_interval_seconds)
    }

    /// Run one spawn step and advance the scheduler clock by `dt` seconds.
    pub fn step(
        &mut self,
        dt: f64,
        params: SchedulerParams,
        registry: &ElementRegistry,
        store: &mut InstanceStore,
        factory: &mut InstanceFactory,
        env: &mut SpawnEnv<'_>,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        self.introduce_title(params, registry, store, factory, env, &mut report);
        self.spawn_random(params, registry, store, factory, env, &mut report);
        self.ticks += 1;
        self.elapsed += dt;
        report
    }

    fn introduce_title(
        &mut self,
        params: SchedulerParams,
        registry: &ElementRegistry,
        store: &mut InstanceStore,
        factory: &mut InstanceFactory,
        env: &mut SpawnEnv<'_>,
        report: &mut SpawnReport,
    ) {
        let order = registry.title_order();
        let Some(next_id) = order.get(self.titles_done) else {
            return;
        };

        let (start, interval) = title_timing(params.spawn_speed);
        if self.ticks < start || (self.ticks - start) % interval != 0 {
            return;
        }
        if store.len() >= params.max_instances {
            return;
        }

        let (Some(desc), Some(cfg)) = (registry.descriptor(next_id), registry.config(next_id)) else {
            tracing::warn!(id = %next_id, "title element missing, skipping");
            self.titles_done += 1;
            return;
        };

        let slot = TitleSlot {
            index: self.titles_done as u32,
            total: order.len() as u32,
        };
        let instance = factory.create_title(desc, cfg, slot, env);
        tracing::debug!(element = %desc.id, slot = slot.index, "title introduced");
        report.spawned.push(instance.id);
        store.insert(instance);
        self.titles_done += 1;
    }

    fn spawn_random(
        &mut self,
        params: SchedulerParams,
        registry: &ElementRegistry,
        store: &mut InstanceStore,
        factory: &mut InstanceFactory,
        env: &mut SpawnEnv<'_>,
        report: &mut SpawnReport,
    ) {
        if store.len() >= params.max_instances || registry.is_empty() {
            return;
        }

        let index = env.rng.below(registry.len());
        let Some(desc) = registry.at(index) else {
            return;
        };
        let Some(cfg) = registry.config(&desc.id) else {
            return;
        };
        if cfg.animation_mode == AnimationMode::Title {
            return;
        }

        let mut chance = cfg.effective_frequency()
            * cfg.animation_mode.spawn_multiplier()
            * self.ramp(params.reset_interval_seconds)
            * params.spawn_speed;
        if self.titles_pending(registry) {
            chance *= TITLE_PRIORITY_FACTOR;
        }
        // A probability; huge speed multipliers must not overflow it to infinity.
        let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        report.chance = Some(chance);

        if env.rng.next_f64() < chance {
            let instance = factory.create(desc, cfg, env);
            tracing::debug!(
                element = %desc.id,
                chance,
                mode = instance.actual_mode().as_str(),
                "spawn"
            );
            report.spawned.push(instance.id);
            store.insert(instance);
        }
    }
}

/// Quadratic ease-in from [`RAMP_FLOOR`] to 1 over the ramp window.
///
/// The window ends one second before a configured reset (at least 0.1 s), or after
/// [`DEFAULT_RAMP_SECONDS`] when no reset interval above one second is set.
pub fn ramp_multiplier(elapsed: f64, reset_interval_seconds: Option<f64>) -> f64 {
    let window = match reset_interval_seconds {
        Some(r) if r.is_finite() && r > 1.0 => (r - 1.0).max(0.1),
        _ => DEFAULT_RAMP_SECONDS,
    };
    Ease::InQuad.lerp(RAMP_FLOOR, 1.0, elapsed / window)
}

/// `(start, interval)` in scheduler ticks for the title sequence at a spawn speed.
pub fn title_timing(spawn_speed: f64) -> (u64, u64) {
    let factor = spawn_speed.max(0.01).sqrt();
    let start = (TITLE_START_TICKS / factor).floor();
    let interval = (TITLE_INTERVAL_TICKS / factor).round().max(2.0);
    (start as u64, interval as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/spawn/scheduler.rs"]
mod tests;
