use std::f64::consts::TAU;

use crate::animation::mode::{
    AnimationMode, ConcreteMode, FlickerState, GrowState, LayeredState, ModeState, RotateState,
    TitleState,
};
use crate::animation::state::RetirementPolicy;
use crate::elements::registry::{ElementConfig, ElementDescriptor};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::rng::Mulberry32;
use crate::instances::store::{Instance, InstanceId};
use crate::spawn::cluster::ClusterBook;

/// Mutable engine state an instance is created against.
pub struct SpawnEnv<'a> {
    /// Placement area.
    pub canvas: Canvas,
    /// The engine RNG.
    pub rng: &'a mut Mulberry32,
    /// Cluster and stack bookkeeping.
    pub book: &'a mut ClusterBook,
    /// Lifespan policy.
    pub retirement: RetirementPolicy,
}

/// Slot of a title instance in the left-to-right introduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TitleSlot {
    /// 0-based position.
    pub index: u32,
    /// Number of title elements.
    pub total: u32,
}

/// Issues instance ids and builds instances.
#[derive(Debug, Default)]
pub struct InstanceFactory {
    next_id: u64,
}

impl InstanceFactory {
    /// Factory whose first id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }

    fn issue(&mut self) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an instance of `desc` through the probabilistic spawn path.
    pub fn create(
        &mut self,
        desc: &ElementDescriptor,
        cfg: &ElementConfig,
        env: &mut SpawnEnv<'_>,
    ) -> Instance {
        let mode = resolve_mode(cfg.animation_mode, cfg, env.rng);
        let nominal = cfg.effective_size();
        let canvas = env.canvas;

        let (position, size, rotation, state) = match mode {
            ConcreteMode::Layered => {
                let p = env.book.place_layered(&desc.id, nominal, canvas, env.rng);
                (p.position, p.size, p.rotation, ModeState::Layered(p.state))
            }
            ConcreteMode::Grow => {
                let size = env.rng.jitter(nominal, 0.3);
                let p = env.book.place_grow(&desc.id, size, canvas, env.rng);
                (p.position, p.size, p.rotation, ModeState::Grow(p.state))
            }
            ConcreteMode::Title => {
                let size = env.rng.jitter(nominal, 0.3);
                let position = random_point(canvas, env.rng);
                let state = ModeState::Title(TitleState {
                    order_index: 0,
                    flicker_count: flicker_count(env.rng),
                });
                (position, size, 0.0, state)
            }
            ConcreteMode::Rotate | ConcreteMode::Pulse | ConcreteMode::Flicker => {
                let size = env.rng.jitter(nominal, 0.3);
                let rotation = env.rng.next_f64() * TAU;
                let position = random_point(canvas, env.rng);
                let state = match mode {
                    ConcreteMode::Rotate => ModeState::Rotate(RotateState {
                        direction: env.rng.sign(),
                    }),
                    ConcreteMode::Flicker => ModeState::Flicker(FlickerState {
                        flicker_count: flicker_count(env.rng),
                    }),
                    _ => ModeState::Pulse,
                };
                (position, size, rotation, state)
            }
        };

        let speed = cfg.effective_speed();
        Instance {
            id: self.issue(),
            element_id: desc.id.clone(),
            position,
            size,
            rotation,
            opacity: 0.0,
            animation_mode: cfg.animation_mode,
            state,
            age: 0,
            lifespan: env.retirement.lifespan(mode, speed),
            speed,
            rng_draw: env.rng.next_f64(),
        }
    }

    /// Create the title instance for `slot`.
    pub fn create_title(
        &mut self,
        desc: &ElementDescriptor,
        cfg: &ElementConfig,
        slot: TitleSlot,
        env: &mut SpawnEnv<'_>,
    ) -> Instance {
        let canvas = env.canvas;
        let size = env.rng.jitter(cfg.effective_size(), 0.3);
        let x = canvas.w() / f64::from(slot.total + 1) * f64::from(slot.index + 1);
        let y = env.rng.jitter(canvas.h() * 0.5, 0.4);
        let state = ModeState::Title(TitleState {
            order_index: slot.index,
            flicker_count: flicker_count(env.rng),
        });
        let speed = cfg.effective_speed();
        Instance {
            id: self.issue(),
            element_id: desc.id.clone(),
            position: Point::new(x, y),
            size,
            rotation: 0.0,
            opacity: 0.0,
            animation_mode: AnimationMode::Title,
            state,
            age: 0,
            lifespan: env.retirement.lifespan(ConcreteMode::Title, speed),
            speed,
            rng_draw: env.rng.next_f64(),
        }
    }
}

/// Resolve a configured mode to the concrete mode a new instance animates with.
pub fn resolve_mode(mode: AnimationMode, cfg: &ElementConfig, rng: &mut Mulberry32) -> ConcreteMode {
    match mode.concrete() {
        Some(m) => m,
        None => cfg.weights().choose(rng),
    }
}

/// Fresh mode state for an existing instance switched to `mode`.
///
/// Position, size, and rotation are kept: accumulating modes anchor a one-member cluster or
/// stack at the instance's current place.
pub fn swap_state(mode: ConcreteMode, inst: &Instance, rng: &mut Mulberry32) -> ModeState {
    match mode {
        ConcreteMode::Layered => ModeState::Layered(LayeredState {
            cluster: None,
            layer_index: 0,
            member_cap: 1,
            base: inst.position,
            direction: 0.0,
            spacing: 0.0,
            rotation_step: 0.0,
            base_rotation: inst.rotation,
        }),
        ConcreteMode::Rotate => ModeState::Rotate(RotateState {
            direction: rng.sign(),
        }),
        ConcreteMode::Pulse => ModeState::Pulse,
        ConcreteMode::Flicker => ModeState::Flicker(FlickerState {
            flicker_count: flicker_count(rng),
        }),
        ConcreteMode::Grow => ModeState::Grow(GrowState {
            stack: None,
            layer_index: 0,
            base: inst.position,
            direction: inst.rotation,
            spacing: inst.size,
        }),
        ConcreteMode::Title => ModeState::Title(TitleState {
            order_index: 0,
            flicker_count: flicker_count(rng),
        }),
    }
}

fn random_point(canvas: Canvas, rng: &mut Mulberry32) -> Point {
    let x = rng.next_f64() * canvas.w();
    let y = rng.next_f64() * canvas.h();
    Point::new(x, y)
}

fn flicker_count(rng: &mut Mulberry32) -> u8 {
    3 + rng.below(5) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/spawn/factory.rs"]
mod tests;
