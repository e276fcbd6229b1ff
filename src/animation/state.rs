use std::f64::consts::TAU;

use crate::animation::ease::Ease;
use crate::animation::mode::{ConcreteMode, ModeState};
use crate::foundation::core::{Affine, Point, Vec2};

/// Full turns per second of a rotate-mode instance at speed 1.
pub const ROTATION_SPEED: f64 = 2.0;

/// Pulse oscillations over one nominal lifespan.
const PULSE_CYCLES: f64 = 3.0;

/// How long an instance lives before natural retirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifespan {
    /// Never retires on its own; cleared only by capacity eviction or reset.
    Persistent,
    /// Retires once its age reaches this many ticks.
    Ticks(u64),
}

impl Lifespan {
    /// Lifespan of a mode at `speed`, rounded to whole ticks (at least one).
    pub fn for_mode(mode: ConcreteMode, speed: f64) -> Self {
        let ticks = (mode.nominal_duration() as f64 / speed).round();
        Self::Ticks(if ticks.is_finite() { ticks.max(1.0) as u64 } else { 1 })
    }

    /// `true` once `age` reached the end of a finite lifespan.
    pub fn expired(self, age: u64) -> bool {
        match self {
            Self::Persistent => false,
            Self::Ticks(n) => age >= n,
        }
    }
}

/// Whether instances retire on their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetirementPolicy {
    /// Every instance persists until reset or capacity eviction.
    #[default]
    Persistent,
    /// Transient modes retire after their nominal duration; layered and grow persist.
    Expire,
}

impl RetirementPolicy {
    /// Lifespan assigned to a new (or hot-swapped) instance.
    pub fn lifespan(self, mode: ConcreteMode, speed: f64) -> Lifespan {
        match self {
            Self::Persistent => Lifespan::Persistent,
            Self::Expire if mode.is_accumulating() => Lifespan::Persistent,
            Self::Expire => Lifespan::for_mode(mode, speed),
        }
    }
}

/// Elapsed-progress ratio of an instance in `[0, 1]`.
///
/// Finite lifespans map linearly. Persistent instances play their entrance over the mode's
/// nominal duration, then keep cycling the steady band between entrance and exit, so they never
/// start fading.
pub fn progress(mode: ConcreteMode, lifespan: Lifespan, age: u64, speed: f64) -> f64 {
    match lifespan {
        Lifespan::Ticks(0) => 1.0,
        Lifespan::Ticks(n) => (age as f64 / n as f64).min(1.0),
        Lifespan::Persistent => {
            let duration = mode.nominal_duration() as f64 / speed.max(f64::EPSILON);
            let raw = age as f64 / duration;
            let (start, end) = steady_band(mode);
            if raw < end {
                raw
            } else {
                start + (raw - start) % (end - start)
            }
        }
    }
}

/// Progress range persistent instances cycle through once their entrance has played.
///
/// Pulse wraps after a whole number of oscillation periods so the scale stays continuous.
fn steady_band(mode: ConcreteMode) -> (f64, f64) {
    match mode {
        ConcreteMode::Rotate => (0.2, 0.8),
        ConcreteMode::Pulse => (0.15, 0.15 + 2.0 / PULSE_CYCLES),
        _ => (0.0, mode.outro_start()),
    }
}

/// Visual state of an instance for one frame, relative to its base position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct InstanceTransform {
    /// Uniform scale factor.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Displacement from the instance position, pixels.
    pub offset: Vec2,
}

impl InstanceTransform {
    /// Identity transform with the given rotation.
    pub fn steady(rotation: f64) -> Self {
        Self {
            scale: 1.0,
            opacity: 1.0,
            rotation,
            offset: Vec2::ZERO,
        }
    }

    /// Force every field finite, scale non-negative, and opacity into `[0, 1]`.
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };
        Self {
            scale: finite_or(self.scale, 0.0).max(0.0),
            opacity: finite_or(self.opacity, 0.0).clamp(0.0, 1.0),
            rotation: finite_or(self.rotation, 0.0),
            offset: Vec2::new(finite_or(self.offset.x, 0.0), finite_or(self.offset.y, 0.0)),
        }
    }

    /// Affine placing a shape centered on the origin at `position`.
    pub fn to_affine(self, position: Point) -> Affine {
        Affine::translate(position.to_vec2() + self.offset)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
    }

    /// `true` when nothing would be drawn.
    pub fn is_invisible(self) -> bool {
        self.opacity <= 0.0 || self.scale <= 0.0
    }
}

/// Compute the transform of an instance in `state` at `progress`.
///
/// `rotation` is the instance's stored rotation (accumulated for rotate mode).
pub fn sample(state: &ModeState, progress: f64, rotation: f64) -> InstanceTransform {
    let p = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
    let t = match state {
        ModeState::Layered(_) | ModeState::Grow(_) => InstanceTransform::steady(rotation),
        ModeState::Rotate(_) => sample_rotate(p, rotation),
        ModeState::Pulse => sample_pulse(p, rotation),
        ModeState::Flicker(_) => sample_tail_fade(p, rotation),
        ModeState::Title(_) => sample_tail_fade(p, 0.0),
    };
    t.sanitized()
}

fn sample_rotate(p: f64, rotation: f64) -> InstanceTransform {
    let (scale, opacity) = if p < 0.2 {
        let f = p / 0.2;
        (Ease::Linear.lerp(0.3, 1.0, f), f)
    } else if p > 0.8 {
        let f = (p - 0.8) / 0.2;
        (Ease::Linear.lerp(1.0, 1.5, f), 1.0 - f)
    } else {
        (1.0, 1.0)
    };
    InstanceTransform {
        scale,
        opacity,
        ..InstanceTransform::steady(rotation)
    }
}

fn sample_pulse(p: f64, rotation: f64) -> InstanceTransform {
    let osc = 1.0 + 0.15 * (TAU * PULSE_CYCLES * p).sin();
    let (scale, opacity) = if p < 0.15 {
        let f = p / 0.15;
        (f, f)
    } else if p > 0.85 {
        let f = (p - 0.85) / 0.15;
        (Ease::Linear.lerp(osc, 0.3, f), 1.0 - f)
    } else {
        (osc, 1.0)
    };
    InstanceTransform {
        scale,
        opacity,
        ..InstanceTransform::steady(rotation)
    }
}

fn sample_tail_fade(p: f64, rotation: f64) -> InstanceTransform {
    if p <= 0.85 {
        return InstanceTransform::steady(rotation);
    }
    let f = (p - 0.85) / 0.15;
    InstanceTransform {
        scale: 1.0 + 0.5 * f,
        opacity: 1.0 - f,
        ..InstanceTransform::steady(rotation)
    }
}

/// Rotation added to a rotate-mode instance over `dt` seconds.
pub fn rotation_delta(dt: f64, direction: f64, speed: f64) -> f64 {
    dt * TAU * ROTATION_SPEED * direction * speed
}

#[cfg(test)]
#[path = "../../tests/unit/animation/state.rs"]
mod tests;
