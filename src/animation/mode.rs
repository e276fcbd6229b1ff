use crate::foundation::core::Point;

/// Animation mode as configured on an element (and stored on each instance).
///
/// `Random` is nominal only: every instance spawned under it commits to one [`ConcreteMode`] at
/// spawn time, while its `animation_mode` keeps reporting `Random`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// In-place rotated stacks, built by the cluster engine.
    Layered,
    /// Fade/scale in, continuous spin, grow-and-fade out.
    Rotate,
    /// Fade in, sine breathing, damped fade out.
    Pulse,
    /// Fully visible, smooth tail fade after 85%.
    Flicker,
    /// Edge-fed straight stacks, built by the stack engine.
    Grow,
    /// Ordered one-time introduction, never rotated.
    Title,
    /// Weighted choice among the five spawnable concrete modes.
    Random,
}

impl AnimationMode {
    /// The concrete mode, or `None` for [`AnimationMode::Random`].
    pub fn concrete(self) -> Option<ConcreteMode> {
        match self {
            Self::Layered => Some(ConcreteMode::Layered),
            Self::Rotate => Some(ConcreteMode::Rotate),
            Self::Pulse => Some(ConcreteMode::Pulse),
            Self::Flicker => Some(ConcreteMode::Flicker),
            Self::Grow => Some(ConcreteMode::Grow),
            Self::Title => Some(ConcreteMode::Title),
            Self::Random => None,
        }
    }

    /// Spawn-chance bias. Accumulating modes are visually additive and spawn faster.
    pub fn spawn_multiplier(self) -> f64 {
        match self {
            Self::Layered => 2.0,
            _ => 1.5,
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            other => other.concrete().map_or("random", ConcreteMode::as_str),
        }
    }
}

/// The mode an instance actually animates with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcreteMode {
    /// See [`AnimationMode::Layered`].
    Layered,
    /// See [`AnimationMode::Rotate`].
    Rotate,
    /// See [`AnimationMode::Pulse`].
    Pulse,
    /// See [`AnimationMode::Flicker`].
    Flicker,
    /// See [`AnimationMode::Grow`].
    Grow,
    /// See [`AnimationMode::Title`].
    Title,
}

impl ConcreteMode {
    /// The five modes `random` may resolve to, in resolution order.
    pub const SPAWNABLE: [ConcreteMode; 5] = [
        ConcreteMode::Layered,
        ConcreteMode::Rotate,
        ConcreteMode::Pulse,
        ConcreteMode::Flicker,
        ConcreteMode::Grow,
    ];

    /// Nominal animation length in ticks at speed 1.
    pub fn nominal_duration(self) -> u64 {
        match self {
            Self::Rotate => 1200,
            Self::Pulse => 900,
            Self::Layered | Self::Flicker | Self::Grow | Self::Title => 1800,
        }
    }

    /// Modes whose instances never fade on their own: they only ever hold.
    pub fn is_accumulating(self) -> bool {
        matches!(self, Self::Layered | Self::Grow)
    }

    /// Progress at which the exit phase starts; persistent instances hold just before it.
    pub fn outro_start(self) -> f64 {
        match self {
            Self::Rotate => 0.8,
            Self::Pulse | Self::Flicker | Self::Title => 0.85,
            Self::Layered | Self::Grow => 1.0,
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layered => "layered",
            Self::Rotate => "rotate",
            Self::Pulse => "pulse",
            Self::Flicker => "flicker",
            Self::Grow => "grow",
            Self::Title => "title",
        }
    }
}

impl From<ConcreteMode> for AnimationMode {
    fn from(m: ConcreteMode) -> Self {
        match m {
            ConcreteMode::Layered => Self::Layered,
            ConcreteMode::Rotate => Self::Rotate,
            ConcreteMode::Pulse => Self::Pulse,
            ConcreteMode::Flicker => Self::Flicker,
            ConcreteMode::Grow => Self::Grow,
            ConcreteMode::Title => Self::Title,
        }
    }
}

/// Identifier of a layered cluster. Unique for the engine's lifetime.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ClusterId(pub u32);

/// Identifier of a grow stack. Unique for the engine's lifetime.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct StackId(pub u32);

/// Placement bookkeeping copied onto every member of a layered cluster.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayeredState {
    /// Owning cluster, `None` for instances hot-swapped into layered mode.
    pub cluster: Option<ClusterId>,
    /// 0-based position inside the cluster.
    pub layer_index: u32,
    /// Member cap of the cluster (5..=7).
    pub member_cap: u32,
    /// Position of layer 0.
    pub base: Point,
    /// Direction layers march along, radians.
    pub direction: f64,
    /// Distance between consecutive layers, pixels.
    pub spacing: f64,
    /// Rotation added per layer, radians.
    pub rotation_step: f64,
    /// Rotation of layer 0, radians.
    pub base_rotation: f64,
}

/// Per-instance spin direction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RotateState {
    /// `+1.0` or `-1.0`.
    pub direction: f64,
}

/// Flicker count chosen at spawn. Stored for inspection; the canonical fade does not read it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FlickerState {
    /// 3..=7.
    pub flicker_count: u8,
}

/// Placement bookkeeping copied onto every member of a grow stack.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GrowState {
    /// Owning stack, `None` for instances hot-swapped into grow mode.
    pub stack: Option<StackId>,
    /// 0-based position inside the stack.
    pub layer_index: u32,
    /// Entry point of the stack (just outside a canvas edge).
    pub base: Point,
    /// Direction the stack grows along, radians.
    pub direction: f64,
    /// Distance between consecutive members, pixels (the first member's size).
    pub spacing: f64,
}

/// Position in the ordered title introduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TitleState {
    /// 0-based slot, left to right.
    pub order_index: u32,
    /// 3..=7, stored like [`FlickerState::flicker_count`].
    pub flicker_count: u8,
}

/// Mode-specific instance state, tagged by the resolved concrete mode.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ModeState {
    /// Layered cluster member.
    Layered(LayeredState),
    /// Spinning instance.
    Rotate(RotateState),
    /// Breathing instance.
    Pulse,
    /// Tail-fading instance.
    Flicker(FlickerState),
    /// Grow stack member.
    Grow(GrowState),
    /// Title slot.
    Title(TitleState),
}

impl ModeState {
    /// The concrete mode this state belongs to.
    pub fn mode(&self) -> ConcreteMode {
        match self {
            Self::Layered(_) => ConcreteMode::Layered,
            Self::Rotate(_) => ConcreteMode::Rotate,
            Self::Pulse => ConcreteMode::Pulse,
            Self::Flicker(_) => ConcreteMode::Flicker,
            Self::Grow(_) => ConcreteMode::Grow,
            Self::Title(_) => ConcreteMode::Title,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/mode.rs"]
mod tests;
