//! Typomoss is a seeded generative typography engine.
//!
//! Registered vector elements are spawned onto a 2D canvas, grouped into clusters and edge-grown
//! stacks, animated per mode, and redrawn every tick. A run is reproducible from its seed and the
//! sequence of calls made on the engine:
//!
//! - Describe elements with [`ElementDescriptor`] (or load a [`Scene`])
//! - Create an [`Engine`] over a [`RenderTarget`] such as [`CpuCanvas`]
//! - [`Engine::start`], [`Engine::enable_spawning`], then drive [`Engine::tick`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod elements;
pub(crate) mod engine;
pub(crate) mod instances;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod spawn;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Vec2};
pub use crate::foundation::error::{MossError, MossResult};
pub use crate::foundation::rng::Mulberry32;

pub use crate::animation::ease::Ease;
pub use crate::animation::mode::{
    AnimationMode, ClusterId, ConcreteMode, FlickerState, GrowState, LayeredState, ModeState,
    RotateState, StackId, TitleState,
};
pub use crate::animation::random::{RandomModeWeights, Weight};
pub use crate::animation::state::{
    InstanceTransform, Lifespan, ROTATION_SPEED, RetirementPolicy, progress, sample,
};
pub use crate::elements::registry::{
    DEFAULT_ELEMENT_SIZE, ElementConfig, ElementConfigPatch, ElementDescriptor, ElementRegistry,
};
pub use crate::elements::shape::ElementShape;
pub use crate::engine::clock::{FixedStepClock, FrameClock, MonotonicClock};
pub use crate::engine::config::{EngineConfig, EngineConfigPatch};
pub use crate::engine::runtime::{Engine, MAX_DT, MIN_DT, Stats, TickOutcome};
pub use crate::instances::store::{Instance, InstanceId, InstanceStore};
pub use crate::render::cpu::{CpuCanvas, SVG_RASTER_EDGE};
pub use crate::render::target::{DrawCommand, RecordedDraw, RecordingTarget, RenderTarget};
pub use crate::render::tint::TintCache;
pub use crate::scene::{Scene, SceneElement};
pub use crate::spawn::scheduler::{ramp_multiplier, title_timing};
