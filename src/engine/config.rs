use crate::animation::state::RetirementPolicy;
use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use crate::foundation::error::MossResult;

/// Process-wide engine settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Frame background.
    pub background: Color,
    /// Capacity checked before each spawn.
    pub max_instances: usize,
    /// Global spawn speed multiplier, `>= 0`.
    pub spawn_speed_multiplier: f64,
    /// RNG seed.
    pub seed: u32,
    /// Host-driven reset period; shapes the spawn ramp.
    pub reset_interval_seconds: Option<f64>,
    /// Whether instances retire on their own.
    pub retirement: RetirementPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1920,
            canvas_height: 1080,
            background: Color::WHITE,
            max_instances: 250,
            spawn_speed_multiplier: 1.0,
            seed: 1,
            reset_interval_seconds: None,
            retirement: RetirementPolicy::Persistent,
        }
    }
}

impl EngineConfig {
    /// Validated canvas.
    pub fn canvas(&self) -> MossResult<Canvas> {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    /// Spawn speed coerced to a finite value `>= 0` (NaN means 1).
    pub fn effective_spawn_speed(&self) -> f64 {
        coerce_spawn_speed(self.spawn_speed_multiplier)
    }
}

fn coerce_spawn_speed(v: f64) -> f64 {
    if v.is_nan() {
        1.0
    } else if v.is_infinite() {
        if v > 0.0 { f64::MAX } else { 0.0 }
    } else {
        v.max(0.0)
    }
}

/// Partial update of [`EngineConfig`]. Out-of-range numbers are coerced, never rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfigPatch {
    /// New canvas width; resizes the render target.
    pub canvas_width: Option<u32>,
    /// New canvas height; resizes the render target.
    pub canvas_height: Option<u32>,
    /// New background.
    pub background: Option<Color>,
    /// New capacity; negative values mean 0.
    pub max_instances: Option<i64>,
    /// New spawn speed; negative values mean 0.
    pub spawn_speed_multiplier: Option<f64>,
    /// New seed; reseeds the RNG immediately.
    pub seed: Option<u32>,
    /// New reset period; non-positive or non-finite values clear it.
    pub reset_interval_seconds: Option<f64>,
    /// New retirement policy; applies to instances spawned afterwards.
    pub retirement: Option<RetirementPolicy>,
}

impl EngineConfigPatch {
    /// Merge into `cfg`. Returns `true` when the seed was set.
    pub(crate) fn apply_to(&self, cfg: &mut EngineConfig) -> bool {
        if let Some(w) = self.canvas_width {
            cfg.canvas_width = w;
        }
        if let Some(h) = self.canvas_height {
            cfg.canvas_height = h;
        }
        if let Some(bg) = self.background {
            cfg.background = bg;
        }
        if let Some(max) = self.max_instances {
            cfg.max_instances = usize::try_from(max.max(0)).unwrap_or(usize::MAX);
        }
        if let Some(s) = self.spawn_speed_multiplier {
            cfg.spawn_speed_multiplier = coerce_spawn_speed(s);
        }
        if let Some(r) = self.reset_interval_seconds {
            cfg.reset_interval_seconds = (r.is_finite() && r > 0.0).then_some(r);
        }
        if let Some(p) = self.retirement {
            cfg.retirement = p;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
