/// Easing curves applied to a normalized `0..=1` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// `t`.
    Linear,
    /// `t²`: slow start, used for the spawn density ramp.
    InQuad,
}

impl Ease {
    /// Apply the curve. Input is clamped into `[0, 1]`; NaN maps to `0`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
        }
    }

    /// Interpolate from `a` to `b` along the curve.
    pub fn lerp(self, a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * self.apply(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
