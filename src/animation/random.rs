use crate::animation::mode::ConcreteMode;
use crate::foundation::rng::Mulberry32;

/// A single weight as supplied by configuration: a number or a numeric string.
///
/// Strings may carry a trailing `%`. Values above 1 are read as percentages.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Weight {
    /// Plain number, `0.3` or `30`.
    Number(f64),
    /// Text such as `"0.3"`, `"30"`, or `"30%"`.
    Text(String),
}

impl Weight {
    /// Parse into a probability in `[0, ∞)`. `None` means the value is unusable.
    pub fn parse(&self) -> Option<f64> {
        let raw = match self {
            Self::Number(n) => *n,
            Self::Text(s) => {
                let s = s.trim();
                match s.strip_suffix('%') {
                    Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
                    None => s.parse::<f64>().ok()?,
                }
            }
        };
        if !raw.is_finite() {
            return None;
        }
        let v = if raw > 1.0 { raw / 100.0 } else { raw };
        Some(v.max(0.0))
    }
}

impl From<f64> for Weight {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Weight {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Optional per-mode weights used when an element's mode is `random`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RandomModeWeights {
    /// Weight for `layered`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layered: Option<Weight>,
    /// Weight for `rotate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<Weight>,
    /// Weight for `pulse`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<Weight>,
    /// Weight for `flicker`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flicker: Option<Weight>,
    /// Weight for `grow`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow: Option<Weight>,
}

impl RandomModeWeights {
    /// Engine-wide default for a mode that has no configured weight.
    pub fn default_weight(mode: ConcreteMode) -> f64 {
        match mode {
            ConcreteMode::Rotate | ConcreteMode::Pulse => 0.3,
            ConcreteMode::Layered => 0.2,
            ConcreteMode::Flicker | ConcreteMode::Grow => 0.1,
            ConcreteMode::Title => 0.0,
        }
    }

    /// Build from plain numbers, in `[layered, rotate, pulse, flicker, grow]` order.
    pub fn from_numbers(w: [f64; 5]) -> Self {
        Self {
            layered: Some(w[0].into()),
            rotate: Some(w[1].into()),
            pulse: Some(w[2].into()),
            flicker: Some(w[3].into()),
            grow: Some(w[4].into()),
        }
    }

    fn slot(&self, mode: ConcreteMode) -> Option<&Weight> {
        match mode {
            ConcreteMode::Layered => self.layered.as_ref(),
            ConcreteMode::Rotate => self.rotate.as_ref(),
            ConcreteMode::Pulse => self.pulse.as_ref(),
            ConcreteMode::Flicker => self.flicker.as_ref(),
            ConcreteMode::Grow => self.grow.as_ref(),
            ConcreteMode::Title => None,
        }
    }

    /// Effective weights in [`ConcreteMode::SPAWNABLE`] order.
    ///
    /// Absent entries take the engine default; present but unparseable entries count as 0.
    pub fn resolved(&self) -> [f64; 5] {
        let mut out = [0.0; 5];
        for (slot, mode) in out.iter_mut().zip(ConcreteMode::SPAWNABLE) {
            *slot = match self.slot(mode) {
                None => Self::default_weight(mode),
                Some(w) => w.parse().unwrap_or_else(|| {
                    tracing::warn!(mode = mode.as_str(), value = ?w, "unparseable random-mode weight, using 0");
                    0.0
                }),
            };
        }
        out
    }

    /// Pick one concrete mode by weighted choice.
    ///
    /// Draws exactly one RNG value when at least one weight is positive. A degenerate
    /// configuration falls back to `pulse` without drawing.
    pub fn choose(&self, rng: &mut Mulberry32) -> ConcreteMode {
        let weights = self.resolved();
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 || !total.is_finite() {
            tracing::warn!(?weights, "all random-mode weights are zero or invalid, falling back to pulse");
            return ConcreteMode::Pulse;
        }

        let r = rng.next_f64() * total;
        let mut cumulative = 0.0;
        let mut last = ConcreteMode::Pulse;
        for (w, mode) in weights.iter().zip(ConcreteMode::SPAWNABLE) {
            if *w <= 0.0 {
                continue;
            }
            cumulative += *w;
            last = mode;
            if r < cumulative {
                return mode;
            }
        }
        last
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/random.rs"]
mod tests;
