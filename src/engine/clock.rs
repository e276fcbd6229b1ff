use std::time::{Duration, Instant};

/// Source of frame timestamps.
pub trait FrameClock {
    /// Time since an arbitrary fixed origin. Must not go backwards.
    fn now(&mut self) -> Duration;
}

/// Wall-clock time from [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that advances by a fixed step on every query, for headless and reproducible runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedStepClock {
    step: Duration,
    t: Duration,
}

impl FixedStepClock {
    /// Clock advancing `step` per query.
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            t: Duration::ZERO,
        }
    }

    /// Clock stepping at `fps` frames per second. Non-positive rates fall back to 60.
    pub fn from_fps(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self::new(Duration::from_secs_f64(1.0 / fps))
    }
}

impl FrameClock for FixedStepClock {
    fn now(&mut self) -> Duration {
        self.t += self.step;
        self.t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/clock.rs"]
mod tests;
