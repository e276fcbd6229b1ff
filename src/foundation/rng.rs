/// Mulberry32: a 32-bit add-then-mix generator.
///
/// Every stochastic decision in the engine draws from one instance of this generator, so a run
/// is reproducible from its seed. Reseeding discards all previous state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    const INCREMENT: u32 = 0x6D2B_79F5;
    const TWO_POW_32: f64 = 4_294_967_296.0;

    /// Create a generator at `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Replace the generator state with `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / Self::TWO_POW_32
    }

    /// Uniform float in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// `base ± base * fraction`, uniformly distributed.
    pub fn jitter(&mut self, base: f64, fraction: f64) -> f64 {
        base + (self.next_f64() - 0.5) * 2.0 * base * fraction
    }

    /// `+1.0` or `-1.0` with equal probability.
    pub fn sign(&mut self) -> f64 {
        if self.chance(0.5) { 1.0 } else { -1.0 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
