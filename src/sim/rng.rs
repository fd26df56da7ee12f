//! Seeded linear-congruential random stream
//!
//! One stream per game. Every spawn decision draws from it in a fixed order,
//! so a given seed always replays the same run.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Default seed for a fresh run
pub const DEFAULT_SEED: u32 = 42;

/// 32-bit LCG (Numerical Recipes constants)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcgRng {
    state: u32,
}

impl Default for LcgRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl LcgRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform value in [0, 1): the post-update state divided by 2^32
    pub fn next_uniform(&mut self) -> f64 {
        f64::from(self.advance()) / TWO_POW_32
    }

    /// Uniform value in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        let t = self.next_uniform();
        let v = (f64::from(min) + (f64::from(max) - f64::from(min)) * t) as f32;
        // f32 rounding can land exactly on `max`
        if v >= max { min } else { v }
    }

    /// Index drawn with probability proportional to `weights[i]`.
    ///
    /// Falls back to the last index if floating point leaves a remainder.
    /// Empty input yields 0.
    pub fn weighted_pick(&mut self, weights: &[u32]) -> usize {
        let sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        let mut t = self.next_uniform() * sum as f64;
        for (i, &w) in weights.iter().enumerate() {
            t -= f64::from(w);
            if t <= 0.0 {
                return i;
            }
        }
        weights.len().saturating_sub(1)
    }
}

impl RngCore for LcgRng {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.advance());
        let lo = u64::from(self.advance());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for LcgRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
