//! Seeded random number generation.
//!
//! Uses the `rand` crate with `SmallRng`, which is fast and seedable for
//! deterministic replay. The seed is remembered so snapshots can restore
//! a reproducible generator.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A seedable RNG that remembers its seed.
#[derive(Debug)]
pub struct GameRng {
    seed: Option<u64>,
    inner: SmallRng,
}

impl GameRng {
    /// Create from system entropy.
    pub fn new() -> Self {
        Self {
            seed: None,
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `Some`, entropy-backed otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::new(),
        }
    }

    /// The seed this generator was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
