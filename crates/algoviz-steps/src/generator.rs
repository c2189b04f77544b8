//! Random input arrays.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Longest array that will be generated.
pub const MAX_LEN: usize = 1000;

/// Shape of a generated array. Value bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayConfig {
    pub len: usize,
    pub min: i64,
    pub max: i64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            len: 50,
            min: 5,
            max: 100,
        }
    }
}

impl ArrayConfig {
    /// Same bounds, different length, clamped to [`MAX_LEN`].
    #[must_use]
    pub fn with_len(self, len: usize) -> Self {
        Self {
            len: len.min(MAX_LEN),
            ..self
        }
    }
}

/// Generate a fresh array from `rng`.
pub fn generate<R: Rng>(config: &ArrayConfig, rng: &mut R) -> Vec<i64> {
    let (min, max) = if config.min <= config.max {
        (config.min, config.max)
    } else {
        (config.max, config.min)
    };
    (0..config.len.min(MAX_LEN))
        .map(|_| rng.gen_range(min..=max))
        .collect()
}

/// Generate from the thread-local RNG.
pub fn generate_random(config: &ArrayConfig) -> Vec<i64> {
    generate(config, &mut rand::thread_rng())
}

/// Generate deterministically from a seed.
pub fn generate_seeded(config: &ArrayConfig, seed: u64) -> Vec<i64> {
    generate(config, &mut StdRng::seed_from_u64(seed))
}
