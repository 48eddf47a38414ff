//! Level assignment for new nodes

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of node levels
///
/// Implementations must return a value in `0..=max_level`.
pub trait LevelGenerator: Send + Sync {
    fn random_level(&mut self, max_level: usize) -> usize;
}

/// Geometric level distribution: flip a fair coin and climb one level per
/// head, stopping at the first tail or at `max_level`
#[derive(Debug, Clone)]
pub struct CoinFlipLevels {
    rng: StdRng,
}

impl CoinFlipLevels {
    /// Reproducible sequence of levels
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl LevelGenerator for CoinFlipLevels {
    fn random_level(&mut self, max_level: usize) -> usize {
        let mut level = 0;
        while level < max_level && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level
    }
}
