//! Choosing among equally good candidates.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks one of `candidates` equally good options, returning its index.
///
/// Called with `candidates >= 1`; the result must be `< candidates`.
pub trait TieBreak {
    fn pick(&mut self, candidates: usize) -> usize;
}

impl<T: TieBreak + ?Sized> TieBreak for Box<T> {
    fn pick(&mut self, candidates: usize) -> usize {
        (**self).pick(candidates)
    }
}

/// Uniform random choice from an explicit, seedable generator.
#[derive(Clone, Debug)]
pub struct RandomTieBreak<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomTieBreak<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomTieBreak<ChaCha8Rng> {
    /// Reproducible tie-breaking.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Tie-breaking seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> TieBreak for RandomTieBreak<R> {
    fn pick(&mut self, candidates: usize) -> usize {
        if candidates <= 1 {
            0
        } else {
            self.rng.gen_range(0..candidates)
        }
    }
}

/// Always the first candidate, in expansion order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstTieBreak;

impl TieBreak for FirstTieBreak {
    fn pick(&mut self, _candidates: usize) -> usize {
        0
    }
}

/// Items sharing the maximum score, in iteration order.
///
/// NaN scores never win.
pub(crate) fn max_candidates<T>(scored: impl IntoIterator<Item = (T, f64)>) -> Vec<T> {
    let mut best_score = f64::NEG_INFINITY;
    let mut best = Vec::new();
    for (item, score) in scored {
        if score > best_score {
            best_score = score;
            best.clear();
            best.push(item);
        } else if score == best_score {
            best.push(item);
        }
    }
    best
}
