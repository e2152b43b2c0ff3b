//! Search budget configuration.
//!
//! Every knob is a zero-argument provider rather than a fixed value, so a
//! caller can shrink the budget between moves (for example as a match clock
//! runs down) without rebuilding the engine. Providers are evaluated once at
//! the start of each search.

use crate::tie_break::{RandomTieBreak, TieBreak};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;
pub const DEFAULT_MAX_TIME: Duration = Duration::from_secs(1000);
pub const DEFAULT_SIMS_PER_ITER: u32 = 1;

type Provider<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Budget snapshot taken at the start of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBudget {
    /// Iteration cap.
    pub max_iterations: u64,

    /// Wall-clock cap. Checked between iterations, so it may be overshot by
    /// one iteration.
    pub max_time: Duration,

    /// Rollouts per iteration, each backpropagated separately.
    pub sims_per_iter: u32,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_time: DEFAULT_MAX_TIME,
            sims_per_iter: DEFAULT_SIMS_PER_ITER,
        }
    }
}

/// Budget and tie-breaking for [`Mcts::search`](crate::Mcts::search).
#[derive(Clone)]
pub struct SearchConfig {
    max_iterations: Provider<u64>,
    max_time: Provider<Duration>,
    sims_per_iter: Provider<u32>,
    tie_break: Provider<Box<dyn TieBreak + Send>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: Arc::new(|| DEFAULT_MAX_ITERATIONS),
            max_time: Arc::new(|| DEFAULT_MAX_TIME),
            sims_per_iter: Arc::new(|| DEFAULT_SIMS_PER_ITER),
            tie_break: Arc::new(|| Box::new(RandomTieBreak::from_entropy())),
        }
    }
}

impl SearchConfig {
    /// Default config capped at `max_iterations` iterations.
    pub fn with_iterations(max_iterations: u64) -> Self {
        Self::default().with_max_iterations(max_iterations)
    }

    /// Default config capped at `max_time` wall-clock time.
    pub fn with_time(max_time: Duration) -> Self {
        Self::default().with_max_time(max_time)
    }

    pub fn with_max_iterations(self, max_iterations: u64) -> Self {
        self.max_iterations_from(move || max_iterations)
    }

    pub fn with_max_time(self, max_time: Duration) -> Self {
        self.max_time_from(move || max_time)
    }

    pub fn with_sims_per_iter(self, sims_per_iter: u32) -> Self {
        self.sims_per_iter_from(move || sims_per_iter)
    }

    /// Reproducible uniform tie-breaking; every search restarts the sequence.
    pub fn seeded(self, seed: u64) -> Self {
        self.with_tie_break(move || RandomTieBreak::seeded(seed))
    }

    pub fn max_iterations_from<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        self.max_iterations = Arc::new(provider);
        self
    }

    pub fn max_time_from<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Duration + Send + Sync + 'static,
    {
        self.max_time = Arc::new(provider);
        self
    }

    pub fn sims_per_iter_from<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> u32 + Send + Sync + 'static,
    {
        self.sims_per_iter = Arc::new(provider);
        self
    }

    /// Use a fresh tie-break from `provider` for each search.
    pub fn with_tie_break<F, T>(mut self, provider: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: TieBreak + Send + 'static,
    {
        self.tie_break = Arc::new(move || Box::new(provider()) as Box<dyn TieBreak + Send>);
        self
    }

    /// Evaluate the budget providers.
    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_iterations: (self.max_iterations)(),
            max_time: (self.max_time)(),
            sims_per_iter: (self.sims_per_iter)(),
        }
    }

    /// Evaluate the tie-break provider.
    pub fn tie_break(&self) -> Box<dyn TieBreak + Send> {
        (self.tie_break)()
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Providers may be stateful, so they are not evaluated here
        f.debug_struct("SearchConfig").finish_non_exhaustive()
    }
}
