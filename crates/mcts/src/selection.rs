//! Child selection during tree descent.

use crate::error::SearchError;
use crate::node::{Node, NodeId, EPSILON};
use crate::tie_break::{max_candidates, RandomTieBreak, TieBreak};
use crate::tree::Tree;
use kinrow_core::{GameError, State};
use rand_chacha::ChaCha8Rng;

/// Default UCB1 exploration constant, √2.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Picks the child to descend into.
pub trait SelectionPolicy<S: State> {
    /// Return one child of `node`, which sits `depth` plies below the root.
    ///
    /// # Errors
    /// `SearchError::NoChildren` if `node` has no children; utility shape
    /// errors from the statistics propagate.
    fn select(&mut self, tree: &Tree<S>, node: NodeId, depth: usize) -> Result<NodeId, SearchError>;
}

/// UCB1 with perspective rotation.
///
/// For a child of a node at depth `d`:
///
/// ```text
/// score = U_d(child) / (n + ε) + C * sqrt(ln(N) / (n + ε))
/// ```
///
/// where `N` is the parent's visit count, `n` the child's, and `U_d` sums
/// the configured utility indices shifted by `d mod players`. Without
/// configured indices every entry is summed and no rotation applies.
#[derive(Clone, Debug)]
pub struct Ucb1<T = RandomTieBreak<ChaCha8Rng>> {
    utility_indices: Option<Vec<usize>>,
    exploration: f64,
    tie_break: T,
}

impl<T: TieBreak> Ucb1<T> {
    pub fn new(tie_break: T) -> Self {
        Self {
            utility_indices: None,
            exploration: DEFAULT_EXPLORATION,
            tie_break,
        }
    }

    /// Maximize the sum of these players' utilities (rotated with depth).
    ///
    /// An empty list means "all players".
    pub fn with_utility_indices(mut self, indices: Vec<usize>) -> Self {
        self.utility_indices = if indices.is_empty() {
            None
        } else {
            Some(indices)
        };
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    pub fn utility_indices(&self) -> Option<&[usize]> {
        self.utility_indices.as_deref()
    }

    /// UCB1 score of `child` under a parent with `parent_visits` visits at
    /// `depth`.
    pub fn score<S: State>(
        &self,
        parent_visits: u32,
        child: &Node<S>,
        depth: usize,
    ) -> Result<f64, GameError> {
        let exploitation = child.expected_utility(self.utility_indices.as_deref(), depth)?;
        let parent_visits = parent_visits.max(1) as f64;
        let exploration = self.exploration
            * (parent_visits.ln() / (child.visits() as f64 + EPSILON)).sqrt();
        Ok(exploitation + exploration)
    }
}

impl Ucb1<RandomTieBreak<ChaCha8Rng>> {
    /// UCB1 with reproducible random tie-breaking.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomTieBreak::seeded(seed))
    }
}

impl Default for Ucb1<RandomTieBreak<ChaCha8Rng>> {
    fn default() -> Self {
        Self::new(RandomTieBreak::from_entropy())
    }
}

impl<S: State, T: TieBreak> SelectionPolicy<S> for Ucb1<T> {
    fn select(&mut self, tree: &Tree<S>, node: NodeId, depth: usize) -> Result<NodeId, SearchError> {
        let parent = tree.get(node);
        match parent.children() {
            [] => return Err(SearchError::NoChildren(node)),
            [(_, only)] => return Ok(*only),
            _ => {}
        }

        let mut scored = Vec::with_capacity(parent.children().len());
        for (_, child_id) in parent.children() {
            let score = self.score(parent.visits(), tree.get(*child_id), depth)?;
            scored.push((*child_id, score));
        }

        let best = max_candidates(scored);
        if best.is_empty() {
            // Every score was NaN
            return Ok(parent.children()[0].1);
        }
        let n = best.len();
        Ok(best[self.tie_break.pick(n).min(n - 1)])
    }
}
