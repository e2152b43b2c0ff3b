//! The MCTS engine.
//!
//! Each iteration selects a leaf with the selection policy, expands it once
//! it has been visited, runs the rollout policy on the chosen node and
//! backpropagates every result to the root. After each iteration the current
//! best root action is published, so the search can be cut off at any point
//! and still answer.
//!
//! [`Mcts::search`] runs the loop on a scoped worker thread and supervises
//! it against the wall-clock budget.

use crate::{
    combine::{ComponentSum, UtilityCombine},
    config::{SearchBudget, SearchConfig},
    error::SearchError,
    expansion::{ExpansionPolicy, LinearExpansion},
    node::NodeId,
    rollout::{RandomRollout, RolloutPolicy},
    selection::{SelectionPolicy, Ucb1},
    tie_break::{max_candidates, TieBreak},
    tree::Tree,
};
use kinrow_core::{GameError, State, Utility};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// How the returned action was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision<A> {
    /// Published by a completed iteration.
    Best(A),

    /// No iteration published anything before the budget ran out; this is
    /// the expansion policy's first action for the root.
    Fallback(A),
}

impl<A> Decision<A> {
    pub fn action(&self) -> &A {
        match self {
            Decision::Best(action) | Decision::Fallback(action) => action,
        }
    }

    pub fn into_action(self) -> A {
        match self {
            Decision::Best(action) | Decision::Fallback(action) => action,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Decision::Fallback(_))
    }
}

/// Result of an MCTS search.
#[derive(Clone, Debug)]
pub struct SearchResult<A> {
    pub decision: Decision<A>,

    /// Completed iterations.
    pub iterations: u64,

    /// Root visit count, `iterations * sims_per_iter`.
    pub root_visits: u32,

    pub elapsed: Duration,
}

impl<A> SearchResult<A> {
    pub fn action(&self) -> &A {
        self.decision.action()
    }

    pub fn into_action(self) -> A {
        self.decision.into_action()
    }

    /// True when the budget expired before any iteration published.
    pub fn is_degraded(&self) -> bool {
        self.decision.is_fallback()
    }
}

/// Best root action after a given iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Published<A> {
    pub action: A,

    /// 1-based iteration that produced this value.
    pub iteration: u64,
}

/// Monte Carlo Tree Search.
///
/// Generic over:
/// - `S`: The game state
/// - `Sel`: Child selection during descent
/// - `Exp`: Which children a leaf receives
/// - `Roll`: Utility estimate for a node
/// - `Comb`: How simulation results accumulate
///
/// A fresh tree is built for every [`search`](Self::search) and dropped when
/// it returns.
pub struct Mcts<
    S,
    Sel = Ucb1,
    Exp = LinearExpansion,
    Roll = RandomRollout<ChaCha8Rng>,
    Comb = ComponentSum,
> {
    selection: Sel,
    expansion: Exp,
    rollout: Roll,
    combine: Comb,
    utility_indices: Option<Vec<usize>>,
    _state: PhantomData<fn() -> S>,
}

impl<S, Sel, Exp, Roll> Mcts<S, Sel, Exp, Roll, ComponentSum>
where
    S: State,
    Sel: SelectionPolicy<S>,
    Exp: ExpansionPolicy<S>,
    Roll: RolloutPolicy<S>,
{
    /// Create an engine that sums utilities component-wise.
    pub fn new(selection: Sel, expansion: Exp, rollout: Roll) -> Self {
        Self {
            selection,
            expansion,
            rollout,
            combine: ComponentSum,
            utility_indices: None,
            _state: PhantomData,
        }
    }
}

impl<S, Sel, Exp, Roll, Comb> Mcts<S, Sel, Exp, Roll, Comb>
where
    S: State,
    Sel: SelectionPolicy<S>,
    Exp: ExpansionPolicy<S>,
    Roll: RolloutPolicy<S>,
    Comb: UtilityCombine,
{
    /// Replace the utility combination operator.
    pub fn with_combine<C: UtilityCombine>(self, combine: C) -> Mcts<S, Sel, Exp, Roll, C> {
        Mcts {
            selection: self.selection,
            expansion: self.expansion,
            rollout: self.rollout,
            combine,
            utility_indices: self.utility_indices,
            _state: PhantomData,
        }
    }

    /// Players whose summed utility the best root action maximizes.
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

    pub fn utility_indices(&self) -> Option<&[usize]> {
        self.utility_indices.as_deref()
    }

    /// Search from `state` within the budget in `config`.
    ///
    /// # Errors
    /// - `SearchError::NoLegalActions` if `state` is terminal or the
    ///   expansion policy offers nothing to fall back on.
    /// - `SearchError::Game` if a collaborator broke the game contract.
    ///
    /// A panic inside a collaborator is resumed on the calling thread.
    pub fn search(
        &mut self,
        state: &S,
        config: &SearchConfig,
    ) -> Result<SearchResult<S::Action>, SearchError>
    where
        Sel: Send,
        Exp: Send,
        Roll: Send,
        Comb: Send,
    {
        if state.is_terminal() {
            return Err(SearchError::NoLegalActions);
        }

        let budget = config.budget();
        let mut tie_break = config.tie_break();
        let start = Instant::now();
        // Too far in the future to represent means no deadline
        let deadline = start.checked_add(budget.max_time);
        let cancel = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel();
        let tree = Tree::new(state.clone());

        debug!(
            max_iterations = budget.max_iterations,
            max_time = ?budget.max_time,
            sims_per_iter = budget.sims_per_iter,
            "starting search"
        );

        let engine = &mut *self;
        let (outcome, latest) = thread::scope(|scope| {
            let cancel = &cancel;
            let worker = scope.spawn(move || {
                let mut tree = tree;
                let iterations = engine.run_iterations(
                    &mut tree,
                    budget,
                    deadline,
                    &mut *tie_break,
                    cancel,
                    |published| {
                        // The receiver outlives the worker
                        let _ = tx.send(published);
                    },
                )?;
                Ok::<_, SearchError>((iterations, tree.root().visits()))
            });

            let mut latest = None;
            loop {
                let received = match deadline {
                    Some(deadline) => {
                        rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                    }
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };
                match received {
                    Ok(published) => latest = Some(published),
                    Err(RecvTimeoutError::Timeout) => {
                        debug!("deadline reached, cancelling worker");
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            cancel.store(true, Ordering::Relaxed);
            let outcome = worker.join();
            // Anything published while the worker wound down is still valid
            (outcome, rx.try_iter().last().or(latest))
        });

        let (iterations, root_visits) = match outcome {
            Ok(result) => result?,
            Err(payload) => std::panic::resume_unwind(payload),
        };
        let elapsed = start.elapsed();

        let decision = match latest {
            Some(published) => Decision::Best(published.action),
            None => {
                let action = self
                    .expansion
                    .expand(state)
                    .into_iter()
                    .next()
                    .ok_or(SearchError::NoLegalActions)?;
                warn!(
                    iterations,
                    ?elapsed,
                    ?action,
                    "no iteration completed in budget, falling back to first action"
                );
                Decision::Fallback(action)
            }
        };

        debug!(iterations, root_visits, ?elapsed, "search finished");

        Ok(SearchResult {
            decision,
            iterations,
            root_visits,
            elapsed,
        })
    }

    /// Run iterations on `tree` until a bound is hit, publishing the best
    /// root action after each one that leaves the root with children.
    ///
    /// Bounds (iteration cap, `deadline`, `cancel`) are checked only before
    /// starting an iteration. Returns the number of completed iterations.
    pub fn run_iterations<T, P>(
        &mut self,
        tree: &mut Tree<S>,
        budget: SearchBudget,
        deadline: Option<Instant>,
        tie_break: &mut T,
        cancel: &AtomicBool,
        mut publish: P,
    ) -> Result<u64, SearchError>
    where
        T: TieBreak + ?Sized,
        P: FnMut(Published<S::Action>),
    {
        let mut iterations = 0;
        while iterations < budget.max_iterations {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            if matches!(deadline, Some(deadline) if Instant::now() >= deadline) {
                break;
            }

            self.iterate(tree, budget.sims_per_iter)?;
            iterations += 1;

            if let Some(action) = self.best_action(tree, tie_break)? {
                trace!(iteration = iterations, ?action, "published best action");
                publish(Published {
                    action,
                    iteration: iterations,
                });
            }
        }
        Ok(iterations)
    }

    /// One select, expand, simulate, backpropagate pass.
    ///
    /// Returns the node that was simulated from.
    pub fn iterate(&mut self, tree: &mut Tree<S>, sims: u32) -> Result<NodeId, SearchError> {
        let leaf = self.select_leaf(tree)?;

        let node = tree.get(leaf);
        let should_expand =
            node.visits() > 0 && !node.is_expanded() && !node.state().is_terminal();
        let target = if should_expand {
            self.expand(tree, leaf)?.unwrap_or(leaf)
        } else {
            leaf
        };

        for _ in 0..sims {
            let node = tree.get(target);
            let sample = self.rollout.rollout(node.state())?;
            let players = node.state().num_players();
            if sample.len() != players {
                return Err(GameError::UtilityShape {
                    expected: players,
                    found: sample.len(),
                }
                .into());
            }
            self.backpropagate(tree, target, &sample)?;
        }
        Ok(target)
    }

    /// Descend from the root to a leaf.
    fn select_leaf(&mut self, tree: &Tree<S>) -> Result<NodeId, SearchError> {
        let mut current = NodeId::ROOT;
        let mut depth = 0;
        while !tree.get(current).is_leaf() {
            current = self.selection.select(tree, current, depth)?;
            depth += 1;
        }
        Ok(current)
    }

    /// Create one child per distinct action the expansion policy returns.
    ///
    /// Returns the first child in expansion order, or `None` if the policy
    /// returned no actions.
    ///
    /// # Errors
    /// `SearchError::AlreadyExpanded` on a second call for the same node.
    pub fn expand(&self, tree: &mut Tree<S>, node: NodeId) -> Result<Option<NodeId>, SearchError> {
        let parent = tree.get(node);
        if parent.is_expanded() {
            return Err(SearchError::AlreadyExpanded(node));
        }

        let actions = self.expansion.expand(parent.state());
        let mut seen = HashSet::with_capacity(actions.len());
        let mut children = Vec::with_capacity(actions.len());
        for action in actions {
            if !seen.insert(action.clone()) {
                continue;
            }
            let child = parent.state().take_action(&action)?;
            children.push((action, child));
        }

        tree.get_mut(node).expanded = true;
        let mut first = None;
        for (action, state) in children {
            let id = tree.add_child(node, action, state);
            first.get_or_insert(id);
        }
        Ok(first)
    }

    /// Add one visit and `sample` to every node from `from` up to the root.
    fn backpropagate(
        &self,
        tree: &mut Tree<S>,
        from: NodeId,
        sample: &Utility,
    ) -> Result<(), SearchError> {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = tree.get_mut(id);
            let combined = match &node.utility {
                Some(accumulated) => self.combine.combine(accumulated, sample)?,
                None => sample.clone(),
            };
            node.utility = Some(combined);
            node.visits += 1;
            current = node.parent;
        }
        Ok(())
    }

    /// Root action with the highest expected utility, if the root has
    /// children.
    pub fn best_action<T>(
        &self,
        tree: &Tree<S>,
        tie_break: &mut T,
    ) -> Result<Option<S::Action>, SearchError>
    where
        T: TieBreak + ?Sized,
    {
        let root = tree.root();
        let Some((first, _)) = root.children().first() else {
            return Ok(None);
        };

        let mut scored = Vec::with_capacity(root.children().len());
        for (action, id) in root.children() {
            let value = tree
                .get(*id)
                .expected_utility(self.utility_indices.as_deref(), 0)?;
            scored.push((action, value));
        }

        let best = max_candidates(scored);
        let action = match best.len() {
            0 => first,
            n => best[tie_break.pick(n).min(n - 1)],
        };
        Ok(Some(action.clone()))
    }
}
