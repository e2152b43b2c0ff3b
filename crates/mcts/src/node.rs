//! MCTS node types for tree storage.
//!
//! Nodes live in an arena and refer to each other by index, so the parent
//! back-reference is a plain [`NodeId`] rather than an owning pointer.

use kinrow_core::{GameError, State, Utility};

/// Added to visit counts before dividing, so unvisited children score finitely.
pub const EPSILON: f64 = 1e-5;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the search tree.
///
/// Owns a snapshot of its position and accumulates statistics from every
/// backpropagation pass that goes through it. Only the engine's expansion
/// and backpropagation steps write to a node.
#[derive(Clone, Debug)]
pub struct Node<S: State> {
    pub(crate) state: S,

    /// `None` only for the root.
    pub(crate) parent: Option<NodeId>,

    /// Children in expansion order, one per distinct action.
    pub(crate) children: Vec<(S::Action, NodeId)>,

    pub(crate) visits: u32,

    /// Combined simulation results, absent until the first backpropagation.
    pub(crate) utility: Option<Utility>,

    /// Set once expansion has run, even if it produced no children.
    pub(crate) expanded: bool,
}

impl<S: State> Node<S> {
    pub(crate) fn new(state: S, parent: Option<NodeId>) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            visits: 0,
            utility: None,
            expanded: false,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[(S::Action, NodeId)] {
        &self.children
    }

    /// Child reached by `action`, if it has been expanded.
    pub fn child(&self, action: &S::Action) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn utility(&self) -> Option<&Utility> {
        self.utility.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// A leaf has no children or wraps a terminal position.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() || self.state.is_terminal()
    }

    /// Mean accumulated utility of the selected players.
    ///
    /// With `indices`, sums those entries after rotating them by `shift`;
    /// without, sums every entry. A node that was never backpropagated
    /// through counts as zero.
    ///
    /// # Errors
    /// Returns `GameError::UtilityIndex` if an index exceeds the number of
    /// players.
    pub fn expected_utility(
        &self,
        indices: Option<&[usize]>,
        shift: usize,
    ) -> Result<f64, GameError> {
        let total = match (&self.utility, indices) {
            (None, _) => 0.0,
            (Some(utility), Some(indices)) => utility.sum_indices(indices, shift)?,
            (Some(utility), None) => utility.total(),
        };
        Ok(total / (self.visits as f64 + EPSILON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinrow_mnk::{MnkAction, MnkState};

    #[test]
    fn test_new_node_is_leaf() {
        let node = Node::new(MnkState::tic_tac_toe(), None);
        assert!(node.is_leaf());
        assert!(!node.is_expanded());
        assert_eq!(node.visits(), 0);
        assert!(node.utility().is_none());
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn test_terminal_node_is_leaf_even_with_children() {
        let mut state = MnkState::new(1, 1, 1, vec!['X', 'O']).unwrap();
        state.apply(&MnkAction::new(0, 0, 0)).unwrap();
        let mut node = Node::new(state.clone(), None);
        node.children.push((MnkAction::new(1, 0, 0), NodeId(1)));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_expected_utility_unvisited() {
        let node = Node::new(MnkState::tic_tac_toe(), None);
        assert_eq!(node.expected_utility(None, 0).unwrap(), 0.0);
        assert_eq!(node.expected_utility(Some(&[1]), 1).unwrap(), 0.0);
    }

    #[test]
    fn test_expected_utility_with_indices() {
        let mut node = Node::new(MnkState::tic_tac_toe(), None);
        node.visits = 4;
        node.utility = Some(Utility::new(vec![2.0, -2.0]));

        let all = node.expected_utility(None, 0).unwrap();
        assert!(all.abs() < 1e-9);

        let first = node.expected_utility(Some(&[0]), 0).unwrap();
        assert!((first - 0.5).abs() < 1e-5);

        let rotated = node.expected_utility(Some(&[0]), 1).unwrap();
        assert!((rotated + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_expected_utility_bad_index() {
        let mut node = Node::new(MnkState::tic_tac_toe(), None);
        node.visits = 1;
        node.utility = Some(Utility::zeros(2));
        assert!(node.expected_utility(Some(&[5]), 0).is_err());
    }
}
