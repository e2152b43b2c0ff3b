//! Arena-allocated search tree.
//!
//! Using a Vec<Node> with indices gives O(1) upward walks for
//! backpropagation without Rc<RefCell<Node>> cycles.

use crate::node::{Node, NodeId};
use kinrow_core::State;

/// Arena-allocated search tree.
///
/// Built fresh for every search and dropped when the search returns.
#[derive(Debug)]
pub struct Tree<S: State> {
    nodes: Vec<Node<S>>,
}

impl<S: State> Tree<S> {
    /// Create a tree holding only a root for `state`.
    pub fn new(state: S) -> Self {
        Self {
            nodes: vec![Node::new(state, None)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Append a child of `parent` reached by `action`.
    pub(crate) fn add_child(&mut self, parent: NodeId, action: S::Action, state: S) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(state, Some(parent)));
        self.nodes[parent.0].children.push((action, id));
        id
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node<S> {
        self.get(NodeId::ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinrow_mnk::{MnkAction, MnkState};

    #[test]
    fn test_tree_creation() {
        let tree = Tree::new(MnkState::tic_tac_toe());
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root().parent(), None);
    }

    #[test]
    fn test_add_child_links_parent() {
        let state = MnkState::tic_tac_toe();
        let mut tree = Tree::new(state.clone());
        let action = MnkAction::new(0, 1, 1);
        let child_state = state.take_action(&action).unwrap();

        let id = tree.add_child(NodeId::ROOT, action, child_state);

        assert_eq!(id.index(), 1);
        assert_eq!(tree.get(id).parent(), Some(NodeId::ROOT));
        assert_eq!(tree.root().child(&action), Some(id));
    }

    #[test]
    fn test_grandchild_links_to_child() {
        let state = MnkState::tic_tac_toe();
        let mut tree = Tree::new(state.clone());

        let first = MnkAction::new(0, 0, 0);
        let s1 = state.take_action(&first).unwrap();
        let c1 = tree.add_child(NodeId::ROOT, first, s1.clone());

        let second = MnkAction::new(1, 2, 2);
        let s2 = s1.take_action(&second).unwrap();
        let c2 = tree.add_child(c1, second, s2);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(c2).parent(), Some(c1));
        assert_eq!(tree.get(c1).child(&second), Some(c2));
        assert!(tree.root().child(&second).is_none());
    }
}
