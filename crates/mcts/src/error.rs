use crate::node::NodeId;
use kinrow_core::GameError;
use thiserror::Error;

/// Errors surfaced by a search.
///
/// Running out of budget is not an error; see
/// [`Decision::Fallback`](crate::Decision::Fallback).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// A collaborator broke the game contract.
    #[error("Game rule violation: {0}")]
    Game(#[from] GameError),

    /// The root has no legal action, so there is nothing to return.
    #[error("No legal actions from the root state")]
    NoLegalActions,

    #[error("Node {} has already been expanded", .0.index())]
    AlreadyExpanded(NodeId),

    #[error("Node {} has no children to select from", .0.index())]
    NoChildren(NodeId),
}

/// Convenience Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
