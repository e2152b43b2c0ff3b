//! Anytime Monte Carlo Tree Search.
//!
//! This crate provides a generic MCTS implementation that works with any
//! game implementing the `kinrow_core::State` contract.
//!
//! # Features
//!
//! - **Generic**: Works with any `State` implementation
//! - **UCB1 Selection**: Perspective rotation by depth for multi-player games
//! - **Pluggable Policies**: Selection, expansion, rollout and utility
//!   combination are all traits, and closures implement the last three
//! - **Anytime**: The best root action is published after every iteration,
//!   so a time-boxed search always has an answer
//! - **Reproducible**: Every random choice goes through a seedable generator
//!
//! # Example
//!
//! ```
//! use kinrow_core::State;
//! use kinrow_mcts::{LinearExpansion, Mcts, RandomRollout, SearchConfig, Ucb1};
//! use kinrow_mnk::MnkState;
//!
//! let state = MnkState::tic_tac_toe();
//! let player = state.current_player();
//!
//! let mut mcts = Mcts::new(
//!     Ucb1::seeded(42).with_utility_indices(vec![player]),
//!     LinearExpansion,
//!     RandomRollout::seeded(42),
//! )
//! .with_utility_indices(vec![player]);
//!
//! let config = SearchConfig::with_iterations(200).seeded(42);
//! let result = mcts.search(&state, &config)?;
//!
//! println!("Best action: {}", result.action());
//! println!("Root visits: {}", result.root_visits);
//! assert!(!result.is_degraded());
//! # Ok::<(), kinrow_mcts::SearchError>(())
//! ```

pub mod combine;
pub mod config;
mod error;
pub mod expansion;
mod node;
pub mod rollout;
pub mod search;
pub mod selection;
pub mod tie_break;
mod tree;

pub use combine::{ComponentSum, UtilityCombine};
pub use config::{SearchBudget, SearchConfig};
pub use error::{Result, SearchError};
pub use expansion::{ExpansionPolicy, LinearExpansion};
pub use node::{Node, NodeId, EPSILON};
pub use rollout::{RandomRollout, RolloutPolicy, TruncatedRollout};
pub use search::{Decision, Mcts, Published, SearchResult};
pub use selection::{SelectionPolicy, Ucb1};
pub use tie_break::{FirstTieBreak, RandomTieBreak, TieBreak};
pub use tree::Tree;
