//! kinrow MNK - generalized k-in-a-row on an m×n board
//!
//! Implements the [`kinrow_core::State`] contract so search agents can play
//! tic-tac-toe, gomoku and anything in between, with two or more players.
//!
//! # Example
//!
//! ```
//! use kinrow_core::State;
//! use kinrow_mnk::{MnkAction, MnkState};
//!
//! let state = MnkState::tic_tac_toe();
//! let next = state.take_action(&MnkAction::new(0, 1, 1)).unwrap();
//! assert_eq!(next.current_player(), 1);
//! assert_eq!(state.actions().len(), 9);
//! ```

mod action;
mod state;

pub use action::MnkAction;
pub use state::{MnkState, EMPTY_SIGN};
