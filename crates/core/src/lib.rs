//! kinrow core - game abstractions shared by search agents
//!
//! This crate defines the contract every game must satisfy for the search
//! engine to operate on it.
//!
//! # Types
//!
//! - [`State`] - A game position with legal actions and transitions
//! - [`Action`] - A value-typed move
//! - [`Utility`] - Per-player reward vector in turn order
//! - [`GameError`] - Rule-contract violations

mod error;
mod game;
mod types;

pub use error::{GameError, Result};
pub use game::{Action, State};
pub use types::Utility;
