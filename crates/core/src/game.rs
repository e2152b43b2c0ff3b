use crate::{Result, Utility};
use std::fmt::Debug;
use std::hash::Hash;

/// A single legal move, compared and hashed by value.
pub trait Action: Clone + Eq + Hash + Debug + Send {}

impl<T: Clone + Eq + Hash + Debug + Send> Action for T {}

/// A position in a turn-based, perfect-information game.
///
/// This is the whole contract the search engine relies on. The `Clone`
/// bound is the explicit copy used whenever the caller must keep the
/// original position (search-tree construction); rollouts use the
/// destructive [`State::apply`] / [`State::into_next`] path instead.
pub trait State: Clone + Send {
    /// The move type for this game.
    type Action: Action;

    /// All legal actions from this position, in a stable order.
    ///
    /// Empty for a terminal state.
    fn actions(&self) -> Vec<Self::Action>;

    /// Applies an action in place.
    ///
    /// # Errors
    /// Returns [`GameError::TerminalState`](crate::GameError::TerminalState)
    /// if the game is over, or
    /// [`GameError::IllegalAction`](crate::GameError::IllegalAction) if the
    /// action is not legal here. The receiver is left untouched on error.
    fn apply(&mut self, action: &Self::Action) -> Result<()>;

    /// Returns true once the game has ended.
    fn is_terminal(&self) -> bool;

    /// Per-player rewards in turn order. Only defined for terminal states.
    ///
    /// # Errors
    /// Returns [`GameError::NotTerminal`](crate::GameError::NotTerminal)
    /// before the game has ended.
    fn utility(&self) -> Result<Utility>;

    /// Number of players, i.e. the length of every utility vector.
    fn num_players(&self) -> usize;

    /// Index (in turn order) of the player to move.
    fn current_player(&self) -> usize;

    /// Returns the successor state, leaving `self` unmodified.
    fn take_action(&self, action: &Self::Action) -> Result<Self> {
        let mut next = self.clone();
        next.apply(action)?;
        Ok(next)
    }

    /// Consumes `self` and returns it advanced by `action`.
    ///
    /// The caller forfeits the original position; no copy is made.
    fn into_next(mut self, action: &Self::Action) -> Result<Self> {
        self.apply(action)?;
        Ok(self)
    }
}
