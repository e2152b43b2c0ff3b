use std::fmt;

/// Placing `player`'s sign on cell (`row`, `col`).
///
/// Two actions are equal only if all three fields match, so the same cell
/// claimed by different players gives different actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MnkAction {
    /// Player index in turn order.
    pub player: usize,
    pub row: usize,
    pub col: usize,
}

impl MnkAction {
    pub fn new(player: usize, row: usize, col: usize) -> Self {
        Self { player, row, col }
    }
}

impl fmt::Display for MnkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
