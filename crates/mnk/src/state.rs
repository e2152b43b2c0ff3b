//! m,n,k game state.
//!
//! An m×n board on which players take turns placing their sign; the first
//! player to connect `k` signs in a row, column or diagonal wins. Tic-tac-toe
//! is (3, 3, 3) and gomoku is (15, 15, 5).

use crate::MnkAction;
use kinrow_core::{GameError, Result, State, Utility};
use std::fmt;

/// Sign used when rendering empty cells. Players may not use it.
pub const EMPTY_SIGN: char = '-';

/// The four line directions checked through the last move.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// m,n,k board position.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct MnkState {
    rows: usize,
    cols: usize,
    k: usize,

    /// Player signs in turn order.
    signs: Vec<char>,

    /// Row-major cells holding the index of the player who claimed them.
    board: Vec<Option<usize>>,

    moves_made: usize,
    last_action: Option<MnkAction>,

    /// Cached winner, set by the move that completed a line.
    winner: Option<usize>,
}

impl MnkState {
    /// Create an empty `rows` × `cols` board where `k` in a row wins.
    ///
    /// # Errors
    /// Returns `GameError::InvalidConfig` if `k` is zero or larger than
    /// `min(rows, cols)`, if fewer than two signs are given, or if a sign is
    /// repeated or equal to [`EMPTY_SIGN`].
    pub fn new(rows: usize, cols: usize, k: usize, signs: Vec<char>) -> Result<Self> {
        if k == 0 || k > rows.min(cols) {
            return Err(GameError::InvalidConfig(format!(
                "k = {} must be in 1..={} for a {}x{} board",
                k,
                rows.min(cols),
                rows,
                cols
            )));
        }
        if signs.len() < 2 {
            return Err(GameError::InvalidConfig(
                "at least two players are required".to_string(),
            ));
        }
        if signs.contains(&EMPTY_SIGN) {
            return Err(GameError::InvalidConfig(format!(
                "'{}' is reserved for empty cells",
                EMPTY_SIGN
            )));
        }
        for (i, sign) in signs.iter().enumerate() {
            if signs[..i].contains(sign) {
                return Err(GameError::InvalidConfig(format!(
                    "sign '{}' is used by more than one player",
                    sign
                )));
            }
        }

        Ok(Self {
            rows,
            cols,
            k,
            signs,
            board: vec![None; rows * cols],
            moves_made: 0,
            last_action: None,
            winner: None,
        })
    }

    /// Classic 3×3 tic-tac-toe with X to move.
    pub fn tic_tac_toe() -> Self {
        Self {
            rows: 3,
            cols: 3,
            k: 3,
            signs: vec!['X', 'O'],
            board: vec![None; 9],
            moves_made: 0,
            last_action: None,
            winner: None,
        }
    }

    /// 15×15 five-in-a-row with X to move.
    pub fn gomoku() -> Self {
        Self {
            rows: 15,
            cols: 15,
            k: 5,
            signs: vec!['X', 'O'],
            board: vec![None; 225],
            moves_made: 0,
            last_action: None,
            winner: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn signs(&self) -> &[char] {
        &self.signs
    }

    /// Sign of the player to move.
    pub fn current_sign(&self) -> char {
        self.signs[self.current_player()]
    }

    /// Player occupying a cell, or `None` if it is empty or off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.board[row * self.cols + col]
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn last_action(&self) -> Option<MnkAction> {
        self.last_action
    }

    /// Empty cells left on the board.
    pub fn remaining_moves(&self) -> usize {
        self.rows * self.cols - self.moves_made
    }

    /// Whether `action` may be played now: on the board, on an empty cell,
    /// by the player to move.
    pub fn is_legal(&self, action: &MnkAction) -> bool {
        action.row < self.rows
            && action.col < self.cols
            && action.player == self.current_player()
            && self.board[action.row * self.cols + action.col].is_none()
    }

    /// Count consecutive cells owned by `player` from (`row`, `col`) in
    /// direction (`dr`, `dc`), excluding the starting cell.
    fn run_length(&self, player: usize, row: usize, col: usize, dr: isize, dc: isize) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && c >= 0
            && (r as usize) < self.rows
            && (c as usize) < self.cols
            && self.board[r as usize * self.cols + c as usize] == Some(player)
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Whether the move just made completes `k` in a line.
    fn completes_line(&self, action: &MnkAction) -> bool {
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = self.run_length(action.player, action.row, action.col, dr, dc);
            let backward = self.run_length(action.player, action.row, action.col, -dr, -dc);
            1 + forward + backward >= self.k
        })
    }
}

impl State for MnkState {
    type Action = MnkAction;

    fn actions(&self) -> Vec<MnkAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        let player = self.current_player();
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .filter(|&(row, col)| self.board[row * self.cols + col].is_none())
            .map(|(row, col)| MnkAction::new(player, row, col))
            .collect()
    }

    fn apply(&mut self, action: &MnkAction) -> Result<()> {
        if self.is_terminal() {
            return Err(GameError::TerminalState);
        }
        if !self.is_legal(action) {
            return Err(GameError::IllegalAction(format!(
                "player {} at {} on {}x{} board",
                action.player, action, self.rows, self.cols
            )));
        }

        self.board[action.row * self.cols + action.col] = Some(action.player);
        self.moves_made += 1;
        self.last_action = Some(*action);
        if self.completes_line(action) {
            self.winner = Some(action.player);
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.moves_made == self.rows * self.cols
    }

    /// +1 for the winner and -1 for everyone else; all zeros on a draw.
    fn utility(&self) -> Result<Utility> {
        if !self.is_terminal() {
            return Err(GameError::NotTerminal);
        }
        Ok(match self.winner {
            Some(winner) => Utility::new(
                (0..self.signs.len())
                    .map(|p| if p == winner { 1.0 } else { -1.0 })
                    .collect(),
            ),
            None => Utility::zeros(self.signs.len()),
        })
    }

    fn num_players(&self) -> usize {
        self.signs.len()
    }

    fn current_player(&self) -> usize {
        self.moves_made % self.signs.len()
    }
}

impl fmt::Display for MnkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                let sign = match self.board[row * self.cols + col] {
                    Some(player) => self.signs[player],
                    None => EMPTY_SIGN,
                };
                write!(f, "{}", sign)?;
            }
        }
        Ok(())
    }
}
