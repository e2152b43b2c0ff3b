//! Line-potential evaluation for unfinished m,n,k positions.
//!
//! Scores every length-k window on the board. A window that holds signs of
//! a single player is still winnable for that player and counts towards
//! them in proportion to how full it is; mixed windows are dead and count
//! for nobody. A player's utility is their own potential minus the mean
//! potential of everybody else, so the vector sums to zero.

use kinrow_core::{State, Utility};
use kinrow_mnk::MnkState;

/// Right, down, down-right, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

pub fn line_potential(state: &MnkState) -> Utility {
    let players = state.num_players();
    let potential = window_potential(state);

    if players < 2 {
        return Utility::zeros(players);
    }
    let total: f64 = potential.iter().sum();
    let others = (players - 1) as f64;
    Utility::new(
        potential
            .iter()
            .map(|own| own - (total - own) / others)
            .collect(),
    )
}

/// Summed fill ratio of the live windows owned by each player.
fn window_potential(state: &MnkState) -> Vec<f64> {
    let k = state.k();
    let mut potential = vec![0.0; state.num_players()];

    for row in 0..state.rows() {
        for col in 0..state.cols() {
            for (dr, dc) in DIRECTIONS {
                let Some(cells) = window(state, row, col, dr, dc) else {
                    continue;
                };
                let mut owner = None;
                let mut count = 0;
                let mut live = true;
                for cell in cells {
                    if let Some(player) = cell {
                        match owner {
                            Some(existing) if existing != player => {
                                live = false;
                                break;
                            }
                            _ => owner = Some(player),
                        }
                        count += 1;
                    }
                }
                if let (true, Some(player)) = (live, owner) {
                    potential[player] += count as f64 / k as f64;
                }
            }
        }
    }
    potential
}

/// The k cells starting at (row, col) in direction (dr, dc), if in bounds.
fn window(
    state: &MnkState,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
) -> Option<Vec<Option<usize>>> {
    let span = state.k() as isize - 1;
    let end_row = row as isize + dr * span;
    let end_col = col as isize + dc * span;
    if end_row < 0
        || end_col < 0
        || end_row >= state.rows() as isize
        || end_col >= state.cols() as isize
    {
        return None;
    }

    Some(
        (0..state.k() as isize)
            .map(|step| {
                let r = (row as isize + dr * step) as usize;
                let c = (col as isize + dc * step) as usize;
                state.get(r, c)
            })
            .collect(),
    )
}
