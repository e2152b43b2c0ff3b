//! Rollout (simulation) policies.
//!
//! The engine treats a rollout as an opaque function from a position to a
//! utility estimate. Two generic playouts are provided; game-specific
//! heuristics plug into [`TruncatedRollout`].

use kinrow_core::{GameError, State, Utility};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Estimates the utility of a position.
pub trait RolloutPolicy<S: State> {
    /// Returns a utility vector with one entry per player.
    ///
    /// Rule violations raised while playing out propagate to the caller.
    fn rollout(&mut self, state: &S) -> Result<Utility, GameError>;
}

impl<S, F> RolloutPolicy<S> for F
where
    S: State,
    F: FnMut(&S) -> Result<Utility, GameError>,
{
    fn rollout(&mut self, state: &S) -> Result<Utility, GameError> {
        self(state)
    }
}

/// Uniformly random playout to the end of the game.
///
/// Copies the position once, then advances the copy in place.
#[derive(Clone, Debug)]
pub struct RandomRollout<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomRollout<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomRollout<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<S: State, R: Rng> RolloutPolicy<S> for RandomRollout<R> {
    fn rollout(&mut self, state: &S) -> Result<Utility, GameError> {
        let mut state = state.clone();
        while !state.is_terminal() {
            let actions = state.actions();
            if actions.is_empty() {
                break;
            }
            let action = &actions[self.rng.gen_range(0..actions.len())];
            state.apply(action)?;
        }
        state.utility()
    }
}

/// Random playout for at most `depth` moves, then a heuristic score.
///
/// If the game ends first, the exact terminal utility is returned instead.
pub struct TruncatedRollout<R, H> {
    rng: R,
    depth: usize,
    heuristic: H,
}

impl<R: Rng, H> TruncatedRollout<R, H> {
    pub fn new(rng: R, depth: usize, heuristic: H) -> Self {
        Self {
            rng,
            depth,
            heuristic,
        }
    }
}

impl<S, R, H> RolloutPolicy<S> for TruncatedRollout<R, H>
where
    S: State,
    R: Rng,
    H: FnMut(&S) -> Utility,
{
    fn rollout(&mut self, state: &S) -> Result<Utility, GameError> {
        let mut state = state.clone();
        for _ in 0..self.depth {
            if state.is_terminal() {
                break;
            }
            let actions = state.actions();
            if actions.is_empty() {
                break;
            }
            let action = &actions[self.rng.gen_range(0..actions.len())];
            state.apply(action)?;
        }

        if state.is_terminal() {
            state.utility()
        } else {
            Ok((self.heuristic)(&state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinrow_mnk::{MnkAction, MnkState};

    #[test]
    fn test_random_rollout_reaches_terminal() {
        let mut rollout = RandomRollout::seeded(42);
        let state = MnkState::tic_tac_toe();

        for _ in 0..20 {
            let utility = rollout.rollout(&state).unwrap();
            assert_eq!(utility.len(), 2);
            // Zero-sum for win/loss, all zero on a draw
            assert!(utility.total() == 0.0);
        }
    }

    #[test]
    fn test_random_rollout_leaves_input_untouched() {
        let mut rollout = RandomRollout::seeded(1);
        let state = MnkState::tic_tac_toe();
        let before = state.clone();
        rollout.rollout(&state).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_random_rollout_on_terminal_state() {
        let mut state = MnkState::tic_tac_toe();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            let action = MnkAction::new(state.current_player(), row, col);
            state.apply(&action).unwrap();
        }
        let mut rollout = RandomRollout::seeded(0);
        assert_eq!(rollout.rollout(&state).unwrap().as_slice(), &[1.0, -1.0]);
    }

    #[test]
    fn test_random_rollout_deterministic() {
        let state = MnkState::new(5, 5, 4, vec!['X', 'O']).unwrap();
        let mut a = RandomRollout::seeded(2024);
        let mut b = RandomRollout::seeded(2024);
        for _ in 0..10 {
            assert_eq!(a.rollout(&state).unwrap(), b.rollout(&state).unwrap());
        }
    }

    #[test]
    fn test_truncated_rollout_uses_heuristic() {
        let mut calls = 0;
        let mut rollout = TruncatedRollout::new(
            ChaCha8Rng::seed_from_u64(5),
            2,
            |state: &MnkState| {
                calls += 1;
                Utility::new(vec![state.remaining_moves() as f64, 0.0])
            },
        );
        let utility = rollout.rollout(&MnkState::gomoku()).unwrap();
        drop(rollout);

        assert_eq!(utility.as_slice(), &[223.0, 0.0]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_truncated_rollout_prefers_terminal_utility() {
        let state = MnkState::new(1, 1, 1, vec!['X', 'O']).unwrap();
        let mut rollout = TruncatedRollout::new(
            ChaCha8Rng::seed_from_u64(5),
            3,
            |_: &MnkState| Utility::new(vec![9.0, 9.0]),
        );
        assert_eq!(rollout.rollout(&state).unwrap().as_slice(), &[1.0, -1.0]);
    }

    #[test]
    fn test_closure_rollout() {
        let mut constant =
            |_: &MnkState| -> Result<Utility, GameError> { Ok(Utility::new(vec![0.5, -0.5])) };
        let utility = constant.rollout(&MnkState::tic_tac_toe()).unwrap();
        assert_eq!(utility.as_slice(), &[0.5, -0.5]);
    }
}
