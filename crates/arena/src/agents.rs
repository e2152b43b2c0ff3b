//! Players that can sit at an m,n,k board.

use crate::heuristic::line_potential;
use anyhow::{bail, Context, Result};
use kinrow_core::State;
use kinrow_mcts::{
    LinearExpansion, Mcts, RandomRollout, SearchConfig, SearchResult, TruncatedRollout, Ucb1,
};
use kinrow_mnk::{MnkAction, MnkState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::debug;

/// Something that picks a move.
pub trait Agent: Send {
    fn name(&self) -> &str;

    fn choose(&mut self, state: &MnkState) -> Result<MnkAction>;
}

/// Uniformly random legal moves.
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, state: &MnkState) -> Result<MnkAction> {
        let actions = state.actions();
        if actions.is_empty() {
            bail!("no legal moves in position:\n{state}");
        }
        Ok(actions[self.rng.gen_range(0..actions.len())])
    }
}

/// Per-move search settings for [`MctsAgent`].
#[derive(Clone, Debug)]
pub struct MctsSettings {
    pub max_time: Duration,
    pub max_iterations: u64,
    pub exploration: f64,

    /// Random moves before the heuristic takes over; `None` plays out to
    /// the end of the game.
    pub rollout_depth: Option<usize>,
}

impl Default for MctsSettings {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(1),
            max_iterations: 2000,
            exploration: std::f64::consts::SQRT_2,
            rollout_depth: None,
        }
    }
}

/// Fresh UCB1 search for every move, maximizing the mover's utility.
pub struct MctsAgent {
    settings: MctsSettings,
    rng: ChaCha8Rng,
}

impl MctsAgent {
    pub fn new(settings: MctsSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn search(&self, state: &MnkState, seed: u64) -> Result<SearchResult<MnkAction>> {
        let player = state.current_player();
        let selection = Ucb1::seeded(seed)
            .with_utility_indices(vec![player])
            .with_exploration(self.settings.exploration);
        let config = SearchConfig::with_iterations(self.settings.max_iterations)
            .with_max_time(self.settings.max_time)
            .seeded(seed);

        let result = match self.settings.rollout_depth {
            None => Mcts::new(selection, LinearExpansion, RandomRollout::seeded(seed))
                .with_utility_indices(vec![player])
                .search(state, &config),
            Some(depth) => {
                let rollout = TruncatedRollout::new(
                    ChaCha8Rng::seed_from_u64(seed),
                    depth,
                    line_potential,
                );
                Mcts::new(selection, LinearExpansion, rollout)
                    .with_utility_indices(vec![player])
                    .search(state, &config)
            }
        };
        Ok(result?)
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &str {
        "mcts"
    }

    fn choose(&mut self, state: &MnkState) -> Result<MnkAction> {
        let seed = self.rng.gen();
        let result = self
            .search(state, seed)
            .with_context(|| format!("search failed in position:\n{state}"))?;

        debug!(
            action = %result.action(),
            iterations = result.iterations,
            degraded = result.is_degraded(),
            elapsed = ?result.elapsed,
            "mcts move"
        );
        Ok(result.into_action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_settings() -> MctsSettings {
        MctsSettings {
            max_time: Duration::from_secs(60),
            max_iterations: 1500,
            ..Default::default()
        }
    }

    #[test]
    fn test_random_agent_plays_legal_moves() {
        let mut agent = RandomAgent::new(3);
        let mut state = MnkState::tic_tac_toe();
        while !state.is_terminal() {
            let action = agent.choose(&state).unwrap();
            assert!(state.is_legal(&action));
            state.apply(&action).unwrap();
        }
    }

    #[test]
    fn test_random_agent_rejects_finished_game() {
        let mut state = MnkState::new(1, 1, 1, vec!['X', 'O']).unwrap();
        state.apply(&MnkAction::new(0, 0, 0)).unwrap();
        assert!(RandomAgent::new(0).choose(&state).is_err());
    }

    #[test]
    fn test_mcts_agent_takes_the_win() {
        let mut state = MnkState::tic_tac_toe();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let action = MnkAction::new(state.current_player(), row, col);
            state.apply(&action).unwrap();
        }
        let mut agent = MctsAgent::new(quick_settings(), 5);
        assert_eq!(agent.choose(&state).unwrap(), MnkAction::new(0, 0, 2));
    }

    #[test]
    fn test_truncated_mcts_agent_plays_legal_moves() {
        let settings = MctsSettings {
            max_iterations: 200,
            rollout_depth: Some(2),
            ..quick_settings()
        };
        let mut agent = MctsAgent::new(settings, 8);
        let state = MnkState::new(6, 6, 4, vec!['X', 'O']).unwrap();
        let action = agent.choose(&state).unwrap();
        assert!(state.is_legal(&action));
    }

    #[test]
    fn test_mcts_agent_reports_finished_game() {
        let mut state = MnkState::new(1, 1, 1, vec!['X', 'O']).unwrap();
        state.apply(&MnkAction::new(0, 0, 0)).unwrap();
        assert!(MctsAgent::new(quick_settings(), 0).choose(&state).is_err());
    }

    #[test]
    fn test_mcts_agent_reproducible() {
        let state = MnkState::tic_tac_toe();
        let a = MctsAgent::new(quick_settings(), 21).choose(&state).unwrap();
        let b = MctsAgent::new(quick_settings(), 21).choose(&state).unwrap();
        assert_eq!(a, b);
    }
}
