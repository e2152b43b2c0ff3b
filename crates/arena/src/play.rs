//! Rounds and matches between agents.

use crate::agents::{Agent, MctsAgent, MctsSettings, RandomAgent};
use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use kinrow_core::{State, Utility};
use kinrow_mnk::MnkState;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info};

/// Who plays against the MCTS agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Opponent {
    Random,
    Mcts,
}

/// How one finished game ended.
#[derive(Clone, Debug)]
pub struct RoundOutcome {
    pub utility: Utility,
    pub winner: Option<usize>,
    pub moves: usize,
}

/// Aggregate of a match, indexed by seat (player turn order).
#[derive(Clone, Debug)]
pub struct MatchSummary {
    pub names: Vec<String>,
    pub rounds: usize,
    pub totals: Utility,
    pub wins: Vec<usize>,
    pub draws: usize,
    pub moves: usize,
}

impl MatchSummary {
    fn new(names: Vec<String>) -> Self {
        let seats = names.len();
        Self {
            names,
            rounds: 0,
            totals: Utility::zeros(seats),
            wins: vec![0; seats],
            draws: 0,
            moves: 0,
        }
    }

    fn record(&mut self, outcome: &RoundOutcome) -> Result<()> {
        self.totals = self.totals.try_add(&outcome.utility)?;
        match outcome.winner {
            Some(winner) => self.wins[winner] += 1,
            None => self.draws += 1,
        }
        self.rounds += 1;
        self.moves += outcome.moves;
        Ok(())
    }

    pub fn average_moves(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.moves as f64 / self.rounds as f64
        }
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (seat, name) in self.names.iter().enumerate() {
            writeln!(
                f,
                "Player {seat} ({name}): {} wins, total utility {:.1}",
                self.wins[seat], self.totals[seat]
            )?;
        }
        write!(
            f,
            "Draws: {}, average game length: {:.1} moves",
            self.draws,
            self.average_moves()
        )
    }
}

/// Everything needed to set up one round.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub rows: usize,
    pub cols: usize,
    pub k: usize,
    pub opponent: Opponent,
    pub settings: MctsSettings,
}

impl MatchConfig {
    /// Fresh starting position.
    pub fn initial_state(&self) -> Result<MnkState> {
        MnkState::new(self.rows, self.cols, self.k, vec!['X', 'O'])
            .with_context(|| format!("invalid board {}x{} k={}", self.rows, self.cols, self.k))
    }

    /// Agents in seat order: MCTS first, then the opponent.
    pub fn agents(&self, seed: u64) -> Vec<Box<dyn Agent>> {
        let mcts: Box<dyn Agent> = Box::new(MctsAgent::new(self.settings.clone(), seed));
        let opponent: Box<dyn Agent> = match self.opponent {
            Opponent::Random => Box::new(RandomAgent::new(seed.wrapping_add(1))),
            Opponent::Mcts => Box::new(MctsAgent::new(self.settings.clone(), seed.wrapping_add(1))),
        };
        vec![mcts, opponent]
    }
}

/// Play one game from `state` to the end, seat `i` moving for player `i`.
pub fn play_round(agents: &mut [Box<dyn Agent>], mut state: MnkState) -> Result<RoundOutcome> {
    ensure!(
        agents.len() == state.num_players(),
        "{} agents for a {}-player game",
        agents.len(),
        state.num_players()
    );

    let mut moves = 0;
    while !state.is_terminal() {
        let agent = &mut agents[state.current_player()];
        let action = agent.choose(&state)?;
        debug!(agent = agent.name(), %action, "move");
        state
            .apply(&action)
            .with_context(|| format!("{} chose an illegal move {action}", agent.name()))?;
        moves += 1;
    }

    Ok(RoundOutcome {
        utility: state.utility()?,
        winner: state.winner(),
        moves,
    })
}

/// Play `rounds` independent games in parallel and total the results.
///
/// Round `i` is seeded with `seed + 1000 * i`, so a match is reproducible
/// when the search budgets are iteration-bound.
pub fn play_match(config: &MatchConfig, rounds: usize, seed: u64) -> Result<MatchSummary> {
    let initial = config.initial_state()?;
    let names = config
        .agents(seed)
        .iter()
        .map(|agent| agent.name().to_string())
        .collect();

    let outcomes = (0..rounds)
        .into_par_iter()
        .map(|i| {
            let round_seed = seed.wrapping_add(i as u64 * 1000);
            let mut agents = config.agents(round_seed);
            let outcome = play_round(&mut agents, initial.clone())
                .with_context(|| format!("round {i} failed"))?;
            info!(round = i, winner = ?outcome.winner, moves = outcome.moves, "round finished");
            Ok(outcome)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut summary = MatchSummary::new(names);
    for outcome in &outcomes {
        summary.record(outcome)?;
    }
    Ok(summary)
}
