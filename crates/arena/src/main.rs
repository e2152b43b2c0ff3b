//! Match driver for kinrow search agents.
//!
//! Plays rounds of generalized k-in-a-row between an MCTS agent and an
//! opponent and prints per-player win statistics.

mod agents;
mod heuristic;
mod play;

use agents::MctsSettings;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use play::{play_match, MatchConfig, Opponent};
use std::time::{Duration, Instant};
use tracing::info;

/// kinrow match driver.
#[derive(Parser)]
#[command(name = "kinrow-arena")]
#[command(about = "Play m,n,k-in-a-row matches between search agents")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match: MCTS as the first player against an opponent.
    Play {
        /// Board rows.
        #[arg(short, long, default_value = "3")]
        m: usize,

        /// Board columns.
        #[arg(short, long, default_value = "3")]
        n: usize,

        /// Signs in a row needed to win.
        #[arg(short, long, default_value = "3")]
        k: usize,

        /// Number of rounds to play.
        #[arg(short, long, default_value = "10")]
        rounds: usize,

        /// Search time per move, in seconds.
        #[arg(short, long, default_value = "1.0")]
        time: f64,

        /// Search iterations per move.
        #[arg(short, long, default_value = "2000")]
        iterations: u64,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Opponent of the first player.
        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,

        /// Random moves per rollout before the line heuristic scores the
        /// position. Plays out to the end when omitted.
        #[arg(long)]
        rollout_depth: Option<usize>,
    },
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Run the play command.
#[allow(clippy::too_many_arguments)]
fn cmd_play(
    m: usize,
    n: usize,
    k: usize,
    rounds: usize,
    time: f64,
    iterations: u64,
    seed: u64,
    opponent: Opponent,
    rollout_depth: Option<usize>,
) -> Result<()> {
    let max_time = Duration::try_from_secs_f64(time)
        .with_context(|| format!("--time must be a non-negative number of seconds, got {time}"))?;

    let config = MatchConfig {
        rows: m,
        cols: n,
        k,
        opponent,
        settings: MctsSettings {
            max_time,
            max_iterations: iterations,
            rollout_depth,
            ..Default::default()
        },
    };

    info!(m, n, k, rounds, time, iterations, seed, ?opponent, "starting match");
    println!(
        "Playing {} rounds of {}x{} k={}: MCTS ({} iterations, {:.2}s per move) vs {:?}",
        rounds, m, n, k, iterations, time, opponent
    );

    let start = Instant::now();
    let summary = play_match(&config, rounds, seed)?;

    println!("\nCompleted in {:.2}s", start.elapsed().as_secs_f64());
    println!("{summary}");

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Play {
            m,
            n,
            k,
            rounds,
            time,
            iterations,
            seed,
            opponent,
            rollout_depth,
        } => cmd_play(m, n, k, rounds, time, iterations, seed, opponent, rollout_depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["kinrow-arena", "play"]).unwrap();
        let Commands::Play {
            m,
            k,
            rounds,
            opponent,
            rollout_depth,
            ..
        } = cli.command;
        assert_eq!((m, k, rounds), (3, 3, 10));
        assert_eq!(opponent, Opponent::Random);
        assert_eq!(rollout_depth, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "kinrow-arena",
            "play",
            "--m",
            "8",
            "--n",
            "8",
            "--k",
            "5",
            "--opponent",
            "mcts",
            "--rollout-depth",
            "2",
            "--time",
            "0.5",
        ])
        .unwrap();
        let Commands::Play {
            m,
            n,
            k,
            time,
            opponent,
            rollout_depth,
            ..
        } = cli.command;
        assert_eq!((m, n, k), (8, 8, 5));
        assert_eq!(time, 0.5);
        assert_eq!(opponent, Opponent::Mcts);
        assert_eq!(rollout_depth, Some(2));
    }

    #[test]
    fn test_negative_time_rejected() {
        let result = cmd_play(3, 3, 3, 1, -1.0, 10, 0, Opponent::Random, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_unrepresentable_time_rejected() {
        for time in [1e30, f64::INFINITY, f64::NAN] {
            let result = cmd_play(3, 3, 3, 1, time, 10, 0, Opponent::Random, None);
            assert!(result.is_err(), "accepted --time {time}");
        }
    }
}
