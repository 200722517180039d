//! Simulate command - Run sessions against a simulated participant

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    adapters::{RandomResponder, ResponderProfile},
    app::{App, ExperimentConfig},
    cli::{
        config::ConfigArgs,
        output::{
            create_simulation_progress, format_number, format_percent, print_kv, print_metrics,
            print_section,
        },
    },
    pipeline::{JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver},
};

/// Step limit applied when neither the flags nor the config file set one
const DEFAULT_SIMULATION_STEP_LIMIT: usize = 1000;

#[derive(Parser, Debug)]
#[command(about = "Simulate sessions with a random participant")]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of independent sessions
    #[arg(long, short = 'n', default_value_t = 100)]
    pub sessions: usize,

    /// Response tendencies of the simulated participant
    #[arg(long, short = 'p', default_value = "uniform")]
    pub profile: ResponderProfile,

    /// Seed for the simulated participant (defaults to the session seed + 1)
    #[arg(long)]
    pub responder_seed: Option<u64>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Write every step record as JSON Lines
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Save the simulation summary as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Aggregate over all simulated sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub sessions: usize,
    pub profile: ResponderProfile,
    pub config: ExperimentConfig,
    pub rounds: usize,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub aborted_rounds: usize,
    pub metrics: MetricsSummary,
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let mut config = args.config.resolve()?;
    if config.max_steps_per_round.is_none() {
        config.max_steps_per_round = Some(DEFAULT_SIMULATION_STEP_LIMIT);
    }
    let summary = simulate(&args, &config)?;

    print_section("Simulation complete");
    print_kv("Sessions", &format_number(summary.sessions));
    print_kv("Profile", summary.profile.label());
    print_kv("Rounds", &format_number(summary.rounds));
    print_kv(
        "Player wins",
        &format!(
            "{} ({})",
            summary.player_wins,
            format_percent(summary.metrics.player_win_rate)
        ),
    );
    print_kv("Opponent wins", &format_number(summary.opponent_wins));
    print_kv("Aborted rounds", &format_number(summary.aborted_rounds));
    print_metrics(&summary.metrics);

    if let Some(path) = &args.output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        info!(path = %path.display(), "Saved simulation summary");
    }
    Ok(())
}

/// Run all sessions and aggregate their outcomes.
///
/// Session `i` uses the session seed plus `i`, so the whole batch replays
/// from one seed.
pub fn simulate(args: &SimulateArgs, config: &ExperimentConfig) -> Result<SimulationSummary> {
    let app = App::new();
    let (metrics, metrics_handle) = SharedObserver::new(MetricsObserver::new());
    let jsonl = match &args.jsonl {
        Some(path) => {
            let observer = JsonlObserver::new(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Some(SharedObserver::new(observer).0)
        }
        None => None,
    };
    let progress = if args.progress {
        Some(create_simulation_progress(
            (args.sessions * config.repetitions) as u64,
        )?)
    } else {
        None
    };

    info!(
        sessions = args.sessions,
        profile = %args.profile,
        "Starting simulation"
    );

    let mut rounds = 0;
    let mut player_wins = 0;
    let mut opponent_wins = 0;
    let mut aborted_rounds = 0;
    for index in 0..args.sessions {
        let offset = index as u64;
        let mut session_config = config.clone();
        session_config.seed = config.seed.map(|seed| seed.wrapping_add(offset));

        let mut session = app
            .create_session(session_config)?
            .with_observer(Box::new(metrics.clone()));
        if let Some(observer) = &jsonl {
            session = session.with_observer(Box::new(observer.clone()));
        }
        if let Some(pb) = &progress {
            session = session.with_observer(Box::new(ProgressObserver::attached(pb.clone())));
        }

        let mut responder = match args
            .responder_seed
            .or_else(|| config.seed.map(|seed| seed.wrapping_add(1)))
        {
            Some(seed) => {
                RandomResponder::with_seed(args.profile, config.keys.clone(), seed.wrapping_add(offset))
            }
            None => RandomResponder::new(args.profile, config.keys.clone()),
        };

        let result = session.run(&mut responder)?;
        rounds += result.rounds.len();
        player_wins += result.player_wins;
        opponent_wins += result.opponent_wins;
        aborted_rounds += result.aborted_rounds;
    }

    if let Some(pb) = &progress {
        pb.finish_with_message(format!("P:{player_wins} O:{opponent_wins}"));
    }

    let metrics = metrics_handle
        .lock()
        .map_err(|_| anyhow::anyhow!("metrics observer poisoned"))?
        .summary();
    Ok(SimulationSummary {
        sessions: args.sessions,
        profile: args.profile,
        config: config.clone(),
        rounds,
        player_wins,
        opponent_wins,
        aborted_rounds,
        metrics,
    })
}
