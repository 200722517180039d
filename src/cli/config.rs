//! Shared configuration flags for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    app::ExperimentConfig,
    combat::{AgentState, GameState},
    pipeline::RoundBoundary,
};

/// Experiment settings common to `run` and `simulate`
///
/// Values given on the command line override the config file, which
/// overrides the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON experiment configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Rounds per session
    #[arg(long, short = 'r')]
    pub repetitions: Option<usize>,

    /// Session random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seed from OS entropy instead of a fixed seed
    #[arg(long, conflicts_with = "seed")]
    pub entropy: bool,

    /// Response window per step in milliseconds
    #[arg(long)]
    pub window_ms: Option<u64>,

    /// Where new rounds start (`carry` or `reset`)
    #[arg(long)]
    pub boundary: Option<RoundBoundary>,

    /// Abort a round after this many steps without a combo
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Player posture of the first step
    #[arg(long)]
    pub start_player: Option<AgentState>,

    /// Opponent posture of the first step
    #[arg(long)]
    pub start_opponent: Option<AgentState>,

    /// Sprite asset directory
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

impl ConfigArgs {
    /// Resolve the effective configuration
    pub fn resolve(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ExperimentConfig::default(),
        };

        if let Some(repetitions) = self.repetitions {
            config.repetitions = repetitions;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.entropy {
            config.seed = None;
        }
        if let Some(window_ms) = self.window_ms {
            config.wait_window_ms = window_ms;
        }
        if let Some(boundary) = self.boundary {
            config.boundary = boundary;
        }
        if self.max_steps.is_some() {
            config.max_steps_per_round = self.max_steps;
        }
        config.initial_state = GameState::new(
            self.start_player.unwrap_or(config.initial_state.player),
            self.start_opponent.unwrap_or(config.initial_state.opponent),
        );
        if let Some(assets) = &self.assets {
            config.sprite_root = assets.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = ConfigArgs {
            repetitions: Some(3),
            entropy: true,
            boundary: Some(RoundBoundary::Reset),
            start_opponent: Some(AgentState::Windup),
            ..ConfigArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.repetitions, 3);
        assert_eq!(config.seed, None);
        assert_eq!(config.boundary, RoundBoundary::Reset);
        assert_eq!(
            config.initial_state,
            GameState::new(AgentState::Neutral, AgentState::Windup)
        );
    }

    #[test]
    fn test_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        ExperimentConfig::new()
            .with_repetitions(4)
            .with_wait_window_ms(800)
            .save(&path)
            .unwrap();

        let args = ConfigArgs {
            config: Some(path),
            repetitions: Some(2),
            ..ConfigArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.repetitions, 2);
        assert_eq!(config.wait_window_ms, 800);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = ConfigArgs {
            window_ms: Some(0),
            ..ConfigArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
