//! Configuration for experiment sessions.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    combat::{GameState, KeyMap},
    pipeline::RoundBoundary,
};

/// Seed used when none is configured explicitly
pub const DEFAULT_SEED: u64 = 1234;

/// Configuration for one experiment session.
///
/// This type provides a serde-backed, builder-style API. Missing fields in a
/// JSON file take their default values.
///
/// # Examples
///
/// ```
/// use sparring::app::ExperimentConfig;
/// use sparring::pipeline::RoundBoundary;
///
/// let config = ExperimentConfig::new()
///     .with_repetitions(3)
///     .with_seed(42)
///     .with_boundary(RoundBoundary::Reset);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.wait_window().as_millis(), 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Response window per step in milliseconds
    pub wait_window_ms: u64,
    /// Key bindings
    pub keys: KeyMap,
    /// Rounds per session
    pub repetitions: usize,
    /// Session RNG seed (None = OS entropy)
    pub seed: Option<u64>,
    /// State the first step is presented in
    pub initial_state: GameState,
    /// Where each new round starts
    pub boundary: RoundBoundary,
    /// Abort a round after this many steps without a combo
    pub max_steps_per_round: Option<usize>,
    /// Directory holding the sprite images
    pub sprite_root: PathBuf,
}

impl ExperimentConfig {
    /// Create a configuration with default values:
    /// - Wait window: 500 ms
    /// - Keys: q → cross, w → block, e → jab
    /// - Repetitions: 10
    /// - Seed: 1234
    /// - Initial state: (neutral, neutral), carried across rounds
    /// - No step limit, sprites under `assets/`
    pub fn new() -> Self {
        Self {
            wait_window_ms: 500,
            keys: KeyMap::default(),
            repetitions: 10,
            seed: Some(DEFAULT_SEED),
            initial_state: GameState::NEUTRAL,
            boundary: RoundBoundary::default(),
            max_steps_per_round: None,
            sprite_root: PathBuf::from("assets"),
        }
    }

    pub fn with_wait_window_ms(mut self, wait_window_ms: u64) -> Self {
        self.wait_window_ms = wait_window_ms;
        self
    }

    pub fn with_keys(mut self, keys: KeyMap) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed the session from OS entropy.
    pub fn with_entropy(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn with_initial_state(mut self, state: GameState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_boundary(mut self, boundary: RoundBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_max_steps_per_round(mut self, limit: Option<usize>) -> Self {
        self.max_steps_per_round = limit;
        self
    }

    pub fn with_sprite_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sprite_root = root.into();
        self
    }

    pub fn wait_window(&self) -> Duration {
        Duration::from_millis(self.wait_window_ms)
    }

    /// Check values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<()> {
        if self.wait_window_ms == 0 {
            return Err(Error::InvalidConfiguration {
                message: "wait window must be positive".to_string(),
            });
        }
        if self.repetitions == 0 {
            return Err(Error::InvalidConfiguration {
                message: "repetitions must be positive".to_string(),
            });
        }
        if self.max_steps_per_round == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "max steps per round must be positive when set".to_string(),
            });
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open config {}", path.display()), e))?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::io(format!("create config {}", path.display()), e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Action, AgentState, KeyBinding};

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::default();
        assert_eq!(config.wait_window_ms, 500);
        assert_eq!(config.repetitions, 10);
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.initial_state, GameState::NEUTRAL);
        assert_eq!(config.boundary, RoundBoundary::Carry);
        assert_eq!(config.max_steps_per_round, None);
        assert_eq!(config.keys.map(Some("q")), Action::Cross);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExperimentConfig =
            serde_json::from_str(r#"{"repetitions": 3, "boundary": "reset"}"#).unwrap();
        assert_eq!(config.repetitions, 3);
        assert_eq!(config.boundary, RoundBoundary::Reset);
        assert_eq!(config.wait_window_ms, 500);
    }

    #[test]
    fn test_json_initial_state_and_keys() {
        let json = r#"{
            "initial_state": {"player": "neutral", "opponent": "windup"},
            "keys": [{"key": "j", "action": "jab"}]
        }"#;
        let config: ExperimentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.initial_state,
            GameState::new(AgentState::Neutral, AgentState::Windup)
        );
        assert_eq!(
            config.keys.bindings(),
            &[KeyBinding::new("j", Action::Jab)]
        );
    }

    #[test]
    fn test_duplicate_keys_rejected_on_load() {
        let json = r#"{"keys": [{"key": "q", "action": "jab"}, {"key": "Q", "action": "cross"}]}"#;
        assert!(serde_json::from_str::<ExperimentConfig>(json).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(ExperimentConfig::new().with_repetitions(0).validate().is_err());
        assert!(ExperimentConfig::new().with_wait_window_ms(0).validate().is_err());
        assert!(
            ExperimentConfig::new()
                .with_max_steps_per_round(Some(0))
                .validate()
                .is_err()
        );
        assert!(
            ExperimentConfig::new()
                .with_max_steps_per_round(Some(50))
                .validate()
                .is_ok()
        );
    }
}
