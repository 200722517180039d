//! Simulated participant.
//!
//! Picks an action per step from profile weights (optionally depending on
//! the displayed postures), translates it to the bound key, and draws a
//! latency inside the response window. Used by the `simulate` command to
//! exercise the engine without a human at the keyboard.

use std::{fmt, str::FromStr, time::Duration};

use rand::{Rng, SeedableRng, random, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    combat::{Action, AgentState, KeyMap},
    ports::{InputSource, Response, Stimulus},
    utils::weighted_sample,
};

/// Fastest simulated response
const MIN_RT: Duration = Duration::from_millis(150);

/// Response tendencies of a simulated participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderProfile {
    /// Every action, including no response, equally likely
    #[default]
    Uniform,
    /// Mostly lets the window elapse
    Passive,
    /// Mostly strikes
    Aggressive,
    /// Mostly blocks
    Defensive,
    /// Reads the opponent: blocks wind-ups, presses hit opponents
    Reactive,
}

impl ResponderProfile {
    pub const ALL: [ResponderProfile; 5] = [
        ResponderProfile::Uniform,
        ResponderProfile::Passive,
        ResponderProfile::Aggressive,
        ResponderProfile::Defensive,
        ResponderProfile::Reactive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResponderProfile::Uniform => "uniform",
            ResponderProfile::Passive => "passive",
            ResponderProfile::Aggressive => "aggressive",
            ResponderProfile::Defensive => "defensive",
            ResponderProfile::Reactive => "reactive",
        }
    }

    /// Action weights for the displayed pair, in [`Action::ALL`] order
    fn weights(self, stimulus: &Stimulus) -> [f64; Action::COUNT] {
        match self {
            ResponderProfile::Uniform => [1.0, 1.0, 1.0, 1.0],
            ResponderProfile::Passive => [6.0, 1.0, 1.0, 2.0],
            ResponderProfile::Aggressive => [1.0, 4.0, 4.0, 1.0],
            ResponderProfile::Defensive => [2.0, 1.0, 1.0, 6.0],
            ResponderProfile::Reactive => match stimulus.opponent {
                AgentState::Windup => [0.5, 1.0, 0.5, 8.0],
                AgentState::Hit1 | AgentState::Block => [0.5, 2.0, 6.0, 1.0],
                _ => [1.0, 5.0, 2.0, 1.0],
            },
        }
    }
}

impl fmt::Display for ResponderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResponderProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidConfiguration {
                message: format!(
                    "unknown responder profile '{s}'. Expected one of: {}",
                    Self::ALL.map(ResponderProfile::label).join(", ")
                ),
            })
    }
}

/// Seeded random participant
pub struct RandomResponder {
    profile: ResponderProfile,
    keys: KeyMap,
    rng: StdRng,
}

impl RandomResponder {
    /// Create a responder seeded from OS entropy
    pub fn new(profile: ResponderProfile, keys: KeyMap) -> Self {
        Self::with_seed(profile, keys, random())
    }

    /// Create a responder with a deterministic seed
    pub fn with_seed(profile: ResponderProfile, keys: KeyMap, seed: u64) -> Self {
        Self {
            profile,
            keys,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl InputSource for RandomResponder {
    fn await_response(
        &mut self,
        stimulus: &Stimulus,
        window: Duration,
        choices: &[&str],
    ) -> Result<Response> {
        let items: Vec<(Action, f64)> = Action::ALL
            .into_iter()
            .zip(self.profile.weights(stimulus))
            .collect();
        let action = weighted_sample(&mut self.rng, &items).unwrap_or_default();

        let key = self
            .keys
            .key_for(action)
            .filter(|key| choices.iter().any(|c| c.eq_ignore_ascii_case(key)));
        let Some(key) = key else {
            return Ok(Response::timeout());
        };
        if window <= MIN_RT {
            return Ok(Response::timeout());
        }
        let rt = self.rng.random_range(MIN_RT..window);
        Ok(Response::key(key, rt))
    }
}
