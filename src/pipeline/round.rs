//! Round termination and continuity across rounds

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, combat::StepRecord};

/// Where a new round starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundBoundary {
    /// Continue from the last record's next state
    #[default]
    Carry,
    /// Start every round from the configured initial state
    Reset,
}

impl RoundBoundary {
    pub fn label(self) -> &'static str {
        match self {
            RoundBoundary::Carry => "carry",
            RoundBoundary::Reset => "reset",
        }
    }
}

impl fmt::Display for RoundBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoundBoundary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry" => Ok(RoundBoundary::Carry),
            "reset" => Ok(RoundBoundary::Reset),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown round boundary '{other}'. Use 'carry' or 'reset'"),
            }),
        }
    }
}

/// Round-continuation hook.
///
/// Looks at the last record of the current round. If the step was presented
/// in a terminal state, bumps that record's round number once and returns
/// `false`; otherwise returns `true`. An empty round continues.
///
/// # Examples
///
/// ```
/// use sparring::combat::{Action, AgentState, GameState, StepRecord};
/// use sparring::pipeline::continue_round;
///
/// let mut records = vec![StepRecord {
///     trial_index: 0,
///     round: 1,
///     action: Action::None,
///     state: GameState::new(AgentState::Combo2, AgentState::Hit2),
///     next_state: GameState::NEUTRAL,
///     response: None,
///     rt_ms: None,
///     time_elapsed_ms: 500,
/// }];
/// assert!(!continue_round(&mut records));
/// assert_eq!(records[0].round, 2);
/// ```
pub fn continue_round(records: &mut [StepRecord]) -> bool {
    match records.last_mut() {
        Some(last) if last.is_terminal() => {
            last.round += 1;
            false
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Action, AgentState, GameState};

    fn record(state: GameState, next_state: GameState) -> StepRecord {
        StepRecord {
            trial_index: 0,
            round: 1,
            action: Action::None,
            state,
            next_state,
            response: None,
            rt_ms: None,
            time_elapsed_ms: 0,
        }
    }

    #[test]
    fn test_empty_round_continues() {
        assert!(continue_round(&mut []));
    }

    #[test]
    fn test_terminal_next_state_does_not_end_round() {
        // The round ends one step later, when the terminal pair is presented
        let reached = GameState::new(AgentState::Combo2, AgentState::Hit2);
        let mut records = vec![record(GameState::NEUTRAL, reached)];
        assert!(continue_round(&mut records));
        assert_eq!(records[0].round, 1);
    }

    #[test]
    fn test_only_last_record_is_inspected() {
        let terminal = GameState::new(AgentState::Block, AgentState::Combo2);
        let mut records = vec![
            record(terminal, GameState::NEUTRAL),
            record(GameState::NEUTRAL, GameState::NEUTRAL),
        ];
        assert!(continue_round(&mut records));
        assert!(records.iter().all(|r| r.round == 1));
    }

    #[test]
    fn test_every_terminal_state_ends_round() {
        for state in GameState::all() {
            let mut records = vec![record(state, GameState::NEUTRAL)];
            let continues = continue_round(&mut records);
            assert_eq!(continues, !state.is_terminal(), "{state}");
            assert_eq!(records[0].round, if continues { 1 } else { 2 });
        }
    }

    #[test]
    fn test_parse_boundary() {
        assert_eq!("Reset".parse::<RoundBoundary>().unwrap(), RoundBoundary::Reset);
        assert!("restart".parse::<RoundBoundary>().is_err());
    }
}
