//! Step records and the append-only session history

use serde::{Deserialize, Serialize};

use super::state::{Action, GameState};

/// One completed experiment step
///
/// Records are immutable once appended, except for the round-number
/// correction applied to the terminal record of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Position of the step in the session (0-based)
    pub trial_index: usize,
    /// Round the step belongs to (1-based)
    pub round: u32,
    /// Action derived from the response
    pub action: Action,
    /// State the step was presented in
    pub state: GameState,
    /// State computed for the following step
    pub next_state: GameState,
    /// Raw key pressed, if any
    pub response: Option<String>,
    /// Response latency in milliseconds, absent on timeout
    pub rt_ms: Option<u64>,
    /// Milliseconds since the session started, at step completion
    pub time_elapsed_ms: u64,
}

impl StepRecord {
    /// Whether this record ends its round (its starting state is terminal).
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Ordered, append-only log of step records
///
/// The last record is the source of the current state; an empty log yields
/// the initial state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    initial: GameState,
    records: Vec<StepRecord>,
}

impl History {
    pub fn new(initial: GameState) -> Self {
        Self {
            initial,
            records: Vec::new(),
        }
    }

    pub fn initial(&self) -> GameState {
        self.initial
    }

    /// Most recently completed step
    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// State the next step starts in
    pub fn current_state(&self) -> GameState {
        self.last().map_or(self.initial, |record| record.next_state)
    }

    /// Round number for the next appended record
    pub fn round_cursor(&self) -> u32 {
        self.last().map_or(1, |record| record.round)
    }

    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Records from `start` onwards (empty if `start` is past the end)
    pub fn since(&self, start: usize) -> &[StepRecord] {
        self.records.get(start..).unwrap_or(&[])
    }

    /// Mutable view of a round's records, for the round-end correction.
    pub(crate) fn since_mut(&mut self, start: usize) -> &mut [StepRecord] {
        self.records.get_mut(start..).unwrap_or(&mut [])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AgentState;

    fn record(round: u32, state: GameState, next_state: GameState) -> StepRecord {
        StepRecord {
            trial_index: 0,
            round,
            action: Action::None,
            state,
            next_state,
            response: None,
            rt_ms: None,
            time_elapsed_ms: 0,
        }
    }

    #[test]
    fn test_empty_history_uses_initial_state() {
        let history = History::new(GameState::NEUTRAL);
        assert!(history.last().is_none());
        assert_eq!(history.current_state(), GameState::NEUTRAL);
        assert_eq!(history.round_cursor(), 1);
    }

    #[test]
    fn test_current_state_follows_last_record() {
        let mut history = History::new(GameState::NEUTRAL);
        let windup = GameState::new(AgentState::Neutral, AgentState::Windup);
        history.push(record(1, GameState::NEUTRAL, windup));
        assert_eq!(history.current_state(), windup);
        assert_eq!(history.len(), 1);
        assert_eq!(history.since(1).len(), 0);
        assert_eq!(history.since(5).len(), 0);
    }

    #[test]
    fn test_round_cursor_tracks_last_record() {
        let mut history = History::new(GameState::NEUTRAL);
        history.push(record(3, GameState::NEUTRAL, GameState::NEUTRAL));
        assert_eq!(history.round_cursor(), 3);
    }
}
