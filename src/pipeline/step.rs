//! Per-step completion hook

use std::time::Duration;

use rand::Rng;

use crate::{
    combat::{GameState, KeyMap, StepRecord, TransitionTable},
    ports::Response,
};

/// A step that has been presented but not yet resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep {
    pub trial_index: usize,
    pub round: u32,
    pub state: GameState,
}

/// Resolve a presented step into its record.
///
/// Maps the response key to an action, computes the next state with `rng`
/// and attaches both to the host bookkeeping.
pub fn complete_step<R: Rng + ?Sized>(
    table: &TransitionTable,
    keys: &KeyMap,
    pending: PendingStep,
    response: &Response,
    time_elapsed: Duration,
    rng: &mut R,
) -> StepRecord {
    let action = keys.map(response.key.as_deref());
    let next_state = table.transition(pending.state, action, rng);
    StepRecord {
        trial_index: pending.trial_index,
        round: pending.round,
        action,
        state: pending.state,
        next_state,
        response: response.key.clone(),
        rt_ms: response.rt.map(|rt| millis(rt)),
        time_elapsed_ms: millis(time_elapsed),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
