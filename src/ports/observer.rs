//! Observer port - abstraction for session observation and data collection
//!
//! This port defines the interface for observing experiment sessions,
//! allowing composable data collection without coupling the session
//! pipeline to specific output formats.

use crate::{
    Result,
    combat::StepRecord,
    pipeline::{RoundSummary, SessionResult},
};

/// Observer trait for monitoring a session
///
/// Observers can be composed to collect different kinds of data:
/// - Progress bars for simulated runs
/// - JSONL or CSV export of step records
/// - Summary metrics
///
/// # Event Sequence
///
/// 1. `on_session_start(repetitions)` - Once at the beginning
/// 2. For each round:
///    - `on_round_start(round)`
///    - `on_step(record)` - For each completed step
///    - `on_round_end(summary, records)` - After the round-number correction
/// 3. `on_session_end(result)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use sparring::{
///     combat::StepRecord,
///     ports::Observer,
/// };
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl Observer for StepCounter {
///     fn on_step(&mut self, _record: &StepRecord) -> sparring::Result<()> {
///         self.steps += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when the session starts.
    ///
    /// # Parameters
    ///
    /// * `repetitions` - Number of rounds that will be run
    fn on_session_start(&mut self, _repetitions: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a round starts.
    ///
    /// # Parameters
    ///
    /// * `round` - Index of the round within the session (0-based)
    fn on_round_start(&mut self, _round: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each step record is appended.
    ///
    /// The record is final except for its round number, which may still be
    /// corrected if it turns out to end the round.
    fn on_step(&mut self, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when a round ends.
    ///
    /// Also called, with `summary.aborted` set, when the input fails
    /// mid-round, so the steps completed so far are still delivered.
    ///
    /// # Parameters
    ///
    /// * `summary` - How the round ended
    /// * `records` - The round's records, round-number correction applied
    fn on_round_end(&mut self, _summary: &RoundSummary, _records: &[StepRecord]) -> Result<()> {
        Ok(())
    }

    /// Called when the session completes.
    ///
    /// Use this to flush outputs or display summaries.
    fn on_session_end(&mut self, _result: &SessionResult) -> Result<()> {
        Ok(())
    }
}
