//! Observer pattern for experiment sessions
//!
//! Observers allow composable data collection during a session without
//! coupling the step loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::session::{RoundSummary, SessionResult};
use crate::{
    Result,
    combat::{Action, Side, StepRecord, TransitionTable},
    ports::Observer,
    utils::{mean, rate},
};

/// Progress bar observer - Shows session progress in rounds
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    owned: bool,
    player_wins: usize,
    opponent_wins: usize,
}

impl ProgressObserver {
    /// Create a progress observer that draws its own bar per session
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            owned: true,
            player_wins: 0,
            opponent_wins: 0,
        }
    }

    /// Advance an existing bar by one per round, e.g. across many sessions
    pub fn attached(progress_bar: ProgressBar) -> Self {
        Self {
            progress_bar: Some(progress_bar),
            owned: false,
            player_wins: 0,
            opponent_wins: 0,
        }
    }

    fn message(&self) -> String {
        format!("P:{} O:{}", self.player_wins, self.opponent_wins)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, repetitions: usize) -> Result<()> {
        if !self.owned {
            return Ok(());
        }
        let pb = ProgressBar::new(repetitions as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_round_end(&mut self, summary: &RoundSummary, _records: &[StepRecord]) -> Result<()> {
        match summary.victor {
            Some(Side::Player) => self.player_wins += 1,
            Some(Side::Opponent) => self.opponent_wins += 1,
            None => {}
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_session_end(&mut self, _result: &SessionResult) -> Result<()> {
        if self.owned
            && let Some(pb) = &self.progress_bar
        {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks response and outcome metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    steps: usize,
    timeouts: usize,
    fallbacks: usize,
    action_counts: [usize; Action::COUNT],
    reaction_times: Vec<u64>,
    round_lengths: Vec<usize>,
    player_wins: usize,
    opponent_wins: usize,
    aborted_rounds: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of steps where the window elapsed without a valid key
    pub fn timeout_rate(&self) -> f64 {
        rate(self.timeouts, self.steps)
    }

    /// Share of steps resolved by the reset fallback
    pub fn fallback_rate(&self) -> f64 {
        rate(self.fallbacks, self.steps)
    }

    pub fn player_win_rate(&self) -> f64 {
        rate(self.player_wins, self.round_lengths.len())
    }

    /// Mean latency of key presses in milliseconds
    pub fn mean_rt_ms(&self) -> Option<f64> {
        mean(self.reaction_times.iter().map(|&rt| rt as f64))
    }

    pub fn avg_round_length(&self) -> f64 {
        mean(self.round_lengths.iter().map(|&n| n as f64)).unwrap_or(0.0)
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            steps: self.steps,
            rounds: self.round_lengths.len(),
            player_wins: self.player_wins,
            opponent_wins: self.opponent_wins,
            aborted_rounds: self.aborted_rounds,
            action_counts: Action::ALL
                .into_iter()
                .zip(self.action_counts)
                .map(|(action, count)| (action.label().to_string(), count))
                .collect(),
            timeout_rate: self.timeout_rate(),
            fallback_rate: self.fallback_rate(),
            player_win_rate: self.player_win_rate(),
            mean_rt_ms: self.mean_rt_ms(),
            avg_round_length: self.avg_round_length(),
        }
    }
}

/// Summary of session metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub steps: usize,
    pub rounds: usize,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub aborted_rounds: usize,
    pub action_counts: Vec<(String, usize)>,
    pub timeout_rate: f64,
    pub fallback_rate: f64,
    pub player_win_rate: f64,
    pub mean_rt_ms: Option<f64>,
    pub avg_round_length: f64,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        self.steps += 1;
        self.action_counts[record.action.index()] += 1;
        match record.rt_ms {
            Some(rt) if record.action != Action::None => self.reaction_times.push(rt),
            _ => {}
        }
        if record.action == Action::None {
            self.timeouts += 1;
        }
        if !TransitionTable::standard().is_modeled(record.state, record.action) {
            self.fallbacks += 1;
        }
        Ok(())
    }

    fn on_round_end(&mut self, summary: &RoundSummary, _records: &[StepRecord]) -> Result<()> {
        self.round_lengths.push(summary.steps);
        match summary.victor {
            Some(Side::Player) => self.player_wins += 1,
            Some(Side::Opponent) => self.opponent_wins += 1,
            None => {}
        }
        if summary.aborted {
            self.aborted_rounds += 1;
        }
        Ok(())
    }
}

/// JSONL observer - Exports step records in JSON Lines format
///
/// Records are written at the end of each round so the terminal record
/// carries its corrected round number.
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_round_end(&mut self, _summary: &RoundSummary, records: &[StepRecord]) -> Result<()> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            writeln!(&mut self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Flat CSV row for one step record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRow {
    pub trial_index: usize,
    pub round: u32,
    pub player: String,
    pub opponent: String,
    pub action: String,
    pub next_player: String,
    pub next_opponent: String,
    pub response: Option<String>,
    pub rt_ms: Option<u64>,
    pub time_elapsed_ms: u64,
}

impl From<&StepRecord> for CsvRow {
    fn from(record: &StepRecord) -> Self {
        Self {
            trial_index: record.trial_index,
            round: record.round,
            player: record.state.player.label().to_string(),
            opponent: record.state.opponent.label().to_string(),
            action: record.action.label().to_string(),
            next_player: record.next_state.player.label().to_string(),
            next_opponent: record.next_state.opponent.label().to_string(),
            response: record.response.clone(),
            rt_ms: record.rt_ms,
            time_elapsed_ms: record.time_elapsed_ms,
        }
    }
}

/// CSV observer - One row per step record, written per round
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl Observer for CsvObserver {
    fn on_round_end(&mut self, _summary: &RoundSummary, records: &[StepRecord]) -> Result<()> {
        for record in records {
            self.writer.serialize(CsvRow::from(record))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Shares an observer with the caller so its state can be read after the
/// pipeline that owns the boxed observer is done.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O: Observer> SharedObserver<O> {
    /// Wrap `observer`; returns the pipeline-side observer and the handle
    pub fn new(observer: O) -> (Self, Arc<Mutex<O>>) {
        let inner = Arc::new(Mutex::new(observer));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            inner,
        )
    }

    fn with<T>(&self, f: impl FnOnce(&mut O) -> T) -> T {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl<O> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_session_start(&mut self, repetitions: usize) -> Result<()> {
        self.with(|o| o.on_session_start(repetitions))
    }

    fn on_round_start(&mut self, round: usize) -> Result<()> {
        self.with(|o| o.on_round_start(round))
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        self.with(|o| o.on_step(record))
    }

    fn on_round_end(&mut self, summary: &RoundSummary, records: &[StepRecord]) -> Result<()> {
        self.with(|o| o.on_round_end(summary, records))
    }

    fn on_session_end(&mut self, result: &SessionResult) -> Result<()> {
        self.with(|o| o.on_session_end(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AgentState, GameState};

    fn record(state: GameState, action: Action, rt_ms: Option<u64>) -> StepRecord {
        StepRecord {
            trial_index: 0,
            round: 1,
            action,
            state,
            next_state: GameState::NEUTRAL,
            response: rt_ms.map(|_| "e".to_string()),
            rt_ms,
            time_elapsed_ms: 0,
        }
    }

    #[test]
    fn test_metrics_counts_steps_and_rounds() {
        let mut metrics = MetricsObserver::new();
        metrics
            .on_step(&record(GameState::NEUTRAL, Action::Jab, Some(200)))
            .unwrap();
        metrics
            .on_step(&record(GameState::NEUTRAL, Action::None, None))
            .unwrap();
        // Unmodeled: (combo, neutral) + block
        metrics
            .on_step(&record(
                GameState::new(AgentState::Combo, AgentState::Neutral),
                Action::Block,
                Some(400),
            ))
            .unwrap();
        metrics
            .on_round_end(
                &RoundSummary {
                    round: 0,
                    steps: 3,
                    victor: Some(Side::Player),
                    aborted: false,
                },
                &[],
            )
            .unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.player_wins, 1);
        assert_eq!(summary.mean_rt_ms, Some(300.0));
        assert!((summary.timeout_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((summary.fallback_rate - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.action_counts[0], ("none".to_string(), 1));
    }

    #[test]
    fn test_shared_observer_exposes_state() {
        let (observer, handle) = SharedObserver::new(MetricsObserver::new());
        let mut boxed: Box<dyn Observer> = Box::new(observer);
        boxed
            .on_step(&record(GameState::NEUTRAL, Action::Cross, Some(120)))
            .unwrap();
        drop(boxed);
        assert_eq!(handle.lock().unwrap().summary().steps, 1);
    }
}
