//! Session pipeline: the outer repetition driver around the step loop

use std::{path::Path, time::Duration};

use rand::{SeedableRng, random, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    round::{RoundBoundary, continue_round},
    step::{PendingStep, complete_step},
};
use crate::{
    Error, Result,
    app::ExperimentConfig,
    combat::{GameState, History, Side, StepRecord, TransitionTable},
    dispatch::DispatchTable,
    ports::{InputSource, Observer},
    utils::rate,
};

/// How one round ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Index of the round within the session (0-based)
    pub round: usize,
    /// Number of steps presented in the round
    pub steps: usize,
    /// Participant whose combo ended the round
    pub victor: Option<Side>,
    /// Round ended before reaching a terminal state, at the step limit or
    /// because the input failed
    pub aborted: bool,
}

/// Result of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub rounds: Vec<RoundSummary>,
    pub total_steps: usize,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub aborted_rounds: usize,
}

impl SessionResult {
    /// Tally round summaries
    pub fn new(rounds: Vec<RoundSummary>) -> Self {
        let total_steps = rounds.iter().map(|r| r.steps).sum();
        let count = |side| rounds.iter().filter(|r| r.victor == Some(side)).count();
        let player_wins = count(Side::Player);
        let opponent_wins = count(Side::Opponent);
        let aborted_rounds = rounds.iter().filter(|r| r.aborted).count();
        Self {
            rounds,
            total_steps,
            player_wins,
            opponent_wins,
            aborted_rounds,
        }
    }

    pub fn player_win_rate(&self) -> f64 {
        rate(self.player_wins, self.rounds.len())
    }

    pub fn opponent_win_rate(&self) -> f64 {
        rate(self.opponent_wins, self.rounds.len())
    }

    /// Mean number of steps per round
    pub fn mean_round_length(&self) -> f64 {
        if self.rounds.is_empty() {
            0.0
        } else {
            self.total_steps as f64 / self.rounds.len() as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Experiment session for one participant
///
/// Owns the history, the session RNG and the observers. The step to present
/// is selected from the directly held current state; the history stays the
/// audit trail that the guarded dispatch scan reads.
pub struct SessionPipeline {
    config: ExperimentConfig,
    table: &'static TransitionTable,
    dispatch: DispatchTable,
    history: History,
    current: GameState,
    rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
    /// Session timeline: response latency, or the full window on timeout
    elapsed: Duration,
}

impl SessionPipeline {
    /// Create a new session pipeline
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or `dispatch` was built for a
    /// different initial state.
    pub fn new(config: ExperimentConfig, dispatch: DispatchTable) -> Result<Self> {
        config.validate()?;
        if dispatch.initial() != config.initial_state {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "dispatch table starts at {} but the session starts at {}",
                    dispatch.initial(),
                    config.initial_state
                ),
            });
        }
        let seed = config.seed.unwrap_or_else(random);
        Ok(Self {
            table: TransitionTable::standard(),
            history: History::new(config.initial_state),
            current: config.initial_state,
            rng: StdRng::seed_from_u64(seed),
            observers: Vec::new(),
            elapsed: Duration::ZERO,
            dispatch,
            config,
        })
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// State the next step will be presented in
    pub fn current_state(&self) -> GameState {
        self.current
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Run `config.repetitions` rounds against `input`
    pub fn run(&mut self, input: &mut dyn InputSource) -> Result<SessionResult> {
        let repetitions = self.config.repetitions;
        info!(
            repetitions,
            seed = ?self.config.seed,
            boundary = %self.config.boundary,
            "Starting session"
        );

        for observer in &mut self.observers {
            observer.on_session_start(repetitions)?;
        }

        let mut rounds = Vec::with_capacity(repetitions);
        for round in 0..repetitions {
            rounds.push(self.run_round(round, input)?);
        }

        let result = SessionResult::new(rounds);
        for observer in &mut self.observers {
            observer.on_session_end(&result)?;
        }

        info!(
            steps = result.total_steps,
            player_wins = result.player_wins,
            opponent_wins = result.opponent_wins,
            aborted = result.aborted_rounds,
            "Session complete"
        );
        Ok(result)
    }

    fn run_round(&mut self, round: usize, input: &mut dyn InputSource) -> Result<RoundSummary> {
        for observer in &mut self.observers {
            observer.on_round_start(round)?;
        }
        if self.config.boundary == RoundBoundary::Reset {
            self.current = self.config.initial_state;
        }

        let start = self.history.len();
        let mut aborted = false;
        loop {
            if let Err(err) = self.step(round, start, input) {
                warn!(round, error = %err, "Round interrupted");
                // Hand the completed steps to observers before giving up
                if let Err(flush) = self.end_round(round, start, true) {
                    warn!(round, error = %flush, "Failed to flush interrupted round");
                }
                return Err(err);
            }
            let records = self.history.since_mut(start);
            if !continue_round(records) {
                break;
            }
            if let Some(limit) = self.config.max_steps_per_round
                && records.len() >= limit
            {
                warn!(round, limit, "Round reached the step limit without a combo");
                aborted = true;
                break;
            }
        }

        let summary = self.end_round(round, start, aborted)?;
        info!(
            round,
            steps = summary.steps,
            victor = ?summary.victor,
            aborted,
            "Round complete"
        );
        Ok(summary)
    }

    /// Summarize the records since `start` and notify observers
    fn end_round(&mut self, round: usize, start: usize, aborted: bool) -> Result<RoundSummary> {
        let records = self.history.since(start);
        let victor = if aborted {
            None
        } else {
            records.last().and_then(|record| record.state.victor())
        };
        let summary = RoundSummary {
            round,
            steps: records.len(),
            victor,
            aborted,
        };
        for observer in &mut self.observers {
            observer.on_round_end(&summary, records)?;
        }
        Ok(summary)
    }

    fn step(&mut self, round: usize, start: usize, input: &mut dyn InputSource) -> Result<()> {
        let state = self.current;
        let unit = self.dispatch.lookup(state);
        debug_assert_eq!(
            unit.state(),
            self.dispatch.scan(self.visible_last(start)).state(),
            "lookup and guarded scan disagree"
        );

        let window = self.config.wait_window();
        let choices = self.config.keys.choices();
        let response = input.await_response(unit.stimulus(), window, &choices)?;
        self.elapsed += response.rt.unwrap_or(window);

        let pending = PendingStep {
            trial_index: self.history.len(),
            round: self.round_number(round),
            state,
        };
        let record = complete_step(
            self.table,
            &self.config.keys,
            pending,
            &response,
            self.elapsed,
            &mut self.rng,
        );
        debug!(
            trial = record.trial_index,
            state = %record.state,
            action = %record.action,
            next = %record.next_state,
            "Step complete"
        );

        self.current = record.next_state;
        self.history.push(record);
        if let Some(record) = self.history.last() {
            for observer in &mut self.observers {
                observer.on_step(record)?;
            }
        }
        Ok(())
    }

    /// Last record the guarded predicates may see
    fn visible_last(&self, round_start: usize) -> Option<&StepRecord> {
        match self.config.boundary {
            RoundBoundary::Carry => self.history.last(),
            RoundBoundary::Reset => self.history.since(round_start).last(),
        }
    }

    /// Round number stamped on the next record.
    ///
    /// Follows the history cursor, which the terminal correction advances.
    /// An aborted round leaves the cursor behind, so it is raised to the
    /// round index.
    fn round_number(&self, round: usize) -> u32 {
        let floor = u32::try_from(round + 1).unwrap_or(u32::MAX);
        self.history.round_cursor().max(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::{ScriptedInput, SpriteRenderer},
        combat::AgentState,
    };

    fn pipeline(config: ExperimentConfig) -> SessionPipeline {
        let dispatch = DispatchTable::build(&SpriteRenderer::default(), config.initial_state);
        SessionPipeline::new(config, dispatch).unwrap()
    }

    #[test]
    fn test_cross_on_guard_wins_round() {
        // (neutral, block) + cross -> (combo2, block), presented next and terminal
        let config = ExperimentConfig::default()
            .with_repetitions(1)
            .with_initial_state(GameState::new(AgentState::Neutral, AgentState::Block));
        let mut session = pipeline(config);
        let mut input = ScriptedInput::from_keys([Some("q"), None]);
        let result = session.run(&mut input).unwrap();

        assert_eq!(result.rounds.len(), 1);
        assert_eq!(result.rounds[0].steps, 2);
        assert_eq!(result.rounds[0].victor, Some(Side::Player));
        assert_eq!(result.player_wins, 1);

        let rounds: Vec<u32> = session.history().records().iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2]);
        assert_eq!(session.current_state(), GameState::NEUTRAL);
    }

    #[test]
    fn test_step_limit_aborts_round() {
        let config = ExperimentConfig::default()
            .with_repetitions(2)
            .with_max_steps_per_round(Some(4));
        let mut session = pipeline(config);
        let mut input = ScriptedInput::from_keys([None]).cycled();
        let result = session.run(&mut input).unwrap();

        assert_eq!(result.aborted_rounds, 2);
        assert_eq!(result.total_steps, 8);
        assert!(result.rounds.iter().all(|r| r.victor.is_none()));

        let records = session.history().records();
        assert!(records[..4].iter().all(|r| r.round == 1));
        assert!(records[4..].iter().all(|r| r.round == 2));
    }

    #[test]
    fn test_elapsed_time_follows_timeline() {
        let config = ExperimentConfig::default()
            .with_repetitions(1)
            .with_max_steps_per_round(Some(2));
        let mut session = pipeline(config);
        let mut input = ScriptedInput::from_keys([Some("x"), None]);
        session.run(&mut input).unwrap();

        let elapsed: Vec<u64> = session
            .history()
            .records()
            .iter()
            .map(|r| r.time_elapsed_ms)
            .collect();
        assert_eq!(elapsed, vec![250, 750]);
    }

    #[test]
    fn test_mismatched_dispatch_is_rejected() {
        let dispatch = DispatchTable::build(
            &SpriteRenderer::default(),
            GameState::new(AgentState::Block, AgentState::Neutral),
        );
        assert!(SessionPipeline::new(ExperimentConfig::default(), dispatch).is_err());
    }

    #[test]
    fn test_result_rates() {
        let result = SessionResult::new(vec![
            RoundSummary {
                round: 0,
                steps: 3,
                victor: Some(Side::Player),
                aborted: false,
            },
            RoundSummary {
                round: 1,
                steps: 5,
                victor: None,
                aborted: true,
            },
        ]);
        assert_eq!(result.player_win_rate(), 0.5);
        assert_eq!(result.opponent_win_rate(), 0.0);
        assert_eq!(result.mean_round_length(), 4.0);
    }
}
