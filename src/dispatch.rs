//! Pre-built stimulus units, one per `(player, opponent)` pair
//!
//! A runner that can only execute a fixed sequence of units can still follow
//! the combat state machine: every pair gets a unit up front, and each unit
//! carries a predicate that is true only when the last completed step led to
//! its pair. Scanning the units in order and running the active one yields
//! the state-dependent branch.
//!
//! [`DispatchTable::lookup`] selects the same unit directly by index, which
//! is what the session pipeline uses.

use crate::{
    combat::{GameState, StepRecord},
    ports::{Renderer, Stimulus},
};

/// Stimulus entry guarded by an activation predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedUnit {
    state: GameState,
    stimulus: Stimulus,
    initial: GameState,
}

impl GuardedUnit {
    /// The pair this unit represents
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn stimulus(&self) -> &Stimulus {
        &self.stimulus
    }

    /// Whether this unit is the one to run next.
    ///
    /// Reads `last.next_state`, or the table's initial state when no step
    /// has completed.
    pub fn is_active(&self, last: Option<&StepRecord>) -> bool {
        last.map_or(self.initial, |record| record.next_state) == self.state
    }
}

/// All 49 guarded units in player-major canonical order
#[derive(Debug, Clone)]
pub struct DispatchTable {
    units: Vec<GuardedUnit>,
    initial: GameState,
}

impl DispatchTable {
    /// Render every pair once and guard it.
    pub fn build(renderer: &dyn Renderer, initial: GameState) -> Self {
        let units = GameState::all()
            .map(|state| GuardedUnit {
                state,
                stimulus: renderer.render(state.player, state.opponent),
                initial,
            })
            .collect();
        Self { units, initial }
    }

    pub fn units(&self) -> &[GuardedUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// State assumed before any step has completed
    pub fn initial(&self) -> GameState {
        self.initial
    }

    /// Linear scan for the first active unit.
    ///
    /// Falls back to the `{neutral, neutral}` unit if no predicate holds.
    pub fn scan(&self, last: Option<&StepRecord>) -> &GuardedUnit {
        self.units
            .iter()
            .find(|unit| unit.is_active(last))
            .unwrap_or_else(|| self.lookup(GameState::NEUTRAL))
    }

    /// Direct selection of the unit for `state`.
    pub fn lookup(&self, state: GameState) -> &GuardedUnit {
        &self.units[state.index()]
    }
}
