//! Two-participant combat model
//!
//! Postures, actions, the transition table, input mapping and the step log.

pub mod input;
pub mod record;
pub mod state;
pub mod transition;

pub use input::{KeyBinding, KeyMap, map_key};
pub use record::{History, StepRecord};
pub use state::{Action, AgentState, GameState, Side};
pub use transition::{Outcome, Rule, TransitionTable, transition};
