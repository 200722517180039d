//! Combat stimulus engine for keyboard reaction-time experiments
//!
//! Two fighters, the participant-controlled player and a scripted opponent,
//! each hold one of seven postures. Every step shows both postures, waits a
//! short window for a key, and resolves the next pair from a fixed rule
//! table. A round ends when either fighter lands the final combo.
//!
//! This crate provides:
//! - The paired state model, transition rule table and key mapping
//! - 49 guarded presentation units, selected by guarded scan or O(1) lookup
//! - Round termination with the terminal round-number correction
//! - A session pipeline with pluggable input sources and observers
//! - Terminal, scripted and simulated participants
//!
//! # Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use sparring::combat::{Action, AgentState, GameState, transition};
//!
//! let mut rng = StdRng::seed_from_u64(1234);
//! let next = transition(AgentState::Neutral, AgentState::Windup, Action::None, &mut rng);
//! assert_eq!(next, GameState::new(AgentState::Hit1, AgentState::Combo));
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod combat;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod utils;

pub use combat::{Action, AgentState, GameState, Side, StepRecord};
pub use error::{Error, Result};
