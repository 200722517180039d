//! CLI infrastructure for the sparring experiment
//!
//! This module provides the command-line interface for running sessions at
//! the terminal, simulating participants, and inspecting the rule table.

pub mod commands;
pub mod config;
pub mod output;
