//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod random_responder;
pub mod scripted_input;
pub mod sprite_renderer;
pub mod terminal_input;

pub use random_responder::{RandomResponder, ResponderProfile};
pub use scripted_input::ScriptedInput;
pub use sprite_renderer::SpriteRenderer;
pub use terminal_input::{CrosstermEvents, EventSource, QueuedEvents, TerminalInput};
