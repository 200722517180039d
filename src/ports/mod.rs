//! Ports (trait boundaries) for external collaborators.
//!
//! The engine owns these traits; adapters implement them. A host supplies a
//! renderer for stimuli, an input source for responses, and any number of
//! observers for collected data.

pub mod input;
pub mod observer;
pub mod renderer;

pub use input::{InputSource, Response};
pub use observer::Observer;
pub use renderer::{Renderer, Stimulus};
