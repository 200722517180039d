//! Input port - collects one response per step

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::renderer::Stimulus;
use crate::Result;

/// Response collected for one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Key pressed, or `None` when the window elapsed
    pub key: Option<String>,
    /// Latency from stimulus onset to the key press
    pub rt: Option<Duration>,
}

impl Response {
    pub fn key(key: impl Into<String>, rt: Duration) -> Self {
        Self {
            key: Some(key.into()),
            rt: Some(rt),
        }
    }

    pub fn timeout() -> Self {
        Self::default()
    }
}

/// Input source trait
///
/// An input source presents `stimulus` and blocks until one of `choices` is
/// pressed or `window` elapses. Keys outside `choices` are ignored while the
/// window is open. A timeout is a normal [`Response`], not an error.
///
/// # Errors
///
/// Implementations return an error only when no further responses can be
/// produced at all (closed terminal, exhausted script).
pub trait InputSource {
    fn await_response(
        &mut self,
        stimulus: &Stimulus,
        window: Duration,
        choices: &[&str],
    ) -> Result<Response>;
}
