//! Scripted input source for replay and testing.
//!
//! Plays back a fixed list of responses in order. Keys are passed through
//! verbatim, so unbound keys reach the key map as they would from a real
//! keyboard.

use std::{collections::VecDeque, time::Duration};

use crate::{
    Error, Result,
    ports::{InputSource, Response, Stimulus},
};

/// Latency attached to scripted key presses by [`ScriptedInput::from_keys`]
pub const DEFAULT_SCRIPTED_RT: Duration = Duration::from_millis(250);

/// Input source that replays a fixed response list
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sparring::adapters::ScriptedInput;
/// use sparring::ports::{InputSource, Stimulus};
///
/// let mut input = ScriptedInput::from_keys([Some("e"), None]);
/// let stimulus = Stimulus::default();
/// let window = Duration::from_millis(500);
///
/// let first = input.await_response(&stimulus, window, &["q", "w", "e"])?;
/// assert_eq!(first.key.as_deref(), Some("e"));
/// let second = input.await_response(&stimulus, window, &["q", "w", "e"])?;
/// assert!(second.key.is_none());
/// assert!(input.await_response(&stimulus, window, &[]).is_err());
/// # Ok::<(), sparring::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    responses: VecDeque<Response>,
    consumed: usize,
    cycle: bool,
    script: Vec<Response>,
}

impl ScriptedInput {
    pub fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        let script: Vec<Response> = responses.into_iter().collect();
        Self {
            responses: script.iter().cloned().collect(),
            consumed: 0,
            cycle: false,
            script,
        }
    }

    /// Script of key presses; `None` entries are timeouts.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self::new(keys.into_iter().map(|key| match key {
            Some(key) => Response::key(key, DEFAULT_SCRIPTED_RT),
            None => Response::timeout(),
        }))
    }

    /// Restart the script from the top instead of failing when it runs out.
    pub fn cycled(mut self) -> Self {
        self.cycle = true;
        self
    }

    /// Number of responses handed out so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl InputSource for ScriptedInput {
    fn await_response(
        &mut self,
        _stimulus: &Stimulus,
        window: Duration,
        _choices: &[&str],
    ) -> Result<Response> {
        if self.responses.is_empty() && self.cycle && !self.script.is_empty() {
            self.responses.extend(self.script.iter().cloned());
        }
        let mut response = self.responses.pop_front().ok_or(Error::InputExhausted {
            consumed: self.consumed,
        })?;
        self.consumed += 1;

        // A press after the window closed never reaches the runner
        if response.rt.is_some_and(|rt| rt > window) {
            response = Response::timeout();
        }
        Ok(response)
    }
}
