//! Raw-mode terminal input.
//!
//! The terminal is switched to raw mode so a single key press arrives as an
//! event without waiting for Enter. Each step polls for events with the
//! remaining window as timeout; the latency is taken when the key event is
//! read. Keys outside the allowed choices are ignored while the window stays
//! open. Esc or Ctrl+C closes the input.

use std::{
    collections::VecDeque,
    io::{self, Write},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    ports::{InputSource, Response, Stimulus},
};

/// Source of terminal events
pub trait EventSource {
    /// Wait up to `timeout` for an event to become available
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read the next event, blocking if none is pending
    fn read(&mut self) -> io::Result<Event>;
}

/// Events from the process terminal, in raw mode while this value lives
#[derive(Debug)]
pub struct CrosstermEvents {
    _private: (),
}

impl CrosstermEvents {
    /// Enable raw mode; it is disabled again on drop.
    pub fn enable() -> Result<Self> {
        enable_raw_mode().map_err(|e| Error::io("enable raw mode", e))?;
        Ok(Self { _private: () })
    }
}

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

impl Drop for CrosstermEvents {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to restore terminal mode");
        }
    }
}

/// Pre-recorded events, for driving the terminal adapter without a terminal
///
/// `poll` reports whether an event is queued and returns immediately, so an
/// empty queue behaves like a window that elapses without input.
#[derive(Debug, Clone, Default)]
pub struct QueuedEvents {
    events: VecDeque<Event>,
}

impl QueuedEvents {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Plain key presses for each character of `keys`
    pub fn presses(keys: &str) -> Self {
        Self::new(
            keys.chars()
                .map(|c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))),
        )
    }
}

impl EventSource for QueuedEvents {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no queued events"))
    }
}

/// Key the participant pressed, as seen by the step loop
enum Press {
    Char(char),
    Quit,
    Other,
}

fn classify(event: &Event) -> Press {
    let Event::Key(key) = event else {
        return Press::Other;
    };
    if key.kind != KeyEventKind::Press {
        return Press::Other;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Press::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Press::Quit,
        (KeyCode::Char(c), _) => Press::Char(c),
        _ => Press::Other,
    }
}

/// Input source reading single key presses from a terminal
pub struct TerminalInput<E = CrosstermEvents> {
    events: E,
    out: Box<dyn Write + Send>,
    show_sprites: bool,
}

impl TerminalInput<CrosstermEvents> {
    /// Put the terminal in raw mode and present stimuli on stdout.
    ///
    /// The terminal is restored when the returned value is dropped.
    pub fn open() -> Result<Self> {
        Ok(Self::new(CrosstermEvents::enable()?, Box::new(io::stdout())))
    }
}

impl<E: EventSource> TerminalInput<E> {
    pub fn new(events: E, out: Box<dyn Write + Send>) -> Self {
        Self {
            events,
            out,
            show_sprites: false,
        }
    }

    /// Print sprite paths under each stimulus.
    pub fn with_sprites(mut self, show: bool) -> Self {
        self.show_sprites = show;
        self
    }

    fn present(&mut self, stimulus: &Stimulus, choices: &[&str]) -> Result<()> {
        // Raw mode does not translate "\n", so lines end in "\r\n"
        write!(
            self.out,
            "opponent: {:<8} | player: {:<8} [{}]\r\n",
            stimulus.opponent.label(),
            stimulus.player.label(),
            choices.join("/")
        )
        .map_err(|e| Error::io("write stimulus", e))?;
        if self.show_sprites {
            for sprite in stimulus.sprites() {
                write!(self.out, "  {}\r\n", sprite.display())
                    .map_err(|e| Error::io("write stimulus", e))?;
            }
        }
        self.out.flush().map_err(|e| Error::io("flush stimulus", e))
    }

    /// Discard presses made before the stimulus appeared
    fn drain(&mut self) -> Result<()> {
        while self
            .events
            .poll(Duration::ZERO)
            .map_err(|e| Error::io("poll terminal", e))?
        {
            let event = self.events.read().map_err(|e| Error::io("read terminal", e))?;
            if let Press::Quit = classify(&event) {
                return Err(Error::InputClosed);
            }
        }
        Ok(())
    }
}

impl<E: EventSource> InputSource for TerminalInput<E> {
    fn await_response(
        &mut self,
        stimulus: &Stimulus,
        window: Duration,
        choices: &[&str],
    ) -> Result<Response> {
        self.drain()?;
        self.present(stimulus, choices)?;
        let onset = Instant::now();

        loop {
            let Some(remaining) = window.checked_sub(onset.elapsed()) else {
                return Ok(Response::timeout());
            };
            let ready = self
                .events
                .poll(remaining)
                .map_err(|e| Error::io("poll terminal", e))?;
            if !ready {
                return Ok(Response::timeout());
            }
            let event = self.events.read().map_err(|e| Error::io("read terminal", e))?;
            let rt = onset.elapsed();
            match classify(&event) {
                Press::Quit => return Err(Error::InputClosed),
                Press::Char(c) => {
                    let mut buf = [0; 4];
                    let key = c.encode_utf8(&mut buf);
                    if let Some(choice) = choices.iter().find(|k| k.eq_ignore_ascii_case(key)) {
                        return Ok(Response::key(*choice, rt));
                    }
                    debug!(key = %c, "Ignoring key outside allowed choices");
                }
                Press::Other => {}
            }
        }
    }
}
