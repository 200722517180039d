//! Application layer with dependency injection container.
//!
//! The container owns the stimulus renderer and wires configuration,
//! dispatch table and session pipeline together.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │   App (DI Container) + Config        │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                       │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Infrastructure (adapters)           │   │
//! │  │  - SpriteRenderer                    │   │
//! │  │  - TerminalInput / RandomResponder   │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                 │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - Renderer, InputSource, Observer   │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                    │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - combat, dispatch, pipeline        │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use sparring::app::{App, ExperimentConfig};
//! use sparring::adapters::ScriptedInput;
//!
//! let app = App::new();
//! let config = ExperimentConfig::new()
//!     .with_repetitions(1)
//!     .with_max_steps_per_round(Some(5));
//! let mut session = app.create_session(config)?;
//! let mut input = ScriptedInput::from_keys([None]).cycled();
//! let result = session.run(&mut input)?;
//! assert_eq!(result.rounds.len(), 1);
//! # Ok::<(), sparring::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{DEFAULT_SEED, ExperimentConfig};
pub use container::{App, AppBuilder};
