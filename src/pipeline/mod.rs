//! Session pipeline abstractions
//!
//! This module provides:
//! - The round-continuation hook and round boundary policy
//! - The per-step completion hook
//! - The session driver that repeats rounds against an input source
//! - Observers recording what happens during a session

pub mod observers;
pub mod round;
pub mod session;
pub mod step;

// Re-export observer implementations (adapters)
pub use observers::{
    CsvObserver, CsvRow, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    SharedObserver,
};
pub use round::{RoundBoundary, continue_round};
pub use session::{RoundSummary, SessionPipeline, SessionResult};
pub use step::{PendingStep, complete_step};

pub use crate::ports::Observer;
