//! Common test utilities for the sparring test suite.

#![allow(dead_code)]

use rand::{Rng, SeedableRng, prelude::IndexedRandom, rngs::StdRng};
use sparring::{
    adapters::SpriteRenderer, app::ExperimentConfig, dispatch::DispatchTable,
    pipeline::SessionPipeline,
};

/// Keys a scripted participant may press; `None` lets the window elapse.
pub const SCRIPT_KEYS: [Option<&str>; 6] = [Some("q"), Some("w"), Some("e"), Some("Q"), Some("x"), None];

/// Build a session with the default sprite renderer.
pub fn session(config: ExperimentConfig) -> SessionPipeline {
    let dispatch = DispatchTable::build(&SpriteRenderer::default(), config.initial_state);
    SessionPipeline::new(config, dispatch).expect("valid session config")
}

/// Reproducible key script of `len` presses drawn from [`SCRIPT_KEYS`].
pub fn random_script(seed: u64, len: usize) -> Vec<Option<&'static str>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| *SCRIPT_KEYS.choose(&mut rng).unwrap_or(&None))
        .collect()
}

/// Next raw value from a clone of `rng`, leaving `rng` untouched.
pub fn peek(rng: &StdRng) -> u64 {
    rng.clone().random()
}
