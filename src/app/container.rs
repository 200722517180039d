//! Dependency injection container for the sparring application.
//!
//! The container owns the stimulus renderer and provides factory methods for
//! dispatch tables and session pipelines.

use std::{path::PathBuf, sync::Arc};

use tracing::warn;

use super::config::ExperimentConfig;
use crate::{
    Result,
    adapters::SpriteRenderer,
    dispatch::DispatchTable,
    pipeline::SessionPipeline,
    ports::Renderer,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use sparring::app::{App, ExperimentConfig};
///
/// let app = App::new();
/// let session = app.create_session(ExperimentConfig::new().with_repetitions(1))?;
/// assert_eq!(session.dispatch().len(), 49);
/// # Ok::<(), sparring::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use sparring::app::App;
/// use sparring::adapters::SpriteRenderer;
///
/// let app = App::for_testing()
///     .with_renderer(SpriteRenderer::new("/tmp/sprites"))
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Fixed renderer; `None` renders sprites from each config's root
    renderer: Option<Arc<dyn Renderer + Send + Sync>>,
    /// Seed applied when a config leaves its seed unset
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `SpriteRenderer` rooted at each config's `sprite_root`
    /// - No default seed (configs without a seed use OS entropy)
    pub fn new() -> Self {
        Self {
            renderer: None,
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    fn renderer_for(&self, config: &ExperimentConfig) -> Arc<dyn Renderer + Send + Sync> {
        match &self.renderer {
            Some(renderer) => Arc::clone(renderer),
            None => Arc::new(SpriteRenderer::new(&config.sprite_root)),
        }
    }

    /// Build the 49 guarded units for `config`.
    pub fn create_dispatch(&self, config: &ExperimentConfig) -> DispatchTable {
        let renderer = self.renderer_for(config);
        DispatchTable::build(renderer.as_ref(), config.initial_state)
    }

    /// Create a session pipeline with the given configuration.
    pub fn create_session(&self, mut config: ExperimentConfig) -> Result<SessionPipeline> {
        config.seed = config.seed.or(self.default_seed);
        let dispatch = self.create_dispatch(&config);
        SessionPipeline::new(config, dispatch)
    }

    /// Sprite files the session would show but that do not exist.
    ///
    /// Only checked for the built-in sprite renderer; each missing path is
    /// logged as a warning.
    pub fn missing_assets(&self, config: &ExperimentConfig) -> Vec<PathBuf> {
        if self.renderer.is_some() {
            return Vec::new();
        }
        let missing = SpriteRenderer::new(&config.sprite_root).missing_assets();
        for path in &missing {
            warn!(path = %path.display(), "Sprite not found");
        }
        missing
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing App with custom dependencies.
pub struct AppBuilder {
    renderer: Option<Arc<dyn Renderer + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            renderer: None,
            default_seed: None,
        }
    }

    /// Use a fixed renderer for every session.
    pub fn with_renderer<R: Renderer + Send + Sync + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Set the seed used by configs without one.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    pub fn build(self) -> App {
        App {
            renderer: self.renderer,
            default_seed: self.default_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        combat::{AgentState, GameState},
        ports::Stimulus,
    };

    struct LabelRenderer;

    impl Renderer for LabelRenderer {
        fn render(&self, player: AgentState, opponent: AgentState) -> Stimulus {
            Stimulus {
                player,
                opponent,
                ..Stimulus::default()
            }
        }
    }

    #[test]
    fn test_injected_renderer_is_used() {
        let app = App::for_testing().with_renderer(LabelRenderer).build();
        let dispatch = app.create_dispatch(&ExperimentConfig::default());
        let unit = dispatch.lookup(GameState::NEUTRAL);
        assert!(unit.stimulus().player_sprite.is_none());
        assert!(app.missing_assets(&ExperimentConfig::default()).is_empty());
    }

    #[test]
    fn test_default_seed_fills_unset_seed() {
        let app = App::for_testing().with_default_seed(7).build();
        let session = app
            .create_session(ExperimentConfig::default().with_entropy())
            .unwrap();
        assert_eq!(session.config().seed, Some(7));

        let session = app.create_session(ExperimentConfig::default()).unwrap();
        assert_eq!(session.config().seed, Some(1234));
    }

    #[test]
    fn test_sprite_renderer_follows_config_root() {
        let app = App::new();
        let config = ExperimentConfig::default().with_sprite_root("/srv/sprites");
        let dispatch = app.create_dispatch(&config);
        let stimulus = dispatch.lookup(GameState::NEUTRAL).stimulus();
        let sprite = stimulus.opponent_sprite.as_ref().unwrap();
        assert!(sprite.starts_with("/srv/sprites"));
    }
}
