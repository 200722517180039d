//! Sprite-based renderer.
//!
//! Resolves each posture to an image under an asset root:
//!
//! ```text
//! <root>/opponent/{neutral,block,windup,hit1,hit2,strike1,strike2}.png
//! <root>/player/{neutral,block,hit,jab,cross}.png
//! ```
//!
//! The player has no wind-up sprite; that posture renders as an empty
//! player visual.

use std::{collections::BTreeSet, path::PathBuf};

use crate::{
    combat::AgentState,
    ports::{Renderer, Stimulus},
};

/// Renderer backed by image files on disk
#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    root: PathBuf,
}

impl SpriteRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn opponent_file(state: AgentState) -> &'static str {
        match state {
            AgentState::Neutral => "neutral.png",
            AgentState::Block => "block.png",
            AgentState::Windup => "windup.png",
            AgentState::Hit1 => "hit1.png",
            AgentState::Hit2 => "hit2.png",
            AgentState::Combo => "strike1.png",
            AgentState::Combo2 => "strike2.png",
        }
    }

    fn player_file(state: AgentState) -> Option<&'static str> {
        match state {
            AgentState::Neutral => Some("neutral.png"),
            AgentState::Block => Some("block.png"),
            AgentState::Windup => None,
            AgentState::Hit1 | AgentState::Hit2 => Some("hit.png"),
            AgentState::Combo => Some("jab.png"),
            AgentState::Combo2 => Some("cross.png"),
        }
    }

    pub fn opponent_sprite(&self, state: AgentState) -> PathBuf {
        self.root.join("opponent").join(Self::opponent_file(state))
    }

    pub fn player_sprite(&self, state: AgentState) -> Option<PathBuf> {
        Self::player_file(state).map(|file| self.root.join("player").join(file))
    }

    /// Every distinct sprite path, sorted, for preloading.
    pub fn preload_list(&self) -> Vec<PathBuf> {
        let set: BTreeSet<PathBuf> = AgentState::ALL
            .into_iter()
            .flat_map(|state| {
                std::iter::once(self.opponent_sprite(state)).chain(self.player_sprite(state))
            })
            .collect();
        set.into_iter().collect()
    }

    /// Sprites from [`SpriteRenderer::preload_list`] that do not exist on disk
    pub fn missing_assets(&self) -> Vec<PathBuf> {
        self.preload_list()
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl Renderer for SpriteRenderer {
    fn render(&self, player: AgentState, opponent: AgentState) -> Stimulus {
        Stimulus {
            player,
            opponent,
            player_sprite: self.player_sprite(player),
            opponent_sprite: Some(self.opponent_sprite(opponent)),
        }
    }
}
