//! Renderer port - maps a pair of postures to a displayable stimulus

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::combat::AgentState;

/// Opaque stimulus payload for one `(player, opponent)` pair
///
/// Either sprite may be absent; an absent sprite is a valid, empty visual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    pub player: AgentState,
    pub opponent: AgentState,
    pub player_sprite: Option<PathBuf>,
    pub opponent_sprite: Option<PathBuf>,
}

impl Stimulus {
    /// Sprites in display order: opponent on top, player below.
    pub fn sprites(&self) -> impl Iterator<Item = &PathBuf> {
        self.opponent_sprite.iter().chain(self.player_sprite.iter())
    }
}

/// Renderer trait
///
/// Rendering is a pure lookup with no error path: every posture of either
/// participant must resolve to a payload.
pub trait Renderer {
    fn render(&self, player: AgentState, opponent: AgentState) -> Stimulus;
}
