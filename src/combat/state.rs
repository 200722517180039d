//! Agent postures, actions and the paired game state

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Combat posture of a single participant
///
/// The order of the variants is the canonical enumeration order used by the
/// dispatch table and the rule listings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// Idle, guard down
    #[default]
    Neutral,
    /// Guard up
    Block,
    /// Telegraphing an incoming attack
    Windup,
    /// First stage of being hit
    Hit1,
    /// Second stage of being hit
    Hit2,
    /// Landing the opening strike of a combo
    Combo,
    /// Landing the final strike of a combo (ends the round)
    Combo2,
}

impl AgentState {
    /// Number of postures
    pub const COUNT: usize = 7;

    /// All postures in canonical order
    pub const ALL: [AgentState; Self::COUNT] = [
        AgentState::Neutral,
        AgentState::Block,
        AgentState::Windup,
        AgentState::Hit1,
        AgentState::Hit2,
        AgentState::Combo,
        AgentState::Combo2,
    ];

    /// Position in canonical order
    pub fn index(self) -> usize {
        match self {
            AgentState::Neutral => 0,
            AgentState::Block => 1,
            AgentState::Windup => 2,
            AgentState::Hit1 => 3,
            AgentState::Hit2 => 4,
            AgentState::Combo => 5,
            AgentState::Combo2 => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentState::Neutral => "neutral",
            AgentState::Block => "block",
            AgentState::Windup => "windup",
            AgentState::Hit1 => "hit1",
            AgentState::Hit2 => "hit2",
            AgentState::Combo => "combo",
            AgentState::Combo2 => "combo2",
        }
    }

    pub fn from_label(label: &str) -> Option<AgentState> {
        Self::ALL
            .into_iter()
            .find(|state| state.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Whether this is the final combo stage
    pub fn is_final_combo(self) -> bool {
        self == AgentState::Combo2
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgentState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| Error::InvalidAgentState {
            input: s.to_string(),
            expected: Self::ALL.map(AgentState::label).join(", "),
        })
    }
}

/// Input chosen by the player for one step
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// No usable key before the window closed
    #[default]
    None,
    /// Fast strike
    Jab,
    /// Slow, heavy strike
    Cross,
    /// Raise guard
    Block,
}

impl Action {
    pub const COUNT: usize = 4;

    pub const ALL: [Action; Self::COUNT] = [Action::None, Action::Jab, Action::Cross, Action::Block];

    /// Position in [`Action::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Jab => "jab",
            Action::Cross => "cross",
            Action::Block => "block",
        }
    }

    pub fn from_label(label: &str) -> Option<Action> {
        Self::ALL
            .into_iter()
            .find(|action| action.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| Error::InvalidAction {
            input: s.to_string(),
            expected: Self::ALL.map(Action::label).join(", "),
        })
    }
}

/// Which participant an outcome refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

/// Postures of both participants at one point in time
///
/// This type is `Copy`: two bytes, compared and hashed by value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GameState {
    pub player: AgentState,
    pub opponent: AgentState,
}

impl GameState {
    /// Number of distinct pairs
    pub const COUNT: usize = AgentState::COUNT * AgentState::COUNT;

    /// Both participants idle; the initial state and the reset target
    pub const NEUTRAL: GameState = GameState::new(AgentState::Neutral, AgentState::Neutral);

    pub const fn new(player: AgentState, opponent: AgentState) -> Self {
        Self { player, opponent }
    }

    /// Dense index in player-major canonical order (0..49)
    pub fn index(self) -> usize {
        self.player.index() * AgentState::COUNT + self.opponent.index()
    }

    /// Inverse of [`GameState::index`]
    pub fn from_index(index: usize) -> Option<GameState> {
        if index >= Self::COUNT {
            return None;
        }
        Some(GameState::new(
            AgentState::ALL[index / AgentState::COUNT],
            AgentState::ALL[index % AgentState::COUNT],
        ))
    }

    /// Every pair in player-major canonical order
    pub fn all() -> impl Iterator<Item = GameState> {
        AgentState::ALL.into_iter().flat_map(|player| {
            AgentState::ALL
                .into_iter()
                .map(move |opponent| GameState::new(player, opponent))
        })
    }

    /// A state is terminal when either participant is in the final combo stage.
    pub fn is_terminal(self) -> bool {
        self.player.is_final_combo() || self.opponent.is_final_combo()
    }

    /// The participant that reached the final combo stage, player first.
    pub fn victor(self) -> Option<Side> {
        if self.player.is_final_combo() {
            Some(Side::Player)
        } else if self.opponent.is_final_combo() {
            Some(Side::Opponent)
        } else {
            None
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.player, self.opponent)
    }
}

impl From<(AgentState, AgentState)> for GameState {
    fn from((player, opponent): (AgentState, AgentState)) -> Self {
        GameState::new(player, opponent)
    }
}
