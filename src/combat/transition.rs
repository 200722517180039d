//! Transition rules for the paired combat state
//!
//! The table maps a `(player, opponent, action)` triple to a tagged
//! [`Outcome`]. Only a subset of the 196 triples is modeled; every other
//! triple resets both participants to [`GameState::NEUTRAL`].
//!
//! Stochastic outcomes draw exactly once from the caller's random source, so
//! a fixed seed and a fixed input sequence replay identically.

use std::{collections::HashMap, sync::LazyLock};

use rand::{Rng, prelude::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::state::{Action, AgentState, GameState};

use AgentState::{Block, Combo, Combo2, Hit1, Hit2, Neutral, Windup};

/// Result of a modeled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "candidates")]
pub enum Outcome {
    /// Exactly one resulting pair
    Fixed(GameState),
    /// Two equally likely pairs, chosen by one draw
    Either([GameState; 2]),
}

impl Outcome {
    /// Candidate pairs in table order
    pub fn candidates(&self) -> &[GameState] {
        match self {
            Outcome::Fixed(state) => std::slice::from_ref(state),
            Outcome::Either(states) => states,
        }
    }

    /// Whether resolving this outcome consumes randomness
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Outcome::Either(_))
    }

    /// Pick the resulting pair.
    ///
    /// `Fixed` never touches `rng`; `Either` samples one of its two
    /// candidates.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> GameState {
        match self {
            Outcome::Fixed(state) => *state,
            Outcome::Either(states) => *states.choose(rng).unwrap_or(&states[0]),
        }
    }
}

/// One modeled entry of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub player: AgentState,
    pub opponent: AgentState,
    pub action: Action,
    pub outcome: Outcome,
}

impl Rule {
    pub fn state(&self) -> GameState {
        GameState::new(self.player, self.opponent)
    }
}

const fn pair(player: AgentState, opponent: AgentState) -> GameState {
    GameState::new(player, opponent)
}

const fn fixed(
    player: AgentState,
    opponent: AgentState,
    action: Action,
    to: GameState,
) -> Rule {
    Rule {
        player,
        opponent,
        action,
        outcome: Outcome::Fixed(to),
    }
}

const fn either(
    player: AgentState,
    opponent: AgentState,
    action: Action,
    first: GameState,
    second: GameState,
) -> Rule {
    Rule {
        player,
        opponent,
        action,
        outcome: Outcome::Either([first, second]),
    }
}

// Candidate order matters: it fixes which pair a given draw selects.
const RULES: [Rule; 17] = [
    // Both idle
    either(Neutral, Neutral, Action::None, pair(Neutral, Block), pair(Neutral, Windup)),
    either(Neutral, Neutral, Action::Jab, pair(Combo, Block), pair(Combo, Hit1)),
    either(Neutral, Neutral, Action::Cross, pair(Combo2, Hit2), pair(Hit1, Combo)),
    either(Neutral, Neutral, Action::Block, pair(Block, Block), pair(Block, Windup)),
    // Opponent guarding
    either(Neutral, Block, Action::None, pair(Neutral, Neutral), pair(Neutral, Windup)),
    fixed(Neutral, Block, Action::Jab, pair(Combo, Block)),
    fixed(Neutral, Block, Action::Cross, pair(Combo2, Block)),
    fixed(Neutral, Block, Action::Block, pair(Neutral, Neutral)),
    // Opponent winding up
    fixed(Neutral, Windup, Action::None, pair(Hit1, Combo)),
    fixed(Neutral, Windup, Action::Cross, pair(Hit1, Combo)),
    either(Neutral, Windup, Action::Jab, pair(Combo, Hit1), pair(Hit1, Combo)),
    either(Neutral, Windup, Action::Block, pair(Block, Combo), pair(Block, Combo2)),
    // Player mid-combo
    fixed(Combo, Block, Action::Block, pair(Block, Combo)),
    either(Combo, Block, Action::Jab, pair(Combo2, Block), pair(Hit1, Combo)),
    fixed(Combo, Block, Action::Cross, pair(Hit1, Combo)),
    fixed(Combo, Hit1, Action::Cross, pair(Combo2, Hit2)),
    fixed(Combo, Hit1, Action::Block, pair(Block, Neutral)),
];

static STANDARD: LazyLock<TransitionTable> = LazyLock::new(TransitionTable::new);

type Key = (AgentState, AgentState, Action);

/// Explicit mapping from `(player, opponent, action)` to outcome
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: HashMap<Key, Outcome>,
}

impl TransitionTable {
    /// Build the table from the modeled rule set.
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|rule| ((rule.player, rule.opponent, rule.action), rule.outcome))
            .collect();
        Self { rules }
    }

    /// Shared, immutable instance of the standard table
    pub fn standard() -> &'static TransitionTable {
        &STANDARD
    }

    /// Number of modeled triples
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Modeled outcome for a triple, if any
    pub fn outcome(&self, state: GameState, action: Action) -> Option<&Outcome> {
        self.rules.get(&(state.player, state.opponent, action))
    }

    pub fn is_modeled(&self, state: GameState, action: Action) -> bool {
        self.outcome(state, action).is_some()
    }

    /// Modeled rules in canonical `(player, opponent, action)` order
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self
            .rules
            .iter()
            .map(|(&(player, opponent, action), &outcome)| Rule {
                player,
                opponent,
                action,
                outcome,
            })
            .collect();
        rules.sort_by_key(|rule| (rule.player, rule.opponent, rule.action));
        rules
    }

    /// Compute the next state.
    ///
    /// Unmodeled triples yield [`GameState::NEUTRAL`] and consume no
    /// randomness.
    pub fn transition<R: Rng + ?Sized>(
        &self,
        state: GameState,
        action: Action,
        rng: &mut R,
    ) -> GameState {
        match self.outcome(state, action) {
            Some(outcome) => {
                let next = outcome.resolve(rng);
                if outcome.is_stochastic() {
                    debug!(%state, %action, %next, "Sampled transition");
                }
                next
            }
            None => {
                trace!(%state, %action, "Unmodeled transition, resetting");
                GameState::NEUTRAL
            }
        }
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the next state with the standard table.
pub fn transition<R: Rng + ?Sized>(
    player: AgentState,
    opponent: AgentState,
    action: Action,
    rng: &mut R,
) -> GameState {
    TransitionTable::standard().transition(GameState::new(player, opponent), action, rng)
}
