//! Tests for the guarded dispatch table

use std::path::Path;

use sparring::{
    adapters::SpriteRenderer,
    combat::{Action, AgentState, GameState, StepRecord},
    dispatch::DispatchTable,
};

fn record_leading_to(next_state: GameState) -> StepRecord {
    StepRecord {
        trial_index: 0,
        round: 1,
        action: Action::None,
        state: GameState::NEUTRAL,
        next_state,
        response: None,
        rt_ms: None,
        time_elapsed_ms: 500,
    }
}

#[test]
fn exactly_one_unit_is_active_per_state() {
    let table = DispatchTable::build(&SpriteRenderer::default(), GameState::NEUTRAL);
    for state in GameState::all() {
        let last = record_leading_to(state);
        let active: Vec<GameState> = table
            .units()
            .iter()
            .filter(|unit| unit.is_active(Some(&last)))
            .map(|unit| unit.state())
            .collect();
        assert_eq!(active, vec![state]);
        assert_eq!(table.scan(Some(&last)).state(), state);
        assert_eq!(table.lookup(state).state(), state);
    }
}

#[test]
fn empty_history_activates_initial_unit() {
    let table = DispatchTable::build(&SpriteRenderer::default(), GameState::NEUTRAL);
    let active = table
        .units()
        .iter()
        .filter(|unit| unit.is_active(None))
        .count();
    assert_eq!(active, 1);
    assert_eq!(table.scan(None).state(), GameState::NEUTRAL);

    let windup = GameState::new(AgentState::Neutral, AgentState::Windup);
    let table = DispatchTable::build(&SpriteRenderer::default(), windup);
    assert_eq!(table.scan(None).state(), windup);
}

#[test]
fn units_carry_rendered_sprites() {
    let table = DispatchTable::build(&SpriteRenderer::new("sprites"), GameState::NEUTRAL);
    let unit = table.lookup(GameState::new(AgentState::Windup, AgentState::Combo2));
    let stimulus = unit.stimulus();
    assert!(stimulus.player_sprite.is_none());
    assert_eq!(
        stimulus.opponent_sprite.as_deref(),
        Some(Path::new("sprites/opponent/strike2.png"))
    );
}
