//! Tests for the transition table and key mapping

mod common;

use rand::{SeedableRng, prelude::IndexedRandom, rngs::StdRng};
use sparring::combat::{
    Action, AgentState, GameState, Outcome, TransitionTable, map_key, transition,
};

use common::peek;

mod totality {
    use super::*;

    #[test]
    fn every_triple_yields_a_valid_pair() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut count = 0;
        for state in GameState::all() {
            for action in Action::ALL {
                let next = transition(state.player, state.opponent, action, &mut rng);
                assert!(AgentState::ALL.contains(&next.player));
                assert!(AgentState::ALL.contains(&next.opponent));
                count += 1;
            }
        }
        assert_eq!(count, 196);
    }

    #[test]
    fn unmodeled_triples_reset_without_randomness() {
        let table = TransitionTable::standard();
        let mut rng = StdRng::seed_from_u64(99);
        let mut unmodeled = 0;
        for state in GameState::all() {
            for action in Action::ALL {
                if table.is_modeled(state, action) {
                    continue;
                }
                unmodeled += 1;
                let before = peek(&rng);
                assert_eq!(
                    table.transition(state, action, &mut rng),
                    GameState::NEUTRAL,
                    "{state} + {action}"
                );
                assert_eq!(peek(&rng), before, "{state} + {action} drew randomness");
            }
        }
        assert_eq!(unmodeled, 179);
    }

    #[test]
    fn hit_postures_never_start_a_rule() {
        let table = TransitionTable::standard();
        for rule in table.rules() {
            assert!(!matches!(rule.player, AgentState::Hit1 | AgentState::Hit2));
        }
    }
}

mod rule_table {
    use super::*;
    use AgentState::{Block, Combo, Combo2, Hit1, Hit2, Neutral, Windup};

    fn fixed(p: AgentState, o: AgentState) -> Outcome {
        Outcome::Fixed(GameState::new(p, o))
    }

    fn either(first: (AgentState, AgentState), second: (AgentState, AgentState)) -> Outcome {
        Outcome::Either([
            GameState::new(first.0, first.1),
            GameState::new(second.0, second.1),
        ])
    }

    /// Every modeled triple with its outcome, candidates in draw order
    fn expected_rules() -> Vec<(AgentState, AgentState, Action, Outcome)> {
        vec![
            (Neutral, Neutral, Action::None, either((Neutral, Block), (Neutral, Windup))),
            (Neutral, Neutral, Action::Jab, either((Combo, Block), (Combo, Hit1))),
            (Neutral, Neutral, Action::Cross, either((Combo2, Hit2), (Hit1, Combo))),
            (Neutral, Neutral, Action::Block, either((Block, Block), (Block, Windup))),
            (Neutral, Block, Action::None, either((Neutral, Neutral), (Neutral, Windup))),
            (Neutral, Block, Action::Jab, fixed(Combo, Block)),
            (Neutral, Block, Action::Cross, fixed(Combo2, Block)),
            (Neutral, Block, Action::Block, fixed(Neutral, Neutral)),
            (Neutral, Windup, Action::None, fixed(Hit1, Combo)),
            (Neutral, Windup, Action::Cross, fixed(Hit1, Combo)),
            (Neutral, Windup, Action::Jab, either((Combo, Hit1), (Hit1, Combo))),
            (Neutral, Windup, Action::Block, either((Block, Combo), (Block, Combo2))),
            (Combo, Block, Action::Block, fixed(Block, Combo)),
            (Combo, Block, Action::Jab, either((Combo2, Block), (Hit1, Combo))),
            (Combo, Block, Action::Cross, fixed(Hit1, Combo)),
            (Combo, Hit1, Action::Cross, fixed(Combo2, Hit2)),
            (Combo, Hit1, Action::Block, fixed(Block, Neutral)),
        ]
    }

    #[test]
    fn every_rule_has_its_pinned_outcome() {
        let table = TransitionTable::standard();
        for (player, opponent, action, outcome) in expected_rules() {
            let state = GameState::new(player, opponent);
            assert_eq!(
                table.outcome(state, action),
                Some(&outcome),
                "{state} + {action}"
            );
        }
    }

    #[test]
    fn no_triple_outside_the_pinned_set_is_modeled() {
        let table = TransitionTable::standard();
        let expected = expected_rules();
        for state in GameState::all() {
            for action in Action::ALL {
                let pinned = expected
                    .iter()
                    .any(|&(p, o, a, _)| GameState::new(p, o) == state && a == action);
                assert_eq!(table.is_modeled(state, action), pinned, "{state} + {action}");
            }
        }
        assert_eq!(table.len(), expected.len());
    }

    #[test]
    fn draws_select_candidates_in_order() {
        // A draw on the pinned candidate list picks the same pair as the engine
        for (player, opponent, action, outcome) in expected_rules() {
            let Outcome::Either(candidates) = outcome else {
                continue;
            };
            for seed in 0..16 {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut reference = rng.clone();
                let expected = *candidates.choose(&mut reference).unwrap();
                assert_eq!(transition(player, opponent, action, &mut rng), expected);
            }
        }
    }
}

mod scenarios {
    use super::*;

    fn neutral() -> GameState {
        GameState::NEUTRAL
    }

    #[test]
    fn jab_from_neutral_is_an_even_split() {
        let combo_block = GameState::new(AgentState::Combo, AgentState::Block);
        let combo_hit = GameState::new(AgentState::Combo, AgentState::Hit1);
        let trials = 2000;
        let mut blocked = 0;
        for seed in 0..trials {
            let mut rng = StdRng::seed_from_u64(seed);
            let next = transition(AgentState::Neutral, AgentState::Neutral, Action::Jab, &mut rng);
            assert!(next == combo_block || next == combo_hit, "unexpected {next}");
            if next == combo_block {
                blocked += 1;
            }
        }
        let share = blocked as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.05, "share of blocked jabs {share}");
    }

    #[test]
    fn unanswered_windup_always_lands() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                transition(AgentState::Neutral, AgentState::Windup, Action::None, &mut rng),
                GameState::new(AgentState::Hit1, AgentState::Combo)
            );
        }
    }

    #[test]
    fn mutual_guard_resets() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            transition(AgentState::Neutral, AgentState::Block, Action::Block, &mut rng),
            neutral()
        );
    }

    #[test]
    fn guard_after_combo_falls_back_to_neutral() {
        let mut rng = StdRng::seed_from_u64(1);
        let before = peek(&rng);
        assert_eq!(
            transition(AgentState::Combo, AgentState::Neutral, Action::Block, &mut rng),
            neutral()
        );
        assert_eq!(peek(&rng), before);
    }

    #[test]
    fn idle_opponent_reaches_both_outcomes() {
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            seen.insert(transition(
                AgentState::Neutral,
                AgentState::Block,
                Action::None,
                &mut rng,
            ));
        }
        assert_eq!(
            seen,
            [
                GameState::NEUTRAL,
                GameState::new(AgentState::Neutral, AgentState::Windup)
            ]
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
        );
    }
}

mod draw_accounting {
    use super::*;

    #[test]
    fn stochastic_rules_draw_once_fixed_rules_never() {
        let table = TransitionTable::standard();
        for rule in table.rules() {
            let mut engine_rng = StdRng::seed_from_u64(2024);
            let mut reference_rng = engine_rng.clone();
            let next = table.transition(rule.state(), rule.action, &mut engine_rng);

            match rule.outcome {
                Outcome::Fixed(state) => assert_eq!(next, state),
                Outcome::Either(candidates) => {
                    let expected = *candidates.choose(&mut reference_rng).unwrap();
                    assert_eq!(next, expected);
                }
            }
            assert_eq!(
                peek(&engine_rng),
                peek(&reference_rng),
                "{} + {} consumed the wrong amount of randomness",
                rule.state(),
                rule.action
            );
        }
    }

    #[test]
    fn fixed_seed_replays_identically() {
        let script = [Action::Jab, Action::None, Action::Cross, Action::Block, Action::Jab];
        let replay = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = GameState::NEUTRAL;
            let mut path = Vec::new();
            for _ in 0..20 {
                for action in script {
                    state = transition(state.player, state.opponent, action, &mut rng);
                    path.push(state);
                }
            }
            path
        };
        assert_eq!(replay(1234), replay(1234));
    }

    #[test]
    fn table_counts() {
        let rules = TransitionTable::standard().rules();
        assert_eq!(rules.len(), 17);
        assert_eq!(rules.iter().filter(|r| r.outcome.is_stochastic()).count(), 8);
    }
}

mod input_mapping {
    use super::*;

    #[test]
    fn default_bindings() {
        assert_eq!(map_key(Some("q")), Action::Cross);
        assert_eq!(map_key(Some("w")), Action::Block);
        assert_eq!(map_key(Some("e")), Action::Jab);
        assert_eq!(map_key(Some("E")), Action::Jab);
        assert_eq!(map_key(None), Action::None);
    }

    #[test]
    fn any_other_key_is_none() {
        for key in ["", " ", "r", "qq", "space", "Enter", "ё", "1"] {
            assert_eq!(map_key(Some(key)), Action::None, "key {key:?}");
        }
    }
}
