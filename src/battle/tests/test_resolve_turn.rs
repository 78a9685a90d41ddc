use crate::battle::engine::{resolve_turn, resolve_turn_with_events, submit_action};
use crate::battle::events::BattleEvent;
use crate::battle::rng::TurnRng;
use crate::battle::state::{Match, Phase};
use crate::battle::tests::common::{
    assert_ok, create_test_match, predictable_rng, test_dex, TestCombatantBuilder,
};
use crate::config::RulesConfig;
use crate::errors::{ActionError, BattleError};
use crate::side::{Action, SideId};
use pretty_assertions::assert_eq;

fn submit_both(state: &mut Match, a: Action, b: Action) {
    assert_ok(submit_action(state, SideId::A, a, test_dex()));
    assert_ok(submit_action(state, SideId::B, b, test_dex()));
}

fn tackle_duel(defender_hp: Option<u16>) -> Match {
    let mut defender = TestCombatantBuilder::new("ironbulk");
    if let Some(hp) = defender_hp {
        defender = defender.with_hp(hp);
    }
    create_test_match(
        vec![TestCombatantBuilder::new("embercub").build()],
        vec![defender.build()],
    )
}

fn count_lines(state: &Match, needle: &str) -> usize {
    state.log.iter().filter(|line| line.contains(needle)).count()
}

#[test]
fn test_faster_combatant_moves_first() {
    let mut state = tackle_duel(None);
    submit_both(&mut state, Action::use_move("Tackle"), Action::use_move("Tackle"));

    let (next, bus) = resolve_turn_with_events(&state, test_dex(), &RulesConfig::default(), predictable_rng());

    let movers: Vec<_> = bus
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::MoveUsed { side, .. } => Some(*side),
            _ => None,
        })
        .collect();
    assert_eq!(movers, vec![SideId::A, SideId::B]);
    assert_eq!(bus.events()[0], BattleEvent::TurnStarted { turn: 1 });

    assert_eq!(next.turn, 2);
    assert_eq!(next.phase, Phase::Battle);
    assert!(!next.both_actions_present());
    assert_eq!(next.log.first().map(String::as_str), Some("== Turn 1 =="));
    assert_eq!(count_lines(&next, "Embercub used Tackle!"), 1);
}

#[test]
fn test_input_record_is_left_untouched() {
    let mut state = tackle_duel(None);
    submit_both(&mut state, Action::use_move("Tackle"), Action::use_move("Tackle"));
    let before = state.clone();

    let next = resolve_turn(&state, test_dex(), &RulesConfig::default(), predictable_rng());

    assert_eq!(state, before);
    assert!(next.active(SideId::B).unwrap().current_hp < before.active(SideId::B).unwrap().current_hp);
}

#[test]
fn test_resolution_without_both_actions_changes_nothing() {
    let mut state = tackle_duel(None);
    assert_ok(submit_action(&mut state, SideId::A, Action::use_move("Tackle"), test_dex()));

    let next = resolve_turn(&state, test_dex(), &RulesConfig::default(), predictable_rng());
    assert_eq!(next, state);
}

#[test]
fn test_rng_exhaustion_rolls_back_with_a_diagnostic() {
    let mut state = tackle_duel(None);
    submit_both(&mut state, Action::use_move("Tackle"), Action::use_move("Tackle"));

    let next = resolve_turn(
        &state,
        test_dex(),
        &RulesConfig::default(),
        TurnRng::new_for_test(Vec::new()),
    );

    assert_eq!(next.phase, Phase::Battle);
    assert_eq!(next.turn, 1);
    assert!(!next.both_actions_present());
    assert_eq!(next.sides[0].roster, state.sides[0].roster);
    assert_eq!(next.sides[1].roster, state.sides[1].roster);
    assert_eq!(next.log.len(), state.log.len() + 1);
    let diagnostic = next.log.last().unwrap();
    assert!(diagnostic.starts_with("[diagnostic] turn 1 did not resolve"));
    assert!(diagnostic.contains("accuracy of Tackle"));
}

#[test]
fn test_knockout_of_last_combatant_ends_the_match() {
    let mut state = tackle_duel(Some(1));
    submit_both(&mut state, Action::use_move("Tackle"), Action::use_move("Tackle"));

    let (next, bus) = resolve_turn_with_events(&state, test_dex(), &RulesConfig::default(), predictable_rng());

    assert_eq!(next.phase, Phase::Finished);
    assert_eq!(next.winner, Some(SideId::A));
    assert_eq!(count_lines(&next, "Ironbulk fainted!"), 1);
    assert_eq!(count_lines(&next, "Ironbulk used"), 0);
    assert_eq!(bus.events().last(), Some(&BattleEvent::BattleEnded { winner: SideId::A }));
}

#[test]
fn test_double_knockout_goes_to_side_b() {
    // Recoil from the finishing blow takes the attacker down with it.
    let mut state = create_test_match(
        vec![TestCombatantBuilder::new("embercub")
            .with_moves(&["Double-Edge"])
            .with_hp(1)
            .build()],
        vec![TestCombatantBuilder::new("ironbulk").with_hp(1).build()],
    );
    submit_both(&mut state, Action::use_move("Double-Edge"), Action::use_move("Tackle"));

    let next = resolve_turn(&state, test_dex(), &RulesConfig::default(), predictable_rng());

    assert!(next.active(SideId::A).unwrap().is_fainted());
    assert!(next.active(SideId::B).unwrap().is_fainted());
    assert_eq!(next.phase, Phase::Finished);
    assert_eq!(next.winner, Some(SideId::B));
    assert_eq!(count_lines(&next, "fainted!"), 2);
}

#[test]
fn test_knockout_with_bench_waits_for_a_replacement() {
    let mut state = create_test_match(
        vec![TestCombatantBuilder::new("embercub").build()],
        vec![
            TestCombatantBuilder::new("ironbulk").with_hp(1).build(),
            TestCombatantBuilder::new("bogmaw").build(),
        ],
    );
    submit_both(&mut state, Action::use_move("Tackle"), Action::use_move("Tackle"));

    let mut next = resolve_turn(&state, test_dex(), &RulesConfig::default(), predictable_rng());
    assert_eq!(next.phase, Phase::Switching);
    assert_eq!(next.turn, 1);

    assert_eq!(
        submit_action(&mut next, SideId::A, Action::switch_to(0), test_dex()),
        Err(BattleError::Action(ActionError::NoReplacementNeeded(SideId::A)))
    );
    assert_eq!(
        submit_action(&mut next, SideId::B, Action::use_move("Tackle"), test_dex()),
        Err(BattleError::Action(ActionError::ReplacementRequired(SideId::B)))
    );
    assert_eq!(
        submit_action(&mut next, SideId::B, Action::switch_to(0), test_dex()),
        Err(BattleError::Action(ActionError::CombatantFainted(0)))
    );
    assert_ok(submit_action(&mut next, SideId::B, Action::switch_to(1), test_dex()));

    let after = resolve_turn(&next, test_dex(), &RulesConfig::default(), predictable_rng());
    assert_eq!(after.phase, Phase::Battle);
    assert_eq!(after.turn, 2);
    assert_eq!(after.side(SideId::B).active, 1);
    assert_eq!(count_lines(&after, "Side B sent out Bogmaw!"), 1);
    assert_eq!(count_lines(&after, "Ironbulk fainted!"), 1);
}

#[test]
fn test_self_switch_hands_control_back_for_the_pick() {
    let mut state = create_test_match(
        vec![
            TestCombatantBuilder::new("embercub").with_moves(&["U-turn"]).build(),
            TestCombatantBuilder::new("tidalisk").build(),
        ],
        vec![TestCombatantBuilder::new("ironbulk").build()],
    );
    submit_both(&mut state, Action::use_move("U-turn"), Action::use_move("Tackle"));

    let mut next = resolve_turn(&state, test_dex(), &RulesConfig::default(), predictable_rng());
    assert_eq!(next.phase, Phase::Switching);
    assert!(next.side(SideId::A).pending_switch);
    // The switch waits for the pick, so the user still takes the hit.
    assert!(!next.active(SideId::A).unwrap().is_full_hp());

    assert_ok(submit_action(&mut next, SideId::A, Action::switch_to(1), test_dex()));
    let after = resolve_turn(&next, test_dex(), &RulesConfig::default(), predictable_rng());
    assert_eq!(after.phase, Phase::Battle);
    assert_eq!(after.side(SideId::A).active, 1);
    assert!(!after.side(SideId::A).pending_switch);
    assert_eq!(count_lines(&after, "Side A withdrew Embercub."), 1);
}

#[test]
fn test_voluntary_switch_happens_before_the_foes_move() {
    let mut state = create_test_match(
        vec![
            TestCombatantBuilder::new("embercub").build(),
            TestCombatantBuilder::new("granitusk")
                .with_ability(schema::AbilityId::SandRush)
                .build(),
        ],
        vec![TestCombatantBuilder::new("pyrebeast")
            .with_moves(&["Mach Punch"])
            .build()],
    );
    submit_both(&mut state, Action::switch_to(1), Action::use_move("Mach Punch"));

    let (next, bus) = resolve_turn_with_events(&state, test_dex(), &RulesConfig::default(), predictable_rng());

    let switched = bus
        .events()
        .iter()
        .position(|e| matches!(e, BattleEvent::SentOut { side: SideId::A, .. }));
    let punched = bus
        .events()
        .iter()
        .position(|e| matches!(e, BattleEvent::MoveUsed { side: SideId::B, .. }));
    assert!(switched < punched);
    assert!(next.side(SideId::A).roster[0].is_full_hp());
    assert!(!next.side(SideId::A).roster[1].is_full_hp());
}
