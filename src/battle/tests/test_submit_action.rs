use crate::battle::engine::{ready_for_turn_resolution, resolve_turn_with_events, submit_action};
use crate::battle::events::{ActionFailureReason, BattleEvent};
use crate::battle::state::{Match, Phase};
use crate::battle::tests::common::{
    assert_ok, create_test_match, predictable_rng, test_dex, TestCombatantBuilder,
};
use crate::combatant::{Combatant, Encore};
use crate::config::RulesConfig;
use crate::errors::{ActionError, BattleError};
use crate::side::{Action, Side, SideId};
use pretty_assertions::assert_eq;
use rstest::rstest;
use schema::ItemId;

fn duel() -> Match {
    create_test_match(
        vec![
            TestCombatantBuilder::new("voltmane")
                .with_moves(&["Thunderbolt", "Thunder Wave", "Volt Switch"])
                .build(),
            TestCombatantBuilder::new("bogmaw").build(),
            TestCombatantBuilder::new("embercub").with_hp(0).build(),
        ],
        vec![TestCombatantBuilder::new("granitusk").build()],
    )
}

fn rejected(error: ActionError) -> Result<(), BattleError> {
    Err(BattleError::Action(error))
}

#[rstest]
#[case(Action::use_move("Surf"), ActionError::MoveNotKnown("Surf".to_string()))]
#[case(Action::switch_to(7), ActionError::NoSuchCombatant(7))]
#[case(Action::switch_to(0), ActionError::AlreadyActive(0))]
#[case(Action::switch_to(2), ActionError::CombatantFainted(2))]
fn test_invalid_actions_are_rejected(#[case] action: Action, #[case] error: ActionError) {
    let mut state = duel();
    assert_eq!(submit_action(&mut state, SideId::A, action, test_dex()), rejected(error));
    assert_eq!(state.side(SideId::A).pending_action, None);
}

#[test]
fn test_choice_lock_restricts_moves_but_not_switches() {
    let mut state = duel();
    state.active_mut(SideId::A).unwrap().volatiles.choice_locked = Some("Thunderbolt".to_string());

    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Volt Switch"), test_dex()),
        rejected(ActionError::LockedInto("Thunderbolt".to_string()))
    );
    assert_ok(submit_action(&mut state, SideId::A, Action::switch_to(1), test_dex()));
}

#[test]
fn test_encore_outranks_the_choice_lock() {
    let mut state = duel();
    let volts = &mut state.active_mut(SideId::A).unwrap().volatiles;
    volts.choice_locked = Some("Thunderbolt".to_string());
    volts.encore = Some(Encore {
        move_name: "Thunder Wave".to_string(),
        turns: 2,
    });

    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Thunderbolt"), test_dex()),
        rejected(ActionError::LockedInto("Thunder Wave".to_string()))
    );
}

#[test]
fn test_taunt_blocks_status_moves_only() {
    let mut state = duel();
    state.active_mut(SideId::A).unwrap().volatiles.taunt_turns = 2;

    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Thunder Wave"), test_dex()),
        rejected(ActionError::StatusMoveBlocked("Thunder Wave".to_string()))
    );
    assert_ok(submit_action(&mut state, SideId::A, Action::use_move("Thunderbolt"), test_dex()));
}

#[test]
fn test_assault_vest_blocks_status_moves() {
    let mut state = duel();
    state.active_mut(SideId::A).unwrap().item = Some(ItemId::AssaultVest);
    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Thunder Wave"), test_dex()),
        rejected(ActionError::StatusMoveBlocked("Thunder Wave".to_string()))
    );
}

#[test]
fn test_resubmitting_is_idempotent_and_changing_is_refused() {
    let mut state = duel();
    assert_ok(submit_action(&mut state, SideId::A, Action::use_move("Thunderbolt"), test_dex()));
    assert_ok(submit_action(&mut state, SideId::A, Action::use_move("Thunderbolt"), test_dex()));
    assert_eq!(
        submit_action(&mut state, SideId::A, Action::switch_to(1), test_dex()),
        rejected(ActionError::ConflictingSubmission(SideId::A))
    );
    assert_eq!(
        state.side(SideId::A).pending_action,
        Some(Action::use_move("Thunderbolt"))
    );
    assert!(!ready_for_turn_resolution(&state));

    assert_ok(submit_action(&mut state, SideId::B, Action::use_move("Tackle"), test_dex()));
    assert!(ready_for_turn_resolution(&state));
}

#[test]
fn test_first_submission_after_send_out_opens_the_battle() {
    let mut state = duel();
    state.phase = Phase::SendOut;
    assert_ok(submit_action(&mut state, SideId::B, Action::use_move("Tackle"), test_dex()));
    assert_eq!(state.phase, Phase::Battle);
}

#[rstest]
#[case(Phase::Waiting)]
#[case(Phase::Resolving)]
#[case(Phase::Finished)]
fn test_closed_phases_refuse_actions(#[case] phase: Phase) {
    let mut state = duel();
    state.phase = phase;
    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Thunderbolt"), test_dex()),
        rejected(ActionError::WrongPhase(phase))
    );
}

#[test]
fn test_joining_announces_both_leads() {
    let host = Side::new("p1", "Player 1", vec![TestCombatantBuilder::new("voltmane").build()]);
    let guest = Side::new("p2", "Player 2", vec![TestCombatantBuilder::new("granitusk").build()]);
    let mut state = Match::open("lobby", host);
    assert_eq!(state.phase, Phase::Waiting);

    assert_ok(state.join(guest));
    assert_eq!(state.phase, Phase::SendOut);
    assert_eq!(
        state.log,
        vec![
            "Side A sent out Voltmane!".to_string(),
            "Side B sent out Granitusk!".to_string()
        ]
    );
}

fn last_one_standing(voltmane: Combatant) -> Match {
    create_test_match(vec![voltmane], vec![TestCombatantBuilder::new("granitusk").build()])
}

fn resolve_and_check_blocked(mut state: Match, submitted: &str, reason: ActionFailureReason) -> Match {
    assert_ok(submit_action(&mut state, SideId::A, Action::use_move(submitted), test_dex()));
    assert_ok(submit_action(&mut state, SideId::B, Action::use_move("Tackle"), test_dex()));
    assert!(ready_for_turn_resolution(&state));

    let (next, bus) =
        resolve_turn_with_events(&state, test_dex(), &RulesConfig::default(), predictable_rng());
    assert!(bus.events().contains(&BattleEvent::Immobilized {
        name: "Voltmane".to_string(),
        reason,
    }));
    assert_eq!(next.phase, Phase::Battle);
    assert_eq!(next.turn, 2);
    next
}

#[test]
fn test_taunted_status_only_combatant_still_gets_a_turn() {
    let mut voltmane = TestCombatantBuilder::new("voltmane")
        .with_moves(&["Thunder Wave", "Protect"])
        .build();
    voltmane.volatiles.taunt_turns = 3;
    let state = last_one_standing(voltmane);

    let next = resolve_and_check_blocked(state, "Thunder Wave", ActionFailureReason::Taunted);
    assert_eq!(next.active(SideId::A).unwrap().volatiles.taunt_turns, 2);
    assert_eq!(next.active(SideId::B).unwrap().status, None);
}

#[test]
fn test_vest_holder_with_only_status_moves_still_gets_a_turn() {
    let voltmane = TestCombatantBuilder::new("voltmane")
        .with_item(ItemId::AssaultVest)
        .with_moves(&["Thunder Wave", "Protect"])
        .build();
    resolve_and_check_blocked(
        last_one_standing(voltmane),
        "Protect",
        ActionFailureReason::AssaultVest,
    );
}

#[test]
fn test_lock_onto_a_taunted_move_still_gets_a_turn() {
    let mut voltmane = TestCombatantBuilder::new("voltmane")
        .with_moves(&["Thunder Wave", "Thunderbolt"])
        .build();
    voltmane.volatiles.taunt_turns = 3;
    voltmane.volatiles.choice_locked = Some("Thunder Wave".to_string());
    let state = last_one_standing(voltmane);

    // The lock is forced at execution, where the taunt stops it.
    resolve_and_check_blocked(state, "Thunderbolt", ActionFailureReason::Taunted);
}

#[test]
fn test_blocked_move_is_refused_while_a_free_option_exists() {
    let mut voltmane = TestCombatantBuilder::new("voltmane")
        .with_moves(&["Thunder Wave", "Thunderbolt"])
        .build();
    voltmane.volatiles.taunt_turns = 3;
    let mut state = last_one_standing(voltmane);
    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Thunder Wave"), test_dex()),
        rejected(ActionError::StatusMoveBlocked("Thunder Wave".to_string()))
    );
}
