use crate::battle::engine::{resolve_turn_with_events, submit_action};
use crate::battle::events::{ActionFailureReason, BattleEvent, EventBus, HealCause, VolatileKind};
use crate::battle::state::{Match, Phase};
use crate::battle::tests::common::{
    assert_ok, create_test_match, predictable_rng, test_dex, TestCombatantBuilder,
};
use crate::combatant::{Combatant, MajorStatus};
use crate::config::RulesConfig;
use crate::errors::{ActionError, BattleError};
use crate::side::{Action, SideId};
use pretty_assertions::assert_eq;
use schema::{AbilityId, ItemId, Weather};

fn duel(a: Combatant, b: Combatant) -> Match {
    create_test_match(vec![a], vec![b])
}

fn play(state: &mut Match, a: &str, b: &str) -> EventBus {
    assert_ok(submit_action(state, SideId::A, Action::use_move(a), test_dex()));
    assert_ok(submit_action(state, SideId::B, Action::use_move(b), test_dex()));
    let (next, bus) =
        resolve_turn_with_events(state, test_dex(), &RulesConfig::default(), predictable_rng());
    *state = next;
    bus
}

fn immobilized(bus: &EventBus, reason: ActionFailureReason) -> bool {
    bus.events()
        .iter()
        .any(|e| matches!(e, BattleEvent::Immobilized { reason: r, .. } if *r == reason))
}

#[test]
fn test_protect_blocks_the_incoming_hit() {
    let mut state = duel(
        TestCombatantBuilder::new("galeclaw")
            .with_ability(AbilityId::SuperLuck)
            .with_moves(&["Protect"])
            .build(),
        TestCombatantBuilder::new("ironbulk").build(),
    );

    let bus = play(&mut state, "Protect", "Tackle");

    let protected = bus
        .events()
        .iter()
        .filter(|e| matches!(e, BattleEvent::Protected { .. }))
        .count();
    assert_eq!(protected, 2);
    assert!(state.active(SideId::A).unwrap().is_full_hp());
    assert_eq!(state.active(SideId::A).unwrap().volatiles.protect_streak, 1);
}

#[test]
fn test_substitute_soaks_the_hit() {
    let mut state = duel(
        TestCombatantBuilder::new("embercub")
            .with_moves(&["Substitute"])
            .build(),
        TestCombatantBuilder::new("granitusk")
            .with_ability(AbilityId::SandRush)
            .build(),
    );

    let bus = play(&mut state, "Substitute", "Tackle");

    let cub = state.active(SideId::A).unwrap();
    assert_eq!(cub.current_hp, 60);
    assert!(!cub.volatiles.has_substitute());
    assert!(bus.events().contains(&BattleEvent::VolatileEnded {
        target: "Embercub".to_string(),
        kind: VolatileKind::Substitute,
    }));
}

#[test]
fn test_magic_bounce_reflects_status_moves() {
    let mut state = duel(
        TestCombatantBuilder::new("voltmane").with_moves(&["Toxic"]).build(),
        TestCombatantBuilder::new("mindmoth")
            .with_ability(AbilityId::MagicBounce)
            .build(),
    );

    play(&mut state, "Toxic", "Tackle");

    assert_eq!(state.active(SideId::A).unwrap().status, Some(MajorStatus::BadPoison));
    assert_eq!(state.active(SideId::B).unwrap().status, None);
}

#[test]
fn test_prankster_status_moves_fail_against_dark_types() {
    let mut state = duel(
        TestCombatantBuilder::new("voltmane")
            .with_moves(&["Thunder Wave"])
            .build(),
        TestCombatantBuilder::new("frostfang")
            .with_ability(AbilityId::SlushRush)
            .build(),
    );

    let bus = play(&mut state, "Thunder Wave", "Tackle");

    assert!(bus.events().contains(&BattleEvent::NoEffect {
        target: "Frostfang".to_string()
    }));
    assert_eq!(state.active(SideId::B).unwrap().status, None);
    assert!(state.active(SideId::A).unwrap().last_move_failed);
}

#[test]
fn test_sucker_punch_needs_an_incoming_attack() {
    let mut state = duel(
        TestCombatantBuilder::new("frostfang")
            .with_ability(AbilityId::SlushRush)
            .with_moves(&["Sucker Punch"])
            .build(),
        TestCombatantBuilder::new("embercub")
            .with_moves(&["Will-O-Wisp", "Tackle"])
            .build(),
    );

    let bus = play(&mut state, "Sucker Punch", "Will-O-Wisp");
    assert!(bus.events().contains(&BattleEvent::MoveFailed {
        name: "Frostfang".to_string()
    }));
    assert!(state.active(SideId::B).unwrap().is_full_hp());

    play(&mut state, "Sucker Punch", "Tackle");
    assert!(!state.active(SideId::B).unwrap().is_full_hp());
}

#[test]
fn test_charge_turn_then_strike() {
    let mut state = duel(
        TestCombatantBuilder::new("thornback")
            .with_moves(&["Solar Beam"])
            .build(),
        TestCombatantBuilder::new("granitusk")
            .with_ability(AbilityId::SandRush)
            .build(),
    );

    let bus = play(&mut state, "Solar Beam", "Tackle");
    assert!(bus.events().contains(&BattleEvent::Charging {
        name: "Thornback".to_string(),
        move_name: "Solar Beam".to_string(),
    }));
    assert!(state.active(SideId::B).unwrap().is_full_hp());
    assert!(state.active(SideId::A).unwrap().volatiles.charging.is_some());

    play(&mut state, "Solar Beam", "Tackle");
    assert!(state.active(SideId::B).unwrap().is_fainted());
    assert_eq!(state.phase, Phase::Finished);
}

#[test]
fn test_sun_skips_the_charge_turn() {
    let mut state = duel(
        TestCombatantBuilder::new("thornback")
            .with_moves(&["Solar Beam"])
            .build(),
        TestCombatantBuilder::new("granitusk")
            .with_ability(AbilityId::SandRush)
            .build(),
    );
    state.field.set_weather(Weather::Sun, 5);

    play(&mut state, "Solar Beam", "Tackle");
    assert!(state.active(SideId::B).unwrap().is_fainted());
}

#[test]
fn test_recharge_costs_the_next_turn() {
    let mut state = duel(
        TestCombatantBuilder::new("pyrebeast")
            .with_moves(&["Giga Impact"])
            .build(),
        TestCombatantBuilder::new("bogmaw").build(),
    );

    play(&mut state, "Giga Impact", "Tackle");
    assert!(state.active(SideId::A).unwrap().volatiles.must_recharge);

    let bus = play(&mut state, "Giga Impact", "Tackle");
    assert!(immobilized(&bus, ActionFailureReason::Recharging));
    assert!(!state.active(SideId::A).unwrap().volatiles.must_recharge);
}

#[test]
fn test_truant_acts_then_loafs() {
    let mut state = duel(
        TestCombatantBuilder::new("drowsloth").build(),
        TestCombatantBuilder::new("bogmaw").build(),
    );

    let first = play(&mut state, "Tackle", "Tackle");
    assert!(!immobilized(&first, ActionFailureReason::Loafing));

    let second = play(&mut state, "Tackle", "Tackle");
    assert!(immobilized(&second, ActionFailureReason::Loafing));

    let third = play(&mut state, "Tackle", "Tackle");
    assert!(!immobilized(&third, ActionFailureReason::Loafing));
}

#[test]
fn test_choice_item_locks_after_the_first_move() {
    let mut state = duel(
        TestCombatantBuilder::new("embercub")
            .with_item(ItemId::ChoiceScarf)
            .with_moves(&["Tackle", "Flamethrower"])
            .build(),
        TestCombatantBuilder::new("bogmaw").build(),
    );

    play(&mut state, "Tackle", "Tackle");

    assert_eq!(
        submit_action(&mut state, SideId::A, Action::use_move("Flamethrower"), test_dex()),
        Err(BattleError::Action(ActionError::LockedInto("Tackle".to_string())))
    );
    assert_ok(submit_action(&mut state, SideId::A, Action::use_move("Tackle"), test_dex()));
}

#[test]
fn test_focus_sash_hangs_on_from_full() {
    let mut state = duel(
        TestCombatantBuilder::new("embercub")
            .with_item(ItemId::FocusSash)
            .build(),
        TestCombatantBuilder::new("tidalisk").with_moves(&["Surf"]).build(),
    );

    let bus = play(&mut state, "Tackle", "Surf");

    let cub = state.active(SideId::A).unwrap();
    assert_eq!(cub.current_hp, 1);
    assert_eq!(cub.item, None);
    assert!(bus.events().contains(&BattleEvent::HungOn {
        name: "Embercub".to_string(),
        item: ItemId::FocusSash,
    }));
}

#[test]
fn test_sitrus_berry_after_the_hit() {
    let mut state = duel(
        TestCombatantBuilder::new("embercub")
            .with_item(ItemId::SitrusBerry)
            .with_hp(45)
            .build(),
        TestCombatantBuilder::new("ironbulk").build(),
    );

    let bus = play(&mut state, "Tackle", "Tackle");

    assert_eq!(state.active(SideId::A).unwrap().item, None);
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::Healed {
            amount: 20,
            cause: HealCause::Item(ItemId::SitrusBerry),
            ..
        }
    )));
}

#[test]
fn test_destiny_bond_takes_the_attacker_down() {
    let mut state = duel(
        TestCombatantBuilder::new("frostfang")
            .with_ability(AbilityId::SlushRush)
            .with_moves(&["Destiny Bond"])
            .build(),
        TestCombatantBuilder::new("pyrebeast")
            .with_moves(&["Close Combat"])
            .build(),
    );

    let bus = play(&mut state, "Destiny Bond", "Close Combat");

    assert!(state.active(SideId::A).unwrap().is_fainted());
    assert!(state.active(SideId::B).unwrap().is_fainted());
    assert!(bus.events().contains(&BattleEvent::DestinyBondTriggered {
        name: "Frostfang".to_string()
    }));
    assert_eq!(state.winner, Some(SideId::B));
}

#[test]
fn test_weather_move_fails_when_already_active() {
    let mut state = duel(
        TestCombatantBuilder::new("tidalisk")
            .with_ability(AbilityId::Drizzle)
            .with_moves(&["Rain Dance"])
            .build(),
        TestCombatantBuilder::new("bogmaw").build(),
    );

    let bus = play(&mut state, "Rain Dance", "Tackle");

    assert_eq!(state.field.weather, Some(Weather::Rain));
    assert!(bus.events().contains(&BattleEvent::MoveFailed {
        name: "Tidalisk".to_string()
    }));
}

#[test]
fn test_leech_seed_misses_grass_types() {
    let mut state = duel(
        TestCombatantBuilder::new("bogmaw")
            .with_moves(&["Leech Seed"])
            .build(),
        TestCombatantBuilder::new("thornback").build(),
    );

    play(&mut state, "Leech Seed", "Tackle");

    assert!(!state.active(SideId::B).unwrap().volatiles.leech_seed);
    assert!(state.active(SideId::A).unwrap().last_move_failed);
}

fn choice_locked_target(species: &str, ability: AbilityId, item: ItemId) -> Combatant {
    let mut target = TestCombatantBuilder::new(species)
        .with_ability(ability)
        .with_item(item)
        .with_moves(&["Tackle", "Swords Dance"])
        .build();
    target.volatiles.choice_locked = Some("Tackle".to_string());
    target
}

#[test]
fn test_knock_off_frees_a_choice_lock() {
    let mut state = duel(
        TestCombatantBuilder::new("frostfang")
            .with_ability(AbilityId::SlushRush)
            .with_moves(&["Knock Off"])
            .build(),
        choice_locked_target("bogmaw", AbilityId::Regenerator, ItemId::ChoiceScarf),
    );

    play(&mut state, "Knock Off", "Tackle");

    let bogmaw = state.active(SideId::B).unwrap();
    assert_eq!(bogmaw.item, None);
    assert_eq!(bogmaw.volatiles.choice_locked, None);
    assert_ok(submit_action(&mut state, SideId::B, Action::use_move("Swords Dance"), test_dex()));
}

#[test]
fn test_gorilla_tactics_lock_survives_losing_the_item() {
    let mut state = duel(
        TestCombatantBuilder::new("frostfang")
            .with_ability(AbilityId::SlushRush)
            .with_moves(&["Knock Off"])
            .build(),
        choice_locked_target("ironbulk", AbilityId::GorillaTactics, ItemId::ChoiceBand),
    );

    play(&mut state, "Knock Off", "Tackle");

    assert_eq!(state.active(SideId::B).unwrap().item, None);
    assert_eq!(
        submit_action(&mut state, SideId::B, Action::use_move("Swords Dance"), test_dex()),
        Err(BattleError::Action(ActionError::LockedInto("Tackle".to_string())))
    );
}

#[test]
fn test_charge_is_spent_by_the_next_electric_move() {
    let mut state = duel(
        TestCombatantBuilder::new("voltmane")
            .with_moves(&["Charge", "Thunderbolt"])
            .build(),
        TestCombatantBuilder::new("drowsloth")
            .with_ability(AbilityId::Simple)
            .build(),
    );

    play(&mut state, "Charge", "Tackle");
    assert!(state.active(SideId::A).unwrap().volatiles.charged);

    play(&mut state, "Thunderbolt", "Tackle");
    assert!(!state.active(SideId::A).unwrap().volatiles.charged);
}
