use crate::battle::context::BattleContext;
use crate::battle::end_of_turn::{resolve_end_of_turn, tick_field};
use crate::battle::entry::{announce_leads, perform_switch};
use crate::battle::events::{BattleEvent, EventBus};
use crate::battle::items::item_hooks;
use crate::battle::moves::execute_move;
use crate::battle::rng::TurnRng;
use crate::battle::state::{Match, Phase};
use crate::battle::turn_order::determine_turn_order;
use crate::combatant::Combatant;
use crate::config::RulesConfig;
use crate::dex::Dex;
use crate::errors::{ActionError, BattleError, BattleResult};
use crate::side::{Action, SideId};

/// Checks an action against the current match state without storing it.
pub fn validate_action(state: &Match, side: SideId, action: &Action, dex: &dyn Dex) -> BattleResult<()> {
    let team = state.side(side);
    match state.phase {
        Phase::Battle | Phase::SendOut => {}
        Phase::Switching => {
            if !team.needs_replacement() {
                return Err(ActionError::NoReplacementNeeded(side).into());
            }
            if !matches!(action, Action::Switch { .. }) {
                return Err(ActionError::ReplacementRequired(side).into());
            }
        }
        other => return Err(ActionError::WrongPhase(other).into()),
    }

    match action {
        Action::Switch { index } => {
            let target = team
                .roster
                .get(*index)
                .ok_or(ActionError::NoSuchCombatant(*index))?;
            if target.is_fainted() {
                return Err(ActionError::CombatantFainted(*index).into());
            }
            if *index == team.active {
                return Err(ActionError::AlreadyActive(*index).into());
            }
        }
        Action::Move { move_name } => {
            let user = state.active(side)?;
            if user.is_fainted() {
                return Err(ActionError::ActiveFainted.into());
            }
            if !user.knows_move(move_name) {
                return Err(ActionError::MoveNotKnown(move_name.clone()).into());
            }
            if let Some(restriction) = move_restriction(user, move_name, dex)? {
                // With nothing else legal the move goes through and fails
                // at execution, so the turn still resolves.
                if has_unrestricted_option(state, side, dex)? {
                    return Err(restriction.into());
                }
            }
        }
    }
    Ok(())
}

/// Why the active combatant may not pick this move right now.
fn move_restriction(user: &Combatant, move_name: &str, dex: &dyn Dex) -> BattleResult<Option<ActionError>> {
    let move_data = dex.move_data(move_name)?;
    let volatiles = &user.volatiles;
    let locked = volatiles
        .encore
        .as_ref()
        .map(|e| e.move_name.as_str())
        .or(volatiles.choice_locked.as_deref());
    if let Some(locked) = locked.filter(|m| *m != move_name) {
        return Ok(Some(ActionError::LockedInto(locked.to_string())));
    }
    let vest = user.item.is_some_and(|i| item_hooks(i).blocks_status_moves);
    if move_data.is_status() && (volatiles.taunt_turns > 0 || vest) {
        return Ok(Some(ActionError::StatusMoveBlocked(move_name.to_string())));
    }
    Ok(None)
}

/// A free move or a possible switch.
fn has_unrestricted_option(state: &Match, side: SideId, dex: &dyn Dex) -> BattleResult<bool> {
    let team = state.side(side);
    if team.has_bench() {
        return Ok(true);
    }
    let user = state.active(side)?;
    for name in &user.moves {
        if move_restriction(user, name, dex)?.is_none() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Records a side's action. Re-submitting the same action is a no-op; a
/// different one is rejected. The first submission after send-out opens
/// the battle.
pub fn submit_action(state: &mut Match, side: SideId, action: Action, dex: &dyn Dex) -> BattleResult<()> {
    if let Some(existing) = &state.side(side).pending_action {
        if *existing == action {
            return Ok(());
        }
        return Err(ActionError::ConflictingSubmission(side).into());
    }
    validate_action(state, side, &action, dex)?;

    if state.phase == Phase::SendOut {
        state.phase = Phase::Battle;
        log::info!("match {} moved to {}", state.id, state.phase);
    }
    log::debug!("side {} submitted: {}", side, action);
    state.side_mut(side).pending_action = Some(action);
    Ok(())
}

/// Both moves are in, or every side that owes a replacement has sent one.
pub fn ready_for_turn_resolution(state: &Match) -> bool {
    match state.phase {
        Phase::Battle => state.both_actions_present(),
        Phase::Switching => SideId::BOTH.iter().all(|&id| {
            let side = state.side(id);
            !side.needs_replacement() || matches!(side.pending_action, Some(Action::Switch { .. }))
        }),
        _ => false,
    }
}

/// Resolves the pending actions over a copy of `state` and returns the new
/// record. Never fails: a resolution error rolls back to the input state with
/// the pending actions cleared and a diagnostic line appended.
pub fn resolve_turn(state: &Match, dex: &dyn Dex, rules: &RulesConfig, rng: TurnRng) -> Match {
    resolve_turn_with_events(state, dex, rules, rng).0
}

/// `resolve_turn`, also handing back the typed events of the resolution.
pub fn resolve_turn_with_events(
    state: &Match,
    dex: &dyn Dex,
    rules: &RulesConfig,
    mut rng: TurnRng,
) -> (Match, EventBus) {
    let mut bus = EventBus::new();
    if !ready_for_turn_resolution(state) {
        log::warn!(
            "match {}: resolution requested in phase {} without every action",
            state.id,
            state.phase
        );
        return (state.clone(), bus);
    }

    let mut next = state.clone();
    let result = {
        let mut ctx = BattleContext::new(dex, rules, &mut rng, &mut bus);
        if state.phase == Phase::Switching {
            resolve_replacement_phase(&mut next, &mut ctx)
        } else {
            run_turn(&mut next, &mut ctx)
        }
    };

    match result {
        Ok(()) => {
            next.log.extend(bus.lines());
            log::info!(
                "match {} resolved: phase {}, turn {}, {} draws",
                next.id,
                next.phase,
                next.turn,
                rng.consumed()
            );
            (next, bus)
        }
        Err(error) => rollback(state, &error),
    }
}

fn rollback(state: &Match, error: &BattleError) -> (Match, EventBus) {
    log::warn!("match {}: rolling back turn {}: {}", state.id, state.turn, error);
    let mut restored = state.clone();
    if restored.phase != Phase::Switching {
        restored.phase = Phase::Battle;
    }
    restored.clear_pending_actions();

    let mut bus = EventBus::new();
    bus.push(BattleEvent::Diagnostic {
        message: format!("turn {} did not resolve: {}", state.turn, error),
    });
    restored.log.extend(bus.lines());
    (restored, bus)
}

fn initialize_turn(state: &mut Match, ctx: &mut BattleContext) {
    state.phase = Phase::Resolving;
    ctx.emit(BattleEvent::TurnStarted { turn: state.turn });
    for side in &mut state.sides {
        if let Some(active) = side.active_mut() {
            active.volatiles.protected = false;
            active.volatiles.flinched = false;
        }
    }
}

/// One full turn: lead abilities on the first turn, both actions in order,
/// end-of-turn effects, the field countdown and the phase change.
fn run_turn(state: &mut Match, ctx: &mut BattleContext) -> BattleResult<()> {
    initialize_turn(state, ctx);
    announce_leads(state, ctx)?;
    announce_faints(state, ctx);

    let order = determine_turn_order(state, ctx)?;
    for side in order {
        ctx.acted[side.index()] = true;
        if state.living_active(side).is_none() {
            continue;
        }
        match state.side(side).pending_action.clone() {
            Some(Action::Switch { index }) => perform_switch(state, side, index, ctx)?,
            Some(Action::Move { move_name }) => execute_move(state, side, &move_name, ctx)?,
            None => {}
        }
        announce_faints(state, ctx);
    }

    for side in SideId::BOTH {
        resolve_end_of_turn(state, side, ctx)?;
        announce_faints(state, ctx);
    }
    tick_field(state, ctx);

    finalize_turn(state, ctx);
    Ok(())
}

/// Sends in the replacements both sides chose, side A first.
fn resolve_replacement_phase(state: &mut Match, ctx: &mut BattleContext) -> BattleResult<()> {
    for side in SideId::BOTH {
        if !state.side(side).needs_replacement() {
            continue;
        }
        if let Some(Action::Switch { index }) = state.side(side).pending_action.clone() {
            perform_switch(state, side, index, ctx)?;
            announce_faints(state, ctx);
        }
    }
    finalize_turn(state, ctx);
    Ok(())
}

/// Reports each faint exactly once.
fn announce_faints(state: &mut Match, ctx: &mut BattleContext) {
    for side in SideId::BOTH {
        if let Some(active) = state.side_mut(side).active_mut() {
            if active.is_fainted() && !active.faint_announced {
                active.faint_announced = true;
                ctx.emit(BattleEvent::Fainted {
                    side,
                    name: active.name.clone(),
                });
            }
        }
    }
}

/// Side A's elimination is checked first, so a double knock-out goes to B.
fn check_win_conditions(state: &Match) -> Option<SideId> {
    if !state.side(SideId::A).has_living() {
        Some(SideId::B)
    } else if !state.side(SideId::B).has_living() {
        Some(SideId::A)
    } else {
        None
    }
}

fn finalize_turn(state: &mut Match, ctx: &mut BattleContext) {
    state.clear_pending_actions();

    if let Some(winner) = check_win_conditions(state) {
        state.winner = Some(winner);
        state.phase = Phase::Finished;
        ctx.emit(BattleEvent::BattleEnded { winner });
    } else if state.sides.iter().any(|s| s.needs_replacement()) {
        state.phase = Phase::Switching;
    } else {
        state.phase = Phase::Battle;
        state.turn += 1;
    }
    log::info!("match {} moved to {}", state.id, state.phase);
}
