//! Move execution: the pre-move gates, the hit checks, damage application
//! and every secondary effect a move row can describe.

use crate::battle::abilities::{ability_hooks, start_weather};
use crate::battle::context::BattleContext;
use crate::battle::damage::calculate_damage;
use crate::battle::end_of_turn::make_drowsy;
use crate::battle::events::{
    ActionFailureReason, BattleEvent, DamageCause, Hazard, HealCause, SideCondition, VolatileKind,
};
use crate::battle::items::{consume_item, item_hooks, release_choice_lock};
use crate::battle::state::Match;
use crate::battle::stats::{change_stage, move_hits};
use crate::battle::status::{announce_volatile, can_act, inflict_status, ActGate, StatusOutcome};
use crate::battle::turn_order::forced_move;
use crate::battle::volatiles::protect_succeeds;
use crate::combatant::{Charging, Encore, MajorStatus};
use crate::errors::BattleResult;
use crate::side::{Action, Hazards, SideId};
use schema::{
    EffectTarget, ElementType, FieldEffect, MoveBehavior, MoveData, MoveTarget, Recovery,
    StatusKind, Weather,
};

/// What one damaging hit did.
#[derive(Debug, Clone, Copy, Default)]
struct Hit {
    dealt: u16,
    hit_substitute: bool,
}

/// Runs `side`'s move for this turn. `submitted` is the move the player
/// picked; charging moves, encore and choice locks take precedence.
pub fn execute_move(
    state: &mut Match,
    side: SideId,
    submitted: &str,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    if state.living_active(side).is_none() {
        return Ok(());
    }
    let succeeded = run_move(state, side, submitted, ctx)?;
    let user = state.active_mut(side)?;
    user.last_move_failed = !succeeded;
    if !succeeded {
        user.volatiles.charging = None;
    }
    Ok(())
}

fn immobilized(state: &Match, side: SideId, reason: ActionFailureReason, ctx: &mut BattleContext) -> BattleResult<()> {
    let name = state.active(side)?.name.clone();
    ctx.emit(BattleEvent::Immobilized { name, reason });
    Ok(())
}

fn move_failed(state: &Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let name = state.active(side)?.name.clone();
    ctx.emit(BattleEvent::MoveFailed { name });
    Ok(false)
}

fn chosen_move(state: &Match, side: SideId, submitted: &str) -> BattleResult<String> {
    let user = state.active(side)?;
    let name = forced_move(user)
        .or(user.volatiles.choice_locked.as_deref())
        .unwrap_or(submitted);
    Ok(name.to_string())
}

fn sleep_talk_pick(state: &Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<Option<String>> {
    let user = state.active(side)?;
    let mut candidates = Vec::new();
    for name in &user.moves {
        let data = ctx.dex.move_data(name)?;
        if !data.behavior_is(MoveBehavior::SleepTalk) && !data.is_two_turn() {
            candidates.push(name.clone());
        }
    }
    if candidates.is_empty() {
        return Ok(None);
    }
    let last = candidates.len() as u32 - 1;
    let pick = ctx.rng.range(0, last, "sleep talk move")? as usize;
    Ok(candidates.get(pick).cloned())
}

/// Returns false when the move failed, missed or was stopped.
fn run_move(state: &mut Match, side: SideId, submitted: &str, ctx: &mut BattleContext) -> BattleResult<bool> {
    {
        let user = state.active_mut(side)?;
        if user.volatiles.must_recharge {
            user.volatiles.must_recharge = false;
            immobilized(state, side, ActionFailureReason::Recharging, ctx)?;
            return Ok(true);
        }
    }

    let mut move_name = chosen_move(state, side, submitted)?;
    let mut move_data = ctx.dex.move_data(&move_name)?.clone();

    let gate = can_act(state, side, ctx)?;
    let user = state.active(side)?;
    let hooks = ability_hooks(user.ability);
    let sleeping = gate == ActGate::Asleep
        || (user.status == Some(MajorStatus::Sleep) && hooks.acts_while_asleep);
    match gate {
        ActGate::Ready | ActGate::Asleep => {}
        ActGate::Frozen | ActGate::FullyParalyzed | ActGate::HurtItself => return Ok(false),
    }

    if move_data.behavior_is(MoveBehavior::SleepTalk) && sleeping {
        let name = user.name.clone();
        ctx.emit(BattleEvent::MoveUsed {
            side,
            name,
            move_name: move_name.clone(),
        });
        let Some(picked) = sleep_talk_pick(state, side, ctx)? else {
            return move_failed(state, side, ctx);
        };
        move_name = picked;
        move_data = ctx.dex.move_data(&move_name)?.clone();
    } else if gate == ActGate::Asleep {
        return Ok(false);
    }

    let user = state.active(side)?;
    if user.volatiles.flinched {
        immobilized(state, side, ActionFailureReason::Flinched, ctx)?;
        return Ok(false);
    }
    if hooks.loafs {
        let user = state.active_mut(side)?;
        user.volatiles.truant_loafing = !user.volatiles.truant_loafing;
        if !user.volatiles.truant_loafing {
            immobilized(state, side, ActionFailureReason::Loafing, ctx)?;
            return Ok(false);
        }
    }
    let user = state.active(side)?;
    if move_data.is_status() {
        if user.volatiles.taunt_turns > 0 {
            immobilized(state, side, ActionFailureReason::Taunted, ctx)?;
            return Ok(false);
        }
        if user.item.is_some_and(|i| item_hooks(i).blocks_status_moves) {
            immobilized(state, side, ActionFailureReason::AssaultVest, ctx)?;
            return Ok(false);
        }
    }

    announce_use(state, side, &move_name, &move_data, ctx)?;

    if move_data.is_two_turn() && !start_or_finish_charge(state, side, &move_data, ctx)? {
        return Ok(true);
    }

    if move_data.target != MoveTarget::Opponent {
        return apply_effects(state, side, side.opponent(), &move_data, Hit::default(), ctx);
    }
    strike(state, side, &move_data, ctx)
}

fn announce_use(
    state: &mut Match,
    side: SideId,
    move_name: &str,
    move_data: &MoveData,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    let user = state.active_mut(side)?;
    ctx.emit(BattleEvent::MoveUsed {
        side,
        name: user.name.clone(),
        move_name: move_name.to_string(),
    });
    let locks = ability_hooks(user.ability).locks_choice
        || user.item.is_some_and(|i| item_hooks(i).locks_choice);
    if locks && user.volatiles.choice_locked.is_none() {
        user.volatiles.choice_locked = Some(move_name.to_string());
    }
    if !move_data.behavior_is(MoveBehavior::Protect) {
        user.volatiles.protect_streak = 0;
    }
    user.volatiles.last_move = Some(move_name.to_string());
    Ok(())
}

/// True when the move strikes this turn, false when it only charged.
fn start_or_finish_charge(
    state: &mut Match,
    side: SideId,
    move_data: &MoveData,
    ctx: &mut BattleContext,
) -> BattleResult<bool> {
    let sunny = state.field.weather_is(Weather::Sun);
    let user = state.active_mut(side)?;
    if user.volatiles.charging.take().is_some() {
        return Ok(true);
    }
    if move_data.effect.charge_turn && sunny {
        return Ok(true);
    }
    user.volatiles.charging = Some(Charging {
        move_name: move_data.name.clone(),
        semi_invulnerable: move_data.effect.semi_invulnerable,
    });
    ctx.emit(BattleEvent::Charging {
        name: user.name.clone(),
        move_name: move_data.name.clone(),
    });
    Ok(false)
}

fn crash(state: &mut Match, side: SideId, move_data: &MoveData, ctx: &mut BattleContext) -> BattleResult<()> {
    if !move_data.effect.crash {
        return Ok(());
    }
    let user = state.active_mut(side)?;
    let dealt = user.take_damage(user.fraction_of_max(2));
    ctx.emit(BattleEvent::Damaged {
        target: user.name.clone(),
        amount: dealt,
        remaining: user.current_hp,
        cause: DamageCause::Crash,
    });
    Ok(())
}

fn sucker_punch_fails(state: &Match, target: SideId, ctx: &BattleContext) -> BattleResult<bool> {
    if ctx.has_acted(target) {
        return Ok(true);
    }
    match &state.side(target).pending_action {
        Some(Action::Move { move_name }) => Ok(!ctx.dex.move_data(move_name)?.is_damaging()),
        _ => Ok(true),
    }
}

/// Everything after the user commits to a move aimed at the opponent.
fn strike(state: &mut Match, side: SideId, move_data: &MoveData, ctx: &mut BattleContext) -> BattleResult<bool> {
    let target = side.opponent();
    let Some(defender) = state.living_active(target) else {
        return move_failed(state, side, ctx);
    };
    let defender_name = defender.name.clone();
    let defender_hooks = ability_hooks(defender.ability);
    let behind_substitute = defender.volatiles.has_substitute() && !move_data.flags.sound;
    let defender_is_dark = defender.has_type(ElementType::Dark);

    if defender.volatiles.protected && !move_data.flags.breaks_protect {
        ctx.emit(BattleEvent::Protected { name: defender_name });
        crash(state, side, move_data, ctx)?;
        return Ok(false);
    }

    if move_data.is_status() {
        if defender_hooks.bounces_status_moves {
            let ability = state.active(target)?.ability;
            ctx.emit(BattleEvent::AbilityActivated {
                name: defender_name,
                ability,
            });
            return apply_effects(state, target, side, move_data, Hit::default(), ctx);
        }
        let pranked = ability_hooks(state.active(side)?.ability).status_priority_bonus > 0;
        if pranked && defender_is_dark {
            ctx.emit(BattleEvent::NoEffect { target: defender_name });
            return Ok(false);
        }
        if behind_substitute {
            return move_failed(state, side, ctx);
        }
    }

    if move_data.behavior_is(MoveBehavior::SuckerPunch) && sucker_punch_fails(state, target, ctx)? {
        return move_failed(state, side, ctx);
    }

    if !move_hits(state, side, move_data, ctx)? {
        let name = state.active(side)?.name.clone();
        ctx.emit(BattleEvent::MoveMissed { name });
        crash(state, side, move_data, ctx)?;
        return Ok(false);
    }

    let mut hit = Hit::default();
    if move_data.is_damaging() {
        match deal_damage(state, side, move_data, ctx)? {
            Some(landed) => hit = landed,
            None => return Ok(false),
        }
    }
    apply_effects(state, side, target, move_data, hit, ctx)
}

/// Applies the damage of a hit and every reaction to it. `None` when the
/// target was immune.
fn deal_damage(
    state: &mut Match,
    side: SideId,
    move_data: &MoveData,
    ctx: &mut BattleContext,
) -> BattleResult<Option<Hit>> {
    let target = side.opponent();
    let outcome = calculate_damage(state, side, move_data, ctx)?;
    if move_data.move_type == ElementType::Electric {
        state.active_mut(side)?.volatiles.charged = false;
    }

    if outcome.immune {
        let defender = state.active(target)?;
        ctx.emit(BattleEvent::NoEffect {
            target: defender.name.clone(),
        });
        let hooks = ability_hooks(defender.ability);
        if hooks.type_immunity == Some(move_data.move_type) {
            if let Some(hook) = hooks.on_type_immunity {
                hook(state, target, ctx)?;
            }
        }
        return Ok(None);
    }

    if outcome.critical {
        ctx.emit(BattleEvent::CriticalHit);
    }
    if outcome.effectiveness > 1.0 {
        ctx.emit(BattleEvent::SuperEffective);
    } else if outcome.effectiveness < 1.0 {
        ctx.emit(BattleEvent::NotVeryEffective);
    }

    let defender = state.active_mut(target)?;
    if defender.volatiles.has_substitute() && !move_data.flags.sound {
        let absorbed = outcome.damage.min(defender.volatiles.substitute_hp);
        defender.volatiles.substitute_hp -= absorbed;
        ctx.emit(BattleEvent::SubstituteHit {
            target: defender.name.clone(),
            amount: absorbed,
        });
        if !defender.volatiles.has_substitute() {
            ctx.emit(BattleEvent::VolatileEnded {
                target: defender.name.clone(),
                kind: VolatileKind::Substitute,
            });
        }
        let hit = Hit {
            dealt: absorbed,
            hit_substitute: true,
        };
        after_hit_on_user(state, side, move_data, hit, ctx)?;
        return Ok(Some(hit));
    }

    let hp_before = defender.current_hp;
    let mut damage = outcome.damage;
    let sash = defender
        .item
        .filter(|&i| item_hooks(i).endures_from_full && defender.is_full_hp());
    let endured = sash.is_some() && damage >= hp_before;
    if endured {
        damage = hp_before - 1;
    }
    let dealt = defender.take_damage(damage);
    ctx.emit(BattleEvent::Damaged {
        target: defender.name.clone(),
        amount: dealt,
        remaining: defender.current_hp,
        cause: DamageCause::Move,
    });
    if let (true, Some(item)) = (endured, sash) {
        ctx.emit(BattleEvent::HungOn {
            name: defender.name.clone(),
            item,
        });
        consume_item(state, target, ctx)?;
    }

    let defender = state.active(target)?;
    let knocked_out = defender.is_fainted();
    let defender_hooks = ability_hooks(defender.ability);
    let defender_item = defender.item.map(item_hooks);

    if !knocked_out {
        if let Some(hook) = defender_hooks.on_damage_taken {
            hook(state, target, hp_before, ctx)?;
        }
        if outcome.effectiveness > 1.0 {
            if let Some(hook) = defender_item.and_then(|h| h.on_super_effective_hit) {
                hook(state, target, ctx)?;
            }
        }
        let berry = state.active(target)?.item.and_then(|i| item_hooks(i).on_low_hp);
        if let Some(hook) = berry {
            hook(state, target, ctx)?;
        }
    }
    if move_data.flags.contact {
        if let Some(hook) = defender_item.and_then(|h| h.on_contact) {
            hook(state, target, side, ctx)?;
        }
    }

    let hit = Hit {
        dealt,
        hit_substitute: false,
    };
    after_hit_on_user(state, side, move_data, hit, ctx)?;

    if knocked_out {
        let on_knock_out = state
            .living_active(side)
            .and_then(|c| ability_hooks(c.ability).on_knock_out);
        if let Some(hook) = on_knock_out {
            hook(state, side, ctx)?;
        }
        let defender = state.active(target)?;
        if defender.volatiles.destiny_bond {
            let name = defender.name.clone();
            ctx.emit(BattleEvent::DestinyBondTriggered { name });
            state.active_mut(side)?.current_hp = 0;
        }
    }
    Ok(Some(hit))
}

/// Life Orb, recoil and drain on the attacker.
fn after_hit_on_user(
    state: &mut Match,
    side: SideId,
    move_data: &MoveData,
    hit: Hit,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    if hit.dealt == 0 || state.living_active(side).is_none() {
        return Ok(());
    }
    let on_hit_dealt = state.active(side)?.item.and_then(|i| item_hooks(i).on_hit_dealt);
    if let Some(hook) = on_hit_dealt {
        hook(state, side, ctx)?;
    }

    let user = state.active_mut(side)?;
    if let Some(percent) = move_data.effect.recoil {
        if !user.is_fainted() {
            let amount = (u32::from(hit.dealt) * u32::from(percent) / 100).max(1) as u16;
            let taken = user.take_damage(amount);
            ctx.emit(BattleEvent::Damaged {
                target: user.name.clone(),
                amount: taken,
                remaining: user.current_hp,
                cause: DamageCause::Recoil,
            });
        }
    }
    if let Some(Recovery::Drain(percent)) = move_data.effect.recovery {
        if !user.is_fainted() && !user.is_heal_blocked() {
            let amount = (u32::from(hit.dealt) * u32::from(percent) / 100).max(1) as u16;
            let healed = user.heal(amount);
            if healed > 0 {
                ctx.emit(BattleEvent::Healed {
                    target: user.name.clone(),
                    amount: healed,
                    cause: HealCause::Drain,
                });
            }
        }
    }

    let user = state.active(side)?;
    if !user.is_fainted() {
        if let Some(hook) = user.item.and_then(|i| item_hooks(i).on_low_hp) {
            hook(state, side, ctx)?;
        }
    }
    Ok(())
}

fn chance_passes(chance: u8, reason: &str, ctx: &mut BattleContext) -> BattleResult<bool> {
    if chance >= 100 {
        return Ok(true);
    }
    Ok(ctx.rng.percent(reason)? <= u32::from(chance))
}

/// Secondary effects of a move used by `user` against `target`. Opponent
/// effects are skipped when the target fainted or a substitute took the hit.
fn apply_effects(
    state: &mut Match,
    user: SideId,
    target: SideId,
    move_data: &MoveData,
    hit: Hit,
    ctx: &mut BattleContext,
) -> BattleResult<bool> {
    let effect = &move_data.effect;
    let target_reachable = state.living_active(target).is_some() && !hit.hit_substitute;
    let mut succeeded = true;

    for change in &effect.stat_changes {
        let (side, reachable) = match change.target {
            EffectTarget::User => (user, state.living_active(user).is_some()),
            EffectTarget::Opponent => (
                target,
                target_reachable
                    && !state.active(target)?.volatiles.has_substitute(),
            ),
        };
        if !reachable {
            continue;
        }
        if chance_passes(change.chance, &format!("{} stat change", move_data.name), ctx)? {
            change_stage(state, side, change.stat, change.stages, Some(user), ctx)?;
        }
    }

    if let Some(ailment) = effect.ailment {
        let side = match ailment.target {
            EffectTarget::User => user,
            EffectTarget::Opponent => target,
        };
        let reachable = side == user || target_reachable;
        if reachable && chance_passes(ailment.chance, &format!("{} ailment", move_data.name), ctx)? {
            if ailment.delayed {
                if !make_drowsy(state, side, ctx)? {
                    succeeded = move_failed(state, user, ctx)?;
                }
            } else {
                let outcome =
                    inflict_status(state, side, ailment.kind, Some(user), move_data.is_status(), ctx)?;
                if move_data.is_status() && outcome != StatusOutcome::Applied {
                    succeeded = false;
                }
            }
        }
    }

    if effect.flinch > 0 && target_reachable && !ctx.has_acted(target) {
        let defender = state.active(target)?;
        if !ability_hooks(defender.ability).blocks_flinch
            && chance_passes(effect.flinch, &format!("{} flinch", move_data.name), ctx)?
        {
            state.active_mut(target)?.volatiles.flinched = true;
        }
    }

    if let Some(recovery) = effect.recovery {
        if !matches!(recovery, Recovery::Drain(_)) && !recover(state, user, recovery, ctx)? {
            succeeded = move_failed(state, user, ctx)?;
        }
    }

    if let Some(weather) = effect.weather {
        if state.field.weather_is(weather) {
            succeeded = move_failed(state, user, ctx)?;
        } else {
            start_weather(state, weather, ctx);
        }
    }

    if let Some(field) = effect.field {
        if !apply_field_effect(state, user, field, ctx)? {
            succeeded = move_failed(state, user, ctx)?;
        }
    }

    if let Some(behavior) = effect.behavior {
        if !apply_behavior(state, user, target, behavior, hit, ctx)? {
            succeeded = move_failed(state, user, ctx)?;
        }
    }

    if effect.recharge && hit.dealt > 0 {
        state.active_mut(user)?.volatiles.must_recharge = true;
    }

    if effect.switch_self && succeeded && state.living_active(user).is_some() {
        let team = state.side_mut(user);
        if team.has_bench() {
            team.pending_switch = true;
            team.baton_pass = effect.pass_stats;
        }
    }
    Ok(succeeded)
}

fn recover(state: &mut Match, side: SideId, recovery: Recovery, ctx: &mut BattleContext) -> BattleResult<bool> {
    let weather = state.field.weather;
    let user = state.active_mut(side)?;
    if user.is_heal_blocked() || user.is_full_hp() {
        return Ok(false);
    }
    let max = u32::from(user.max_hp());
    let amount = match recovery {
        Recovery::Percent(percent) => max * u32::from(percent) / 100,
        Recovery::WeatherDependent => match weather {
            None => max / 2,
            Some(Weather::Sun) => max * 2 / 3,
            Some(_) => max / 4,
        },
        Recovery::Drain(_) => return Ok(true),
    };
    let healed = user.heal(amount.max(1) as u16);
    ctx.emit(BattleEvent::Healed {
        target: user.name.clone(),
        amount: healed,
        cause: HealCause::Move,
    });
    Ok(true)
}

fn set_hazard(state: &mut Match, side: SideId, hazard: Hazard, ctx: &mut BattleContext) -> bool {
    let hazards = &mut state.side_mut(side).hazards;
    let placed = match hazard {
        Hazard::StealthRock => !std::mem::replace(&mut hazards.stealth_rock, true),
        Hazard::StickyWeb => !std::mem::replace(&mut hazards.sticky_web, true),
        Hazard::Spikes if hazards.spikes < Hazards::MAX_SPIKES => {
            hazards.spikes += 1;
            true
        }
        Hazard::ToxicSpikes if hazards.toxic_spikes < Hazards::MAX_TOXIC_SPIKES => {
            hazards.toxic_spikes += 1;
            true
        }
        Hazard::Spikes | Hazard::ToxicSpikes => false,
    };
    if placed {
        ctx.emit(BattleEvent::HazardSet { side, hazard });
    }
    placed
}

fn raise_condition(counter: &mut u8, turns: u8) -> bool {
    if *counter > 0 {
        return false;
    }
    *counter = turns;
    true
}

/// Field and side conditions. Returns false if nothing changed.
fn apply_field_effect(state: &mut Match, user: SideId, effect: FieldEffect, ctx: &mut BattleContext) -> BattleResult<bool> {
    let foe = user.opponent();
    let screen_turns = ctx.rules.screen_turns;
    let hail = state.field.weather_is(Weather::Hail);

    let (side, condition, raised) = match effect {
        FieldEffect::StealthRock => return Ok(set_hazard(state, foe, Hazard::StealthRock, ctx)),
        FieldEffect::Spikes => return Ok(set_hazard(state, foe, Hazard::Spikes, ctx)),
        FieldEffect::ToxicSpikes => return Ok(set_hazard(state, foe, Hazard::ToxicSpikes, ctx)),
        FieldEffect::StickyWeb => return Ok(set_hazard(state, foe, Hazard::StickyWeb, ctx)),
        FieldEffect::Terrain(terrain) => {
            if state.field.terrain == Some(terrain) {
                return Ok(false);
            }
            state.field.set_terrain(terrain, ctx.rules.terrain_turns);
            ctx.emit(BattleEvent::TerrainStarted { terrain });
            return Ok(true);
        }
        FieldEffect::Haze => {
            for side in SideId::BOTH {
                if let Some(combatant) = state.side_mut(side).active_mut() {
                    combatant.stages.clear();
                }
            }
            ctx.emit(BattleEvent::StagesReset);
            return Ok(true);
        }
        FieldEffect::Reflect => {
            let screens = &mut state.side_mut(user).screens;
            (user, SideCondition::Reflect, raise_condition(&mut screens.reflect, screen_turns))
        }
        FieldEffect::LightScreen => {
            let screens = &mut state.side_mut(user).screens;
            (
                user,
                SideCondition::LightScreen,
                raise_condition(&mut screens.light_screen, screen_turns),
            )
        }
        FieldEffect::AuroraVeil => {
            let screens = &mut state.side_mut(user).screens;
            let raised = hail && raise_condition(&mut screens.aurora_veil, screen_turns);
            (user, SideCondition::AuroraVeil, raised)
        }
        FieldEffect::Tailwind => {
            let turns = ctx.rules.tailwind_turns;
            let raised = raise_condition(&mut state.side_mut(user).tailwind, turns);
            (user, SideCondition::Tailwind, raised)
        }
    };
    if raised {
        ctx.emit(BattleEvent::SideConditionStarted { side, condition });
    }
    Ok(raised)
}

/// Named behaviours. Returns false when the move failed.
fn apply_behavior(
    state: &mut Match,
    user: SideId,
    target: SideId,
    behavior: MoveBehavior,
    hit: Hit,
    ctx: &mut BattleContext,
) -> BattleResult<bool> {
    let rules = ctx.rules;
    let target_alive = state.living_active(target).is_some();

    match behavior {
        MoveBehavior::Protect => {
            let combatant = state.active_mut(user)?;
            if !protect_succeeds(combatant, ctx)? {
                return Ok(false);
            }
            let name = combatant.name.clone();
            ctx.emit(BattleEvent::Protected { name });
        }
        MoveBehavior::Substitute => {
            let combatant = state.active_mut(user)?;
            let cost = combatant.max_hp() / 4;
            if combatant.volatiles.has_substitute() || cost == 0 || combatant.current_hp <= cost {
                return Ok(false);
            }
            let paid = combatant.take_damage(cost);
            combatant.volatiles.substitute_hp = cost;
            ctx.emit(BattleEvent::Damaged {
                target: combatant.name.clone(),
                amount: paid,
                remaining: combatant.current_hp,
                cause: DamageCause::Substitute,
            });
        }
        MoveBehavior::PerishSong => {
            let mut affected = false;
            for side in SideId::BOTH {
                if state.living_active(side).is_none() {
                    continue;
                }
                let combatant = state.active_mut(side)?;
                if combatant.volatiles.perish_count == 0 {
                    combatant.volatiles.perish_count = rules.perish_count;
                    affected = true;
                    let name = combatant.name.clone();
                    announce_volatile(&name, VolatileKind::PerishSong, ctx);
                }
            }
            return Ok(affected);
        }
        MoveBehavior::LeechSeed => {
            if !target_alive {
                return Ok(false);
            }
            let defender = state.active_mut(target)?;
            if defender.has_type(ElementType::Grass) {
                ctx.emit(BattleEvent::NoEffect {
                    target: defender.name.clone(),
                });
                return Ok(false);
            }
            if defender.volatiles.leech_seed || defender.volatiles.has_substitute() {
                return Ok(false);
            }
            defender.volatiles.leech_seed = true;
            let name = defender.name.clone();
            announce_volatile(&name, VolatileKind::LeechSeed, ctx);
        }
        MoveBehavior::Taunt => {
            if !target_alive {
                return Ok(false);
            }
            let defender = state.active_mut(target)?;
            if ability_hooks(defender.ability).blocks_taunt {
                ctx.emit(BattleEvent::AbilityActivated {
                    name: defender.name.clone(),
                    ability: defender.ability,
                });
                return Ok(false);
            }
            if defender.volatiles.taunt_turns > 0 {
                return Ok(false);
            }
            defender.volatiles.taunt_turns = rules.taunt_turns;
            let name = defender.name.clone();
            announce_volatile(&name, VolatileKind::Taunt, ctx);
        }
        MoveBehavior::Encore => {
            if !target_alive {
                return Ok(false);
            }
            let defender = state.active_mut(target)?;
            let repeatable = defender
                .volatiles
                .last_move
                .clone()
                .filter(|m| m != "Encore" && defender.volatiles.encore.is_none());
            let Some(move_name) = repeatable else {
                return Ok(false);
            };
            defender.volatiles.encore = Some(Encore {
                move_name,
                turns: rules.encore_turns,
            });
            let name = defender.name.clone();
            announce_volatile(&name, VolatileKind::Encore, ctx);
        }
        MoveBehavior::Trick => return trick(state, user, target, ctx),
        MoveBehavior::KnockOff => {
            if hit.hit_substitute || hit.dealt == 0 {
                return Ok(true);
            }
            let defender = state.active_mut(target)?;
            if ability_hooks(defender.ability).keeps_item {
                return Ok(true);
            }
            if let Some(item) = defender.item.take() {
                release_choice_lock(defender);
                ctx.emit(BattleEvent::ItemRemoved {
                    name: defender.name.clone(),
                    item,
                });
            }
        }
        MoveBehavior::ScreenBreaker => {
            let screens = &mut state.side_mut(target).screens;
            if screens.reflect + screens.light_screen + screens.aurora_veil > 0 {
                screens.clear();
                ctx.emit(BattleEvent::ScreensShattered { side: target });
            }
        }
        MoveBehavior::Charge => {
            let combatant = state.active_mut(user)?;
            combatant.volatiles.charged = true;
            let name = combatant.name.clone();
            announce_volatile(&name, VolatileKind::Charge, ctx);
        }
        MoveBehavior::DefenseCurl => state.active_mut(user)?.volatiles.defense_curl = true,
        MoveBehavior::DestinyBond => {
            let combatant = state.active_mut(user)?;
            combatant.volatiles.destiny_bond = true;
            let name = combatant.name.clone();
            announce_volatile(&name, VolatileKind::DestinyBond, ctx);
        }
        MoveBehavior::Roost => {
            let combatant = state.active_mut(user)?;
            if combatant.has_type(ElementType::Flying) {
                combatant.types.retain(|t| *t != ElementType::Flying);
                if combatant.types.is_empty() {
                    combatant.types.push(ElementType::Normal);
                }
                combatant.volatiles.roosted = true;
                let name = combatant.name.clone();
                announce_volatile(&name, VolatileKind::Roost, ctx);
            }
        }
        MoveBehavior::HealBlock => {
            if target_alive && !hit.hit_substitute {
                let defender = state.active_mut(target)?;
                if defender.volatiles.heal_block_turns == 0 {
                    defender.volatiles.heal_block_turns = rules.heal_block_turns;
                    let name = defender.name.clone();
                    announce_volatile(&name, VolatileKind::HealBlock, ctx);
                }
            }
        }
        MoveBehavior::Rest => return rest(state, user, ctx),
        // Reaching here means the user was awake.
        MoveBehavior::SleepTalk => return Ok(false),
        MoveBehavior::CurlBoosted
        | MoveBehavior::Facade
        | MoveBehavior::Retaliate
        | MoveBehavior::SuckerPunch => {}
    }
    Ok(true)
}

fn trick(state: &mut Match, user: SideId, target: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let Some(defender) = state.living_active(target) else {
        return Ok(false);
    };
    if ability_hooks(defender.ability).keeps_item {
        let (name, ability) = (defender.name.clone(), defender.ability);
        ctx.emit(BattleEvent::AbilityActivated { name, ability });
        return Ok(false);
    }
    let (target_item, target_name) = (defender.item, defender.name.clone());
    let attacker = state.active(user)?;
    if attacker.item.is_none() && target_item.is_none() {
        return Ok(false);
    }
    let user_item = attacker.item;

    let attacker = state.active_mut(user)?;
    attacker.item = target_item;
    release_choice_lock(attacker);
    let name = attacker.name.clone();
    let defender = state.active_mut(target)?;
    defender.item = user_item;
    release_choice_lock(defender);
    ctx.emit(BattleEvent::ItemsSwapped {
        name,
        target: target_name,
    });
    Ok(true)
}

fn rest(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let user = state.active_mut(side)?;
    let hooks = ability_hooks(user.ability);
    if user.is_full_hp()
        || user.is_heal_blocked()
        || hooks.full_status_immunity
        || hooks.status_immunity.contains(&StatusKind::Sleep)
    {
        return Ok(false);
    }
    user.status = Some(MajorStatus::Sleep);
    // Two turns asleep, awake on the third.
    user.sleep_turns = 3;
    user.bad_poison_counter = 0;
    let healed = user.heal(user.max_hp());
    let name = user.name.clone();
    ctx.emit(BattleEvent::StatusInflicted {
        target: name.clone(),
        status: StatusKind::Sleep,
    });
    ctx.emit(BattleEvent::Healed {
        target: name,
        amount: healed,
        cause: HealCause::Rest,
    });
    Ok(true)
}
