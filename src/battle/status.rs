use crate::battle::abilities::ability_hooks;
use crate::battle::context::BattleContext;
use crate::battle::damage::{base_damage, final_damage};
use crate::battle::events::{ActionFailureReason, BattleEvent, DamageCause, StatusRejection, VolatileKind};
use crate::battle::rng::TurnRng;
use crate::battle::state::{Field, Match};
use crate::combatant::{Combatant, MajorStatus};
use crate::errors::BattleResult;
use crate::side::SideId;
use schema::{ElementType, Stat, StatusKind, Terrain, Weather};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Applied,
    Rejected(StatusRejection),
}

/// Result of the pre-move check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActGate {
    Ready,
    Asleep,
    Frozen,
    FullyParalyzed,
    HurtItself,
}

fn type_immune(target: &Combatant, kind: StatusKind) -> bool {
    match kind {
        StatusKind::Poison | StatusKind::BadPoison => {
            target.has_type(ElementType::Poison) || target.has_type(ElementType::Steel)
        }
        StatusKind::Burn => target.has_type(ElementType::Fire),
        StatusKind::Paralysis => target.has_type(ElementType::Electric),
        StatusKind::Freeze => target.has_type(ElementType::Ice),
        StatusKind::Sleep | StatusKind::Confusion => false,
    }
}

fn rejection(target: &Combatant, kind: StatusKind, field: &Field) -> Option<StatusRejection> {
    let hooks = ability_hooks(target.ability);
    if hooks.full_status_immunity {
        return Some(StatusRejection::AbilityImmunity(target.ability));
    }

    match MajorStatus::from_kind(kind) {
        None if target.volatiles.is_confused() => return Some(StatusRejection::AlreadyActive),
        Some(major) if target.status == Some(major) => {
            return Some(StatusRejection::AlreadyActive)
        }
        Some(_) if target.status.is_some() => return Some(StatusRejection::AlreadyStatused),
        _ => {}
    }

    if type_immune(target, kind) {
        return Some(StatusRejection::TypeImmunity);
    }
    if kind == StatusKind::Freeze && field.weather_is(Weather::Sun) {
        return Some(StatusRejection::Weather);
    }
    if hooks.status_immunity.contains(&kind) {
        return Some(StatusRejection::AbilityImmunity(target.ability));
    }
    if target.is_grounded() {
        let blocked = match field.terrain {
            Some(Terrain::Misty) => kind != StatusKind::Confusion,
            Some(Terrain::Electric) => kind == StatusKind::Sleep,
            _ => false,
        };
        if blocked {
            return Some(StatusRejection::Terrain);
        }
    }
    if target.volatiles.has_substitute() {
        return Some(StatusRejection::Substitute);
    }
    None
}

/// Tries to give `target` a status. Sleep lasts 2-4 turns and confusion
/// 1-4; the roll is only drawn when the status sticks.
pub fn apply_status(
    target: &mut Combatant,
    kind: StatusKind,
    field: &Field,
    rng: &mut TurnRng,
) -> BattleResult<StatusOutcome> {
    if let Some(reason) = rejection(target, kind, field) {
        return Ok(StatusOutcome::Rejected(reason));
    }

    match kind {
        StatusKind::Confusion => {
            let turns = rng.range(1, 4, &format!("confusion length for {}", target.name))?;
            target.volatiles.confusion_turns = turns as u8;
        }
        StatusKind::Sleep => {
            let turns = rng.range(2, 4, &format!("sleep length for {}", target.name))?;
            target.sleep_turns = turns as u8;
            target.status = Some(MajorStatus::Sleep);
        }
        StatusKind::BadPoison => {
            target.bad_poison_counter = 0;
            target.status = Some(MajorStatus::BadPoison);
        }
        other => target.status = MajorStatus::from_kind(other),
    }
    Ok(StatusOutcome::Applied)
}

/// Applies a status to a side's active combatant and reports the outcome.
/// `source` is the side whose move or hazard caused it. Rejections are only
/// reported when `report_block` is set.
pub fn inflict_status(
    state: &mut Match,
    target_side: SideId,
    kind: StatusKind,
    source: Option<SideId>,
    report_block: bool,
    ctx: &mut BattleContext,
) -> BattleResult<StatusOutcome> {
    let field = state.field;
    let target = state.active_mut(target_side)?;
    if target.is_fainted() {
        return Ok(StatusOutcome::Rejected(StatusRejection::AlreadyStatused));
    }
    let outcome = apply_status(target, kind, &field, ctx.rng)?;
    let name = target.name.clone();

    match outcome {
        StatusOutcome::Applied => {
            ctx.emit(BattleEvent::StatusInflicted {
                target: name,
                status: kind,
            });
            let puppeteer = source
                .filter(|&s| s != target_side)
                .and_then(|s| state.living_active(s))
                .is_some_and(|c| ability_hooks(c.ability).poison_confuses);
            if puppeteer && matches!(kind, StatusKind::Poison | StatusKind::BadPoison) {
                inflict_status(state, target_side, StatusKind::Confusion, None, false, ctx)?;
            }
        }
        StatusOutcome::Rejected(reason) if report_block => {
            ctx.emit(BattleEvent::StatusBlocked {
                target: name,
                status: kind,
                reason,
            });
        }
        StatusOutcome::Rejected(_) => {}
    }
    Ok(outcome)
}

fn cure(combatant: &mut Combatant, ctx: &mut BattleContext) {
    if let Some(status) = combatant.status.take() {
        ctx.emit(BattleEvent::StatusCured {
            target: combatant.name.clone(),
            status: status.kind(),
        });
    }
    combatant.sleep_turns = 0;
}

/// Runs once before the combatant's move: sleep, freeze, paralysis and
/// confusion each get a chance to stop it.
pub fn can_act(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<ActGate> {
    let level_factor = ctx.rules.level_factor();
    let combatant = state.active_mut(side)?;
    let name = combatant.name.clone();
    let hooks = ability_hooks(combatant.ability);

    match combatant.status {
        Some(MajorStatus::Sleep) if !hooks.acts_while_asleep => {
            combatant.sleep_turns = combatant.sleep_turns.saturating_sub(1);
            if combatant.sleep_turns == 0 {
                cure(combatant, ctx);
            } else {
                ctx.emit(BattleEvent::Immobilized {
                    name,
                    reason: ActionFailureReason::Asleep,
                });
                return Ok(ActGate::Asleep);
            }
        }
        Some(MajorStatus::Freeze) => {
            if ctx.rng.chance(1, 4, &format!("thaw for {}", name))? {
                cure(combatant, ctx);
            } else {
                ctx.emit(BattleEvent::Immobilized {
                    name,
                    reason: ActionFailureReason::Frozen,
                });
                return Ok(ActGate::Frozen);
            }
        }
        Some(MajorStatus::Paralysis) => {
            if ctx.rng.chance(1, 4, &format!("full paralysis for {}", name))? {
                ctx.emit(BattleEvent::Immobilized {
                    name,
                    reason: ActionFailureReason::FullyParalyzed,
                });
                return Ok(ActGate::FullyParalyzed);
            }
        }
        _ => {}
    }

    if combatant.volatiles.is_confused() {
        combatant.volatiles.confusion_turns -= 1;
        if combatant.volatiles.confusion_turns == 0 {
            ctx.emit(BattleEvent::StatusCured {
                target: name,
                status: StatusKind::Confusion,
            });
        } else if ctx.rng.chance(1, 3, &format!("confusion self-hit for {}", name))? {
            let base = base_damage(
                level_factor,
                40,
                combatant.raw_stat(Stat::Attack),
                combatant.raw_stat(Stat::Defense),
            );
            let roll = ctx.rng.damage_roll("confusion self-hit damage")?;
            let amount = u16::try_from(final_damage(base, 1.0, roll)).unwrap_or(u16::MAX);
            let dealt = combatant.take_damage(amount);
            ctx.emit(BattleEvent::Damaged {
                target: name,
                amount: dealt,
                remaining: combatant.current_hp,
                cause: DamageCause::Confusion,
            });
            return Ok(ActGate::HurtItself);
        }
    }
    Ok(ActGate::Ready)
}

/// Starts a volatile on the target and reports it.
pub fn announce_volatile(name: &str, kind: VolatileKind, ctx: &mut BattleContext) {
    ctx.emit(BattleEvent::VolatileStarted {
        target: name.to_string(),
        kind,
    });
}
