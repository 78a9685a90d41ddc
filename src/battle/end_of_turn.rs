use crate::battle::abilities::ability_hooks;
use crate::battle::context::BattleContext;
use crate::battle::events::{BattleEvent, DamageCause, HealCause, SideCondition, VolatileKind};
use crate::battle::items::item_hooks;
use crate::battle::state::Match;
use crate::battle::status::inflict_status;
use crate::battle::volatiles::{clear_turn_scoped, tick_countdowns};
use crate::combatant::{Combatant, MajorStatus};
use crate::errors::BattleResult;
use crate::side::SideId;
use schema::{ElementType, StatusKind, Weather};

const MAX_BAD_POISON_COUNTER: u8 = 15;

/// Deals residual damage and reports whether the combatant fainted.
fn residual(
    state: &mut Match,
    side: SideId,
    amount: u16,
    cause: DamageCause,
    ctx: &mut BattleContext,
) -> BattleResult<bool> {
    let combatant = state.active_mut(side)?;
    let dealt = combatant.take_damage(amount);
    ctx.emit(BattleEvent::Damaged {
        target: combatant.name.clone(),
        amount: dealt,
        remaining: combatant.current_hp,
        cause,
    });
    Ok(combatant.is_fainted())
}

fn weather_hurts(combatant: &Combatant, weather: Weather) -> bool {
    if ability_hooks(combatant.ability).weather_immunity == Some(weather) {
        return false;
    }
    match weather {
        Weather::Sandstorm => ![ElementType::Rock, ElementType::Ground, ElementType::Steel]
            .iter()
            .any(|&t| combatant.has_type(t)),
        Weather::Hail => !combatant.has_type(ElementType::Ice),
        Weather::Sun | Weather::Rain => false,
    }
}

fn perish_countdown(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let combatant = state.active_mut(side)?;
    if combatant.volatiles.perish_count == 0 {
        return Ok(false);
    }
    combatant.volatiles.perish_count -= 1;
    let count = combatant.volatiles.perish_count;
    ctx.emit(BattleEvent::PerishCount {
        name: combatant.name.clone(),
        count,
    });
    if count == 0 {
        combatant.current_hp = 0;
        return Ok(true);
    }
    Ok(false)
}

fn drowsy_countdown(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let combatant = state.active_mut(side)?;
    if combatant.volatiles.drowsy_turns == 0 {
        return Ok(());
    }
    combatant.volatiles.drowsy_turns -= 1;
    if combatant.volatiles.drowsy_turns == 0 {
        inflict_status(state, side, StatusKind::Sleep, None, false, ctx)?;
    }
    Ok(())
}

fn status_damage(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let combatant = state.active_mut(side)?;
    let (amount, kind) = match combatant.status {
        Some(MajorStatus::Poison) => (combatant.fraction_of_max(8), StatusKind::Poison),
        Some(MajorStatus::BadPoison) => {
            combatant.bad_poison_counter =
                (combatant.bad_poison_counter + 1).min(MAX_BAD_POISON_COUNTER);
            let amount = combatant.fraction_of_max(16) * u16::from(combatant.bad_poison_counter);
            (amount, StatusKind::BadPoison)
        }
        Some(MajorStatus::Burn) => (combatant.fraction_of_max(16), StatusKind::Burn),
        _ => return Ok(false),
    };
    residual(state, side, amount, DamageCause::Status(kind), ctx)
}

fn weather_damage(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let Some(weather) = state.field.weather else {
        return Ok(false);
    };
    let combatant = state.active(side)?;
    if !weather_hurts(combatant, weather) {
        return Ok(false);
    }
    let amount = combatant.fraction_of_max(16);
    residual(state, side, amount, DamageCause::Weather(weather), ctx)
}

fn passive_effects(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let combatant = state.active(side)?;
    let item_hook = combatant.item.and_then(|i| item_hooks(i).on_end_of_turn);
    let ability_hook = ability_hooks(combatant.ability).on_end_of_turn;
    if let Some(hook) = item_hook {
        hook(state, side, ctx)?;
    }
    if state.active(side)?.is_fainted() {
        return Ok(());
    }
    if let Some(hook) = ability_hook {
        hook(state, side, ctx)?;
    }
    Ok(())
}

fn leech_seed(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let combatant = state.active(side)?;
    if !combatant.volatiles.leech_seed {
        return Ok(false);
    }
    let before = combatant.current_hp;
    let amount = combatant.fraction_of_max(8);
    let fainted = residual(state, side, amount, DamageCause::LeechSeed, ctx)?;
    let drained = before - state.active(side)?.current_hp;

    let seeder = side.opponent();
    if state.living_active(seeder).is_some() {
        let receiver = state.active_mut(seeder)?;
        if !receiver.is_heal_blocked() {
            let healed = receiver.heal(drained);
            if healed > 0 {
                ctx.emit(BattleEvent::Healed {
                    target: receiver.name.clone(),
                    amount: healed,
                    cause: HealCause::LeechSeed,
                });
            }
        }
    }
    Ok(fainted)
}

/// The fixed end-of-turn sequence for one side's active combatant. Each
/// damaging step ends the sequence early if it faints the combatant.
pub fn resolve_end_of_turn(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    if state.living_active(side).is_none() {
        return Ok(());
    }
    if perish_countdown(state, side, ctx)? {
        return Ok(());
    }
    drowsy_countdown(state, side, ctx)?;
    if status_damage(state, side, ctx)? || weather_damage(state, side, ctx)? {
        return Ok(());
    }
    passive_effects(state, side, ctx)?;
    if state.active(side)?.is_fainted() || leech_seed(state, side, ctx)? {
        return Ok(());
    }
    tick_countdowns(state, side, ctx)?;
    clear_turn_scoped(state, side)?;

    let combatant = state.active_mut(side)?;
    combatant.volatiles.turns_on_field += 1;
    if let Some(hook) = combatant.item.and_then(|i| item_hooks(i).on_low_hp) {
        hook(state, side, ctx)?;
    }
    Ok(())
}

fn countdown(turns: &mut u8) -> bool {
    if *turns == 0 {
        return false;
    }
    *turns -= 1;
    *turns == 0
}

/// Counts down weather, terrain, tailwind and screens once per turn.
pub fn tick_field(state: &mut Match, ctx: &mut BattleContext) {
    if let Some(weather) = state.field.weather {
        if countdown(&mut state.field.weather_turns) {
            state.field.weather = None;
            ctx.emit(BattleEvent::WeatherEnded { weather });
        }
    }
    if let Some(terrain) = state.field.terrain {
        if countdown(&mut state.field.terrain_turns) {
            state.field.terrain = None;
            ctx.emit(BattleEvent::TerrainEnded { terrain });
        }
    }

    for side in SideId::BOTH {
        let team = state.side_mut(side);
        let counters = [
            (&mut team.tailwind, SideCondition::Tailwind),
            (&mut team.screens.reflect, SideCondition::Reflect),
            (&mut team.screens.light_screen, SideCondition::LightScreen),
            (&mut team.screens.aurora_veil, SideCondition::AuroraVeil),
        ];
        for (turns, condition) in counters {
            if countdown(turns) {
                ctx.emit(BattleEvent::SideConditionEnded { side, condition });
            }
        }
    }
}

/// Drowsiness is reported when it starts, so the event lives here with its
/// countdown.
pub fn make_drowsy(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<bool> {
    let turns = ctx.rules.yawn_turns;
    let combatant = state.active_mut(side)?;
    if combatant.status.is_some() || combatant.volatiles.drowsy_turns > 0 {
        return Ok(false);
    }
    combatant.volatiles.drowsy_turns = turns;
    ctx.emit(BattleEvent::VolatileStarted {
        target: combatant.name.clone(),
        kind: VolatileKind::Drowsy,
    });
    Ok(true)
}
