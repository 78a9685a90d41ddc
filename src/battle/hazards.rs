use crate::battle::context::BattleContext;
use crate::battle::events::{BattleEvent, DamageCause, Hazard};
use crate::battle::items::item_hooks;
use crate::battle::state::Match;
use crate::battle::stats::change_stage;
use crate::battle::status::inflict_status;
use crate::errors::BattleResult;
use crate::side::SideId;
use schema::{effectiveness, ElementType, Stat, StatusKind};

fn hazard_damage(
    state: &mut Match,
    side: SideId,
    amount: u16,
    hazard: Hazard,
    ctx: &mut BattleContext,
) -> BattleResult<bool> {
    let combatant = state.active_mut(side)?;
    let dealt = combatant.take_damage(amount.max(1));
    ctx.emit(BattleEvent::Damaged {
        target: combatant.name.clone(),
        amount: dealt,
        remaining: combatant.current_hp,
        cause: DamageCause::Hazard(hazard),
    });
    Ok(combatant.is_fainted())
}

fn spikes_divisor(layers: u8) -> u16 {
    match layers {
        1 => 8,
        2 => 6,
        _ => 4,
    }
}

/// Runs the side's hazards on its freshly arrived active combatant: rocks,
/// spikes, toxic spikes, then sticky web. Stops as soon as one faints it.
pub fn apply_entry_hazards(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let hazards = state.side(side).hazards;
    if hazards.is_empty() {
        return Ok(());
    }
    let combatant = state.active(side)?;
    if let Some(item) = combatant.item.filter(|&i| item_hooks(i).hazard_immunity) {
        ctx.emit(BattleEvent::HazardsIgnored {
            name: combatant.name.clone(),
            item,
        });
        return Ok(());
    }
    let grounded = combatant.is_grounded();

    if hazards.stealth_rock {
        let combatant = state.active(side)?;
        let multiplier = effectiveness(ElementType::Rock, &combatant.types);
        let amount = (f64::from(combatant.max_hp()) * multiplier / 8.0).floor() as u16;
        if hazard_damage(state, side, amount, Hazard::StealthRock, ctx)? {
            return Ok(());
        }
    }

    if hazards.spikes > 0 && grounded {
        let amount = state.active(side)?.fraction_of_max(spikes_divisor(hazards.spikes));
        if hazard_damage(state, side, amount, Hazard::Spikes, ctx)? {
            return Ok(());
        }
    }

    if hazards.toxic_spikes > 0 && grounded {
        let combatant = state.active(side)?;
        if combatant.has_type(ElementType::Poison) {
            let name = combatant.name.clone();
            state.side_mut(side).hazards.toxic_spikes = 0;
            ctx.emit(BattleEvent::HazardsAbsorbed { name });
        } else if combatant.status.is_none() {
            let kind = if hazards.toxic_spikes >= 2 {
                StatusKind::BadPoison
            } else {
                StatusKind::Poison
            };
            inflict_status(state, side, kind, None, false, ctx)?;
        }
    }

    if hazards.sticky_web && grounded {
        change_stage(state, side, Stat::Speed, -1, Some(side.opponent()), ctx)?;
    }
    Ok(())
}
