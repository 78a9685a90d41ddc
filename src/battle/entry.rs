use crate::battle::abilities::ability_hooks;
use crate::battle::context::BattleContext;
use crate::battle::events::BattleEvent;
use crate::battle::hazards::apply_entry_hazards;
use crate::battle::state::Match;
use crate::battle::volatiles::BatonPassCarry;
use crate::errors::{ActionError, BattleResult};
use crate::side::SideId;

/// Why an entry ability is firing. A copied trigger comes from Trace and
/// never copies again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTrigger {
    Initial,
    Copied,
}

pub fn trigger_entry_ability(
    state: &mut Match,
    side: SideId,
    ctx: &mut BattleContext,
    trigger: EntryTrigger,
) -> BattleResult<()> {
    let Some(combatant) = state.living_active(side) else {
        return Ok(());
    };
    if let Some(hook) = ability_hooks(combatant.ability).on_entry {
        hook(state, side, ctx, trigger)?;
    }
    Ok(())
}

/// Lead abilities fire once, on the first resolution, side A first.
pub fn announce_leads(state: &mut Match, ctx: &mut BattleContext) -> BattleResult<()> {
    if state.leads_announced {
        return Ok(());
    }
    state.leads_announced = true;
    for side in SideId::BOTH {
        trigger_entry_ability(state, side, ctx, EntryTrigger::Initial)?;
    }
    Ok(())
}

/// Withdraws the active combatant. Regenerator heals it on the way out and
/// a pending Baton Pass takes its transferable state along.
pub fn withdraw(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<Option<BatonPassCarry>> {
    let baton_pass = std::mem::take(&mut state.side_mut(side).baton_pass);
    let outgoing = state.active_mut(side)?;
    let carry = baton_pass.then(|| BatonPassCarry::take(outgoing));

    if !outgoing.is_fainted() {
        if let Some(hook) = ability_hooks(outgoing.ability).on_switch_out {
            if let Some(event) = hook(outgoing) {
                ctx.emit(event);
            }
        }
        ctx.emit(BattleEvent::Withdrew {
            side,
            name: outgoing.name.clone(),
        });
    }
    outgoing.clear_on_switch_out();
    Ok(carry)
}

/// Brings roster slot `index` in: hazards first, then its entry ability if
/// it is still standing.
pub fn send_in(
    state: &mut Match,
    side: SideId,
    index: usize,
    carry: Option<BatonPassCarry>,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    let roster_side = state.side_mut(side);
    let incoming = roster_side
        .roster
        .get_mut(index)
        .ok_or(ActionError::NoSuchCombatant(index))?;
    if let Some(carry) = carry {
        carry.apply(incoming);
    }
    let name = incoming.name.clone();
    roster_side.active = index;
    roster_side.pending_switch = false;
    ctx.emit(BattleEvent::SentOut { side, name });

    apply_entry_hazards(state, side, ctx)?;
    trigger_entry_ability(state, side, ctx, EntryTrigger::Initial)
}

/// A voluntary or forced switch from the active combatant to `index`.
pub fn perform_switch(state: &mut Match, side: SideId, index: usize, ctx: &mut BattleContext) -> BattleResult<()> {
    let carry = withdraw(state, side, ctx)?;
    send_in(state, side, index, carry, ctx)
}

/// First living bench member, used when a self-switch needs a target.
pub fn first_available(state: &Match, side: SideId) -> Option<usize> {
    let team = state.side(side);
    team.roster
        .iter()
        .enumerate()
        .find(|(i, c)| *i != team.active && !c.is_fainted())
        .map(|(i, _)| i)
}
