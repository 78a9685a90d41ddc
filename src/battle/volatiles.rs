use crate::battle::context::BattleContext;
use crate::battle::events::{BattleEvent, VolatileKind};
use crate::battle::state::Match;
use crate::combatant::{Combatant, StatStages};
use crate::errors::BattleResult;
use crate::side::SideId;

/// Longest streak whose halving is still tracked.
const MAX_PROTECT_HALVINGS: u8 = 12;

/// Rolls a protect-family move. The first use in a streak always works and
/// every consecutive success halves the next chance. A failure resets the
/// streak.
pub fn protect_succeeds(combatant: &mut Combatant, ctx: &mut BattleContext) -> BattleResult<bool> {
    let streak = combatant.volatiles.protect_streak;
    let success = if streak == 0 {
        true
    } else {
        let denominator = 1u32 << streak.min(MAX_PROTECT_HALVINGS);
        ctx.rng.chance(
            1,
            denominator,
            &format!("protect streak {} for {}", streak, combatant.name),
        )?
    };
    if success {
        combatant.volatiles.protect_streak = streak.saturating_add(1);
        combatant.volatiles.protected = true;
    } else {
        combatant.volatiles.protect_streak = 0;
    }
    Ok(success)
}

/// What Baton Pass hands to the incoming combatant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatonPassCarry {
    pub stages: StatStages,
    pub substitute_hp: u16,
    pub confusion_turns: u8,
    pub leech_seed: bool,
    pub perish_count: u8,
}

impl BatonPassCarry {
    pub fn take(from: &Combatant) -> Self {
        Self {
            stages: from.stages,
            substitute_hp: from.volatiles.substitute_hp,
            confusion_turns: from.volatiles.confusion_turns,
            leech_seed: from.volatiles.leech_seed,
            perish_count: from.volatiles.perish_count,
        }
    }

    pub fn apply(self, to: &mut Combatant) {
        to.stages = self.stages;
        to.volatiles.substitute_hp = self.substitute_hp;
        to.volatiles.confusion_turns = self.confusion_turns;
        to.volatiles.leech_seed = self.leech_seed;
        to.volatiles.perish_count = self.perish_count;
    }
}

fn tick(counter: &mut u8) -> bool {
    if *counter == 0 {
        return false;
    }
    *counter -= 1;
    *counter == 0
}

/// Counts down taunt, encore and heal block and reports the ones that end.
pub fn tick_countdowns(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let combatant = state.active_mut(side)?;
    let name = combatant.name.clone();
    let volatiles = &mut combatant.volatiles;
    let mut ended = Vec::new();

    if tick(&mut volatiles.taunt_turns) {
        ended.push(VolatileKind::Taunt);
    }
    if let Some(encore) = volatiles.encore.as_mut() {
        if tick(&mut encore.turns) {
            volatiles.encore = None;
            ended.push(VolatileKind::Encore);
        }
    }
    if tick(&mut volatiles.heal_block_turns) {
        ended.push(VolatileKind::HealBlock);
    }

    for kind in ended {
        ctx.emit(BattleEvent::VolatileEnded {
            target: name.clone(),
            kind,
        });
    }
    Ok(())
}

/// Destiny bond lasts until the holder's next turn ends; roost only for the
/// turn it was used in.
pub fn clear_turn_scoped(state: &mut Match, side: SideId) -> BattleResult<()> {
    let combatant = state.active_mut(side)?;
    combatant.volatiles.destiny_bond = false;
    if combatant.volatiles.roosted {
        combatant.volatiles.roosted = false;
        combatant.types = combatant.original_types.clone();
    }
    Ok(())
}
