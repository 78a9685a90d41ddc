use crate::battle::abilities::ability_hooks;
use crate::battle::context::BattleContext;
use crate::battle::events::{BattleEvent, DamageCause, HealCause};
use crate::battle::state::Match;
use crate::battle::stats::{change_stage, StatBoost};
use crate::combatant::Combatant;
use crate::errors::BattleResult;
use crate::side::SideId;
use phf::phf_map;
use schema::{ElementType, ItemId, MoveCategory, MoveData, Stat};

pub type DamageHook = fn(&MoveData, f64) -> f64;
pub type HolderHook = fn(&mut Match, SideId, &mut BattleContext) -> BattleResult<()>;
/// `(state, holder, attacker, ctx)`
pub type ContactHook = fn(&mut Match, SideId, SideId, &mut BattleContext) -> BattleResult<()>;

#[derive(Clone, Copy)]
pub struct ItemHooks {
    /// Power multiplier given the move and the type effectiveness so far.
    pub on_damage_dealt: Option<DamageHook>,
    pub stat_boost: Option<StatBoost>,
    pub locks_choice: bool,
    pub blocks_status_moves: bool,
    /// After the holder's move dealt damage.
    pub on_hit_dealt: Option<HolderHook>,
    /// After the holder was struck by a contact move.
    pub on_contact: Option<ContactHook>,
    pub on_end_of_turn: Option<HolderHook>,
    pub on_super_effective_hit: Option<HolderHook>,
    pub on_low_hp: Option<HolderHook>,
    pub endures_from_full: bool,
    pub hazard_immunity: bool,
    pub accuracy_multiplier: f64,
    pub blocks_stat_drops: bool,
    pub protects_stages: bool,
}

pub const NO_HOOKS: ItemHooks = ItemHooks {
    on_damage_dealt: None,
    stat_boost: None,
    locks_choice: false,
    blocks_status_moves: false,
    on_hit_dealt: None,
    on_contact: None,
    on_end_of_turn: None,
    on_super_effective_hit: None,
    on_low_hp: None,
    endures_from_full: false,
    hazard_immunity: false,
    accuracy_multiplier: 1.0,
    blocks_stat_drops: false,
    protects_stages: false,
};

static ITEM_HOOKS: phf::Map<&'static str, ItemHooks> = phf_map! {
    "leftovers" => ItemHooks { on_end_of_turn: Some(leftovers), ..NO_HOOKS },
    "black-sludge" => ItemHooks { on_end_of_turn: Some(black_sludge), ..NO_HOOKS },
    "choice-band" => ItemHooks {
        on_damage_dealt: Some(choice_band),
        locks_choice: true,
        ..NO_HOOKS
    },
    "choice-specs" => ItemHooks {
        on_damage_dealt: Some(choice_specs),
        locks_choice: true,
        ..NO_HOOKS
    },
    "choice-scarf" => ItemHooks {
        stat_boost: Some(StatBoost::one_and_a_half(Stat::Speed)),
        locks_choice: true,
        ..NO_HOOKS
    },
    "life-orb" => ItemHooks {
        on_damage_dealt: Some(life_orb),
        on_hit_dealt: Some(life_orb_recoil),
        ..NO_HOOKS
    },
    "expert-belt" => ItemHooks { on_damage_dealt: Some(expert_belt), ..NO_HOOKS },
    "assault-vest" => ItemHooks {
        stat_boost: Some(StatBoost::one_and_a_half(Stat::SpDefense)),
        blocks_status_moves: true,
        ..NO_HOOKS
    },
    "focus-sash" => ItemHooks { endures_from_full: true, ..NO_HOOKS },
    "weakness-policy" => ItemHooks { on_super_effective_hit: Some(weakness_policy), ..NO_HOOKS },
    "rocky-helmet" => ItemHooks { on_contact: Some(rocky_helmet), ..NO_HOOKS },
    "heavy-duty-boots" => ItemHooks { hazard_immunity: true, ..NO_HOOKS },
    "sitrus-berry" => ItemHooks { on_low_hp: Some(sitrus_berry), ..NO_HOOKS },
    "wide-lens" => ItemHooks { accuracy_multiplier: 1.1, ..NO_HOOKS },
    "clear-amulet" => ItemHooks { blocks_stat_drops: true, ..NO_HOOKS },
    "ability-shield" => ItemHooks { protects_stages: true, ..NO_HOOKS },
};

pub fn item_hooks(id: ItemId) -> &'static ItemHooks {
    ITEM_HOOKS.get(id.as_ref()).unwrap_or(&NO_HOOKS)
}

/// Drops a choice lock that only the held item was enforcing.
pub fn release_choice_lock(holder: &mut Combatant) {
    if !ability_hooks(holder.ability).locks_choice {
        holder.volatiles.choice_locked = None;
    }
}

/// Removes the holder's item for good and reports it.
pub fn consume_item(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let holder = state.active_mut(side)?;
    if let Some(item) = holder.item.take() {
        release_choice_lock(holder);
        ctx.emit(BattleEvent::ItemRemoved {
            name: holder.name.clone(),
            item,
        });
    }
    Ok(())
}

fn choice_band(move_data: &MoveData, _: f64) -> f64 {
    if move_data.category == MoveCategory::Physical {
        1.5
    } else {
        1.0
    }
}

fn choice_specs(move_data: &MoveData, _: f64) -> f64 {
    if move_data.category == MoveCategory::Special {
        1.5
    } else {
        1.0
    }
}

fn life_orb(_: &MoveData, _: f64) -> f64 {
    1.3
}

fn expert_belt(_: &MoveData, effectiveness: f64) -> f64 {
    if effectiveness > 1.0 {
        1.2
    } else {
        1.0
    }
}

fn self_damage(
    state: &mut Match,
    side: SideId,
    divisor: u16,
    cause: DamageCause,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    let target = state.active_mut(side)?;
    if target.is_fainted() {
        return Ok(());
    }
    let amount = target.take_damage(target.fraction_of_max(divisor));
    ctx.emit(BattleEvent::Damaged {
        target: target.name.clone(),
        amount,
        remaining: target.current_hp,
        cause,
    });
    Ok(())
}

fn life_orb_recoil(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    self_damage(state, side, 10, DamageCause::LifeOrb, ctx)
}

fn rocky_helmet(
    state: &mut Match,
    holder: SideId,
    attacker: SideId,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    let name = state.active(holder)?.name.clone();
    ctx.emit(BattleEvent::ItemActivated {
        name,
        item: ItemId::RockyHelmet,
    });
    self_damage(state, attacker, 6, DamageCause::RockyHelmet, ctx)
}

fn heal_by(
    state: &mut Match,
    side: SideId,
    divisor: u16,
    item: ItemId,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    let holder = state.active_mut(side)?;
    if holder.is_heal_blocked() || holder.is_fainted() {
        return Ok(());
    }
    let amount = holder.heal(holder.fraction_of_max(divisor));
    if amount > 0 {
        ctx.emit(BattleEvent::Healed {
            target: holder.name.clone(),
            amount,
            cause: HealCause::Item(item),
        });
    }
    Ok(())
}

fn leftovers(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    heal_by(state, side, 16, ItemId::Leftovers, ctx)
}

fn black_sludge(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    if state.active(side)?.has_type(ElementType::Poison) {
        heal_by(state, side, 16, ItemId::BlackSludge, ctx)
    } else {
        self_damage(state, side, 8, DamageCause::BlackSludge, ctx)
    }
}

fn weakness_policy(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let name = state.active(side)?.name.clone();
    ctx.emit(BattleEvent::ItemActivated {
        name,
        item: ItemId::WeaknessPolicy,
    });
    change_stage(state, side, Stat::Attack, 2, Some(side), ctx)?;
    change_stage(state, side, Stat::SpAttack, 2, Some(side), ctx)?;
    consume_item(state, side, ctx)
}

fn sitrus_berry(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let holder = state.active(side)?;
    if holder.is_fainted() || holder.current_hp > holder.max_hp() / 2 || holder.is_heal_blocked()
    {
        return Ok(());
    }
    heal_by(state, side, 4, ItemId::SitrusBerry, ctx)?;
    consume_item(state, side, ctx)
}
