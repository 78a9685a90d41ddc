//! Ability dispatch table.
//!
//! Each ability id maps to one `AbilityHooks` row. The resolver asks the row
//! for a hook or a trait at the single place that event happens, so no
//! ability is ever checked twice for the same effect.

use crate::battle::context::BattleContext;
use crate::battle::entry::{self, EntryTrigger};
use crate::battle::events::{BattleEvent, HealCause};
use crate::battle::state::Match;
use crate::battle::stats::{change_stage, StatBoost};
use crate::combatant::Combatant;
use crate::errors::BattleResult;
use crate::side::SideId;
use phf::phf_map;
use schema::{AbilityId, ElementType, MoveData, Stat, StatusKind, Weather};

pub type SideHook = fn(&mut Match, SideId, &mut BattleContext) -> BattleResult<()>;
pub type EntryHook = fn(&mut Match, SideId, &mut BattleContext, EntryTrigger) -> BattleResult<()>;
pub type DamageTakenHook = fn(&mut Match, SideId, u16, &mut BattleContext) -> BattleResult<()>;
pub type PowerHook = fn(&MoveData, &Combatant) -> f64;
pub type SwitchOutHook = fn(&mut Combatant) -> Option<BattleEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritAbility {
    /// The holder can never be hit critically.
    Immune,
    /// The holder's critical-hit rate rises to 1/8.
    Boosted,
    /// The holder always lands critical hits on poisoned targets.
    AlwaysVsPoisoned,
}

#[derive(Clone, Copy)]
pub struct AbilityHooks {
    pub on_entry: Option<EntryHook>,
    pub on_stat_lowered: Option<SideHook>,
    pub on_damage_taken: Option<DamageTakenHook>,
    pub on_knock_out: Option<SideHook>,
    pub on_switch_out: Option<SwitchOutHook>,
    pub on_end_of_turn: Option<SideHook>,
    /// Power multiplier when the holder attacks.
    pub on_damage_dealt: Option<PowerHook>,
    /// Power multiplier when the holder is hit.
    pub on_damage_received: Option<PowerHook>,
    pub type_immunity: Option<ElementType>,
    pub on_type_immunity: Option<SideHook>,
    pub status_immunity: &'static [StatusKind],
    pub full_status_immunity: bool,
    pub acts_while_asleep: bool,
    pub ignores_opponent_stages: bool,
    pub doubles_stages: bool,
    pub weather_speed: Option<Weather>,
    pub weather_immunity: Option<Weather>,
    pub stat_boost: Option<StatBoost>,
    pub locks_choice: bool,
    pub boosts_resisted: bool,
    pub crit: Option<CritAbility>,
    pub blocks_intimidate: bool,
    pub blocks_stat_drops: bool,
    pub reflects_stat_drops: bool,
    pub blocks_flinch: bool,
    pub blocks_taunt: bool,
    pub status_priority_bonus: i8,
    pub always_hits: bool,
    pub accuracy_multiplier: f64,
    pub evasion_weather: Option<Weather>,
    pub loafs: bool,
    pub poison_confuses: bool,
    pub keeps_item: bool,
    pub bounces_status_moves: bool,
}

pub const NO_HOOKS: AbilityHooks = AbilityHooks {
    on_entry: None,
    on_stat_lowered: None,
    on_damage_taken: None,
    on_knock_out: None,
    on_switch_out: None,
    on_end_of_turn: None,
    on_damage_dealt: None,
    on_damage_received: None,
    type_immunity: None,
    on_type_immunity: None,
    status_immunity: &[],
    full_status_immunity: false,
    acts_while_asleep: false,
    ignores_opponent_stages: false,
    doubles_stages: false,
    weather_speed: None,
    weather_immunity: None,
    stat_boost: None,
    locks_choice: false,
    boosts_resisted: false,
    crit: None,
    blocks_intimidate: false,
    blocks_stat_drops: false,
    reflects_stat_drops: false,
    blocks_flinch: false,
    blocks_taunt: false,
    status_priority_bonus: 0,
    always_hits: false,
    accuracy_multiplier: 1.0,
    evasion_weather: None,
    loafs: false,
    poison_confuses: false,
    keeps_item: false,
    bounces_status_moves: false,
};

static ABILITY_HOOKS: phf::Map<&'static str, AbilityHooks> = phf_map! {
    "intimidate" => AbilityHooks { on_entry: Some(intimidate), ..NO_HOOKS },
    "drizzle" => AbilityHooks { on_entry: Some(summon_rain), ..NO_HOOKS },
    "drought" => AbilityHooks { on_entry: Some(summon_sun), ..NO_HOOKS },
    "sand-stream" => AbilityHooks {
        on_entry: Some(summon_sandstorm),
        weather_immunity: Some(Weather::Sandstorm),
        ..NO_HOOKS
    },
    "snow-warning" => AbilityHooks {
        on_entry: Some(summon_hail),
        weather_immunity: Some(Weather::Hail),
        ..NO_HOOKS
    },
    "trace" => AbilityHooks { on_entry: Some(trace), ..NO_HOOKS },
    "defiant" => AbilityHooks { on_stat_lowered: Some(defiant), ..NO_HOOKS },
    "berserk" => AbilityHooks { on_damage_taken: Some(berserk), ..NO_HOOKS },
    "moxie" => AbilityHooks { on_knock_out: Some(moxie), ..NO_HOOKS },
    "regenerator" => AbilityHooks { on_switch_out: Some(regenerate), ..NO_HOOKS },
    "rain-dish" => AbilityHooks { on_end_of_turn: Some(rain_dish), ..NO_HOOKS },
    "well-baked-body" => AbilityHooks {
        type_immunity: Some(ElementType::Fire),
        on_type_immunity: Some(well_baked_body),
        ..NO_HOOKS
    },
    "levitate" => AbilityHooks { type_immunity: Some(ElementType::Ground), ..NO_HOOKS },
    "thick-fat" => AbilityHooks { on_damage_received: Some(thick_fat), ..NO_HOOKS },
    "water-bubble" => AbilityHooks {
        on_damage_dealt: Some(water_bubble_attack),
        on_damage_received: Some(water_bubble_defend),
        status_immunity: &[StatusKind::Burn],
        ..NO_HOOKS
    },
    "technician" => AbilityHooks { on_damage_dealt: Some(technician), ..NO_HOOKS },
    "iron-fist" => AbilityHooks { on_damage_dealt: Some(iron_fist), ..NO_HOOKS },
    "tinted-lens" => AbilityHooks { boosts_resisted: true, ..NO_HOOKS },
    "super-luck" => AbilityHooks { crit: Some(CritAbility::Boosted), ..NO_HOOKS },
    "merciless" => AbilityHooks { crit: Some(CritAbility::AlwaysVsPoisoned), ..NO_HOOKS },
    "battle-armor" => AbilityHooks { crit: Some(CritAbility::Immune), ..NO_HOOKS },
    "unaware" => AbilityHooks { ignores_opponent_stages: true, ..NO_HOOKS },
    "simple" => AbilityHooks { doubles_stages: true, ..NO_HOOKS },
    "swift-swim" => AbilityHooks { weather_speed: Some(Weather::Rain), ..NO_HOOKS },
    "chlorophyll" => AbilityHooks { weather_speed: Some(Weather::Sun), ..NO_HOOKS },
    "sand-rush" => AbilityHooks {
        weather_speed: Some(Weather::Sandstorm),
        weather_immunity: Some(Weather::Sandstorm),
        ..NO_HOOKS
    },
    "slush-rush" => AbilityHooks {
        weather_speed: Some(Weather::Hail),
        weather_immunity: Some(Weather::Hail),
        ..NO_HOOKS
    },
    "gorilla-tactics" => AbilityHooks {
        stat_boost: Some(StatBoost::one_and_a_half(Stat::Attack)),
        locks_choice: true,
        ..NO_HOOKS
    },
    "comatose" => AbilityHooks {
        full_status_immunity: true,
        acts_while_asleep: true,
        ..NO_HOOKS
    },
    "own-tempo" => AbilityHooks {
        status_immunity: &[StatusKind::Confusion],
        blocks_intimidate: true,
        ..NO_HOOKS
    },
    "oblivious" => AbilityHooks { blocks_intimidate: true, blocks_taunt: true, ..NO_HOOKS },
    "inner-focus" => AbilityHooks { blocks_intimidate: true, blocks_flinch: true, ..NO_HOOKS },
    "clear-body" => AbilityHooks { blocks_intimidate: true, blocks_stat_drops: true, ..NO_HOOKS },
    "insomnia" => AbilityHooks { status_immunity: &[StatusKind::Sleep], ..NO_HOOKS },
    "vital-spirit" => AbilityHooks { status_immunity: &[StatusKind::Sleep], ..NO_HOOKS },
    "mirror-armor" => AbilityHooks { reflects_stat_drops: true, ..NO_HOOKS },
    "prankster" => AbilityHooks { status_priority_bonus: 1, ..NO_HOOKS },
    "no-guard" => AbilityHooks { always_hits: true, ..NO_HOOKS },
    "compound-eyes" => AbilityHooks { accuracy_multiplier: 1.3, ..NO_HOOKS },
    "snow-cloak" => AbilityHooks {
        evasion_weather: Some(Weather::Hail),
        weather_immunity: Some(Weather::Hail),
        ..NO_HOOKS
    },
    "truant" => AbilityHooks { loafs: true, ..NO_HOOKS },
    "poison-puppeteer" => AbilityHooks { poison_confuses: true, ..NO_HOOKS },
    "sticky-hold" => AbilityHooks { keeps_item: true, ..NO_HOOKS },
    "magic-bounce" => AbilityHooks { bounces_status_moves: true, ..NO_HOOKS },
};

/// The hook row for an ability. Unknown ids get the empty row.
pub fn ability_hooks(id: AbilityId) -> &'static AbilityHooks {
    ABILITY_HOOKS.get(id.as_ref()).unwrap_or(&NO_HOOKS)
}

fn announce(state: &Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    let combatant = state.active(side)?;
    ctx.emit(BattleEvent::AbilityActivated {
        name: combatant.name.clone(),
        ability: combatant.ability,
    });
    Ok(())
}

// --- Entry hooks ---

/// Sets the weather for the configured number of turns and reports it.
pub fn start_weather(state: &mut Match, weather: Weather, ctx: &mut BattleContext) {
    state.field.set_weather(weather, ctx.rules.weather_turns);
    ctx.emit(BattleEvent::WeatherStarted { weather });
}

fn summon_weather(
    state: &mut Match,
    side: SideId,
    weather: Weather,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    announce(state, side, ctx)?;
    start_weather(state, weather, ctx);
    Ok(())
}

fn summon_rain(state: &mut Match, side: SideId, ctx: &mut BattleContext, _: EntryTrigger) -> BattleResult<()> {
    summon_weather(state, side, Weather::Rain, ctx)
}

fn summon_sun(state: &mut Match, side: SideId, ctx: &mut BattleContext, _: EntryTrigger) -> BattleResult<()> {
    summon_weather(state, side, Weather::Sun, ctx)
}

fn summon_sandstorm(state: &mut Match, side: SideId, ctx: &mut BattleContext, _: EntryTrigger) -> BattleResult<()> {
    summon_weather(state, side, Weather::Sandstorm, ctx)
}

fn summon_hail(state: &mut Match, side: SideId, ctx: &mut BattleContext, _: EntryTrigger) -> BattleResult<()> {
    summon_weather(state, side, Weather::Hail, ctx)
}

fn intimidate(
    state: &mut Match,
    side: SideId,
    ctx: &mut BattleContext,
    _: EntryTrigger,
) -> BattleResult<()> {
    let foe = side.opponent();
    let Some(target) = state.living_active(foe) else {
        return Ok(());
    };
    let (target_name, target_ability) = (target.name.clone(), target.ability);
    announce(state, side, ctx)?;

    if ability_hooks(target_ability).blocks_intimidate {
        ctx.emit(BattleEvent::StatDropBlocked {
            target: target_name,
            by: target_ability.display_name().to_string(),
        });
        return Ok(());
    }
    change_stage(state, foe, Stat::Attack, -1, Some(side), ctx)?;
    Ok(())
}

/// Copies the opponent's ability, then lets the copy fire once. A copied
/// trigger never copies again.
fn trace(
    state: &mut Match,
    side: SideId,
    ctx: &mut BattleContext,
    trigger: EntryTrigger,
) -> BattleResult<()> {
    if trigger == EntryTrigger::Copied {
        return Ok(());
    }
    let Some(target) = state.living_active(side.opponent()) else {
        return Ok(());
    };
    let (from, copied) = (target.name.clone(), target.ability);
    if !copied.is_copyable() {
        return Ok(());
    }

    let tracer = state.active_mut(side)?;
    tracer.ability = copied;
    let name = tracer.name.clone();
    ctx.emit(BattleEvent::AbilityCopied {
        name,
        from,
        ability: copied,
    });
    entry::trigger_entry_ability(state, side, ctx, EntryTrigger::Copied)
}

// --- Reactive hooks ---

fn defiant(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    announce(state, side, ctx)?;
    change_stage(state, side, Stat::Attack, 2, Some(side), ctx)?;
    Ok(())
}

fn berserk(
    state: &mut Match,
    side: SideId,
    hp_before: u16,
    ctx: &mut BattleContext,
) -> BattleResult<()> {
    let combatant = state.active(side)?;
    let half = combatant.max_hp() / 2;
    if combatant.is_fainted() || hp_before <= half || combatant.current_hp > half {
        return Ok(());
    }
    announce(state, side, ctx)?;
    change_stage(state, side, Stat::SpAttack, 1, Some(side), ctx)?;
    Ok(())
}

fn moxie(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    if state.living_active(side).is_none() {
        return Ok(());
    }
    announce(state, side, ctx)?;
    change_stage(state, side, Stat::Attack, 1, Some(side), ctx)?;
    Ok(())
}

fn regenerate(combatant: &mut Combatant) -> Option<BattleEvent> {
    if combatant.is_fainted() {
        return None;
    }
    let amount = combatant.heal(combatant.max_hp() / 3);
    (amount > 0).then(|| BattleEvent::Healed {
        target: combatant.name.clone(),
        amount,
        cause: HealCause::Ability(AbilityId::Regenerator),
    })
}

fn rain_dish(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    if !state.field.weather_is(Weather::Rain) {
        return Ok(());
    }
    let combatant = state.active_mut(side)?;
    if combatant.is_heal_blocked() {
        return Ok(());
    }
    let amount = combatant.heal(combatant.fraction_of_max(16));
    if amount > 0 {
        ctx.emit(BattleEvent::Healed {
            target: combatant.name.clone(),
            amount,
            cause: HealCause::Ability(AbilityId::RainDish),
        });
    }
    Ok(())
}

fn well_baked_body(state: &mut Match, side: SideId, ctx: &mut BattleContext) -> BattleResult<()> {
    announce(state, side, ctx)?;
    change_stage(state, side, Stat::Defense, 2, Some(side), ctx)?;
    Ok(())
}

// --- Damage modifiers ---

fn thick_fat(move_data: &MoveData, _: &Combatant) -> f64 {
    match move_data.move_type {
        ElementType::Fire | ElementType::Ice => 0.5,
        _ => 1.0,
    }
}

fn water_bubble_attack(move_data: &MoveData, _: &Combatant) -> f64 {
    if move_data.move_type == ElementType::Water {
        2.0
    } else {
        1.0
    }
}

fn water_bubble_defend(move_data: &MoveData, _: &Combatant) -> f64 {
    if move_data.move_type == ElementType::Fire {
        0.5
    } else {
        1.0
    }
}

fn technician(move_data: &MoveData, _: &Combatant) -> f64 {
    match move_data.power {
        Some(power) if power <= 60 => 1.5,
        _ => 1.0,
    }
}

fn iron_fist(move_data: &MoveData, _: &Combatant) -> f64 {
    if move_data.flags.punch {
        1.2
    } else {
        1.0
    }
}
