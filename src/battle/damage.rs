use crate::battle::abilities::{ability_hooks, CritAbility};
use crate::battle::context::BattleContext;
use crate::battle::items::item_hooks;
use crate::battle::state::{Field, Match};
use crate::battle::stats::effective_stat;
use crate::combatant::{Combatant, MajorStatus};
use crate::errors::BattleResult;
use crate::side::{Screens, SideId};
use schema::{
    effectiveness, ElementType, MoveBehavior, MoveCategory, MoveData, Stat, Terrain, Weather,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub effectiveness: f64,
    pub critical: bool,
    pub immune: bool,
}

impl DamageOutcome {
    fn immune() -> Self {
        Self {
            damage: 0,
            effectiveness: 0.0,
            critical: false,
            immune: true,
        }
    }
}

/// Everything the modifier pipeline reads about one attack.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub defender_screens: Screens,
    pub field: &'a Field,
}

impl<'a> Matchup<'a> {
    pub fn from_state(state: &'a Match, attacker_side: SideId) -> BattleResult<Self> {
        let defender_side = attacker_side.opponent();
        Ok(Self {
            attacker: state.active(attacker_side)?,
            defender: state.active(defender_side)?,
            defender_screens: state.side(defender_side).screens,
            field: &state.field,
        })
    }
}

/// Product of every pipeline step plus the running type effectiveness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    pub total: f64,
    pub effectiveness: f64,
}

/// `floor(floor(level_factor * power * attack / defense) / 50) + 2`
pub fn base_damage(level_factor: u32, power: u32, attack: u32, defense: u32) -> u32 {
    level_factor * power * attack / defense.max(1) / 50 + 2
}

/// Applies the modifier total and the random roll, flooring after each, and
/// never returns less than 1.
pub fn final_damage(base: u32, total: f64, roll_percent: u32) -> u32 {
    let scaled = (f64::from(base) * total).floor() as u32;
    (scaled * roll_percent / 100).max(1)
}

/// The defender is untouchable by this move's type, either through its
/// ability or through the chart.
pub fn is_immune(matchup: &Matchup, move_data: &MoveData) -> bool {
    let hooks = ability_hooks(matchup.defender.ability);
    hooks.type_immunity == Some(move_data.move_type)
        || effectiveness(move_data.move_type, &matchup.defender.types) == 0.0
}

/// Critical-hit chance as `(numerator, denominator)`.
pub fn crit_rate(attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> (u32, u32) {
    if ability_hooks(defender.ability).crit == Some(CritAbility::Immune) {
        return (0, 1);
    }
    let mut rate = (1, 24);
    match ability_hooks(attacker.ability).crit {
        Some(CritAbility::Boosted) => rate = (1, 8),
        Some(CritAbility::AlwaysVsPoisoned)
            if defender.status.is_some_and(|s| s.is_poison()) =>
        {
            rate = (1, 1)
        }
        _ => {}
    }
    if move_data.effect.high_crit {
        rate = (1, 8);
    }
    rate
}

fn roll_critical(matchup: &Matchup, move_data: &MoveData, ctx: &mut BattleContext) -> BattleResult<bool> {
    match crit_rate(matchup.attacker, matchup.defender, move_data) {
        (0, _) => Ok(false),
        (n, d) if n >= d => Ok(true),
        (n, d) => ctx.rng.chance(n, d, &format!("critical hit for {}", move_data.name)),
    }
}

fn weather_modifier(weather: Option<Weather>, move_type: ElementType) -> f64 {
    match (weather, move_type) {
        (Some(Weather::Sun), ElementType::Fire) | (Some(Weather::Rain), ElementType::Water) => 1.5,
        (Some(Weather::Sun), ElementType::Water) | (Some(Weather::Rain), ElementType::Fire) => 0.5,
        _ => 1.0,
    }
}

fn terrain_boosts(terrain: Option<Terrain>, move_type: ElementType) -> bool {
    matches!(
        (terrain, move_type),
        (Some(Terrain::Electric), ElementType::Electric)
            | (Some(Terrain::Grassy), ElementType::Grass)
            | (Some(Terrain::Psychic), ElementType::Psychic)
    )
}

fn screen_applies(screens: Screens, category: MoveCategory) -> bool {
    screens.aurora_veil > 0
        || match category {
            MoveCategory::Physical => screens.reflect > 0,
            MoveCategory::Special => screens.light_screen > 0,
            MoveCategory::Status => false,
        }
}

/// The ordered multiplier chain. A type immunity zeroes the total and stops.
pub fn modifier_pipeline(matchup: &Matchup, move_data: &MoveData, critical: bool) -> Modifiers {
    let attacker = matchup.attacker;
    let defender = matchup.defender;
    let attacker_hooks = ability_hooks(attacker.ability);
    let defender_hooks = ability_hooks(defender.ability);
    let move_type = move_data.move_type;
    let mut total = 1.0;

    if attacker.has_type(move_type) {
        total *= 1.5;
    }
    if defender_hooks.type_immunity == Some(move_type) {
        return Modifiers {
            total: 0.0,
            effectiveness: 0.0,
        };
    }

    let type_effectiveness = effectiveness(move_type, &defender.types);
    total *= type_effectiveness;
    if type_effectiveness == 0.0 {
        return Modifiers {
            total: 0.0,
            effectiveness: 0.0,
        };
    }
    if attacker_hooks.boosts_resisted && type_effectiveness < 1.0 {
        total *= 2.0;
    }
    if critical {
        total *= 1.5;
    }

    let facade = move_data.behavior_is(MoveBehavior::Facade);
    if attacker.status == Some(MajorStatus::Burn)
        && move_data.category == MoveCategory::Physical
        && !facade
    {
        total *= 0.5;
    }
    if facade
        && matches!(
            attacker.status,
            Some(
                MajorStatus::Burn
                    | MajorStatus::Poison
                    | MajorStatus::BadPoison
                    | MajorStatus::Paralysis
            )
        )
    {
        total *= 2.0;
    }

    total *= weather_modifier(matchup.field.weather, move_type);

    if let Some(hook) = attacker_hooks.on_damage_dealt {
        total *= hook(move_data, attacker);
    }
    if let Some(hook) = defender_hooks.on_damage_received {
        total *= hook(move_data, defender);
    }
    if let Some(hook) = attacker.item.and_then(|i| item_hooks(i).on_damage_dealt) {
        total *= hook(move_data, type_effectiveness);
    }

    if move_data.behavior_is(MoveBehavior::KnockOff)
        && defender.item.is_some()
        && !defender_hooks.keeps_item
    {
        total *= 1.5;
    }

    if !critical
        && !move_data.behavior_is(MoveBehavior::ScreenBreaker)
        && screen_applies(matchup.defender_screens, move_data.category)
    {
        total *= 0.5;
    }

    if attacker.volatiles.charged && move_type == ElementType::Electric {
        total *= 2.0;
    }
    if attacker.is_grounded() && terrain_boosts(matchup.field.terrain, move_type) {
        total *= 1.3;
    }
    if move_data.behavior_is(MoveBehavior::CurlBoosted) && attacker.volatiles.defense_curl {
        total *= 2.0;
    }
    if move_data.behavior_is(MoveBehavior::Retaliate) && attacker.last_move_failed {
        total *= 2.0;
    }

    Modifiers {
        total,
        effectiveness: type_effectiveness,
    }
}

fn attacking_stats(category: MoveCategory) -> (Stat, Stat) {
    match category {
        MoveCategory::Special => (Stat::SpAttack, Stat::SpDefense),
        _ => (Stat::Attack, Stat::Defense),
    }
}

/// Full damage calculation for the attacker's move against the opposing
/// active combatant. Draws the critical roll and the damage roll.
pub fn calculate_damage(
    state: &Match,
    attacker_side: SideId,
    move_data: &MoveData,
    ctx: &mut BattleContext,
) -> BattleResult<DamageOutcome> {
    let Some(power) = move_data.power.filter(|_| move_data.is_damaging()) else {
        return Ok(DamageOutcome {
            damage: 0,
            effectiveness: 1.0,
            critical: false,
            immune: false,
        });
    };
    let matchup = Matchup::from_state(state, attacker_side)?;
    if is_immune(&matchup, move_data) {
        return Ok(DamageOutcome::immune());
    }

    let critical = roll_critical(&matchup, move_data, ctx)?;
    let modifiers = modifier_pipeline(&matchup, move_data, critical);

    let (attack_stat, defense_stat) = attacking_stats(move_data.category);
    let attacker = matchup.attacker;
    let defender = matchup.defender;
    let weather = state.field.weather;
    let attack = effective_stat(
        attacker,
        attack_stat,
        attacker.stages.get(attack_stat),
        Some(defender.ability),
        false,
        weather,
    );
    let defense = effective_stat(
        defender,
        defense_stat,
        defender.stages.get(defense_stat),
        Some(attacker.ability),
        false,
        weather,
    );

    let base = base_damage(ctx.rules.level_factor(), u32::from(power), attack, defense);
    let roll = ctx.rng.damage_roll(&format!("damage roll for {}", move_data.name))?;
    let damage = final_damage(base, modifiers.total, roll);
    log::debug!(
        "{} -> {}: base {} x {:.3} at {}% = {}",
        attacker.name,
        defender.name,
        base,
        modifiers.total,
        roll,
        damage
    );

    Ok(DamageOutcome {
        damage: u16::try_from(damage).unwrap_or(u16::MAX),
        effectiveness: modifiers.effectiveness,
        critical,
        immune: false,
    })
}
