use crate::battle::abilities::ability_hooks;
use crate::battle::context::BattleContext;
use crate::battle::events::BattleEvent;
use crate::battle::items::item_hooks;
use crate::battle::state::Match;
use crate::combatant::{Combatant, MajorStatus, StatStages};
use crate::errors::BattleResult;
use crate::side::SideId;
use schema::{AbilityId, ElementType, MoveData, Stat, Weather};

/// A flat `numerator / denominator` boost to one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBoost {
    pub stat: Stat,
    pub numerator: u32,
    pub denominator: u32,
}

impl StatBoost {
    pub const fn one_and_a_half(stat: Stat) -> Self {
        Self {
            stat,
            numerator: 3,
            denominator: 2,
        }
    }
}

/// `(2 + stage) / 2` when non-negative, `2 / (2 + |stage|)` otherwise.
pub fn stage_ratio(stage: i8) -> (u32, u32) {
    let magnitude = u32::from(stage.unsigned_abs());
    if stage >= 0 {
        (2 + magnitude, 2)
    } else {
        (2, 2 + magnitude)
    }
}

pub fn apply_stage(base: u32, stage: i8) -> u32 {
    let (numerator, denominator) = stage_ratio(stage);
    base * numerator / denominator
}

/// The stat a combatant actually fights with.
///
/// Every multiplier floors before the next one applies. The stage is ignored
/// entirely when the opponent's ability disregards stat changes (unless the
/// holder's item protects them) and doubled when the holder's own ability
/// amplifies stage changes.
pub fn effective_stat(
    combatant: &Combatant,
    stat: Stat,
    stage: i8,
    opponent_ability: Option<AbilityId>,
    tailwind: bool,
    weather: Option<Weather>,
) -> u32 {
    let own = ability_hooks(combatant.ability);
    let item = combatant.item.map(item_hooks);

    let mut stage = stage.clamp(StatStages::MIN, StatStages::MAX);
    let stages_protected = item.is_some_and(|h| h.protects_stages);
    if opponent_ability.is_some_and(|a| ability_hooks(a).ignores_opponent_stages)
        && !stages_protected
    {
        stage = 0;
    }
    if own.doubles_stages {
        stage = (stage * 2).clamp(StatStages::MIN, StatStages::MAX);
    }

    let mut value = apply_stage(combatant.raw_stat(stat), stage);

    if stat == Stat::Speed && combatant.status == Some(MajorStatus::Paralysis) {
        value /= 2;
    }
    if stat == Stat::Speed && tailwind {
        value *= 2;
    }
    if stat == Stat::SpDefense
        && weather == Some(Weather::Sandstorm)
        && combatant.has_type(ElementType::Rock)
    {
        value = value * 3 / 2;
    }
    if stat == Stat::Speed && weather.is_some() && own.weather_speed == weather {
        value *= 2;
    }
    if let Some(boost) = item.and_then(|h| h.stat_boost) {
        if boost.stat == stat {
            value = value * boost.numerator / boost.denominator;
        }
    }
    if let Some(boost) = own.stat_boost {
        if boost.stat == stat {
            value = value * boost.numerator / boost.denominator;
        }
    }
    value
}

/// Speed of a side's active combatant with its side's tailwind and the weather.
pub fn active_speed(state: &Match, side: SideId) -> BattleResult<u32> {
    let combatant = state.active(side)?;
    Ok(effective_stat(
        combatant,
        Stat::Speed,
        combatant.stages.get(Stat::Speed),
        None,
        state.side(side).tailwind > 0,
        state.field.weather,
    ))
}

/// Moves a stage and reports it, applying stat-drop protection, reflection and
/// stat-reactive abilities. `source` is the side responsible for the change.
/// Returns the change that actually happened.
pub fn change_stage(
    state: &mut Match,
    target: SideId,
    stat: Stat,
    delta: i8,
    source: Option<SideId>,
    ctx: &mut BattleContext,
) -> BattleResult<i8> {
    let combatant = state.active(target)?;
    if combatant.is_fainted() || delta == 0 {
        return Ok(0);
    }
    let name = combatant.name.clone();
    let ability = combatant.ability;
    let hooks = ability_hooks(ability);
    let by_opponent = source.is_some_and(|s| s != target);

    if delta < 0 && by_opponent {
        if let Some(item) = combatant.item.filter(|&i| item_hooks(i).blocks_stat_drops) {
            ctx.emit(BattleEvent::StatDropBlocked {
                target: name,
                by: item.display_name().to_string(),
            });
            return Ok(0);
        }
        if hooks.blocks_stat_drops {
            ctx.emit(BattleEvent::StatDropBlocked {
                target: name,
                by: ability.display_name().to_string(),
            });
            return Ok(0);
        }
        if hooks.reflects_stat_drops {
            ctx.emit(BattleEvent::AbilityActivated { name, ability });
            if let Some(origin) = source {
                // Reflected drops carry no source, so they cannot bounce back again.
                change_stage(state, origin, stat, delta, None, ctx)?;
            }
            return Ok(0);
        }
    }

    let combatant = state.active_mut(target)?;
    let actual = combatant.stages.shift(stat, delta);
    if actual == 0 {
        ctx.emit(BattleEvent::StatUnchanged {
            target: name,
            stat,
            rising: delta > 0,
        });
        return Ok(0);
    }
    ctx.emit(BattleEvent::StatChanged {
        target: name,
        stat,
        delta: actual,
    });

    if actual < 0 && by_opponent {
        if let Some(hook) = hooks.on_stat_lowered {
            hook(state, target, ctx)?;
        }
    }
    Ok(actual)
}

/// Accuracy/evasion stage ratio on the thirds scale.
fn accuracy_ratio(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(StatStages::MIN, StatStages::MAX));
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}

/// Hit check for a move aimed at the opponent's active combatant.
pub fn move_hits(
    state: &Match,
    attacker_side: SideId,
    move_data: &MoveData,
    ctx: &mut BattleContext,
) -> BattleResult<bool> {
    let attacker = state.active(attacker_side)?;
    let defender = state.active(attacker_side.opponent())?;
    let attacker_hooks = ability_hooks(attacker.ability);
    let defender_hooks = ability_hooks(defender.ability);
    let no_guard = attacker_hooks.always_hits || defender_hooks.always_hits;

    if defender.volatiles.semi_invulnerable().is_some() {
        return Ok(no_guard);
    }
    if no_guard {
        return Ok(true);
    }
    if move_data
        .effect
        .certain_in
        .is_some_and(|w| state.field.weather_is(w))
    {
        return Ok(true);
    }
    let Some(base_accuracy) = move_data.accuracy else {
        return Ok(true);
    };

    let stage = attacker.stages.get(Stat::Accuracy) - defender.stages.get(Stat::Evasion);
    let mut accuracy = f64::from(base_accuracy) * accuracy_ratio(stage);
    if let Some(item) = attacker.item {
        accuracy *= item_hooks(item).accuracy_multiplier;
    }
    accuracy *= attacker_hooks.accuracy_multiplier;
    if defender_hooks
        .evasion_weather
        .is_some_and(|w| state.field.weather_is(w))
    {
        accuracy *= 0.8;
    }

    let threshold = accuracy.floor() as u32;
    let roll = ctx.rng.percent(&format!("accuracy of {}", move_data.name))?;
    Ok(roll <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatantBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::ItemId;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 150)]
    #[case(2, 200)]
    #[case(6, 400)]
    #[case(-1, 66)]
    #[case(-2, 50)]
    #[case(-6, 25)]
    fn test_stage_multiplier(#[case] stage: i8, #[case] expected: u32) {
        assert_eq!(apply_stage(100, stage), expected);
    }

    #[test]
    fn test_effective_stat_is_monotonic_in_stage() {
        let combatant = TestCombatantBuilder::new("granitusk").build();
        for stat in [Stat::Attack, Stat::Defense, Stat::Speed, Stat::SpDefense] {
            let mut previous = 0;
            for stage in -6..=6 {
                let value = effective_stat(&combatant, stat, stage, None, false, None);
                assert!(value >= previous, "{stat} dropped at stage {stage}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_paralysis_halves_then_tailwind_doubles() {
        let fast = TestCombatantBuilder::new("frostfang")
            .with_status(MajorStatus::Paralysis)
            .build();
        assert_eq!(effective_stat(&fast, Stat::Speed, 0, None, false, None), 57);
        assert_eq!(effective_stat(&fast, Stat::Speed, 0, None, true, None), 114);
    }

    #[test]
    fn test_unaware_opponent_ignores_stages_unless_shielded() {
        let boosted = TestCombatantBuilder::new("galeclaw").build();
        let ignored = effective_stat(
            &boosted,
            Stat::Attack,
            2,
            Some(AbilityId::Unaware),
            false,
            None,
        );
        assert_eq!(ignored, 100);

        let shielded = TestCombatantBuilder::new("galeclaw")
            .with_item(ItemId::AbilityShield)
            .build();
        let kept = effective_stat(
            &shielded,
            Stat::Attack,
            2,
            Some(AbilityId::Unaware),
            false,
            None,
        );
        assert_eq!(kept, 200);
    }

    #[test]
    fn test_simple_doubles_and_clamps_stages() {
        let simple = TestCombatantBuilder::new("drowsloth")
            .with_ability(AbilityId::Simple)
            .build();
        assert_eq!(effective_stat(&simple, Stat::Attack, 1, None, false, None), 200);
        assert_eq!(effective_stat(&simple, Stat::Attack, 4, None, false, None), 400);
    }

    #[rstest]
    #[case("tidalisk", AbilityId::SwiftSwim, Weather::Rain, 150)]
    #[case("thornback", AbilityId::Chlorophyll, Weather::Sun, 224)]
    #[case("granitusk", AbilityId::SandRush, Weather::Sandstorm, 134)]
    #[case("frostfang", AbilityId::SlushRush, Weather::Hail, 230)]
    fn test_weather_speed_abilities(
        #[case] species: &str,
        #[case] ability: AbilityId,
        #[case] weather: Weather,
        #[case] expected: u32,
    ) {
        let combatant = TestCombatantBuilder::new(species).with_ability(ability).build();
        assert_eq!(
            effective_stat(&combatant, Stat::Speed, 0, None, false, Some(weather)),
            expected
        );
    }

    #[test]
    fn test_sandstorm_boosts_rock_special_defense() {
        let rock = TestCombatantBuilder::new("granitusk").build();
        assert_eq!(
            effective_stat(&rock, Stat::SpDefense, 0, None, false, Some(Weather::Sandstorm)),
            132
        );
    }

    #[test]
    fn test_item_and_ability_boosts() {
        let scarfed = TestCombatantBuilder::new("ironbulk")
            .with_item(ItemId::ChoiceScarf)
            .build();
        assert_eq!(effective_stat(&scarfed, Stat::Speed, 0, None, false, None), 67);

        let vested = TestCombatantBuilder::new("ironbulk")
            .with_item(ItemId::AssaultVest)
            .build();
        assert_eq!(effective_stat(&vested, Stat::SpDefense, 0, None, false, None), 120);

        let tactician = TestCombatantBuilder::new("ironbulk")
            .with_ability(AbilityId::GorillaTactics)
            .build();
        assert_eq!(effective_stat(&tactician, Stat::Attack, 0, None, false, None), 180);
    }
}
