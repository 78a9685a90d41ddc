use crate::dex::Dex;
use crate::errors::{BattleResult, DataError};
use schema::{
    AbilityId, BaseStats, ElementType, ItemId, SemiInvulnerable, Stat, StatusKind,
};
use serde::{Deserialize, Serialize};

/// Persistent major status. At most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorStatus {
    Sleep,
    Freeze,
    Paralysis,
    Burn,
    Poison,
    BadPoison,
}

impl MajorStatus {
    pub fn from_kind(kind: StatusKind) -> Option<Self> {
        match kind {
            StatusKind::Sleep => Some(MajorStatus::Sleep),
            StatusKind::Freeze => Some(MajorStatus::Freeze),
            StatusKind::Paralysis => Some(MajorStatus::Paralysis),
            StatusKind::Burn => Some(MajorStatus::Burn),
            StatusKind::Poison => Some(MajorStatus::Poison),
            StatusKind::BadPoison => Some(MajorStatus::BadPoison),
            StatusKind::Confusion => None,
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            MajorStatus::Sleep => StatusKind::Sleep,
            MajorStatus::Freeze => StatusKind::Freeze,
            MajorStatus::Paralysis => StatusKind::Paralysis,
            MajorStatus::Burn => StatusKind::Burn,
            MajorStatus::Poison => StatusKind::Poison,
            MajorStatus::BadPoison => StatusKind::BadPoison,
        }
    }

    pub fn is_poison(&self) -> bool {
        matches!(self, MajorStatus::Poison | MajorStatus::BadPoison)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub sp_attack: i8,
    pub sp_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub const MIN: i8 = -6;
    pub const MAX: i8 = 6;

    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpAttack => self.sp_attack,
            Stat::SpDefense => self.sp_defense,
            Stat::Speed => self.speed,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut i8 {
        match stat {
            Stat::Attack => &mut self.attack,
            Stat::Defense => &mut self.defense,
            Stat::SpAttack => &mut self.sp_attack,
            Stat::SpDefense => &mut self.sp_defense,
            Stat::Speed => &mut self.speed,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Evasion => &mut self.evasion,
        }
    }

    /// Moves a stage by `delta`, clamped to [-6, 6]. Returns the change that
    /// actually took place.
    pub fn shift(&mut self, stat: Stat, delta: i8) -> i8 {
        let slot = self.slot(stat);
        let before = *slot;
        *slot = (before + delta).clamp(Self::MIN, Self::MAX);
        *slot - before
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encore {
    pub move_name: String,
    pub turns: u8,
}

/// A two-turn move between its charge turn and its strike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charging {
    pub move_name: String,
    pub semi_invulnerable: Option<SemiInvulnerable>,
}

/// Transient state that lives only while the combatant is on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volatiles {
    pub confusion_turns: u8,
    pub leech_seed: bool,
    pub taunt_turns: u8,
    pub encore: Option<Encore>,
    pub substitute_hp: u16,
    pub protect_streak: u8,
    pub protected: bool,
    pub charging: Option<Charging>,
    pub must_recharge: bool,
    pub choice_locked: Option<String>,
    pub perish_count: u8,
    pub drowsy_turns: u8,
    pub turns_on_field: u32,
    pub charged: bool,
    pub defense_curl: bool,
    pub destiny_bond: bool,
    pub roosted: bool,
    pub heal_block_turns: u8,
    pub flinched: bool,
    pub truant_loafing: bool,
    pub last_move: Option<String>,
}

impl Volatiles {
    pub fn is_confused(&self) -> bool {
        self.confusion_turns > 0
    }

    pub fn has_substitute(&self) -> bool {
        self.substitute_hp > 0
    }

    pub fn semi_invulnerable(&self) -> Option<SemiInvulnerable> {
        self.charging.as_ref().and_then(|c| c.semi_invulnerable)
    }
}

/// One creature with its mutable battle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species_id: String,
    pub name: String,
    pub types: Vec<ElementType>,
    pub original_types: Vec<ElementType>,
    pub stats: BaseStats,
    pub current_hp: u16,
    pub stages: StatStages,
    pub status: Option<MajorStatus>,
    pub sleep_turns: u8,
    pub bad_poison_counter: u8,
    pub volatiles: Volatiles,
    pub ability: AbilityId,
    pub base_ability: AbilityId,
    pub item: Option<ItemId>,
    pub original_item: Option<ItemId>,
    pub moves: Vec<String>,
    pub last_move_failed: bool,
    pub faint_announced: bool,
}

impl Combatant {
    /// Builds a combatant from a species row, checking every reference against
    /// the repository.
    pub fn from_species(
        dex: &dyn Dex,
        species_id: &str,
        ability: AbilityId,
        item: Option<ItemId>,
        moves: &[&str],
    ) -> BattleResult<Self> {
        let species = dex.species(species_id)?;
        if !species.can_have_ability(ability) {
            return Err(DataError::AbilityNotAllowed {
                species: species.id.clone(),
                ability: ability.as_ref().to_string(),
            }
            .into());
        }
        if let Some(item) = item {
            dex.item(item)?;
        }
        for name in moves {
            dex.move_data(name)?;
        }

        let mut combatant = Self {
            species_id: species.id.clone(),
            name: species.name.clone(),
            types: species.types.clone(),
            original_types: species.types.clone(),
            stats: species.base_stats,
            current_hp: species.base_stats.hp,
            stages: StatStages::default(),
            status: None,
            sleep_turns: 0,
            bad_poison_counter: 0,
            volatiles: Volatiles::default(),
            ability,
            base_ability: ability,
            item,
            original_item: item,
            moves: moves.iter().map(|m| m.to_string()).collect(),
            last_move_failed: false,
            faint_announced: false,
        };
        combatant.apply_innate_status();
        Ok(combatant)
    }

    fn apply_innate_status(&mut self) {
        if self.ability == AbilityId::Comatose {
            self.status = Some(MajorStatus::Sleep);
            self.sleep_turns = 0;
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.current_hp == self.max_hp()
    }

    /// `max_hp / divisor`, never below 1.
    pub fn fraction_of_max(&self, divisor: u16) -> u16 {
        (self.max_hp() / divisor.max(1)).max(1)
    }

    pub fn raw_stat(&self, stat: Stat) -> u32 {
        let value = match stat {
            Stat::Attack => self.stats.atk,
            Stat::Defense => self.stats.def,
            Stat::SpAttack => self.stats.spa,
            Stat::SpDefense => self.stats.spd,
            Stat::Speed => self.stats.spe,
            Stat::Accuracy | Stat::Evasion => 1,
        };
        u32::from(value)
    }

    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }

    /// Touches the ground: not Flying, not levitating, not airborne mid-move.
    pub fn is_grounded(&self) -> bool {
        !self.has_type(ElementType::Flying)
            && self.ability != AbilityId::Levitate
            && self.volatiles.semi_invulnerable() != Some(SemiInvulnerable::Airborne)
    }

    pub fn knows_move(&self, move_name: &str) -> bool {
        self.moves.iter().any(|m| m == move_name)
    }

    /// Subtracts HP and returns the amount actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Adds HP up to the maximum and returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let restored = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += restored;
        restored
    }

    pub fn is_heal_blocked(&self) -> bool {
        self.volatiles.heal_block_turns > 0
    }

    /// Wipes everything that does not survive leaving the field.
    pub fn clear_on_switch_out(&mut self) {
        self.volatiles = Volatiles::default();
        self.stages.clear();
        self.types = self.original_types.clone();
        self.ability = self.base_ability;
        self.bad_poison_counter = 0;
        self.last_move_failed = false;
    }

    /// Full restore used when the players return to the lobby.
    pub fn reset_for_lobby(&mut self) {
        self.clear_on_switch_out();
        self.current_hp = self.max_hp();
        self.status = None;
        self.sleep_turns = 0;
        self.item = self.original_item;
        self.faint_announced = false;
        self.apply_innate_status();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::StaticDex;
    use pretty_assertions::assert_eq;

    fn bundled() -> StaticDex {
        StaticDex::bundled().expect("bundled tables parse")
    }

    #[test]
    fn test_stage_shift_reports_the_real_change() {
        let mut stages = StatStages::default();
        assert_eq!(stages.shift(Stat::Attack, 4), 4);
        assert_eq!(stages.shift(Stat::Attack, 4), 2);
        assert_eq!(stages.get(Stat::Attack), 6);
        assert_eq!(stages.shift(Stat::Speed, -9), -6);
    }

    #[test]
    fn test_unknown_move_is_rejected_at_build_time() {
        let dex = bundled();
        let result = Combatant::from_species(&dex, "embercub", AbilityId::Drought, None, &["Nope"]);
        assert!(matches!(
            result,
            Err(crate::errors::BattleError::Data(DataError::MoveNotFound(_)))
        ));
    }

    #[test]
    fn test_ability_must_belong_to_species() {
        let dex = bundled();
        let result =
            Combatant::from_species(&dex, "embercub", AbilityId::Levitate, None, &["Tackle"]);
        assert!(matches!(
            result,
            Err(crate::errors::BattleError::Data(DataError::AbilityNotAllowed { .. }))
        ));
    }

    #[test]
    fn test_comatose_starts_asleep_and_survives_lobby_reset() {
        let dex = bundled();
        let mut sloth =
            Combatant::from_species(&dex, "drowsloth", AbilityId::Comatose, None, &["Tackle"])
                .unwrap();
        assert_eq!(sloth.status, Some(MajorStatus::Sleep));
        sloth.take_damage(40);
        sloth.reset_for_lobby();
        assert_eq!(sloth.status, Some(MajorStatus::Sleep));
        assert!(sloth.is_full_hp());
    }

    #[test]
    fn test_lobby_reset_restores_everything() {
        let dex = bundled();
        let mut cub = Combatant::from_species(
            &dex,
            "embercub",
            AbilityId::Drought,
            Some(ItemId::SitrusBerry),
            &["Tackle"],
        )
        .unwrap();
        cub.take_damage(500);
        cub.status = Some(MajorStatus::Burn);
        cub.stages.shift(Stat::Attack, 2);
        cub.volatiles.leech_seed = true;
        cub.item = None;
        cub.faint_announced = true;

        cub.reset_for_lobby();

        assert_eq!(cub.current_hp, cub.max_hp());
        assert_eq!(cub.status, None);
        assert_eq!(cub.stages, StatStages::default());
        assert_eq!(cub.volatiles, Volatiles::default());
        assert_eq!(cub.item, Some(ItemId::SitrusBerry));
        assert!(!cub.faint_announced);
    }

    #[test]
    fn test_damage_and_heal_are_clamped() {
        let dex = bundled();
        let mut cub =
            Combatant::from_species(&dex, "embercub", AbilityId::Drought, None, &["Tackle"])
                .unwrap();
        assert_eq!(cub.take_damage(30), 30);
        assert_eq!(cub.heal(100), 30);
        assert_eq!(cub.take_damage(1000), cub.max_hp());
        assert!(cub.is_fainted());
    }
}
