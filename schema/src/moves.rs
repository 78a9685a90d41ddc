use crate::element_types::ElementType;
use crate::field::{Terrain, Weather};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Stats that carry a stage in battle. Hp never does.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Stat {
    #[strum(to_string = "Attack")]
    Attack,
    #[strum(to_string = "Defense")]
    Defense,
    #[strum(to_string = "Sp. Atk")]
    SpAttack,
    #[strum(to_string = "Sp. Def")]
    SpDefense,
    #[strum(to_string = "Speed")]
    Speed,
    #[strum(to_string = "accuracy")]
    Accuracy,
    #[strum(to_string = "evasiveness")]
    Evasion,
}

/// Major statuses plus confusion, the one volatile that status moves can inflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StatusKind {
    #[strum(to_string = "sleep")]
    Sleep,
    #[strum(to_string = "freeze")]
    Freeze,
    #[strum(to_string = "paralysis")]
    Paralysis,
    #[strum(to_string = "burn")]
    Burn,
    #[strum(to_string = "poison")]
    Poison,
    #[strum(to_string = "bad poison")]
    BadPoison,
    #[strum(to_string = "confusion")]
    Confusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveTarget {
    #[default]
    Opponent,
    User,
    OpponentSide,
    UserSide,
    Field,
}

/// Who a secondary effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EffectTarget {
    #[default]
    Opponent,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveFlags {
    pub contact: bool,
    pub breaks_protect: bool,
    pub punch: bool,
    pub sound: bool,
}

fn always() -> u8 {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: Stat,
    pub stages: i8,
    #[serde(default = "always")]
    pub chance: u8,
    #[serde(default)]
    pub target: EffectTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAilment {
    pub kind: StatusKind,
    #[serde(default = "always")]
    pub chance: u8,
    #[serde(default)]
    pub target: EffectTarget,
    /// Applied at the end of the next turn instead of immediately (yawn).
    #[serde(default)]
    pub delayed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recovery {
    /// Heal this percentage of max HP.
    Percent(u8),
    /// Half in clear skies, two thirds in sun, a quarter in any other weather.
    WeatherDependent,
    /// Heal this percentage of the damage dealt.
    Drain(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemiInvulnerable {
    Underground,
    Airborne,
    Vanished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldEffect {
    StealthRock,
    Spikes,
    ToxicSpikes,
    StickyWeb,
    Reflect,
    LightScreen,
    AuroraVeil,
    Tailwind,
    Terrain(Terrain),
    Haze,
}

/// Named behaviours that do not fit the generic effect fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveBehavior {
    Protect,
    Substitute,
    PerishSong,
    LeechSeed,
    Taunt,
    Encore,
    Trick,
    KnockOff,
    ScreenBreaker,
    Charge,
    DefenseCurl,
    CurlBoosted,
    DestinyBond,
    Roost,
    HealBlock,
    Rest,
    SleepTalk,
    Facade,
    Retaliate,
    SuckerPunch,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveEffect {
    /// Percentage of damage dealt taken back as recoil.
    pub recoil: Option<u8>,
    /// Lose half of max HP when the move misses.
    pub crash: bool,
    pub stat_changes: Vec<StatChange>,
    pub ailment: Option<StatusAilment>,
    pub flinch: u8,
    pub high_crit: bool,
    pub field: Option<FieldEffect>,
    pub recovery: Option<Recovery>,
    pub weather: Option<Weather>,
    pub semi_invulnerable: Option<SemiInvulnerable>,
    pub charge_turn: bool,
    pub recharge: bool,
    pub switch_self: bool,
    pub pass_stats: bool,
    /// The move cannot miss while this weather is up.
    pub certain_in: Option<Weather>,
    pub behavior: Option<MoveBehavior>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: ElementType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: Option<u16>,
    /// `None` never misses.
    #[serde(default)]
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub target: MoveTarget,
    #[serde(default)]
    pub flags: MoveFlags,
    #[serde(default)]
    pub effect: MoveEffect,
}

impl MoveData {
    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }

    pub fn is_damaging(&self) -> bool {
        !self.is_status() && self.power.is_some_and(|power| power > 0)
    }

    pub fn behavior_is(&self, behavior: MoveBehavior) -> bool {
        self.effect.behavior == Some(behavior)
    }

    pub fn is_two_turn(&self) -> bool {
        self.effect.charge_turn || self.effect.semi_invulnerable.is_some()
    }
}
