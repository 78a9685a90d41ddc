use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumMessage, EnumString, IntoStaticStr};

/// Every ability the rules engine knows about. The kebab-case form is the
/// stable id used by the hook tables; the message is the display name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumMessage,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum AbilityId {
    #[strum(message = "Intimidate")]
    Intimidate,
    #[strum(message = "Drizzle")]
    Drizzle,
    #[strum(message = "Drought")]
    Drought,
    #[strum(message = "Sand Stream")]
    SandStream,
    #[strum(message = "Snow Warning")]
    SnowWarning,
    #[strum(message = "Trace")]
    Trace,
    #[strum(message = "Defiant")]
    Defiant,
    #[strum(message = "Berserk")]
    Berserk,
    #[strum(message = "Moxie")]
    Moxie,
    #[strum(message = "Regenerator")]
    Regenerator,
    #[strum(message = "Rain Dish")]
    RainDish,
    #[strum(message = "Well-Baked Body")]
    WellBakedBody,
    #[strum(message = "Levitate")]
    Levitate,
    #[strum(message = "Thick Fat")]
    ThickFat,
    #[strum(message = "Water Bubble")]
    WaterBubble,
    #[strum(message = "Technician")]
    Technician,
    #[strum(message = "Iron Fist")]
    IronFist,
    #[strum(message = "Tinted Lens")]
    TintedLens,
    #[strum(message = "Super Luck")]
    SuperLuck,
    #[strum(message = "Merciless")]
    Merciless,
    #[strum(message = "Battle Armor")]
    BattleArmor,
    #[strum(message = "Unaware")]
    Unaware,
    #[strum(message = "Simple")]
    Simple,
    #[strum(message = "Swift Swim")]
    SwiftSwim,
    #[strum(message = "Chlorophyll")]
    Chlorophyll,
    #[strum(message = "Sand Rush")]
    SandRush,
    #[strum(message = "Slush Rush")]
    SlushRush,
    #[strum(message = "Gorilla Tactics")]
    GorillaTactics,
    #[strum(message = "Comatose")]
    Comatose,
    #[strum(message = "Own Tempo")]
    OwnTempo,
    #[strum(message = "Oblivious")]
    Oblivious,
    #[strum(message = "Inner Focus")]
    InnerFocus,
    #[strum(message = "Clear Body")]
    ClearBody,
    #[strum(message = "Insomnia")]
    Insomnia,
    #[strum(message = "Vital Spirit")]
    VitalSpirit,
    #[strum(message = "Mirror Armor")]
    MirrorArmor,
    #[strum(message = "Prankster")]
    Prankster,
    #[strum(message = "No Guard")]
    NoGuard,
    #[strum(message = "Compound Eyes")]
    CompoundEyes,
    #[strum(message = "Snow Cloak")]
    SnowCloak,
    #[strum(message = "Truant")]
    Truant,
    #[strum(message = "Poison Puppeteer")]
    PoisonPuppeteer,
    #[strum(message = "Sticky Hold")]
    StickyHold,
    #[strum(message = "Magic Bounce")]
    MagicBounce,
}

impl AbilityId {
    pub fn display_name(&self) -> &'static str {
        self.get_message().unwrap_or("???")
    }

    /// Trace cannot pick these up.
    pub fn is_copyable(&self) -> bool {
        !matches!(self, AbilityId::Trace | AbilityId::Comatose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_ids_round_trip_through_kebab_case() {
        assert_eq!(AbilityId::WellBakedBody.as_ref(), "well-baked-body");
        assert_eq!(AbilityId::from_str("no-guard"), Ok(AbilityId::NoGuard));
    }

    #[test]
    fn test_every_ability_has_a_display_name() {
        for ability in AbilityId::iter() {
            assert!(ability.get_message().is_some(), "{ability:?} has no name");
        }
    }
}
