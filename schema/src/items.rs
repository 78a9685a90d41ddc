use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumMessage, EnumString, IntoStaticStr};

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
pub enum ItemId {
    #[strum(message = "Leftovers")]
    Leftovers,
    #[strum(message = "Black Sludge")]
    BlackSludge,
    #[strum(message = "Choice Band")]
    ChoiceBand,
    #[strum(message = "Choice Specs")]
    ChoiceSpecs,
    #[strum(message = "Choice Scarf")]
    ChoiceScarf,
    #[strum(message = "Life Orb")]
    LifeOrb,
    #[strum(message = "Expert Belt")]
    ExpertBelt,
    #[strum(message = "Assault Vest")]
    AssaultVest,
    #[strum(message = "Focus Sash")]
    FocusSash,
    #[strum(message = "Weakness Policy")]
    WeaknessPolicy,
    #[strum(message = "Rocky Helmet")]
    RockyHelmet,
    #[strum(message = "Heavy-Duty Boots")]
    HeavyDutyBoots,
    #[strum(message = "Sitrus Berry")]
    SitrusBerry,
    #[strum(message = "Wide Lens")]
    WideLens,
    #[strum(message = "Clear Amulet")]
    ClearAmulet,
    #[strum(message = "Ability Shield")]
    AbilityShield,
}

impl ItemId {
    pub fn display_name(&self) -> &'static str {
        self.get_message().unwrap_or("???")
    }
}

/// One row of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
