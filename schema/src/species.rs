use crate::abilities::AbilityId;
use crate::element_types::ElementType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

/// One row of the species table. Stats are already the level-50 battle values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: String,
    pub name: String,
    pub types: Vec<ElementType>,
    pub base_stats: BaseStats,
    pub abilities: Vec<AbilityId>,
}

impl SpeciesData {
    pub fn can_have_ability(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }
}
