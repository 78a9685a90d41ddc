use crate::errors::{BattleResult, DataError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_RULES: &str = include_str!("../data/rules.ron");

/// Tunable durations and sizes for a match. Every field falls back to the
/// standard value when omitted from the RON source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub level: u32,
    pub weather_turns: u8,
    pub terrain_turns: u8,
    pub screen_turns: u8,
    pub tailwind_turns: u8,
    pub taunt_turns: u8,
    pub encore_turns: u8,
    pub heal_block_turns: u8,
    pub perish_count: u8,
    pub yawn_turns: u8,
    /// How many raw values `TurnRng::new_random` pre-draws for one resolution.
    pub rng_buffer: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            level: 50,
            weather_turns: 5,
            terrain_turns: 5,
            screen_turns: 5,
            tailwind_turns: 4,
            taunt_turns: 3,
            encore_turns: 3,
            heal_block_turns: 2,
            perish_count: 4,
            yawn_turns: 2,
            rng_buffer: 256,
        }
    }
}

impl RulesConfig {
    pub fn from_ron_str(source: &str) -> BattleResult<Self> {
        ron::from_str(source)
            .map_err(|e| DataError::Malformed(format!("rules: {}", e)).into())
    }

    pub fn load(path: &Path) -> BattleResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| DataError::Malformed(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&source)
    }

    pub fn bundled() -> BattleResult<Self> {
        Self::from_ron_str(BUNDLED_RULES)
    }

    /// The `2 * level / 5 + 2` factor of the damage formula.
    pub fn level_factor(&self) -> u32 {
        2 * self.level / 5 + 2
    }
}
