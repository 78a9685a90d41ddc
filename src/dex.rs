use crate::errors::{BattleResult, DataError};
use schema::{ItemData, ItemId, MoveData, SpeciesData};
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_SPECIES: &str = include_str!("../data/species.ron");
const BUNDLED_MOVES: &str = include_str!("../data/moves.ron");
const BUNDLED_ITEMS: &str = include_str!("../data/items.ron");

/// Read-only access to the static species, move and item tables.
///
/// The resolver only ever sees this trait, so callers can back it with the
/// bundled tables, files on disk, or a hand-built table in tests.
pub trait Dex {
    fn species(&self, id: &str) -> Result<&SpeciesData, DataError>;
    fn move_data(&self, name: &str) -> Result<&MoveData, DataError>;
    fn item(&self, id: ItemId) -> Result<&ItemData, DataError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticDex {
    species: HashMap<String, SpeciesData>,
    moves: HashMap<String, MoveData>,
    items: HashMap<ItemId, ItemData>,
}

fn parse_table<T: serde::de::DeserializeOwned>(label: &str, source: &str) -> BattleResult<Vec<T>> {
    ron::from_str(source).map_err(|e| DataError::Malformed(format!("{}: {}", label, e)).into())
}

impl StaticDex {
    /// Builds the repository from the three RON table sources.
    pub fn from_ron(species: &str, moves: &str, items: &str) -> BattleResult<Self> {
        let species: Vec<SpeciesData> = parse_table("species", species)?;
        let moves: Vec<MoveData> = parse_table("moves", moves)?;
        let items: Vec<ItemData> = parse_table("items", items)?;

        let dex = Self {
            species: species.into_iter().map(|s| (s.id.clone(), s)).collect(),
            moves: moves.into_iter().map(|m| (m.name.clone(), m)).collect(),
            items: items.into_iter().map(|i| (i.id, i)).collect(),
        };
        log::debug!(
            "loaded {} species, {} moves, {} items",
            dex.species.len(),
            dex.moves.len(),
            dex.items.len()
        );
        Ok(dex)
    }

    /// Loads `species.ron`, `moves.ron` and `items.ron` from a data directory.
    pub fn from_dir(data_path: &Path) -> BattleResult<Self> {
        let read = |file: &str| -> BattleResult<String> {
            let path = data_path.join(file);
            std::fs::read_to_string(&path)
                .map_err(|e| DataError::Malformed(format!("{}: {}", path.display(), e)).into())
        };
        Self::from_ron(&read("species.ron")?, &read("moves.ron")?, &read("items.ron")?)
    }

    /// The tables compiled into the crate.
    pub fn bundled() -> BattleResult<Self> {
        Self::from_ron(BUNDLED_SPECIES, BUNDLED_MOVES, BUNDLED_ITEMS)
    }

    pub fn insert_move(&mut self, data: MoveData) {
        self.moves.insert(data.name.clone(), data);
    }

    pub fn species_ids(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    pub fn move_names(&self) -> impl Iterator<Item = &str> {
        self.moves.keys().map(String::as_str)
    }
}

impl Dex for StaticDex {
    fn species(&self, id: &str) -> Result<&SpeciesData, DataError> {
        self.species
            .get(id)
            .ok_or_else(|| DataError::SpeciesNotFound(id.to_string()))
    }

    fn move_data(&self, name: &str) -> Result<&MoveData, DataError> {
        self.moves
            .get(name)
            .ok_or_else(|| DataError::MoveNotFound(name.to_string()))
    }

    fn item(&self, id: ItemId) -> Result<&ItemData, DataError> {
        self.items
            .get(&id)
            .ok_or_else(|| DataError::ItemNotFound(id.as_ref().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{AbilityId, MoveBehavior, MoveCategory};
    use strum::IntoEnumIterator;

    #[test]
    fn test_bundled_tables_load() {
        let dex = StaticDex::bundled().expect("bundled tables parse");
        assert!(dex.species_ids().count() >= 14);
        assert!(dex.move_names().count() >= 60);
    }

    #[test]
    fn test_every_item_has_a_row() {
        let dex = StaticDex::bundled().unwrap();
        for id in ItemId::iter() {
            assert_eq!(dex.item(id).unwrap().id, id);
        }
    }

    #[test]
    fn test_every_species_move_reference_is_sound() {
        let dex = StaticDex::bundled().unwrap();
        for id in dex.species_ids() {
            let species = dex.species(id).unwrap();
            assert!(!species.types.is_empty() && species.types.len() <= 2);
            assert!(!species.abilities.is_empty());
        }
    }

    #[test]
    fn test_protect_row() {
        let dex = StaticDex::bundled().unwrap();
        let protect = dex.move_data("Protect").unwrap();
        assert_eq!(protect.category, MoveCategory::Status);
        assert_eq!(protect.priority, 4);
        assert!(protect.behavior_is(MoveBehavior::Protect));
    }

    #[test]
    fn test_unknown_lookups_are_errors() {
        let dex = StaticDex::bundled().unwrap();
        assert_eq!(
            dex.move_data("Splash Dance"),
            Err(DataError::MoveNotFound("Splash Dance".to_string()))
        );
        assert!(matches!(
            dex.species("missingno"),
            Err(DataError::SpeciesNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_table_is_reported() {
        let result = StaticDex::from_ron("[(id: 1)]", "[]", "[]");
        assert!(matches!(
            result,
            Err(crate::errors::BattleError::Data(DataError::Malformed(_)))
        ));
    }

    #[test]
    fn test_species_abilities_parse_as_ids() {
        let dex = StaticDex::bundled().unwrap();
        let species = dex.species("embercub").unwrap();
        assert!(species.can_have_ability(AbilityId::WellBakedBody));
    }
}
