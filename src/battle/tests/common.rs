use crate::battle::context::BattleContext;
use crate::battle::events::{BattleEvent, EventBus};
use crate::battle::rng::TurnRng;
use crate::battle::state::{Match, Phase};
use crate::combatant::{Combatant, MajorStatus};
use crate::config::RulesConfig;
use crate::dex::{Dex, StaticDex};
use crate::errors::BattleResult;
use crate::side::Side;
use schema::{AbilityId, ItemId, MoveData};
use std::sync::OnceLock;

/// The bundled tables, parsed once per test binary.
pub fn test_dex() -> &'static StaticDex {
    static DEX: OnceLock<StaticDex> = OnceLock::new();
    DEX.get_or_init(|| match StaticDex::bundled() {
        Ok(dex) => dex,
        Err(err) => panic!("bundled tables failed to load: {}", err),
    })
}

pub fn move_named(name: &str) -> MoveData {
    match test_dex().move_data(name) {
        Ok(data) => data.clone(),
        Err(err) => panic!("{}", err),
    }
}

/// A builder for test combatants with common defaults.
///
/// The ability defaults to the species' first listed one and is set directly,
/// so tests may pair a species with any ability.
///
/// # Example
/// ```ignore
/// let cub = TestCombatantBuilder::new("embercub")
///     .with_moves(&["Flamethrower"])
///     .with_status(MajorStatus::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species_id: String,
    ability: Option<AbilityId>,
    item: Option<ItemId>,
    status: Option<MajorStatus>,
    moves: Vec<String>,
    hp: Option<u16>,
}

impl TestCombatantBuilder {
    pub fn new(species_id: &str) -> Self {
        Self {
            species_id: species_id.to_string(),
            ability: None,
            item: None,
            status: None,
            moves: vec!["Tackle".to_string()],
            hp: None,
        }
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_item(mut self, item: ItemId) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_status(mut self, status: MajorStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn build(self) -> Combatant {
        let dex = test_dex();
        let species = match dex.species(&self.species_id) {
            Ok(species) => species,
            Err(err) => panic!("{}", err),
        };
        let first_ability = species.abilities[0];
        let moves: Vec<&str> = self.moves.iter().map(String::as_str).collect();
        let mut combatant =
            match Combatant::from_species(dex, &self.species_id, first_ability, self.item, &moves) {
                Ok(combatant) => combatant,
                Err(err) => panic!("failed to build {}: {}", self.species_id, err),
            };

        if let Some(ability) = self.ability {
            combatant.ability = ability;
            combatant.base_ability = ability;
            if ability == AbilityId::Comatose {
                combatant.status = Some(MajorStatus::Sleep);
            } else if combatant.status == Some(MajorStatus::Sleep) {
                combatant.status = None;
            }
        }
        if let Some(status) = self.status {
            combatant.status = Some(status);
            if status == MajorStatus::Sleep {
                combatant.sleep_turns = 3;
            }
        }
        if let Some(hp) = self.hp {
            combatant.current_hp = hp.min(combatant.max_hp());
        }
        combatant
    }
}

/// A seated match already past send-out, with side A = `a_roster`.
pub fn create_test_match(a_roster: Vec<Combatant>, b_roster: Vec<Combatant>) -> Match {
    let side_a = Side::new("p1", "Player 1", a_roster);
    let side_b = Side::new("p2", "Player 2", b_roster);
    let mut state = match Match::new("test_match", side_a, side_b) {
        Ok(state) => state,
        Err(err) => panic!("{}", err),
    };
    state.phase = Phase::Battle;
    state.log.clear();
    state
}

/// Every draw is 50: no crit, no full paralysis, 51 on percent rolls, an 87
/// damage roll and side A on speed ties.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 256])
}

/// Owns the collaborators of a `BattleContext` so a test can drive one
/// engine step at a time and inspect the events afterwards.
pub struct TestHarness {
    pub rules: RulesConfig,
    pub rng: TurnRng,
    pub bus: EventBus,
}

impl TestHarness {
    pub fn new(rng: TurnRng) -> Self {
        Self {
            rules: RulesConfig::default(),
            rng,
            bus: EventBus::new(),
        }
    }

    pub fn run<T>(&mut self, step: impl FnOnce(&mut BattleContext) -> BattleResult<T>) -> BattleResult<T> {
        let mut ctx = BattleContext::new(test_dex(), &self.rules, &mut self.rng, &mut self.bus);
        step(&mut ctx)
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.bus.events()
    }
}

pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
