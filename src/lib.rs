//! Duel Engine
//!
//! A deterministic resolver for two-sided creature battles. Both sides submit
//! one action per turn; the resolver plays the turn out against a pre-drawn
//! random stream and returns the next match record together with a
//! human-readable log.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod dex;
pub mod errors;
pub mod side;

// --- PUBLIC API RE-EXPORTS ---

// Static table shapes from the `schema` crate.
pub use schema::{
    AbilityId, BaseStats, ElementType, ItemData, ItemId, MoveCategory, MoveData, SpeciesData,
    Stat, Terrain, Weather,
};

// Turn resolution entry points and the match record.
pub use battle::engine::{
    ready_for_turn_resolution, resolve_turn, resolve_turn_with_events, submit_action,
    validate_action,
};
pub use battle::events::{BattleEvent, EventBus};
pub use battle::executor::BattleExecutor;
pub use battle::rng::TurnRng;
pub use battle::state::{Field, Match, Phase};

// Runtime types for one battle.
pub use combatant::{Combatant, MajorStatus};
pub use side::{Action, Side, SideId};

pub use config::RulesConfig;
pub use dex::{Dex, StaticDex};

pub use errors::{ActionError, BattleError, BattleResult, DataError, StateError};
