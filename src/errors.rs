use crate::battle::state::Phase;
use crate::side::SideId;
use thiserror::Error;

/// Main error type for the duel engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// A static table lookup failed
    #[error("data error: {0}")]
    Data(#[from] DataError),
    /// A submitted action was rejected
    #[error("invalid action: {0}")]
    Action(#[from] ActionError),
    /// The match record is inconsistent
    #[error("battle state error: {0}")]
    State(#[from] StateError),
    /// The pre-drawn random stream ran out mid-resolution
    #[error("random stream exhausted while drawing for '{reason}'")]
    RngExhausted { reason: String },
}

/// Errors related to the static species/move/item tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("move '{0}' not found in the move table")]
    MoveNotFound(String),
    #[error("species '{0}' not found in the species table")]
    SpeciesNotFound(String),
    #[error("item '{0}' not found in the item table")]
    ItemNotFound(String),
    #[error("species '{species}' cannot have ability '{ability}'")]
    AbilityNotAllowed { species: String, ability: String },
    #[error("malformed table data: {0}")]
    Malformed(String),
}

/// Errors related to the match record itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("side {0} has no active combatant")]
    NoActiveCombatant(SideId),
    #[error("side {0} has an empty roster")]
    EmptyRoster(SideId),
    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

/// Errors related to submitted actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("actions are not accepted during the {0} phase")]
    WrongPhase(Phase),
    #[error("side {0} does not need a replacement")]
    NoReplacementNeeded(SideId),
    #[error("side {0} must send in a replacement")]
    ReplacementRequired(SideId),
    #[error("roster slot {0} does not exist")]
    NoSuchCombatant(usize),
    #[error("roster slot {0} has fainted")]
    CombatantFainted(usize),
    #[error("roster slot {0} is already active")]
    AlreadyActive(usize),
    #[error("the active combatant has fainted")]
    ActiveFainted,
    #[error("'{0}' is not in the active combatant's moveset")]
    MoveNotKnown(String),
    #[error("locked into '{0}'")]
    LockedInto(String),
    #[error("'{0}' is a status move and cannot be used right now")]
    StatusMoveBlocked(String),
    #[error("side {0} already submitted a different action")]
    ConflictingSubmission(SideId),
}

/// Type alias for Results that use BattleError
pub type BattleResult<T> = Result<T, BattleError>;
