use crate::combatant::Combatant;
use crate::errors::{BattleResult, StateError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    A,
    B,
}

impl SideId {
    pub const BOTH: [SideId; 2] = [SideId::A, SideId::B];

    pub fn index(&self) -> usize {
        match self {
            SideId::A => 0,
            SideId::B => 1,
        }
    }

    pub fn opponent(&self) -> SideId {
        match self {
            SideId::A => SideId::B,
            SideId::B => SideId::A,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideId::A => write!(f, "A"),
            SideId::B => write!(f, "B"),
        }
    }
}

/// What a side chose to do this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { move_name: String },
    Switch { index: usize },
}

impl Action {
    pub fn use_move(name: &str) -> Self {
        Action::Move {
            move_name: name.to_string(),
        }
    }

    pub fn switch_to(index: usize) -> Self {
        Action::Switch { index }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { move_name } => write!(f, "use {}", move_name),
            Action::Switch { index } => write!(f, "switch to slot {}", index),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazards {
    pub stealth_rock: bool,
    pub spikes: u8,
    pub toxic_spikes: u8,
    pub sticky_web: bool,
}

impl Hazards {
    pub const MAX_SPIKES: u8 = 3;
    pub const MAX_TOXIC_SPIKES: u8 = 2;

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Remaining turns for each screen; 0 means down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screens {
    pub reflect: u8,
    pub light_screen: u8,
    pub aurora_veil: u8,
}

impl Screens {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One player's roster plus the side-level field state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub owner_id: String,
    pub name: String,
    pub roster: Vec<Combatant>,
    pub active: usize,
    pub pending_action: Option<Action>,
    pub hazards: Hazards,
    pub screens: Screens,
    pub tailwind: u8,
    pub pending_switch: bool,
    pub baton_pass: bool,
}

impl Side {
    pub fn new(owner_id: &str, name: &str, roster: Vec<Combatant>) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            roster,
            active: 0,
            pending_action: None,
            hazards: Hazards::default(),
            screens: Screens::default(),
            tailwind: 0,
            pending_switch: false,
            baton_pass: false,
        }
    }

    /// Placeholder for the seat nobody has taken yet.
    pub fn vacant() -> Self {
        Self::new("", "", Vec::new())
    }

    pub fn is_vacant(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn active(&self) -> Option<&Combatant> {
        self.roster.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Combatant> {
        self.roster.get_mut(self.active)
    }

    pub fn active_or_err(&self, id: SideId) -> BattleResult<&Combatant> {
        self.active()
            .ok_or_else(|| StateError::NoActiveCombatant(id).into())
    }

    pub fn living_count(&self) -> usize {
        self.roster.iter().filter(|c| !c.is_fainted()).count()
    }

    pub fn has_living(&self) -> bool {
        self.living_count() > 0
    }

    /// A non-active, non-fainted roster member exists.
    pub fn has_bench(&self) -> bool {
        self.roster
            .iter()
            .enumerate()
            .any(|(i, c)| i != self.active && !c.is_fainted())
    }

    pub fn active_fainted(&self) -> bool {
        self.active().map_or(true, |c| c.is_fainted())
    }

    /// The active fainted or asked to switch out, and someone can come in.
    pub fn needs_replacement(&self) -> bool {
        (self.active_fainted() || self.pending_switch) && self.has_bench()
    }

    pub fn reset_for_lobby(&mut self) {
        for combatant in &mut self.roster {
            combatant.reset_for_lobby();
        }
        self.active = 0;
        self.pending_action = None;
        self.hazards = Hazards::default();
        self.screens.clear();
        self.tailwind = 0;
        self.pending_switch = false;
        self.baton_pass = false;
    }
}
