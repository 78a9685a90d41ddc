use crate::battle::events::BattleEvent;
use crate::combatant::Combatant;
use crate::errors::{BattleResult, DataError, StateError};
use crate::side::{Side, SideId};
use schema::{Terrain, Weather};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Match-level phase. `Resolving` only exists while a resolution is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Waiting,
    SendOut,
    Battle,
    Resolving,
    Switching,
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub weather: Option<Weather>,
    pub weather_turns: u8,
    pub terrain: Option<Terrain>,
    pub terrain_turns: u8,
}

impl Field {
    pub fn set_weather(&mut self, weather: Weather, turns: u8) {
        self.weather = Some(weather);
        self.weather_turns = turns;
    }

    pub fn set_terrain(&mut self, terrain: Terrain, turns: u8) {
        self.terrain = Some(terrain);
        self.terrain_turns = turns;
    }

    pub fn weather_is(&self, weather: Weather) -> bool {
        self.weather == Some(weather)
    }
}

/// The persisted match record. Resolution reads and writes it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub sides: [Side; 2],
    pub turn: u32,
    pub field: Field,
    pub log: Vec<String>,
    pub phase: Phase,
    pub winner: Option<SideId>,
    pub leads_announced: bool,
}

impl Match {
    /// A match with only the host seated.
    pub fn open(id: &str, host: Side) -> Self {
        Self {
            id: id.to_string(),
            sides: [host, Side::vacant()],
            turn: 1,
            field: Field::default(),
            log: Vec::new(),
            phase: Phase::Waiting,
            winner: None,
            leads_announced: false,
        }
    }

    /// Seats the guest and moves to send-out.
    pub fn join(&mut self, guest: Side) -> BattleResult<()> {
        if self.phase != Phase::Waiting {
            return Err(crate::errors::ActionError::WrongPhase(self.phase).into());
        }
        for (id, side) in [(SideId::A, &self.sides[0]), (SideId::B, &guest)] {
            if side.roster.is_empty() {
                return Err(StateError::EmptyRoster(id).into());
            }
        }
        self.sides[1] = guest;
        self.phase = Phase::SendOut;
        for id in SideId::BOTH {
            let side = self.side(id);
            if let Some(lead) = side.active() {
                let line = BattleEvent::SentOut {
                    side: id,
                    name: lead.name.clone(),
                }
                .to_string();
                self.log.push(line);
            }
        }
        log::info!("match {} moved to {}", self.id, self.phase);
        Ok(())
    }

    /// Convenience for tests and tools: both sides seated at once.
    pub fn new(id: &str, side_a: Side, side_b: Side) -> BattleResult<Self> {
        let mut state = Self::open(id, side_a);
        state.join(side_b)?;
        Ok(state)
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut Side {
        &mut self.sides[id.index()]
    }

    pub fn active(&self, id: SideId) -> BattleResult<&Combatant> {
        self.side(id).active_or_err(id)
    }

    pub fn active_mut(&mut self, id: SideId) -> BattleResult<&mut Combatant> {
        self.sides[id.index()]
            .active_mut()
            .ok_or_else(|| StateError::NoActiveCombatant(id).into())
    }

    /// Active combatant, if it is still standing.
    pub fn living_active(&self, id: SideId) -> Option<&Combatant> {
        self.side(id).active().filter(|c| !c.is_fainted())
    }

    pub fn both_actions_present(&self) -> bool {
        self.sides.iter().all(|s| s.pending_action.is_some())
    }

    pub fn clear_pending_actions(&mut self) {
        for side in &mut self.sides {
            side.pending_action = None;
        }
    }

    /// Resets every combatant and side for the lobby.
    pub fn return_to_lobby(&mut self) {
        for side in &mut self.sides {
            side.reset_for_lobby();
        }
        self.field = Field::default();
    }

    pub fn to_json(&self) -> BattleResult<String> {
        serde_json::to_string(self).map_err(|e| DataError::Malformed(e.to_string()).into())
    }

    pub fn from_json(source: &str) -> BattleResult<Self> {
        serde_json::from_str(source).map_err(|e| DataError::Malformed(e.to_string()).into())
    }

    pub fn to_bytes(&self) -> BattleResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| DataError::Malformed(e.to_string()).into())
    }

    pub fn from_bytes(bytes: &[u8]) -> BattleResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| DataError::Malformed(e.to_string()).into())
    }
}
