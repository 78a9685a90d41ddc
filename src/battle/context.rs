use crate::battle::events::{BattleEvent, EventBus};
use crate::battle::rng::TurnRng;
use crate::config::RulesConfig;
use crate::dex::Dex;
use crate::side::SideId;

/// Collaborators threaded through one resolution.
pub struct BattleContext<'a> {
    pub dex: &'a dyn Dex,
    pub rules: &'a RulesConfig,
    pub rng: &'a mut TurnRng,
    pub bus: &'a mut EventBus,
    /// Which sides have already taken their action this turn.
    pub acted: [bool; 2],
}

impl<'a> BattleContext<'a> {
    pub fn new(
        dex: &'a dyn Dex,
        rules: &'a RulesConfig,
        rng: &'a mut TurnRng,
        bus: &'a mut EventBus,
    ) -> Self {
        Self {
            dex,
            rules,
            rng,
            bus,
            acted: [false; 2],
        }
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.bus.push(event);
    }

    pub fn has_acted(&self, side: SideId) -> bool {
        self.acted[side.index()]
    }
}
