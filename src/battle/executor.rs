use crate::battle::engine::{ready_for_turn_resolution, resolve_turn, submit_action};
use crate::battle::rng::TurnRng;
use crate::battle::state::{Match, Phase};
use crate::config::RulesConfig;
use crate::dex::Dex;
use crate::errors::{BattleResult, StateError};
use crate::side::{Action, SideId};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared owner of one match record.
///
/// Submissions and the resolving transition go through the lock; the
/// resolution itself runs on a snapshot outside it. The stored phase sits at
/// `Resolving` meanwhile, so a second trigger backs off and late submissions
/// are refused.
pub struct BattleExecutor {
    state: Mutex<Match>,
    dex: Arc<dyn Dex + Send + Sync>,
    rules: RulesConfig,
}

impl BattleExecutor {
    pub fn new(state: Match, dex: Arc<dyn Dex + Send + Sync>, rules: RulesConfig) -> Self {
        Self {
            state: Mutex::new(state),
            dex,
            rules,
        }
    }

    fn lock(&self) -> BattleResult<MutexGuard<'_, Match>> {
        self.state
            .lock()
            .map_err(|_| StateError::Inconsistent("match lock poisoned".to_string()).into())
    }

    /// A copy of the current record.
    pub fn snapshot(&self) -> BattleResult<Match> {
        Ok(self.lock()?.clone())
    }

    pub fn submit_action(&self, side: SideId, action: Action) -> BattleResult<()> {
        let mut state = self.lock()?;
        submit_action(&mut state, side, action, self.dex.as_ref())
    }

    /// Resolves the pending actions if both are in and nobody else is already
    /// resolving. Returns whether this call did the resolution.
    pub fn try_resolve(&self, rng: TurnRng) -> BattleResult<bool> {
        let snapshot = {
            let mut state = self.lock()?;
            if state.phase == Phase::Resolving || !ready_for_turn_resolution(&state) {
                return Ok(false);
            }
            let snapshot = state.clone();
            state.phase = Phase::Resolving;
            snapshot
        };

        let next = resolve_turn(&snapshot, self.dex.as_ref(), &self.rules, rng);
        *self.lock()? = next;
        Ok(true)
    }
}
