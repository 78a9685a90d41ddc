use crate::battle::abilities::ability_hooks;
use crate::battle::context::BattleContext;
use crate::battle::state::Match;
use crate::battle::stats::active_speed;
use crate::combatant::Combatant;
use crate::errors::{BattleResult, StateError};
use crate::side::{Action, SideId};
use schema::MoveData;

/// Sorting key for one side's action this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Switch,
    Move(i8),
}

/// The move a combatant will really use: a charging move or an encore
/// overrides whatever was submitted.
pub fn forced_move(combatant: &Combatant) -> Option<&str> {
    if let Some(charging) = &combatant.volatiles.charging {
        return Some(&charging.move_name);
    }
    combatant.volatiles.encore.as_ref().map(|e| e.move_name.as_str())
}

/// Priority of a move for this user, including the status-move bonus some
/// abilities grant.
pub fn move_priority(user: &Combatant, move_data: &MoveData) -> i8 {
    let bonus = if move_data.is_status() {
        ability_hooks(user.ability).status_priority_bonus
    } else {
        0
    };
    move_data.priority + bonus
}

fn tier(state: &Match, side: SideId, ctx: &BattleContext) -> BattleResult<Tier> {
    let action = state
        .side(side)
        .pending_action
        .as_ref()
        .ok_or_else(|| StateError::Inconsistent(format!("side {} has no action", side)))?;
    match action {
        Action::Switch { .. } => Ok(Tier::Switch),
        Action::Move { move_name } => {
            let user = state.active(side)?;
            let name = forced_move(user).unwrap_or(move_name);
            let move_data = ctx.dex.move_data(name)?;
            Ok(Tier::Move(move_priority(user, move_data)))
        }
    }
}

/// Who acts first. Switches beat moves, then priority, then speed, and a
/// full tie is a coin flip.
pub fn determine_turn_order(state: &Match, ctx: &mut BattleContext) -> BattleResult<[SideId; 2]> {
    const A_FIRST: [SideId; 2] = [SideId::A, SideId::B];
    const B_FIRST: [SideId; 2] = [SideId::B, SideId::A];

    match (tier(state, SideId::A, ctx)?, tier(state, SideId::B, ctx)?) {
        (Tier::Switch, _) => Ok(A_FIRST),
        (_, Tier::Switch) => Ok(B_FIRST),
        (Tier::Move(a), Tier::Move(b)) if a != b => Ok(if a > b { A_FIRST } else { B_FIRST }),
        _ => {
            let speed_a = active_speed(state, SideId::A)?;
            let speed_b = active_speed(state, SideId::B)?;
            if speed_a != speed_b {
                return Ok(if speed_a > speed_b { A_FIRST } else { B_FIRST });
            }
            if ctx.rng.chance(1, 2, "speed tie")? {
                Ok(A_FIRST)
            } else {
                Ok(B_FIRST)
            }
        }
    }
}
