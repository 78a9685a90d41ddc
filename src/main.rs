use duel_engine::battle::entry::first_available;
use duel_engine::{
    ready_for_turn_resolution, resolve_turn, submit_action, Action, BattleResult, Combatant, Dex,
    ItemId, Match, Phase, RulesConfig, Side, SideId, StaticDex, TurnRng,
};

const MAX_ROUNDS: u64 = 200;
const BASE_SEED: u64 = 0x5eed;
const DRAWS_PER_TURN: usize = 64;

fn build_combatant(dex: &dyn Dex, species_id: &str, item: Option<ItemId>, moves: &[&str]) -> BattleResult<Combatant> {
    let ability = dex
        .species(species_id)?
        .abilities
        .first()
        .copied()
        .ok_or_else(|| duel_engine::DataError::Malformed(format!("{} lists no abilities", species_id)))?;
    Combatant::from_species(dex, species_id, ability, item, moves)
}

fn build_sides(dex: &dyn Dex) -> BattleResult<(Side, Side)> {
    let host = Side::new(
        "p1",
        "Ash",
        vec![
            build_combatant(dex, "embercub", Some(ItemId::Leftovers), &["Flamethrower", "Will-O-Wisp", "Protect", "U-turn"])?,
            build_combatant(dex, "tidalisk", None, &["Surf", "Earthquake", "Rain Dance", "Recover"])?,
            build_combatant(dex, "voltmane", None, &["Thunderbolt", "Thunder Wave", "Volt Switch", "Substitute"])?,
        ],
    );
    let guest = Side::new(
        "p2",
        "Gary",
        vec![
            build_combatant(dex, "thornback", Some(ItemId::BlackSludge), &["Leaf Blade", "Sludge Bomb", "Leech Seed", "Toxic"])?,
            build_combatant(dex, "granitusk", None, &["Earthquake", "Stomping Tantrum", "Spikes", "Swords Dance"])?,
            build_combatant(dex, "galeclaw", Some(ItemId::ChoiceScarf), &["Brave Bird", "Quick Attack", "Double-Edge", "U-turn"])?,
        ],
    );
    Ok((host, guest))
}

/// Picks the first legal action for a side, rotating through its moveset.
fn choose_action(state: &mut Match, side: SideId, dex: &dyn Dex) -> BattleResult<bool> {
    if state.phase == Phase::Switching {
        if !state.side(side).needs_replacement() {
            return Ok(false);
        }
        return match first_available(state, side) {
            Some(index) => submit_action(state, side, Action::switch_to(index), dex).map(|_| true),
            None => Ok(false),
        };
    }

    let moves = state.active(side)?.moves.clone();
    let start = state.turn as usize + side.index();
    for offset in 0..moves.len() {
        let name = &moves[(start + offset) % moves.len()];
        if submit_action(state, side, Action::use_move(name), dex).is_ok() {
            return Ok(true);
        }
    }
    match first_available(state, side) {
        Some(index) => submit_action(state, side, Action::switch_to(index), dex).map(|_| true),
        None => Ok(false),
    }
}

fn run() -> BattleResult<()> {
    let dex = StaticDex::bundled()?;
    let rules = RulesConfig::bundled()?;

    let (host, guest) = build_sides(&dex)?;
    let mut state = Match::open("demo", host);
    state.join(guest)?;

    for round in 0..MAX_ROUNDS {
        if state.phase == Phase::Finished {
            break;
        }
        for side in SideId::BOTH {
            choose_action(&mut state, side, &dex)?;
        }
        if !ready_for_turn_resolution(&state) {
            println!("No legal actions left; stopping.");
            break;
        }
        let rng = TurnRng::from_seed(BASE_SEED + round, DRAWS_PER_TURN);
        state = resolve_turn(&state, &dex, &rules, rng);
    }

    for line in &state.log {
        println!("{}", line);
    }
    match state.winner {
        Some(side) => println!("\nSide {} ({}) wins!", side, state.side(side).name),
        None => println!("\nNo winner after {} turns.", state.turn),
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        println!("Error running the demo battle: {}", e);
    }
}
