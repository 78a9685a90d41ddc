pub mod abilities;
pub mod context;
pub mod damage;
pub mod end_of_turn;
pub mod engine;
pub mod entry;
pub mod events;
pub mod executor;
pub mod hazards;
pub mod items;
pub mod moves;
pub mod rng;
pub mod state;
pub mod stats;
pub mod status;
pub mod turn_order;
pub mod volatiles;

#[cfg(test)]
pub(crate) mod tests;
