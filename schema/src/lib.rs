// Duel Engine Schema - Shared static data shapes
// This crate holds the enums and table rows that describe species, moves and
// items. The runtime crate reads them through its data repository; nothing in
// here carries mutable battle state.

pub use abilities::*;
pub use element_types::*;
pub use field::*;
pub use items::*;
pub use moves::*;
pub use species::*;

pub mod abilities;
pub mod element_types;
pub mod field;
pub mod items;
pub mod moves;
pub mod species;
