// Battle simulator schema - shared plain data definitions.
// The catalogs deserialize into these records and the engine matches on the
// enums; nothing here carries battle logic.

// Re-export the main types
pub use battle_data::*;
pub use move_types::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod move_types;
pub mod pokemon_types;
pub mod species_data;
