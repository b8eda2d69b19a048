use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};

/// Raw base stats. Stored wide so out-of-range catalog values can be rejected
/// instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special: u16,
}

/// A species as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    pub dex_number: u16,
    pub base_stats: BaseStats,
    pub primary_type: PokemonType,
    #[serde(default)]
    pub secondary_type: Option<PokemonType>,
    pub moveset: Vec<String>,
}
