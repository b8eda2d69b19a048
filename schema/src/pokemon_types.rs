use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumCount, EnumIter};

/// The fifteen Generation 1 types.
///
/// Declaration order doubles as the row/column index of the effectiveness
/// chart, so do not reorder variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, EnumCount,
)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub const SUPER_EFFECTIVE: f64 = 2.0;
pub const NOT_VERY_EFFECTIVE: f64 = 0.5;
pub const NO_EFFECT: f64 = 0.0;

impl PokemonType {
    /// Index into per-type tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Moves of a physical type use Attack/Defense, the rest use Special.
    pub fn is_physical(self) -> bool {
        use PokemonType::*;
        matches!(
            self,
            Normal | Fighting | Flying | Poison | Ground | Rock | Bug | Ghost
        )
    }

    pub fn is_special(self) -> bool {
        !self.is_physical()
    }

    /// Calculate type effectiveness multiplier for attacking type vs defending type.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f64 {
        use PokemonType::*;

        match (attacking, defending) {
            (Normal, Rock) => NOT_VERY_EFFECTIVE,
            (Normal, Ghost) => NO_EFFECT,

            (Fighting, Normal) | (Fighting, Rock) | (Fighting, Ice) => SUPER_EFFECTIVE,
            (Fighting, Flying) | (Fighting, Poison) | (Fighting, Bug) | (Fighting, Psychic) => {
                NOT_VERY_EFFECTIVE
            }
            (Fighting, Ghost) => NO_EFFECT,

            (Flying, Fighting) | (Flying, Bug) | (Flying, Grass) => SUPER_EFFECTIVE,
            (Flying, Rock) | (Flying, Electric) => NOT_VERY_EFFECTIVE,

            (Poison, Bug) | (Poison, Grass) => SUPER_EFFECTIVE,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => {
                NOT_VERY_EFFECTIVE
            }

            (Ground, Poison) | (Ground, Rock) | (Ground, Fire) | (Ground, Electric) => {
                SUPER_EFFECTIVE
            }
            (Ground, Bug) | (Ground, Grass) => NOT_VERY_EFFECTIVE,
            (Ground, Flying) => NO_EFFECT,

            (Rock, Flying) | (Rock, Bug) | (Rock, Fire) | (Rock, Ice) => SUPER_EFFECTIVE,
            (Rock, Fighting) | (Rock, Ground) => NOT_VERY_EFFECTIVE,

            (Bug, Poison) | (Bug, Grass) | (Bug, Psychic) => SUPER_EFFECTIVE,
            (Bug, Fighting) | (Bug, Flying) | (Bug, Ghost) | (Bug, Fire) => NOT_VERY_EFFECTIVE,

            (Ghost, Ghost) => SUPER_EFFECTIVE,
            (Ghost, Normal) | (Ghost, Psychic) => NO_EFFECT,

            (Fire, Bug) | (Fire, Grass) | (Fire, Ice) => SUPER_EFFECTIVE,
            (Fire, Rock) | (Fire, Fire) | (Fire, Water) | (Fire, Dragon) => NOT_VERY_EFFECTIVE,

            (Water, Ground) | (Water, Rock) | (Water, Fire) => SUPER_EFFECTIVE,
            (Water, Water) | (Water, Grass) | (Water, Dragon) => NOT_VERY_EFFECTIVE,

            (Grass, Ground) | (Grass, Rock) | (Grass, Water) => SUPER_EFFECTIVE,
            (Grass, Flying)
            | (Grass, Poison)
            | (Grass, Bug)
            | (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Dragon) => NOT_VERY_EFFECTIVE,

            (Electric, Flying) | (Electric, Water) => SUPER_EFFECTIVE,
            (Electric, Grass) | (Electric, Electric) | (Electric, Dragon) => NOT_VERY_EFFECTIVE,
            (Electric, Ground) => NO_EFFECT,

            (Psychic, Fighting) | (Psychic, Poison) => SUPER_EFFECTIVE,
            (Psychic, Psychic) => NOT_VERY_EFFECTIVE,

            (Ice, Flying) | (Ice, Ground) | (Ice, Grass) | (Ice, Dragon) => SUPER_EFFECTIVE,
            (Ice, Water) | (Ice, Ice) => NOT_VERY_EFFECTIVE,

            (Dragon, Dragon) => SUPER_EFFECTIVE,

            _ => 1.0,
        }
    }

    pub fn is_immune(attacking: PokemonType, defending: PokemonType) -> bool {
        Self::type_effectiveness(attacking, defending) == NO_EFFECT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_physical_special_split_is_exclusive() {
        let physical: Vec<_> = PokemonType::iter().filter(|t| t.is_physical()).collect();
        assert_eq!(physical.len(), 8);
        for t in PokemonType::iter() {
            assert_ne!(t.is_physical(), t.is_special(), "{} must be exactly one class", t);
        }
        assert!(PokemonType::Ghost.is_physical());
        assert!(PokemonType::Dragon.is_special());
    }

    #[test]
    fn test_chart_only_uses_known_multipliers() {
        for attacking in PokemonType::iter() {
            for defending in PokemonType::iter() {
                let m = PokemonType::type_effectiveness(attacking, defending);
                assert!(
                    [0.0, 0.5, 1.0, 2.0].contains(&m),
                    "{} vs {} produced {}",
                    attacking,
                    defending,
                    m
                );
            }
        }
    }

    #[test]
    fn test_generation_one_quirks() {
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Ghost, PokemonType::Psychic), 0.0);
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Bug, PokemonType::Poison), 2.0);
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Poison, PokemonType::Bug), 2.0);
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Ice, PokemonType::Fire), 1.0);
        assert!(PokemonType::is_immune(PokemonType::Normal, PokemonType::Ghost));
        assert!(!PokemonType::is_immune(PokemonType::Fire, PokemonType::Water));
    }

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, t) in PokemonType::iter().enumerate() {
            assert_eq!(t.index(), i);
        }
        assert_eq!(PokemonType::COUNT, 15);
    }
}
