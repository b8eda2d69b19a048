use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{BattleResult, PokemonError, PokemonResult};
use crate::move_data::get_move_data;
use crate::moves::Move;
use crate::species::{get_species_data, Species};

pub const MAX_LEVEL: u8 = 100;
pub const MAX_DV: u8 = 15;
pub const MAX_STAT_EXP: u16 = u16::MAX;
pub const MAX_MOVES: usize = 4;

/// Diversification values for the four stats that have one. The HP DV is
/// derived from their low bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dvs {
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub special: u8,
}

impl Dvs {
    pub const MAX: Dvs = Dvs { attack: MAX_DV, defense: MAX_DV, speed: MAX_DV, special: MAX_DV };
    pub const ZERO: Dvs = Dvs { attack: 0, defense: 0, speed: 0, special: 0 };

    /// Attack, Defense, Speed and Special low bits, most significant first.
    pub fn hp(&self) -> u8 {
        8 * (self.attack % 2) + 4 * (self.defense % 2) + 2 * (self.speed % 2) + (self.special % 2)
    }

    fn validate(&self) -> PokemonResult<()> {
        let dvs = [
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Speed", self.speed),
            ("Special", self.special),
        ];
        for (stat, value) in dvs {
            if value > MAX_DV {
                return Err(PokemonError::InvalidDv { stat, value });
            }
        }
        Ok(())
    }
}

impl Default for Dvs {
    fn default() -> Self {
        Dvs::MAX
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatExperience {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special: u16,
}

impl StatExperience {
    pub const MAX: StatExperience = StatExperience {
        hp: MAX_STAT_EXP,
        attack: MAX_STAT_EXP,
        defense: MAX_STAT_EXP,
        speed: MAX_STAT_EXP,
        special: MAX_STAT_EXP,
    };
    pub const ZERO: StatExperience = StatExperience { hp: 0, attack: 0, defense: 0, speed: 0, special: 0 };
}

impl Default for StatExperience {
    fn default() -> Self {
        StatExperience::MAX
    }
}

/// Battle-ready stats derived from species, level, DVs and stat experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special: u16,
}

/// A roster entry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyPokemon {
    species: Arc<Species>,
    level: u8,
    moves: Vec<Option<Arc<Move>>>,
    dvs: Dvs,
    stat_exp: StatExperience,
    nickname: Option<String>,
    stats: Stats,
}

impl PartyPokemon {
    /// Builds a roster entry. `None` move slots are placeholders.
    pub fn new(
        species: Arc<Species>,
        level: u8,
        moves: Vec<Option<Arc<Move>>>,
        dvs: Dvs,
        stat_exp: StatExperience,
        nickname: Option<String>,
    ) -> PokemonResult<Self> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(PokemonError::InvalidLevel(level));
        }
        if moves.is_empty() || moves.len() > MAX_MOVES {
            return Err(PokemonError::InvalidMoveCount(moves.len()));
        }
        for move_ in moves.iter().flatten() {
            if !species.can_learn(move_.name()) {
                return Err(PokemonError::IllegalMove {
                    species: species.name().to_string(),
                    move_name: move_.name().to_string(),
                });
            }
        }
        dvs.validate()?;

        let stats = Self::calculate_stats(&species, level, &dvs, &stat_exp);

        Ok(Self {
            species,
            level,
            moves,
            dvs,
            stat_exp,
            nickname,
            stats,
        })
    }

    /// Builds a roster entry with maximum DVs and stat experience.
    pub fn with_moves(species: Arc<Species>, level: u8, moves: Vec<Arc<Move>>) -> PokemonResult<Self> {
        let moves = moves.into_iter().map(Some).collect();
        Self::new(species, level, moves, Dvs::MAX, StatExperience::MAX, None)
    }

    /// Builds a roster entry from the built-in catalogs.
    pub fn from_names(species: &str, level: u8, moves: &[&str]) -> BattleResult<Self> {
        let species = get_species_data(species)?;
        let moves = moves
            .iter()
            .map(|name| get_move_data(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_moves(species, level, moves)?)
    }

    /// Calculate stats with the closed-form Generation 1 formula.
    fn calculate_stats(species: &Species, level: u8, dvs: &Dvs, stat_exp: &StatExperience) -> Stats {
        let base = species.base_stats();
        Stats {
            hp: calculate_stat(base.hp, dvs.hp(), stat_exp.hp, level) + level as u16 + 10,
            attack: calculate_stat(base.attack, dvs.attack, stat_exp.attack, level) + 5,
            defense: calculate_stat(base.defense, dvs.defense, stat_exp.defense, level) + 5,
            speed: calculate_stat(base.speed, dvs.speed, stat_exp.speed, level) + 5,
            special: calculate_stat(base.special, dvs.special, stat_exp.special, level) + 5,
        }
    }

    pub fn species(&self) -> &Arc<Species> {
        &self.species
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn moves(&self) -> &[Option<Arc<Move>>] {
        &self.moves
    }

    pub fn dvs(&self) -> &Dvs {
        &self.dvs
    }

    pub fn stat_exp(&self) -> &StatExperience {
        &self.stat_exp
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Nickname if set, otherwise the species name.
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or_else(|| self.species.name())
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }
}

/// `floor((2*base + dv + floor(sqrt(stat_exp)/4)) * level / 100)`, before the per-stat offset.
fn calculate_stat(base: u16, dv: u8, stat_exp: u16, level: u8) -> u16 {
    let exp_bonus = ((stat_exp as f64).sqrt() / 4.0).floor() as u32;
    let core = 2 * base as u32 + dv as u32 + exp_bonus;
    (core * level as u32 / 100) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{BaseStats, PokemonType};

    fn flat_species(base: u16) -> Arc<Species> {
        let stats = BaseStats { hp: base, attack: base, defense: base, speed: base, special: base };
        Arc::new(Species::new("Flat", 0, stats, PokemonType::Normal, None, ["Tackle"]).unwrap())
    }

    fn tackle() -> Arc<Move> {
        get_move_data("Tackle").unwrap()
    }

    #[test]
    fn test_zero_dv_zero_exp_stats() {
        let pokemon = PartyPokemon::new(
            flat_species(100),
            50,
            vec![Some(tackle())],
            Dvs::ZERO,
            StatExperience::ZERO,
            None,
        )
        .unwrap();

        // floor(200 * 50 / 100) = 100, plus the HP offset of level + 10.
        assert_eq!(
            *pokemon.stats(),
            Stats { hp: 160, attack: 105, defense: 105, speed: 105, special: 105 }
        );
    }

    #[test]
    fn test_max_dv_max_exp_stats() {
        let pokemon = PartyPokemon::with_moves(flat_species(100), 100, vec![tackle()]).unwrap();
        // 2*100 + 15 + floor(255.99/4) = 278
        assert_eq!(pokemon.stats().attack, 283);
        assert_eq!(pokemon.stats().hp, 388);
    }

    #[rstest]
    #[case(Dvs::MAX, 15)]
    #[case(Dvs::ZERO, 0)]
    #[case(Dvs { attack: 1, defense: 0, speed: 0, special: 0 }, 8)]
    #[case(Dvs { attack: 0, defense: 3, speed: 0, special: 0 }, 4)]
    #[case(Dvs { attack: 0, defense: 0, speed: 5, special: 0 }, 2)]
    #[case(Dvs { attack: 0, defense: 0, speed: 0, special: 7 }, 1)]
    #[case(Dvs { attack: 14, defense: 13, speed: 12, special: 11 }, 5)]
    fn test_hp_dv_bit_packing(#[case] dvs: Dvs, #[case] expected: u8) {
        assert_eq!(dvs.hp(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    fn test_invalid_levels(#[case] level: u8) {
        let result = PartyPokemon::with_moves(flat_species(50), level, vec![tackle()]);
        assert_eq!(result, Err(PokemonError::InvalidLevel(level)));
    }

    #[test]
    fn test_invalid_dv_rejected() {
        let result = PartyPokemon::new(
            flat_species(50),
            10,
            vec![Some(tackle())],
            Dvs { attack: 16, ..Dvs::MAX },
            StatExperience::MAX,
            None,
        );
        assert_eq!(result, Err(PokemonError::InvalidDv { stat: "Attack", value: 16 }));
    }

    #[test]
    fn test_move_count_and_legality() {
        let species = flat_species(50);
        assert_eq!(
            PartyPokemon::new(species.clone(), 10, vec![], Dvs::MAX, StatExperience::MAX, None),
            Err(PokemonError::InvalidMoveCount(0))
        );
        assert_eq!(
            PartyPokemon::new(species.clone(), 10, vec![None; 5], Dvs::MAX, StatExperience::MAX, None),
            Err(PokemonError::InvalidMoveCount(5))
        );

        let growl = get_move_data("Growl").unwrap();
        assert!(matches!(
            PartyPokemon::with_moves(species.clone(), 10, vec![growl]),
            Err(PokemonError::IllegalMove { .. })
        ));

        let with_placeholder =
            PartyPokemon::new(species, 10, vec![Some(tackle()), None], Dvs::MAX, StatExperience::MAX, None);
        assert!(with_placeholder.is_ok(), "placeholder slots are allowed");
    }

    #[test]
    fn test_from_names_and_display_name() {
        let pikachu = PartyPokemon::from_names("Pikachu", 25, &["Thunder Shock", "Growl"]).unwrap();
        assert_eq!(pikachu.name(), "Pikachu");
        assert_eq!(pikachu.moves().len(), 2);

        let sparky = PartyPokemon::new(
            pikachu.species().clone(),
            25,
            vec![Some(get_move_data("Thunder Shock").unwrap())],
            Dvs::MAX,
            StatExperience::MAX,
            Some("Sparky".to_string()),
        )
        .unwrap();
        assert_eq!(sparky.name(), "Sparky");
        assert_eq!(sparky.nickname(), Some("Sparky"));

        assert!(PartyPokemon::from_names("Pikachu", 25, &["Surf"]).is_err());
    }
}
