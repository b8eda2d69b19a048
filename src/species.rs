use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, LazyLock};

use schema::{BaseStats, PokemonType, SpeciesRecord};
use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};

use crate::errors::{SpeciesDataError, SpeciesDataResult};
use crate::move_data;

const POKEDEX_RON: &str = include_str!("../data/pokedex.ron");

/// Highest value a base stat may take.
pub const MAX_BASE_STAT: u16 = 255;

/// Immutable per-species data plus the values derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Species {
    name: String,
    dex_number: u16,
    base_stats: BaseStats,
    primary_type: PokemonType,
    secondary_type: Option<PokemonType>,
    moveset: BTreeSet<String>,
    #[serde(skip)]
    effectiveness: [f64; PokemonType::COUNT],
}

impl Species {
    pub fn new<I, S>(
        name: impl Into<String>,
        dex_number: u16,
        base_stats: BaseStats,
        primary_type: PokemonType,
        secondary_type: Option<PokemonType>,
        moveset: I,
    ) -> SpeciesDataResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();

        let stats = [
            ("HP", base_stats.hp),
            ("Attack", base_stats.attack),
            ("Defense", base_stats.defense),
            ("Speed", base_stats.speed),
            ("Special", base_stats.special),
        ];
        for (stat, value) in stats {
            if value > MAX_BASE_STAT {
                return Err(SpeciesDataError::InvalidBaseStat { name, stat, value });
            }
        }

        if secondary_type == Some(primary_type) {
            return Err(SpeciesDataError::DuplicateType { name });
        }

        let mut effectiveness = [1.0; PokemonType::COUNT];
        for attacking in PokemonType::iter() {
            let mut multiplier = PokemonType::type_effectiveness(attacking, primary_type);
            if let Some(secondary) = secondary_type {
                multiplier *= PokemonType::type_effectiveness(attacking, secondary);
            }
            effectiveness[attacking.index()] = multiplier;
        }

        Ok(Self {
            name,
            dex_number,
            base_stats,
            primary_type,
            secondary_type,
            moveset: moveset.into_iter().map(Into::into).collect(),
            effectiveness,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dex_number(&self) -> u16 {
        self.dex_number
    }

    pub fn base_stats(&self) -> &BaseStats {
        &self.base_stats
    }

    pub fn primary_type(&self) -> PokemonType {
        self.primary_type
    }

    pub fn secondary_type(&self) -> Option<PokemonType> {
        self.secondary_type
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.primary_type == pokemon_type || self.secondary_type == Some(pokemon_type)
    }

    pub fn moveset(&self) -> &BTreeSet<String> {
        &self.moveset
    }

    pub fn can_learn(&self, move_name: &str) -> bool {
        self.moveset.contains(move_name)
    }

    /// Multiplier a move of `attacking` type gets against this species.
    pub fn attack_effectiveness(&self, attacking: PokemonType) -> f64 {
        self.effectiveness[attacking.index()]
    }

    /// Threshold a `[0, 256)` roll must stay under for a critical hit.
    ///
    /// Focus Energy combined with a high-crit move lands below the high-crit
    /// move alone, as on the original cartridge.
    pub fn critical_hit_threshold(&self, high_crit: bool, focus_energy: bool) -> u16 {
        let speed = self.base_stats.speed;
        match (high_crit, focus_energy) {
            (false, false) => speed / 2,
            (true, false) => (8 * (speed / 2)).min(255),
            (false, true) => speed / 8,
            (true, true) => 4 * (speed / 4),
        }
    }
}

impl TryFrom<SpeciesRecord> for Species {
    type Error = SpeciesDataError;

    fn try_from(record: SpeciesRecord) -> SpeciesDataResult<Self> {
        Species::new(
            record.name,
            record.dex_number,
            record.base_stats,
            record.primary_type,
            record.secondary_type,
            record.moveset,
        )
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // --- 1. Name and Pokedex Number ---
        writeln!(f, "{} (#{:03})", self.name, self.dex_number)?;
        writeln!(f, "--------------------")?;

        // --- 2. Types ---
        write!(f, "Type(s): {}", self.primary_type)?;
        if let Some(secondary) = self.secondary_type {
            write!(f, " / {}", secondary)?;
        }
        writeln!(f)?;
        writeln!(f, "--------------------")?;

        // --- 3. Base Stats ---
        writeln!(f, "Base Stats:")?;
        const LABEL_WIDTH: usize = 12;

        writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", self.base_stats.hp)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", self.base_stats.attack)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", self.base_stats.defense)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Speed", self.base_stats.speed)?;
        write!(f, "{:<LABEL_WIDTH$} : {}", "Special", self.base_stats.special)
    }
}

static POKEDEX: LazyLock<SpeciesDataResult<HashMap<String, Arc<Species>>>> =
    LazyLock::new(load_pokedex);

fn load_pokedex() -> SpeciesDataResult<HashMap<String, Arc<Species>>> {
    let records: Vec<SpeciesRecord> =
        ron::from_str(POKEDEX_RON).map_err(|e| SpeciesDataError::MalformedData(e.to_string()))?;

    let mut pokedex = HashMap::with_capacity(records.len());
    for record in records {
        let species = Species::try_from(record)?;
        for move_name in species.moveset() {
            if move_data::get_move_data(move_name).is_err() {
                return Err(SpeciesDataError::UnknownMove {
                    name: species.name().to_string(),
                    move_name: move_name.clone(),
                });
            }
        }
        pokedex.insert(species.name().to_string(), Arc::new(species));
    }

    tracing::debug!(species = pokedex.len(), "loaded built-in pokedex");
    Ok(pokedex)
}

/// Looks up a species in the built-in pokedex.
pub fn get_species_data(name: &str) -> SpeciesDataResult<Arc<Species>> {
    let pokedex = POKEDEX.as_ref().map_err(Clone::clone)?;
    pokedex
        .get(name)
        .cloned()
        .ok_or_else(|| SpeciesDataError::SpeciesNotFound(name.to_string()))
}

/// Every built-in species, ordered by dex number.
pub fn all_species() -> SpeciesDataResult<Vec<Arc<Species>>> {
    let pokedex = POKEDEX.as_ref().map_err(Clone::clone)?;
    let mut species: Vec<_> = pokedex.values().cloned().collect();
    species.sort_by_key(|s| s.dex_number());
    Ok(species)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hp: u16, attack: u16, defense: u16, speed: u16, special: u16) -> BaseStats {
        BaseStats { hp, attack, defense, speed, special }
    }

    #[test]
    fn test_base_stat_validation() {
        let result = Species::new(
            "Glitch",
            0,
            stats(100, 256, 100, 100, 100),
            PokemonType::Normal,
            None,
            ["Tackle"],
        );
        assert!(matches!(
            result,
            Err(SpeciesDataError::InvalidBaseStat { stat: "Attack", value: 256, .. })
        ));

        let edges = Species::new("Edge", 0, stats(0, 255, 0, 255, 0), PokemonType::Normal, None, ["Tackle"]);
        assert!(edges.is_ok(), "0 and 255 are both legal base stats");
    }

    #[test]
    fn test_duplicate_types_rejected() {
        let result = Species::new(
            "Twin",
            0,
            stats(50, 50, 50, 50, 50),
            PokemonType::Fire,
            Some(PokemonType::Fire),
            Vec::<String>::new(),
        );
        assert!(matches!(result, Err(SpeciesDataError::DuplicateType { .. })));
    }

    #[test]
    fn test_attack_effectiveness_multiplies_both_types() {
        let geodude = get_species_data("Geodude").expect("Geodude should be in the pokedex");
        assert_eq!(geodude.attack_effectiveness(PokemonType::Water), 4.0);
        assert_eq!(geodude.attack_effectiveness(PokemonType::Electric), 0.0);
        assert_eq!(geodude.attack_effectiveness(PokemonType::Normal), 0.5);

        let gastly = get_species_data("Gastly").expect("Gastly should be in the pokedex");
        assert_eq!(gastly.attack_effectiveness(PokemonType::Normal), 0.0);
    }

    #[test]
    fn test_critical_hit_threshold_branches() {
        let species = Species::new("Fast", 0, stats(50, 50, 50, 100, 50), PokemonType::Normal, None, ["Tackle"])
            .expect("valid species");
        assert_eq!(species.critical_hit_threshold(false, false), 50);
        assert_eq!(species.critical_hit_threshold(true, false), 255);
        assert_eq!(species.critical_hit_threshold(false, true), 12);
        assert_eq!(species.critical_hit_threshold(true, true), 100);

        let slow = Species::new("Slow", 0, stats(50, 50, 50, 30, 50), PokemonType::Normal, None, ["Tackle"])
            .expect("valid species");
        assert_eq!(slow.critical_hit_threshold(true, false), 120);
        assert!(
            slow.critical_hit_threshold(true, true) < slow.critical_hit_threshold(true, false),
            "Focus Energy lowers the high-crit threshold"
        );
    }

    #[test]
    fn test_pokedex_lookup() {
        let pikachu = get_species_data("Pikachu").expect("Pikachu should be in the pokedex");
        assert_eq!(pikachu.dex_number(), 25);
        assert!(pikachu.can_learn("Thunderbolt"));
        assert!(!pikachu.can_learn("Surf"));

        assert!(matches!(
            get_species_data("Missingno"),
            Err(SpeciesDataError::SpeciesNotFound(_))
        ));
    }

    #[test]
    fn test_all_species_sorted_by_dex_number() {
        let species = all_species().expect("pokedex should load");
        assert!(!species.is_empty());
        assert!(species.windows(2).all(|w| w[0].dex_number() < w[1].dex_number()));
        assert_eq!(species[0].name(), "Bulbasaur");
    }
}
