//! Battle format configuration: which species and moves are legal, team and
//! turn limits, and the toggleable clauses.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::errors::{RulesetError, RulesetResult};
use crate::move_data;
use crate::moves::{Move, STRUGGLE};
use crate::pokemon::PartyPokemon;
use crate::species::{self, Species};

pub const MAX_TEAM_SIZE: usize = 6;
pub const DEFAULT_MAX_TURNS: u32 = 1000;

/// An immutable, validated battle format. Build one with [`RulesetBuilder`].
#[derive(Debug, Clone)]
pub struct Ruleset {
    species: BTreeMap<String, Arc<Species>>,
    moves: BTreeMap<String, Arc<Move>>,
    struggle: Arc<Move>,
    max_team_size: usize,
    max_turns: Option<u32>,
    use_pp: bool,
    deterministic_damage: bool,
    accuracy_checks: bool,
    sleep_clause: bool,
    freeze_clause: bool,
    species_clause: bool,
    ohko_clause: bool,
    evasion_clause: bool,
}

impl Ruleset {
    pub fn builder() -> RulesetBuilder {
        RulesetBuilder::default()
    }

    /// Every built-in species and move, every clause on.
    pub fn standard() -> crate::errors::BattleResult<Self> {
        Ok(RulesetBuilder::default()
            .species(species::all_species()?)
            .moves(move_data::all_moves()?)
            .build()?)
    }

    /// The three starters and the moves they know at level 17.
    pub fn basic_rival() -> crate::errors::BattleResult<Self> {
        let species = ["Bulbasaur", "Charmander", "Squirtle"]
            .iter()
            .map(|name| species::get_species_data(name))
            .collect::<Result<Vec<_>, _>>()?;
        let moves = move_data::moves_by_name(&[
            STRUGGLE,
            "Tackle",
            "Growl",
            "Leech Seed",
            "Vine Whip",
            "Scratch",
            "Ember",
            "Leer",
            "Tail Whip",
            "Bubble",
            "Water Gun",
        ])?;
        Ok(RulesetBuilder::default()
            .species(species)
            .moves(moves)
            .max_team_size(1)
            .build()?)
    }

    pub fn species(&self) -> impl Iterator<Item = &Arc<Species>> {
        self.species.values()
    }

    pub fn moves(&self) -> impl Iterator<Item = &Arc<Move>> {
        self.moves.values()
    }

    pub fn struggle(&self) -> &Arc<Move> {
        &self.struggle
    }

    pub fn is_species_legal(&self, name: &str) -> bool {
        self.species.contains_key(name)
    }

    pub fn is_move_legal(&self, name: &str) -> bool {
        self.moves.contains_key(name)
    }

    pub fn max_team_size(&self) -> usize {
        self.max_team_size
    }

    pub fn max_turns(&self) -> Option<u32> {
        self.max_turns
    }

    pub fn use_pp(&self) -> bool {
        self.use_pp
    }

    pub fn deterministic_damage(&self) -> bool {
        self.deterministic_damage
    }

    pub fn accuracy_checks(&self) -> bool {
        self.accuracy_checks
    }

    pub fn sleep_clause(&self) -> bool {
        self.sleep_clause
    }

    pub fn freeze_clause(&self) -> bool {
        self.freeze_clause
    }

    pub fn species_clause(&self) -> bool {
        self.species_clause
    }

    pub fn ohko_clause(&self) -> bool {
        self.ohko_clause
    }

    pub fn evasion_clause(&self) -> bool {
        self.evasion_clause
    }

    /// Checks a single roster entry's species and moves against this format.
    pub fn validate_pokemon(&self, pokemon: &PartyPokemon) -> RulesetResult<()> {
        let species_name = pokemon.species().name();
        if !self.is_species_legal(species_name) {
            return Err(RulesetError::IllegalSpecies(species_name.to_string()));
        }

        for move_ in pokemon.moves().iter().flatten() {
            if !self.is_move_legal(move_.name()) {
                return Err(RulesetError::IllegalMove {
                    species: species_name.to_string(),
                    move_name: move_.name().to_string(),
                });
            }
            if self.ohko_clause && move_.is_one_hit_ko() {
                return Err(RulesetError::OhkoMoveBanned(move_.name().to_string()));
            }
            if self.evasion_clause && move_.raises_evasion() {
                return Err(RulesetError::EvasionMoveBanned(move_.name().to_string()));
            }
        }
        Ok(())
    }

    pub fn pokemon_is_legal(&self, pokemon: &PartyPokemon) -> bool {
        self.validate_pokemon(pokemon).is_ok()
    }

    /// Checks team size, the species clause and every member.
    pub fn validate_team(&self, team: &[Arc<PartyPokemon>]) -> RulesetResult<()> {
        if team.is_empty() || team.len() > self.max_team_size {
            return Err(RulesetError::InvalidTeamSize {
                size: team.len(),
                max: self.max_team_size,
            });
        }

        if self.species_clause {
            let mut seen = HashSet::new();
            for pokemon in team {
                let name = pokemon.species().name();
                if !seen.insert(name) {
                    return Err(RulesetError::DuplicateSpecies(name.to_string()));
                }
            }
        }

        team.iter().try_for_each(|pokemon| self.validate_pokemon(pokemon))
    }

    pub fn team_is_valid(&self, team: &[Arc<PartyPokemon>]) -> bool {
        self.validate_team(team).is_ok()
    }
}

/// Collects a ruleset's settings; [`RulesetBuilder::build`] validates them.
#[derive(Debug, Clone)]
pub struct RulesetBuilder {
    species: Vec<Arc<Species>>,
    moves: Vec<Arc<Move>>,
    max_team_size: usize,
    max_turns: Option<u32>,
    use_pp: bool,
    deterministic_damage: bool,
    accuracy_checks: bool,
    sleep_clause: bool,
    freeze_clause: bool,
    species_clause: bool,
    ohko_clause: bool,
    evasion_clause: bool,
}

impl Default for RulesetBuilder {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            moves: Vec::new(),
            max_team_size: MAX_TEAM_SIZE,
            max_turns: Some(DEFAULT_MAX_TURNS),
            use_pp: true,
            deterministic_damage: false,
            accuracy_checks: true,
            sleep_clause: true,
            freeze_clause: true,
            species_clause: true,
            ohko_clause: true,
            evasion_clause: true,
        }
    }
}

impl RulesetBuilder {
    pub fn species(mut self, species: impl IntoIterator<Item = Arc<Species>>) -> Self {
        self.species.extend(species);
        self
    }

    pub fn moves(mut self, moves: impl IntoIterator<Item = Arc<Move>>) -> Self {
        self.moves.extend(moves);
        self
    }

    pub fn max_team_size(mut self, size: usize) -> Self {
        self.max_team_size = size;
        self
    }

    pub fn max_turns(mut self, turns: Option<u32>) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn use_pp(mut self, enabled: bool) -> Self {
        self.use_pp = enabled;
        self
    }

    pub fn deterministic_damage(mut self, enabled: bool) -> Self {
        self.deterministic_damage = enabled;
        self
    }

    pub fn accuracy_checks(mut self, enabled: bool) -> Self {
        self.accuracy_checks = enabled;
        self
    }

    pub fn sleep_clause(mut self, enabled: bool) -> Self {
        self.sleep_clause = enabled;
        self
    }

    pub fn freeze_clause(mut self, enabled: bool) -> Self {
        self.freeze_clause = enabled;
        self
    }

    pub fn species_clause(mut self, enabled: bool) -> Self {
        self.species_clause = enabled;
        self
    }

    pub fn ohko_clause(mut self, enabled: bool) -> Self {
        self.ohko_clause = enabled;
        self
    }

    pub fn evasion_clause(mut self, enabled: bool) -> Self {
        self.evasion_clause = enabled;
        self
    }

    pub fn build(self) -> RulesetResult<Ruleset> {
        if self.species.is_empty() {
            return Err(RulesetError::NoSpecies);
        }
        if self.moves.is_empty() {
            return Err(RulesetError::NoMoves);
        }
        if !(1..=MAX_TEAM_SIZE).contains(&self.max_team_size) {
            return Err(RulesetError::InvalidMaxTeamSize(self.max_team_size));
        }
        if self.max_turns == Some(0) {
            return Err(RulesetError::InvalidMaxTurns);
        }

        let moves: BTreeMap<String, Arc<Move>> = self
            .moves
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect();

        // Struggle is kept even when PP is off so the engine always has a fallback.
        let struggle = match moves.get(STRUGGLE) {
            Some(struggle) => struggle.clone(),
            None if self.use_pp => return Err(RulesetError::StruggleRequired),
            None => move_data::struggle().map_err(|_| RulesetError::StruggleRequired)?,
        };

        let species: BTreeMap<String, Arc<Species>> = self
            .species
            .into_iter()
            .map(|s| (s.name().to_string(), s))
            .collect();

        for s in species.values() {
            if !s.moveset().iter().any(|name| moves.contains_key(name)) {
                return Err(RulesetError::SpeciesWithoutMoves(s.name().to_string()));
            }
        }

        Ok(Ruleset {
            species,
            moves,
            struggle,
            max_team_size: self.max_team_size,
            max_turns: self.max_turns,
            use_pp: self.use_pp,
            deterministic_damage: self.deterministic_damage,
            accuracy_checks: self.accuracy_checks,
            sleep_clause: self.sleep_clause,
            freeze_clause: self.freeze_clause,
            species_clause: self.species_clause,
            ohko_clause: self.ohko_clause,
            evasion_clause: self.evasion_clause,
        })
    }
}
