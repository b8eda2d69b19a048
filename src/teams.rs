//! Team generators feed self-play with successive legal rosters.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::errors::BattleResult;
use crate::pokemon::PartyPokemon;
use crate::prefab_teams::{get_prefab_teams, PrefabTeam};

pub type Team = Vec<Arc<PartyPokemon>>;

/// Produces distinct teams until exhausted.
pub trait TeamGenerator: Send {
    /// The next team, or `None` once every team has been handed out.
    fn generate_team(&mut self) -> Option<Team>;

    /// Restarts enumeration from the first team.
    fn reset(&mut self);

    /// Drains the generator from its current position.
    fn collect_teams(&mut self) -> Vec<Team> {
        std::iter::from_fn(|| self.generate_team()).collect()
    }
}

pub const BASIC_RIVAL_LEVEL: u8 = 17;

const BASIC_RIVAL_ROSTER: [(&str, [&str; 4]); 3] = [
    ("Bulbasaur", ["Tackle", "Growl", "Leech Seed", "Vine Whip"]),
    ("Charmander", ["Scratch", "Growl", "Ember", "Leer"]),
    ("Squirtle", ["Tackle", "Tail Whip", "Bubble", "Water Gun"]),
];

/// One-starter teams for the `Ruleset::basic_rival` format, handed out in a
/// seeded random order.
#[derive(Debug)]
pub struct BasicRivalTeamGenerator {
    starters: Vec<Arc<PartyPokemon>>,
    order: Vec<usize>,
    next: usize,
    rng: StdRng,
}

impl BasicRivalTeamGenerator {
    pub fn new(seed: u64) -> BattleResult<Self> {
        let starters = BASIC_RIVAL_ROSTER
            .iter()
            .map(|(species, moves)| PartyPokemon::from_names(species, BASIC_RIVAL_LEVEL, moves).map(Arc::new))
            .collect::<BattleResult<Vec<_>>>()?;

        let mut generator = Self {
            order: (0..starters.len()).collect(),
            starters,
            next: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        generator.reset();
        Ok(generator)
    }
}

impl TeamGenerator for BasicRivalTeamGenerator {
    fn generate_team(&mut self) -> Option<Team> {
        let index = *self.order.get(self.next)?;
        self.next += 1;
        Some(vec![self.starters[index].clone()])
    }

    fn reset(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.next = 0;
        debug!(order = ?self.order, "basic rival teams shuffled");
    }
}

/// Hands out the built-in prefab teams in their listed order.
#[derive(Debug)]
pub struct PrefabTeamGenerator {
    teams: Vec<Team>,
    next: usize,
}

impl PrefabTeamGenerator {
    pub fn new() -> BattleResult<Self> {
        Self::from_prefabs(&get_prefab_teams())
    }

    pub fn from_prefabs(prefabs: &[PrefabTeam]) -> BattleResult<Self> {
        let teams = prefabs.iter().map(PrefabTeam::build).collect::<BattleResult<Vec<_>>>()?;
        Ok(Self { teams, next: 0 })
    }
}

impl TeamGenerator for PrefabTeamGenerator {
    fn generate_team(&mut self) -> Option<Team> {
        let team = self.teams.get(self.next)?.clone();
        self.next += 1;
        Some(team)
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;
    use std::collections::HashSet;

    fn species_of(team: &Team) -> Vec<String> {
        team.iter().map(|pokemon| pokemon.species().name().to_string()).collect()
    }

    #[test]
    fn test_basic_rival_generator_exhausts_after_three_teams() {
        let mut generator = BasicRivalTeamGenerator::new(7).unwrap();
        let teams = generator.collect_teams();

        assert_eq!(teams.len(), 3);
        assert!(generator.generate_team().is_none());

        let names: HashSet<String> = teams.iter().flat_map(species_of).collect();
        let expected: HashSet<String> =
            ["Bulbasaur", "Charmander", "Squirtle"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_basic_rival_teams_are_legal() {
        let ruleset = Ruleset::basic_rival().unwrap();
        let mut generator = BasicRivalTeamGenerator::new(3).unwrap();

        while let Some(team) = generator.generate_team() {
            assert_eq!(team.len(), 1);
            assert_eq!(team[0].level(), BASIC_RIVAL_LEVEL);
            assert!(ruleset.team_is_valid(&team), "{:?} should be legal", species_of(&team));
        }
    }

    #[test]
    fn test_basic_rival_order_is_reproducible() {
        let first_order = |seed| {
            let mut generator = BasicRivalTeamGenerator::new(seed).unwrap();
            generator.collect_teams().iter().flat_map(species_of).collect::<Vec<_>>()
        };

        assert_eq!(first_order(11), first_order(11));
    }

    #[test]
    fn test_reset_restarts_enumeration() {
        let mut generator = BasicRivalTeamGenerator::new(5).unwrap();
        generator.collect_teams();
        assert!(generator.generate_team().is_none());

        generator.reset();
        assert_eq!(generator.collect_teams().len(), 3);
    }

    #[test]
    fn test_prefab_generator_yields_every_prefab() {
        let ruleset = Ruleset::standard().unwrap();
        let mut generator = PrefabTeamGenerator::new().unwrap();
        let teams = generator.collect_teams();

        assert_eq!(teams.len(), get_prefab_teams().len());
        for team in &teams {
            assert_eq!(team.len(), 6);
            assert!(ruleset.team_is_valid(team));
        }

        generator.reset();
        let again = generator.generate_team().unwrap();
        assert_eq!(species_of(&again), species_of(&teams[0]));
    }
}
