use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::BattleResult;
use crate::pokemon::PartyPokemon;

/// A predefined six-pokemon roster for evaluation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabTeam {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pokemon: Vec<PrefabPokemon>,
}

/// A predefined roster entry, named against the built-in catalogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabPokemon {
    pub species: String,
    pub level: u8,
    pub moves: Vec<String>,
}

impl PrefabPokemon {
    fn new(species: &str, level: u8, moves: [&str; 4]) -> Self {
        Self {
            species: species.to_string(),
            level,
            moves: moves.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn build(&self) -> BattleResult<PartyPokemon> {
        let moves: Vec<&str> = self.moves.iter().map(String::as_str).collect();
        PartyPokemon::from_names(&self.species, self.level, &moves)
    }
}

impl PrefabTeam {
    /// Builds every roster entry with maximum DVs and stat experience.
    pub fn build(&self) -> BattleResult<Vec<Arc<PartyPokemon>>> {
        self.pokemon.iter().map(|entry| entry.build().map(Arc::new)).collect()
    }
}

const PREFAB_LEVEL: u8 = 60;

/// Get all available prefab teams
pub fn get_prefab_teams() -> Vec<PrefabTeam> {
    vec![
        PrefabTeam {
            id: "venusaur_team".to_string(),
            name: "Venusaur Team".to_string(),
            description: "Sleep and drain up front, with heavy physical hitters behind".to_string(),
            pokemon: vec![
                PrefabPokemon::new("Venusaur", PREFAB_LEVEL, ["Sleep Powder", "Razor Leaf", "Leech Seed", "Body Slam"]),
                PrefabPokemon::new("Charizard", PREFAB_LEVEL, ["Flamethrower", "Earthquake", "Slash", "Swords Dance"]),
                PrefabPokemon::new("Lapras", PREFAB_LEVEL, ["Blizzard", "Surf", "Thunderbolt", "Sing"]),
                PrefabPokemon::new("Nidoking", PREFAB_LEVEL, ["Earthquake", "Thunderbolt", "Ice Beam", "Double Kick"]),
                PrefabPokemon::new("Machamp", PREFAB_LEVEL, ["Submission", "Karate Chop", "Rock Slide", "Focus Energy"]),
                PrefabPokemon::new("Snorlax", PREFAB_LEVEL, ["Body Slam", "Headbutt", "Amnesia", "Earthquake"]),
            ],
        },
        PrefabTeam {
            id: "blastoise_team".to_string(),
            name: "Blastoise Team".to_string(),
            description: "Paralysis and screens supporting wide type coverage".to_string(),
            pokemon: vec![
                PrefabPokemon::new("Blastoise", PREFAB_LEVEL, ["Hydro Pump", "Ice Beam", "Earthquake", "Reflect"]),
                PrefabPokemon::new("Dragonite", PREFAB_LEVEL, ["Body Slam", "Thunder Wave", "Dragon Rage", "Agility"]),
                PrefabPokemon::new("Alakazam", PREFAB_LEVEL, ["Psychic", "Thunder Wave", "Reflect", "Seismic Toss"]),
                PrefabPokemon::new("Golem", PREFAB_LEVEL, ["Earthquake", "Rock Slide", "Body Slam", "Harden"]),
                PrefabPokemon::new("Gengar", PREFAB_LEVEL, ["Hypnosis", "Night Shade", "Thunderbolt", "Confuse Ray"]),
                PrefabPokemon::new("Tauros", PREFAB_LEVEL, ["Body Slam", "Stomp", "Earthquake", "Blizzard"]),
            ],
        },
        PrefabTeam {
            id: "raichu_team".to_string(),
            name: "Raichu Team".to_string(),
            description: "Fast special attackers backed by status spreaders".to_string(),
            pokemon: vec![
                PrefabPokemon::new("Raichu", PREFAB_LEVEL, ["Thunderbolt", "Thunder Wave", "Body Slam", "Agility"]),
                PrefabPokemon::new("Starmie", PREFAB_LEVEL, ["Surf", "Psychic", "Thunder Wave", "Light Screen"]),
                PrefabPokemon::new("Jynx", PREFAB_LEVEL, ["Lovely Kiss", "Blizzard", "Psychic", "Ice Punch"]),
                PrefabPokemon::new("Exeggutor", PREFAB_LEVEL, ["Sleep Powder", "Psychic", "Leech Seed", "Stun Spore"]),
                PrefabPokemon::new("Chansey", PREFAB_LEVEL, ["Ice Beam", "Thunderbolt", "Thunder Wave", "Seismic Toss"]),
                PrefabPokemon::new("Kangaskhan", PREFAB_LEVEL, ["Comet Punch", "Body Slam", "Earthquake", "Rock Slide"]),
            ],
        },
    ]
}

/// Look up a prefab team by id.
pub fn get_prefab_team(id: &str) -> Option<PrefabTeam> {
    get_prefab_teams().into_iter().find(|team| team.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;

    #[test]
    fn test_prefab_teams_build_and_are_legal() {
        let ruleset = Ruleset::standard().unwrap();

        for prefab in get_prefab_teams() {
            let team = prefab.build().unwrap();
            assert_eq!(team.len(), 6, "{} should have six members", prefab.id);
            if let Err(error) = ruleset.validate_team(&team) {
                panic!("{} is not legal: {}", prefab.id, error);
            }
        }
    }

    #[test]
    fn test_prefab_ids_are_unique() {
        let teams = get_prefab_teams();
        let mut ids: Vec<&str> = teams.iter().map(|team| team.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), teams.len());
    }

    #[test]
    fn test_get_prefab_team_by_id() {
        let team = get_prefab_team("blastoise_team").unwrap();
        assert_eq!(team.pokemon[0].species, "Blastoise");
        assert!(get_prefab_team("missingno_team").is_none());
    }

    #[test]
    fn test_unknown_move_is_reported() {
        let entry = PrefabPokemon::new("Pikachu", 20, ["Thunder Shock", "Growl", "Quick Attack", "Splash Dance"]);
        assert!(entry.build().is_err());
    }
}
