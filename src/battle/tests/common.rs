use std::collections::VecDeque;
use std::sync::Arc;

use schema::Status;

use crate::battle::ai::Behavior;
use crate::battle::commands::PlayerSide;
use crate::battle::state::{BattleEvent, BattleRng, BattleState};
use crate::errors::BattleResult;
use crate::move_data;
use crate::player::{BattlePlayer, PlayerAction};
use crate::pokemon::PartyPokemon;
use crate::ruleset::{Ruleset, RulesetBuilder};
use crate::species;

/// A builder for test pokemon with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu", 25)
///     .with_moves(&["Thunder Shock"])
///     .with_status(Status::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: String,
    level: u8,
    moves: Vec<String>,
    status: Status,
    sleep_turns: u8,
    current_hp: Option<u16>,
}

/// A roster entry plus the in-battle state it should start with.
pub struct TestPokemon {
    pub party: Arc<PartyPokemon>,
    pub status: Status,
    pub sleep_turns: u8,
    pub current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            moves: Vec::new(),
            status: Status::None,
            sleep_turns: 0,
            current_hp: None,
        }
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Asleep for `turns` more move attempts.
    pub fn asleep_for(mut self, turns: u8) -> Self {
        self.status = Status::Sleep;
        self.sleep_turns = turns;
        self
    }

    /// Sets the starting HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> TestPokemon {
        let moves: Vec<&str> = self.moves.iter().map(String::as_str).collect();
        let party = match PartyPokemon::from_names(&self.species, self.level, &moves) {
            Ok(party) => party,
            Err(err) => panic!("Failed to build test {}: {}", self.species, err),
        };
        TestPokemon {
            party: Arc::new(party),
            status: self.status,
            sleep_turns: self.sleep_turns,
            current_hp: self.current_hp,
        }
    }
}

fn all_catalog() -> RulesetBuilder {
    Ruleset::builder()
        .species(assert_ok(species::all_species().map_err(Into::into)))
        .moves(assert_ok(move_data::all_moves().map_err(Into::into)))
}

/// Every built-in species and move with default toggles.
pub fn standard_ruleset() -> Arc<Ruleset> {
    Arc::new(assert_ok(all_catalog().build().map_err(Into::into)))
}

/// No accuracy rolls, no crits and a fixed damage roll, so scripted tests only
/// need values for the draws they care about.
pub fn deterministic_ruleset() -> Arc<Ruleset> {
    custom_ruleset(|builder| builder)
}

/// The deterministic ruleset with extra toggles applied.
pub fn custom_ruleset(configure: impl FnOnce(RulesetBuilder) -> RulesetBuilder) -> Arc<Ruleset> {
    let builder = all_catalog().deterministic_damage(true).accuracy_checks(false);
    Arc::new(assert_ok(configure(builder).build().map_err(Into::into)))
}

fn apply_start_state(player: &mut BattlePlayer, team: &[TestPokemon]) {
    for (battling, spec) in player.team.iter_mut().zip(team) {
        battling.set_status(spec.status);
        battling.set_sleep_turns(spec.sleep_turns);
        if let Some(hp) = spec.current_hp {
            if let Err(err) = battling.set_hp(hp) {
                panic!("Invalid test HP: {}", err);
            }
        }
    }
}

pub fn party(team: &[TestPokemon]) -> Vec<Arc<PartyPokemon>> {
    team.iter().map(|pokemon| pokemon.party.clone()).collect()
}

/// Creates a battle state for two teams under `ruleset`.
pub fn create_team_battle(team1: Vec<TestPokemon>, team2: Vec<TestPokemon>, ruleset: Arc<Ruleset>) -> BattleState {
    let mut state = BattleState::from_teams(&party(&team1), &party(&team2), ruleset);
    apply_start_state(state.player_mut(PlayerSide::Player1), &team1);
    apply_start_state(state.player_mut(PlayerSide::Player2), &team2);
    state
}

/// Creates a 1v1 battle state under the deterministic ruleset.
pub fn create_test_battle(p1_pokemon: TestPokemon, p2_pokemon: TestPokemon) -> BattleState {
    create_team_battle(vec![p1_pokemon], vec![p2_pokemon], deterministic_ruleset())
}

/// A scripted rng with no values: any draw panics.
pub fn no_draws() -> BattleRng {
    BattleRng::new_for_test(Vec::new())
}

/// All events logged so far, flattened across turns.
pub fn events(state: &BattleState) -> Vec<BattleEvent> {
    state.log.events().cloned().collect()
}

pub fn active_hp(state: &BattleState, side: PlayerSide) -> u16 {
    state.player(side).active_pokemon().current_hp()
}

/// Plays the queued actions in order, then falls back to the first legal one.
pub struct ScriptedAgent {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedAgent {
    pub fn new(actions: Vec<PlayerAction>) -> Self {
        Self { actions: actions.into() }
    }

    pub fn first_legal() -> Self {
        Self::new(Vec::new())
    }
}

impl Behavior for ScriptedAgent {
    fn choose_action(&mut self, _state: &BattleState, _side: PlayerSide, legal: &[PlayerAction]) -> PlayerAction {
        self.actions.pop_front().unwrap_or(legal[0])
    }
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
