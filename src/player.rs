use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::battle::battling::BattlingPokemon;
use crate::battle::conditions::ActivePokemon;
use crate::errors::BattleStateError;
use crate::pokemon::PartyPokemon;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active Pokémon's move list.
    UseMove { move_index: usize },

    // The index refers to the Pokémon's position (0-5) in the player's team.
    SwitchPokemon { team_index: usize },
}

impl PlayerAction {
    pub fn is_switch(&self) -> bool {
        matches!(self, PlayerAction::SwitchPokemon { .. })
    }
}

/// One side of a battle.
#[derive(Serialize, Debug, Clone)]
pub struct BattlePlayer {
    pub player_name: String,

    // The player's full team of 1-6 battling Pokémon.
    pub team: Vec<BattlingPokemon>,

    // The index into `team` of the Pokémon currently in play.
    pub active_pokemon_index: usize,

    // Volatile state of the Pokémon in play; replaced on every switch.
    pub active: ActivePokemon,
}

impl BattlePlayer {
    pub fn new(player_name: impl Into<String>, team: &[Arc<PartyPokemon>]) -> Self {
        Self {
            player_name: player_name.into(),
            team: team.iter().cloned().map(BattlingPokemon::new).collect(),
            active_pokemon_index: 0,
            active: ActivePokemon::new(),
        }
    }

    pub fn active_pokemon(&self) -> &BattlingPokemon {
        &self.team[self.active_pokemon_index]
    }

    pub fn active_pokemon_mut(&mut self) -> &mut BattlingPokemon {
        &mut self.team[self.active_pokemon_index]
    }

    /// Brings another roster slot into play with fresh volatile state.
    pub fn switch_pokemon(&mut self, new_index: usize) -> Result<(), BattleStateError> {
        if new_index >= self.team.len() {
            return Err(BattleStateError::InvalidPokemonIndex(new_index));
        }
        self.active_pokemon_index = new_index;
        self.active = ActivePokemon::new();
        Ok(())
    }

    /// Roster slots that could be switched in right now.
    pub fn switch_targets(&self) -> impl Iterator<Item = usize> + '_ {
        self.team
            .iter()
            .enumerate()
            .filter(move |(i, pokemon)| *i != self.active_pokemon_index && !pokemon.is_fainted())
            .map(|(i, _)| i)
    }

    /// A side is out of the battle once every roster member is at 0 HP.
    pub fn is_defeated(&self) -> bool {
        self.team.iter().all(BattlingPokemon::is_fainted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::ModifiableStat;

    fn team() -> Vec<Arc<PartyPokemon>> {
        [("Pikachu", "Thunder Shock"), ("Rattata", "Tackle"), ("Meowth", "Scratch")]
            .iter()
            .map(|(name, move_name)| Arc::new(PartyPokemon::from_names(name, 20, &[*move_name]).unwrap()))
            .collect()
    }

    #[test]
    fn test_switch_resets_volatile_state() {
        let mut player = BattlePlayer::new("Red", &team());
        player.active.modify_stat(ModifiableStat::Attack, 2);
        player.active_pokemon_mut().deal_damage(5);

        player.switch_pokemon(1).unwrap();
        assert_eq!(player.active_pokemon_index, 1);
        assert_eq!(player.active.stat_stage(ModifiableStat::Attack), 0);

        player.switch_pokemon(0).unwrap();
        assert!(player.active_pokemon().current_hp() < player.active_pokemon().max_hp());

        assert_eq!(player.switch_pokemon(6), Err(BattleStateError::InvalidPokemonIndex(6)));
    }

    #[test]
    fn test_switch_targets_skip_active_and_fainted() {
        let mut player = BattlePlayer::new("Blue", &team());
        assert_eq!(player.switch_targets().collect::<Vec<_>>(), vec![1, 2]);

        player.team[2].deal_damage(u16::MAX);
        assert_eq!(player.switch_targets().collect::<Vec<_>>(), vec![1]);
        assert!(!player.is_defeated());

        for pokemon in &mut player.team {
            pokemon.deal_damage(u16::MAX);
        }
        assert!(player.is_defeated());
    }
}
