use std::sync::Arc;

use schema::Status;
use serde::Serialize;

use crate::errors::BattleStateError;
use crate::moves::Move;
use crate::pokemon::{PartyPokemon, Stats};
use crate::species::Species;

/// Per-battle state of one roster entry. Lives for the whole battle,
/// whether or not the entry is currently in play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattlingPokemon {
    #[serde(skip)]
    pokemon: Arc<PartyPokemon>,
    current_hp: u16,
    status: Status,
    /// Remaining PP per move slot; `None` for a placeholder slot.
    pp: Vec<Option<u8>>,
    /// Move attempts left before a sleeping pokemon wakes.
    sleep_turns: u8,
}

impl BattlingPokemon {
    pub fn new(pokemon: Arc<PartyPokemon>) -> Self {
        let pp = pokemon.moves().iter().map(|slot| slot.as_ref().map(|m| m.pp())).collect();
        Self {
            current_hp: pokemon.max_hp(),
            status: Status::None,
            pp,
            sleep_turns: 0,
            pokemon,
        }
    }

    pub fn pokemon(&self) -> &Arc<PartyPokemon> {
        &self.pokemon
    }

    pub fn species(&self) -> &Species {
        self.pokemon.species()
    }

    pub fn name(&self) -> &str {
        self.pokemon.name()
    }

    pub fn level(&self) -> u8 {
        self.pokemon.level()
    }

    pub fn stats(&self) -> &Stats {
        self.pokemon.stats()
    }

    pub fn max_hp(&self) -> u16 {
        self.pokemon.max_hp()
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn set_hp(&mut self, hp: u16) -> Result<(), BattleStateError> {
        if hp > self.max_hp() {
            return Err(BattleStateError::InvalidHp { hp, max_hp: self.max_hp() });
        }
        self.current_hp = hp;
        Ok(())
    }

    /// Removes up to `amount` HP and returns how much was actually lost.
    pub fn deal_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restores up to `amount` HP and returns how much was actually gained.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += healed;
        healed
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        if status != Status::Sleep {
            self.sleep_turns = 0;
        }
    }

    pub fn sleep_turns(&self) -> u8 {
        self.sleep_turns
    }

    pub fn set_sleep_turns(&mut self, turns: u8) {
        self.sleep_turns = turns;
    }

    pub fn move_at(&self, slot: usize) -> Option<&Arc<Move>> {
        self.pokemon.moves().get(slot).and_then(Option::as_ref)
    }

    pub fn move_count(&self) -> usize {
        self.pp.len()
    }

    pub fn pp(&self, slot: usize) -> Option<u8> {
        self.pp.get(slot).copied().flatten()
    }

    /// True if any filled slot still has PP.
    pub fn has_usable_move(&self) -> bool {
        self.pp.iter().flatten().any(|&pp| pp > 0)
    }

    pub fn use_pp(&mut self, slot: usize) -> Result<(), BattleStateError> {
        match self.pp.get_mut(slot) {
            Some(Some(pp)) => {
                *pp = pp.saturating_sub(1);
                Ok(())
            }
            _ => Err(BattleStateError::InvalidMoveIndex(slot)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_data::get_move_data;
    use crate::pokemon::{Dvs, StatExperience};
    use crate::species::get_species_data;
    use pretty_assertions::assert_eq;

    fn pikachu() -> BattlingPokemon {
        let party = PartyPokemon::from_names("Pikachu", 25, &["Thunder Shock", "Growl", "Quick Attack"]).unwrap();
        BattlingPokemon::new(Arc::new(party))
    }

    #[test]
    fn test_new_starts_healthy_with_full_pp() {
        let pokemon = pikachu();
        assert_eq!(pokemon.current_hp(), pokemon.max_hp());
        assert_eq!(pokemon.status(), Status::None);
        for slot in 0..pokemon.move_count() {
            let max_pp = pokemon.move_at(slot).unwrap().pp();
            assert_eq!(pokemon.pp(slot), Some(max_pp));
        }
        assert_eq!(pokemon.pp(3), None);
    }

    #[test]
    fn test_placeholder_slot_has_no_pp() {
        let party = PartyPokemon::new(
            get_species_data("Pikachu").unwrap(),
            10,
            vec![None, Some(get_move_data("Growl").unwrap())],
            Dvs::MAX,
            StatExperience::MAX,
            None,
        )
        .unwrap();
        let mut pokemon = BattlingPokemon::new(Arc::new(party));
        assert_eq!(pokemon.pp(0), None);
        assert_eq!(pokemon.pp(1), Some(40));
        assert!(pokemon.use_pp(0).is_err());
        assert!(pokemon.use_pp(1).is_ok());
        assert_eq!(pokemon.pp(1), Some(39));
    }

    #[test]
    fn test_hp_stays_in_bounds() {
        let mut pokemon = pikachu();
        let max_hp = pokemon.max_hp();

        for amount in [0, 1, 7, max_hp, u16::MAX] {
            pokemon.deal_damage(amount);
            assert!(pokemon.current_hp() <= max_hp);
            pokemon.heal(amount);
            assert!(pokemon.current_hp() <= max_hp);
        }

        assert_eq!(pokemon.deal_damage(u16::MAX), max_hp);
        assert_eq!(pokemon.current_hp(), 0);
        assert!(pokemon.is_fainted());
        assert_eq!(pokemon.heal(u16::MAX), max_hp);
        assert_eq!(pokemon.current_hp(), max_hp);
    }

    #[test]
    fn test_set_hp_validates_upper_bound() {
        let mut pokemon = pikachu();
        let max_hp = pokemon.max_hp();
        assert!(pokemon.set_hp(0).is_ok());
        assert_eq!(
            pokemon.set_hp(max_hp + 1),
            Err(BattleStateError::InvalidHp { hp: max_hp + 1, max_hp })
        );
        assert_eq!(pokemon.current_hp(), 0);
    }

    #[test]
    fn test_pp_exhaustion() {
        let mut pokemon = pikachu();
        assert!(pokemon.has_usable_move());
        for slot in 0..pokemon.move_count() {
            while pokemon.pp(slot) != Some(0) {
                pokemon.use_pp(slot).unwrap();
            }
        }
        assert!(!pokemon.has_usable_move());
    }
}
