use schema::{ModifiableStat, Status};
use serde::{Deserialize, Serialize};

use crate::battle::conditions::VolatileCondition;
use crate::battle::state::{BattleEvent, BattleOutcome, BattleState};
use crate::errors::BattleStateError;

/// Player side for commands - provides type safety over raw indices
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSide {
    Player1,
    Player2,
}

impl PlayerSide {
    pub const BOTH: [PlayerSide; 2] = [PlayerSide::Player1, PlayerSide::Player2];

    pub fn to_index(self) -> usize {
        match self {
            PlayerSide::Player1 => 0,
            PlayerSide::Player2 => 1,
        }
    }

    pub fn opponent(self) -> PlayerSide {
        match self {
            PlayerSide::Player1 => PlayerSide::Player2,
            PlayerSide::Player2 => PlayerSide::Player1,
        }
    }

    pub fn from_index(index: usize) -> PlayerSide {
        match index {
            0 => PlayerSide::Player1,
            1 => PlayerSide::Player2,
            _ => panic!("Invalid player index: {}", index),
        }
    }
}

/// Atomic commands representing final state changes. Every command targets
/// the active pokemon of a side unless it names a roster slot.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    IncrementTurnNumber,
    SetOutcome(BattleOutcome),

    // Pokemon modifications
    DealDamage {
        target: PlayerSide,
        amount: u16,
    },
    HealPokemon {
        target: PlayerSide,
        amount: u16,
    },
    SetStatus {
        target: PlayerSide,
        status: Status,
    },
    SetSleepTurns {
        target: PlayerSide,
        turns: u8,
    },
    UsePp {
        target: PlayerSide,
        move_slot: usize,
    },

    // Volatile state changes
    ChangeStatStage {
        target: PlayerSide,
        stat: ModifiableStat,
        delta: i8,
    },
    SetConfusion {
        target: PlayerSide,
        turns: Option<u8>,
    },
    SetToxicCounter {
        target: PlayerSide,
        counter: Option<u8>,
    },
    AddCondition {
        target: PlayerSide,
        condition: VolatileCondition,
    },
    RemoveCondition {
        target: PlayerSide,
        condition: VolatileCondition,
    },
    SwitchPokemon {
        target: PlayerSide,
        new_pokemon_index: usize,
    },

    // Battle flow
    EmitEvent(BattleEvent),
}

pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
) -> Result<(), BattleStateError> {
    for command in commands {
        execute_command(command, state)?;
    }
    Ok(())
}

/// Helper function specifically for DealDamage command with event emission
fn execute_deal_damage_command(
    target: PlayerSide,
    amount: u16,
    state: &mut BattleState,
) -> Result<(), BattleStateError> {
    let pokemon = state.player_mut(target).active_pokemon_mut();
    let was_fainted = pokemon.is_fainted();
    let dealt = pokemon.deal_damage(amount);
    let remaining_hp = pokemon.current_hp();
    let name = pokemon.name().to_string();
    let fainted_now = !was_fainted && pokemon.is_fainted();

    state.log.push(BattleEvent::DamageDealt {
        target: name.clone(),
        damage: dealt,
        remaining_hp,
    });

    if fainted_now {
        tracing::debug!(side = ?target, pokemon = %name, "pokemon fainted");
        state.log.push(BattleEvent::PokemonFainted { side: target, pokemon: name });
    }
    Ok(())
}

fn execute_command(command: BattleCommand, state: &mut BattleState) -> Result<(), BattleStateError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            state.log.push(event);
            Ok(())
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
            Ok(())
        }
        BattleCommand::SetOutcome(outcome) => {
            state.outcome = Some(outcome);
            Ok(())
        }
        BattleCommand::DealDamage { target, amount } => {
            execute_deal_damage_command(target, amount, state)
        }
        BattleCommand::HealPokemon { target, amount } => {
            let pokemon = state.player_mut(target).active_pokemon_mut();
            let healed = pokemon.heal(amount);
            let new_hp = pokemon.current_hp();
            let name = pokemon.name().to_string();
            if healed > 0 {
                state.log.push(BattleEvent::PokemonHealed { target: name, amount: healed, new_hp });
            }
            Ok(())
        }
        BattleCommand::SetStatus { target, status } => {
            state.player_mut(target).active_pokemon_mut().set_status(status);
            Ok(())
        }
        BattleCommand::SetSleepTurns { target, turns } => {
            state.player_mut(target).active_pokemon_mut().set_sleep_turns(turns);
            Ok(())
        }
        BattleCommand::UsePp { target, move_slot } => {
            state.player_mut(target).active_pokemon_mut().use_pp(move_slot)
        }
        BattleCommand::ChangeStatStage { target, stat, delta } => {
            state.player_mut(target).active.modify_stat(stat, delta);
            Ok(())
        }
        BattleCommand::SetConfusion { target, turns } => {
            state.player_mut(target).active.set_confusion(turns);
            Ok(())
        }
        BattleCommand::SetToxicCounter { target, counter } => {
            state.player_mut(target).active.set_toxic_counter(counter);
            Ok(())
        }
        BattleCommand::AddCondition { target, condition } => {
            state.player_mut(target).active.set_condition(condition, true);
            Ok(())
        }
        BattleCommand::RemoveCondition { target, condition } => {
            state.player_mut(target).active.set_condition(condition, false);
            Ok(())
        }
        BattleCommand::SwitchPokemon { target, new_pokemon_index } => {
            let player = state.player_mut(target);
            let old_pokemon = player.active_pokemon().name().to_string();
            player.switch_pokemon(new_pokemon_index)?;
            let new_pokemon = player.active_pokemon().name().to_string();
            state.log.push(BattleEvent::PokemonSwitched { side: target, old_pokemon, new_pokemon });
            Ok(())
        }
    }
}
