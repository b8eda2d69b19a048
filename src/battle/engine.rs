use std::cmp::Ordering;
use std::sync::Arc;

use schema::Status;
use tracing::debug;

use crate::battle::calculators::confusion_self_damage;
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerSide};
use crate::battle::conditions::VolatileCondition;
use crate::battle::move_effects::{apply_move_effect, EffectContext};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleOutcome, BattleRng, BattleState};
use crate::battle::stats::{effective_speed, move_hits};
use crate::errors::BattleStateError;
use crate::moves::Move;
use crate::player::PlayerAction;

/// Chance (in percent) that a paralyzed pokemon cannot move.
const FULL_PARALYSIS_CHANCE: u8 = 25;

/// Legal actions for a general request. A move slot is legal while it is
/// filled and has PP. Once no slot has PP, a single `UseMove` stands for
/// Struggle.
pub fn get_valid_actions(state: &BattleState, side: PlayerSide) -> Vec<PlayerAction> {
    let player = state.player(side);
    let active = player.active_pokemon();
    let mut actions = Vec::new();

    // A. Generate "Use Move" Actions
    if !active.is_fainted() {
        let usable: Vec<PlayerAction> = (0..active.move_count())
            .filter(|&slot| active.pp(slot).is_some_and(|pp| pp > 0))
            .map(|move_index| PlayerAction::UseMove { move_index })
            .collect();

        if usable.is_empty() {
            let struggle_slot = (0..active.move_count())
                .find(|&slot| active.move_at(slot).is_some())
                .unwrap_or(0);
            actions.push(PlayerAction::UseMove { move_index: struggle_slot });
        } else {
            actions.extend(usable);
        }
    }

    // B. Generate "Switch Pokemon" Actions
    actions.extend(get_valid_replacements(state, side));
    actions
}

/// Legal actions for a switch-only request.
pub fn get_valid_replacements(state: &BattleState, side: PlayerSide) -> Vec<PlayerAction> {
    state
        .player(side)
        .switch_targets()
        .map(|team_index| PlayerAction::SwitchPokemon { team_index })
        .collect()
}

/// A side must replace its active pokemon when it fainted and a teammate can
/// still fight.
pub fn needs_replacement(state: &BattleState, side: PlayerSide) -> bool {
    let player = state.player(side);
    player.active_pokemon().is_fainted() && !player.is_defeated()
}

/// The move a slot will actually execute: the slot's move, or Struggle once
/// the slot has nothing left to use.
pub fn resolve_move(state: &BattleState, side: PlayerSide, move_index: usize) -> Arc<Move> {
    let active = state.player(side).active_pokemon();
    match active.move_at(move_index) {
        Some(move_) if !state.ruleset.use_pp() || active.pp(move_index).is_some_and(|pp| pp > 0) => {
            move_.clone()
        }
        _ => state.ruleset.struggle().clone(),
    }
}

/// Decides which side acts first this turn.
pub fn first_to_move(
    state: &BattleState,
    actions: &[PlayerAction; 2],
    rng: &mut BattleRng,
) -> PlayerSide {
    let by_speed = |rng: &mut BattleRng| {
        let speed1 = effective_speed(state.player(PlayerSide::Player1));
        let speed2 = effective_speed(state.player(PlayerSide::Player2));
        match speed1.partial_cmp(&speed2) {
            Some(Ordering::Greater) => PlayerSide::Player1,
            Some(Ordering::Less) => PlayerSide::Player2,
            _ => speed_tie(rng),
        }
    };

    let first = match actions {
        [PlayerAction::SwitchPokemon { .. }, PlayerAction::UseMove { .. }] => PlayerSide::Player1,
        [PlayerAction::UseMove { .. }, PlayerAction::SwitchPokemon { .. }] => PlayerSide::Player2,
        [PlayerAction::SwitchPokemon { .. }, PlayerAction::SwitchPokemon { .. }] => by_speed(rng),
        [PlayerAction::UseMove { move_index: index1 }, PlayerAction::UseMove { move_index: index2 }] => {
            let priority1 = resolve_move(state, PlayerSide::Player1, *index1).priority();
            let priority2 = resolve_move(state, PlayerSide::Player2, *index2).priority();
            match priority1.cmp(&priority2) {
                Ordering::Greater => PlayerSide::Player1,
                Ordering::Less => PlayerSide::Player2,
                Ordering::Equal => by_speed(rng),
            }
        }
    };
    debug!(?first, "action order resolved");
    first
}

fn speed_tie(rng: &mut BattleRng) -> PlayerSide {
    if rng.coin_flip("speed tie") {
        PlayerSide::Player1
    } else {
        PlayerSide::Player2
    }
}

pub fn execute_action(
    state: &mut BattleState,
    side: PlayerSide,
    action: PlayerAction,
    rng: &mut BattleRng,
) -> Result<(), BattleStateError> {
    match action {
        PlayerAction::UseMove { move_index } => use_move(state, side, move_index, rng),
        PlayerAction::SwitchPokemon { team_index } => execute_switch(state, side, team_index),
    }
}

pub fn execute_switch(
    state: &mut BattleState,
    side: PlayerSide,
    team_index: usize,
) -> Result<(), BattleStateError> {
    debug!(?side, team_index, "switching");
    execute_command_batch(
        vec![BattleCommand::SwitchPokemon { target: side, new_pokemon_index: team_index }],
        state,
    )
}

/// One move attempt by `side`'s active pokemon, including the residual
/// damage that follows it.
pub fn use_move(
    state: &mut BattleState,
    side: PlayerSide,
    move_index: usize,
    rng: &mut BattleRng,
) -> Result<(), BattleStateError> {
    if state.player(side).active_pokemon().is_fainted() {
        return Ok(());
    }

    if check_action_preventing_conditions(state, side, rng)? {
        let move_ = resolve_move(state, side, move_index);
        let mut commands = Vec::new();
        if state.ruleset.use_pp() && !move_.is_struggle() {
            commands.push(BattleCommand::UsePp { target: side, move_slot: move_index });
        }
        let pokemon = state.player(side).active_pokemon().name().to_string();
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
            side,
            pokemon: pokemon.clone(),
            move_name: move_.name().to_string(),
        }));
        execute_command_batch(commands, state)?;

        let context = EffectContext::new(side, move_.clone());
        let accuracy = if state.ruleset.accuracy_checks() { move_.accuracy() } else { None };
        let hits = move_hits(
            accuracy,
            &state.player(side).active,
            &state.player(side.opponent()).active,
            rng,
        );

        if hits {
            apply_move_effect(move_.effect(), &context, state, rng)?;
        } else {
            execute_command_batch(
                vec![BattleCommand::EmitEvent(BattleEvent::MoveMissed { attacker: pokemon })],
                state,
            )?;
        }
    }

    apply_residual_damage(state, side)
}

/// Runs the checks that can stop a move attempt, in order: flinch, sleep,
/// paralysis, freeze, confusion. Returns true if the move goes ahead.
fn check_action_preventing_conditions(
    state: &mut BattleState,
    side: PlayerSide,
    rng: &mut BattleRng,
) -> Result<bool, BattleStateError> {
    let player = state.player(side);
    let pokemon = player.active_pokemon();
    let name = pokemon.name().to_string();
    let fail = |reason| BattleCommand::EmitEvent(BattleEvent::ActionFailed { pokemon: name.clone(), reason });

    if player.active.is_flinched() {
        execute_command_batch(vec![fail(ActionFailureReason::IsFlinching)], state)?;
        return Ok(false);
    }

    match pokemon.status() {
        Status::Sleep => {
            let turns_left = pokemon.sleep_turns().saturating_sub(1);
            let commands = if turns_left == 0 {
                vec![
                    BattleCommand::SetStatus { target: side, status: Status::None },
                    fail(ActionFailureReason::WokeUp),
                ]
            } else {
                vec![
                    BattleCommand::SetSleepTurns { target: side, turns: turns_left },
                    fail(ActionFailureReason::IsAsleep),
                ]
            };
            execute_command_batch(commands, state)?;
            return Ok(false);
        }
        Status::Paralysis if rng.chance(FULL_PARALYSIS_CHANCE, "full paralysis") => {
            execute_command_batch(vec![fail(ActionFailureReason::IsParalyzed)], state)?;
            return Ok(false);
        }
        Status::Freeze => {
            execute_command_batch(vec![fail(ActionFailureReason::IsFrozen)], state)?;
            return Ok(false);
        }
        _ => {}
    }

    if let Some(turns) = player.active.confusion() {
        let turns_left = turns.saturating_sub(1);
        if turns_left == 0 {
            execute_command_batch(
                vec![
                    BattleCommand::SetConfusion { target: side, turns: None },
                    BattleCommand::EmitEvent(BattleEvent::ConfusionEnded { target: name.clone() }),
                ],
                state,
            )?;
            return Ok(true);
        }

        let mut commands = vec![BattleCommand::SetConfusion { target: side, turns: Some(turns_left) }];
        let hurt_itself = rng.coin_flip("confusion self-hit");
        if hurt_itself {
            let damage = confusion_self_damage(state, side, rng);
            commands.push(fail(ActionFailureReason::IsConfused));
            commands.push(BattleCommand::EmitEvent(BattleEvent::HurtItself { pokemon: name.clone() }));
            commands.push(BattleCommand::DealDamage { target: side, amount: damage });
        }
        execute_command_batch(commands, state)?;
        return Ok(!hurt_itself);
    }

    Ok(true)
}

/// Poison/burn damage and the leech seed drain that follow a move attempt.
pub fn apply_residual_damage(state: &mut BattleState, side: PlayerSide) -> Result<(), BattleStateError> {
    let opponent = side.opponent();
    if state.player(side).active_pokemon().is_fainted()
        || state.player(opponent).active_pokemon().is_fainted()
    {
        return Ok(());
    }

    let player = state.player(side);
    let pokemon = player.active_pokemon();
    let name = pokemon.name().to_string();
    let base = (pokemon.max_hp() / 16).max(1);

    let status = pokemon.status();
    if matches!(status, Status::Poison | Status::Burn) {
        let multiplier = match (status, player.active.toxic_counter()) {
            (Status::Poison, Some(counter)) => counter.max(1) as u16,
            _ => 1,
        };
        execute_command_batch(
            vec![
                BattleCommand::EmitEvent(BattleEvent::StatusDamage { target: name.clone(), status }),
                BattleCommand::DealDamage { target: side, amount: base.saturating_mul(multiplier) },
            ],
            state,
        )?;
    }

    let player = state.player(side);
    if player.active.is_seeded() && !player.active_pokemon().is_fainted() {
        let drained = base.min(player.active_pokemon().current_hp());
        execute_command_batch(
            vec![
                BattleCommand::EmitEvent(BattleEvent::LeechSeedDrain { pokemon: name }),
                BattleCommand::DealDamage { target: side, amount: drained },
                BattleCommand::HealPokemon { target: opponent, amount: drained },
            ],
            state,
        )?;
    }
    Ok(())
}

/// Clears flinches and advances toxic counters on both actives.
pub fn end_of_turn(state: &mut BattleState) -> Result<(), BattleStateError> {
    let mut commands = Vec::new();
    for side in PlayerSide::BOTH {
        let player = state.player(side);
        if player.active.is_flinched() {
            commands.push(BattleCommand::RemoveCondition { target: side, condition: VolatileCondition::Flinched });
        }
        if let Some(counter) = player.active.toxic_counter() {
            if player.active_pokemon().status() == Status::Poison {
                commands.push(BattleCommand::SetToxicCounter {
                    target: side,
                    counter: Some(counter.saturating_add(1)),
                });
            }
        }
    }
    execute_command_batch(commands, state)
}

/// Sets the outcome once a side has no pokemon left standing.
pub fn update_result(state: &mut BattleState) -> Result<(), BattleStateError> {
    if state.is_finished() {
        return Ok(());
    }

    let defeated1 = state.player(PlayerSide::Player1).is_defeated();
    let defeated2 = state.player(PlayerSide::Player2).is_defeated();
    let outcome = match (defeated1, defeated2) {
        (true, true) => BattleOutcome::Draw,
        (true, false) => BattleOutcome::Player2Win,
        (false, true) => BattleOutcome::Player1Win,
        (false, false) => return Ok(()),
    };
    finish(state, outcome)
}

/// Ends the battle with `outcome`.
pub fn finish(state: &mut BattleState, outcome: BattleOutcome) -> Result<(), BattleStateError> {
    let mut commands: Vec<BattleCommand> = PlayerSide::BOTH
        .into_iter()
        .filter(|&side| state.player(side).is_defeated())
        .map(|side| BattleCommand::EmitEvent(BattleEvent::PlayerDefeated { side }))
        .collect();
    commands.push(BattleCommand::SetOutcome(outcome));
    commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded { outcome }));
    debug!(?outcome, turn = state.turn_number, "battle ended");
    execute_command_batch(commands, state)
}
