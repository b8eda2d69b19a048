// In: src/battle/move_effects/mod.rs

// --- 1. DECLARE HELPER MODULES ---
mod damage_effects;
mod special_effects;
mod stat_effects;
mod status_effects;

// --- 2. IMPORTS ---
use std::sync::Arc;

use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerSide};
use crate::battle::conditions::VolatileCondition;
use crate::battle::state::{BattleEvent, BattleRng, BattleState};
use crate::errors::BattleStateError;
use crate::moves::Move;
use schema::{MoveEffect, SecondaryEffect, Status, Target};
// Bring the standalone helper functions from our private modules into scope.
use self::{damage_effects::*, special_effects::*, stat_effects::*, status_effects::*};

// --- 3. BATTLE-SPECIFIC DATA STRUCTURES ---
#[derive(Debug, Clone)]
pub struct EffectContext {
    pub attacker: PlayerSide,
    pub defender: PlayerSide,
    pub move_: Arc<Move>,
}

impl EffectContext {
    pub fn new(attacker: PlayerSide, move_: Arc<Move>) -> Self {
        Self { attacker, defender: attacker.opponent(), move_ }
    }

    pub fn target_side(&self, target: Target) -> PlayerSide {
        match target {
            Target::User => self.attacker,
            Target::Target => self.defender,
        }
    }
}

// --- 4. PUBLIC ENTRY POINTS ---

/// Applies a move's effect after it passed its accuracy check. Effects run
/// step by step so later steps (extra hits, secondary effects, recoil) see
/// the state the earlier steps left behind. Returns the HP removed from the
/// defender.
pub fn apply_move_effect(
    effect: &MoveEffect,
    context: &EffectContext,
    state: &mut BattleState,
    rng: &mut BattleRng,
) -> Result<u16, BattleStateError> {
    match effect {
        MoveEffect::Damaging(formula) => {
            let (commands, dealt) = damage_commands(formula, context, state, rng);
            execute_command_batch(commands, state)?;
            Ok(dealt)
        }
        MoveEffect::Repeating { hits, inner } => {
            let weights = hits.weights();
            let hit_count = match weights {
                [(only, _)] => *only,
                _ => rng.weighted(weights, "hit count"),
            };

            let mut total = 0;
            let mut landed = 0;
            for _ in 0..hit_count {
                if defender_fainted(context, state) {
                    break;
                }
                total += apply_move_effect(inner, context, state, rng)?;
                landed += 1;
            }
            execute_command_batch(
                vec![BattleCommand::EmitEvent(BattleEvent::HitCount { hits: landed })],
                state,
            )?;
            Ok(total)
        }
        MoveEffect::SideEffect { chance, inner, extra } => {
            let dealt = apply_move_effect(inner, context, state, rng)?;
            if defender_fainted(context, state) || defender_immune(context, state) {
                return Ok(dealt);
            }
            if rng.range(0, 100, "secondary effect chance") < *chance as u32 {
                let commands = secondary_effect_commands(extra, context, state, rng);
                execute_command_batch(commands, state)?;
            }
            Ok(dealt)
        }
        MoveEffect::Recoil { inner, divisor } => {
            let dealt = apply_move_effect(inner, context, state, rng)?;
            let commands = recoil_commands(*divisor, dealt, context, state);
            execute_command_batch(commands, state)?;
            Ok(dealt)
        }
        MoveEffect::StatModify { stat, stages, target } => {
            let stages = (*stages).min(i8::MAX as u8) as i8;
            let (side, delta) = match target {
                Target::User => (context.attacker, stages),
                Target::Target => (context.defender, -stages),
            };
            let commands =
                stat_change_commands(side, *stat, delta, side == context.defender, state);
            execute_command_batch(commands, state)?;
            Ok(0)
        }
        MoveEffect::StatusInflict(status) => {
            inflict_or_fail(context, *status, false, state, rng)?;
            Ok(0)
        }
        MoveEffect::Toxic => {
            inflict_or_fail(context, Status::Poison, true, state, rng)?;
            Ok(0)
        }
        MoveEffect::Confuse => {
            let mut commands = confusion_commands(context.defender, state, rng);
            if commands.is_empty() {
                commands = failed(context, state);
            }
            execute_command_batch(commands, state)?;
            Ok(0)
        }
        MoveEffect::LeechSeed => {
            execute_command_batch(leech_seed_commands(context, state), state)?;
            Ok(0)
        }
        MoveEffect::Mist => apply_user_condition(VolatileCondition::Mist, context, state),
        MoveEffect::FocusEnergy => apply_user_condition(VolatileCondition::FocusEnergy, context, state),
        MoveEffect::Reflect => apply_user_condition(VolatileCondition::Reflect, context, state),
        MoveEffect::LightScreen => apply_user_condition(VolatileCondition::LightScreen, context, state),
        MoveEffect::NoEffect => {
            execute_command_batch(vec![BattleCommand::EmitEvent(BattleEvent::NothingHappened)], state)?;
            Ok(0)
        }
    }
}

/// Applies a non-volatile status to `target`'s active pokemon under the
/// immunity, no-overwrite and clause rules. Returns whether the state changed.
pub fn apply_status(
    target: PlayerSide,
    status: Status,
    toxic: bool,
    state: &mut BattleState,
    rng: &mut BattleRng,
) -> Result<bool, BattleStateError> {
    let commands = status_commands(target, status, toxic, state, rng);
    let changed = !commands.is_empty();
    execute_command_batch(commands, state)?;
    Ok(changed)
}

// --- 5. PRIVATE HELPERS ---

fn defender_fainted(context: &EffectContext, state: &BattleState) -> bool {
    state.player(context.defender).active_pokemon().is_fainted()
}

fn defender_immune(context: &EffectContext, state: &BattleState) -> bool {
    let species = state.player(context.defender).active_pokemon().species();
    species.attack_effectiveness(context.move_.move_type()) == 0.0
}

fn failed(context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let name = state.player(context.attacker).active_pokemon().name().to_string();
    vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed { pokemon: name })]
}

fn inflict_or_fail(
    context: &EffectContext,
    status: Status,
    toxic: bool,
    state: &mut BattleState,
    rng: &mut BattleRng,
) -> Result<(), BattleStateError> {
    if !apply_status(context.defender, status, toxic, state, rng)? {
        execute_command_batch(failed(context, state), state)?;
    }
    Ok(())
}

fn apply_user_condition(
    condition: VolatileCondition,
    context: &EffectContext,
    state: &mut BattleState,
) -> Result<u16, BattleStateError> {
    execute_command_batch(user_condition_commands(condition, context, state), state)?;
    Ok(0)
}

fn secondary_effect_commands(
    extra: &SecondaryEffect,
    context: &EffectContext,
    state: &BattleState,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    match extra {
        SecondaryEffect::LowerStat { stat, stages } => {
            let delta = -((*stages).min(i8::MAX as u8) as i8);
            stat_change_commands(context.defender, *stat, delta, true, state)
        }
        SecondaryEffect::Flinch => flinch_commands(context.defender),
        SecondaryEffect::Status(status) => status_commands(context.defender, *status, false, state, rng),
        SecondaryEffect::Confuse => confusion_commands(context.defender, state, rng),
    }
}
