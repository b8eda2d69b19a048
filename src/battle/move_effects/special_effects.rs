// In: src/battle/move_effects/special_effects.rs

// --- IMPORTS ---
use super::EffectContext;
use crate::battle::commands::BattleCommand;
use crate::battle::conditions::VolatileCondition;
use crate::battle::state::{BattleEvent, BattleState};
use schema::PokemonType;

// --- STANDALONE HELPER FUNCTIONS ---

fn move_failed(name: &str) -> Vec<BattleCommand> {
    vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed { pokemon: name.to_string() })]
}

/// Seeds the opponent unless it is Grass-type or already seeded.
pub(super) fn leech_seed_commands(context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let defender = state.player(context.defender);
    let defender_pokemon = defender.active_pokemon();

    if defender_pokemon.species().has_type(PokemonType::Grass) || defender.active.is_seeded() {
        return move_failed(state.player(context.attacker).active_pokemon().name());
    }

    vec![
        BattleCommand::AddCondition { target: context.defender, condition: VolatileCondition::LeechSeed },
        BattleCommand::EmitEvent(BattleEvent::ConditionApplied {
            target: defender_pokemon.name().to_string(),
            condition: VolatileCondition::LeechSeed,
        }),
    ]
}

/// Sets a flag on the user (Mist, Focus Energy, Reflect, Light Screen).
pub(super) fn user_condition_commands(
    condition: VolatileCondition,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleCommand> {
    let attacker = state.player(context.attacker);
    let name = attacker.active_pokemon().name();

    if attacker.active.has_condition(condition) {
        return move_failed(name);
    }

    vec![
        BattleCommand::AddCondition { target: context.attacker, condition },
        BattleCommand::EmitEvent(BattleEvent::ConditionApplied { target: name.to_string(), condition }),
    ]
}
