// In: src/battle/move_effects/status_effects.rs

// --- IMPORTS ---
use crate::battle::commands::{BattleCommand, PlayerSide};
use crate::battle::conditions::VolatileCondition;
use crate::battle::state::{BattleEvent, BattleRng, BattleState};
use schema::{PokemonType, Status};

/// Sleep inflicted in battle lasts 1-7 move attempts.
const SLEEP_TURNS: (u32, u32) = (1, 8);
/// Confusion lasts 2-5 move attempts.
const CONFUSION_TURNS: (u32, u32) = (2, 6);

// --- STANDALONE HELPER FUNCTIONS ---

/// Resolves an incoming non-volatile status against the target's active
/// pokemon. Returns no commands when the status does not take.
pub(super) fn status_commands(
    target: PlayerSide,
    status: Status,
    toxic: bool,
    state: &BattleState,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    let mut commands = Vec::new();
    let target_player = state.player(target);
    let target_pokemon = target_player.active_pokemon();
    let current = target_pokemon.status();
    let species = target_pokemon.species();

    // Fire thaws a frozen target instead of burning it.
    if current == Status::Freeze && status == Status::Burn {
        commands.push(BattleCommand::SetStatus { target, status: Status::None });
        commands.push(BattleCommand::EmitEvent(BattleEvent::StatusRemoved {
            target: target_pokemon.name().to_string(),
            status: Status::Freeze,
        }));
        return commands;
    }

    let immune = match status {
        Status::None => true,
        Status::Poison => species.has_type(PokemonType::Poison),
        Status::Burn => species.has_type(PokemonType::Fire),
        _ => false,
    };
    if immune || !current.is_none() {
        return commands;
    }

    let ruleset = &state.ruleset;
    let teammate_has = |s: Status| target_player.team.iter().any(|p| p.status() == s);
    if ruleset.sleep_clause() && status == Status::Sleep && teammate_has(Status::Sleep) {
        return commands;
    }
    if ruleset.freeze_clause() && status == Status::Freeze && teammate_has(Status::Freeze) {
        return commands;
    }

    commands.push(BattleCommand::SetStatus { target, status });
    if status == Status::Sleep {
        let turns = rng.range(SLEEP_TURNS.0, SLEEP_TURNS.1, "sleep duration") as u8;
        commands.push(BattleCommand::SetSleepTurns { target, turns });
    }
    if toxic {
        commands.push(BattleCommand::SetToxicCounter { target, counter: Some(1) });
    }
    commands.push(BattleCommand::EmitEvent(BattleEvent::StatusApplied {
        target: target_pokemon.name().to_string(),
        status,
    }));
    commands
}

pub(super) fn confusion_commands(
    target: PlayerSide,
    state: &BattleState,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    let target_player = state.player(target);
    if target_player.active.is_confused() {
        return Vec::new();
    }

    let turns = rng.range(CONFUSION_TURNS.0, CONFUSION_TURNS.1, "confusion duration") as u8;
    vec![
        BattleCommand::SetConfusion { target, turns: Some(turns) },
        BattleCommand::EmitEvent(BattleEvent::Confused {
            target: target_player.active_pokemon().name().to_string(),
        }),
    ]
}

pub(super) fn flinch_commands(target: PlayerSide) -> Vec<BattleCommand> {
    vec![BattleCommand::AddCondition { target, condition: VolatileCondition::Flinched }]
}
