// In: src/battle/move_effects/stat_effects.rs

// --- IMPORTS ---
use crate::battle::commands::{BattleCommand, PlayerSide};
use crate::battle::conditions::{MAX_STAGE, MIN_STAGE};
use crate::battle::state::{BattleEvent, BattleState};
use schema::ModifiableStat;

// --- STANDALONE HELPER FUNCTIONS ---

/// Shifts `stat` on `target` by `delta` stages. Reductions that come from the
/// opponent are swallowed by Mist.
pub(super) fn stat_change_commands(
    target: PlayerSide,
    stat: ModifiableStat,
    delta: i8,
    from_opponent: bool,
    state: &BattleState,
) -> Vec<BattleCommand> {
    let target_player = state.player(target);
    let name = target_player.active_pokemon().name().to_string();

    if from_opponent && delta < 0 && target_player.active.has_mist() {
        return vec![BattleCommand::EmitEvent(BattleEvent::ProtectedByMist { target: name })];
    }

    let old_stage = target_player.active.stat_stage(stat);
    let new_stage = old_stage.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
    if old_stage == new_stage {
        return vec![BattleCommand::EmitEvent(BattleEvent::StatChangeBlocked {
            target: name,
            stat,
            rising: delta > 0,
        })];
    }

    let applied = new_stage - old_stage;
    vec![
        BattleCommand::ChangeStatStage { target, stat, delta: applied },
        BattleCommand::EmitEvent(BattleEvent::StatStageChanged { target: name, stat, delta: applied }),
    ]
}
