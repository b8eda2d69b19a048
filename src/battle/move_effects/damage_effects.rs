// In: src/battle/move_effects/damage_effects.rs

// --- IMPORTS ---
use super::EffectContext;
use crate::battle::calculators::calculate_damage;
use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, BattleRng, BattleState};
use schema::DamageFormula;

// --- STANDALONE HELPER FUNCTIONS ---

/// One hit of a damaging effect. Returns the commands together with the HP
/// the hit will actually remove.
pub(super) fn damage_commands(
    formula: &DamageFormula,
    context: &EffectContext,
    state: &BattleState,
    rng: &mut BattleRng,
) -> (Vec<BattleCommand>, u16) {
    let mut commands = Vec::new();
    let outcome = calculate_damage(state, context.attacker, &context.move_, formula, rng);

    if outcome.failed {
        let attacker_name = state.player(context.attacker).active_pokemon().name().to_string();
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed { pokemon: attacker_name }));
        return (commands, 0);
    }

    if outcome.critical {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit));
    }
    if formula.uses_standard_math() && outcome.effectiveness != 1.0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
            multiplier: outcome.effectiveness,
        }));
    }

    let remaining = state.player(context.defender).active_pokemon().current_hp();
    let dealt = outcome.damage.min(remaining);
    if outcome.damage > 0 {
        commands.push(BattleCommand::DealDamage { target: context.defender, amount: outcome.damage });
    }
    (commands, dealt)
}

/// The user loses `max(1, dealt / divisor)` HP after a hit that did damage.
pub(super) fn recoil_commands(
    divisor: u8,
    dealt: u16,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleCommand> {
    if dealt == 0 || divisor == 0 {
        return Vec::new();
    }
    let recoil = (dealt / divisor as u16).max(1);
    let attacker_name = state.player(context.attacker).active_pokemon().name().to_string();
    vec![
        BattleCommand::EmitEvent(BattleEvent::RecoilDamage { pokemon: attacker_name }),
        BattleCommand::DealDamage { target: context.attacker, amount: recoil },
    ]
}
