use schema::{DamageFormula, ModifiableStat, PokemonType};

use crate::battle::commands::PlayerSide;
use crate::battle::state::{BattleRng, BattleState};
use crate::battle::stats::{effective_speed, modified_stat, unmodified_stat};
use crate::moves::Move;
use crate::player::BattlePlayer;

/// Power of the typeless hit a confused pokemon lands on itself.
pub const CONFUSION_SELF_HIT_POWER: u8 = 40;

const MIN_DAMAGE_ROLL: u32 = 217;
const MAX_DAMAGE_ROLL: u32 = 255;

/// What one damage calculation produced, before any HP is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub critical: bool,
    pub effectiveness: f64,
    /// The move could not work at all (OHKO against a faster or immune target).
    pub failed: bool,
}

impl DamageOutcome {
    fn fixed(damage: u16) -> Self {
        Self { damage, critical: false, effectiveness: 1.0, failed: false }
    }

    fn failure(effectiveness: f64) -> Self {
        Self { damage: 0, critical: false, effectiveness, failed: true }
    }
}

/// Operands of the standard formula once crit, screens and stages are settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInputs {
    pub level: u8,
    pub power: u8,
    pub attack: f64,
    pub defense: f64,
    pub stab: bool,
    pub effectiveness: f64,
    pub critical: bool,
}

/// The standard damage formula for a given damage roll in [217, 255].
pub fn standard_damage(inputs: &DamageInputs, roll: u32) -> u16 {
    let level = if inputs.critical { 2 * inputs.level as u32 } else { inputs.level as u32 };
    let adjusted_level = 2 * level / 5 + 2;
    let scaled_power = (inputs.power as f64 * inputs.attack / inputs.defense).floor() as u32;
    let base = adjusted_level * scaled_power / 50 + 2;
    let with_stab = if inputs.stab { (base as f64 * 1.5).floor() } else { base as f64 };
    let damage = (with_stab * inputs.effectiveness * roll as f64 / 255.0).floor();
    damage.min(u16::MAX as f64) as u16
}

fn damage_roll(state: &BattleState, rng: &mut BattleRng) -> u32 {
    if state.ruleset.deterministic_damage() {
        MAX_DAMAGE_ROLL
    } else {
        rng.range(MIN_DAMAGE_ROLL, MAX_DAMAGE_ROLL + 1, "damage roll")
    }
}

pub fn roll_critical_hit(
    state: &BattleState,
    attacker: PlayerSide,
    high_crit: bool,
    rng: &mut BattleRng,
) -> bool {
    if state.ruleset.deterministic_damage() {
        return false;
    }
    let player = state.player(attacker);
    let threshold = player
        .active_pokemon()
        .species()
        .critical_hit_threshold(high_crit, player.active.has_focus_energy());
    rng.range(0, 256, "critical hit roll") < threshold as u32
}

fn offense_stats(physical: bool) -> (ModifiableStat, ModifiableStat) {
    if physical {
        (ModifiableStat::Attack, ModifiableStat::Defense)
    } else {
        (ModifiableStat::Special, ModifiableStat::Special)
    }
}

fn standard_inputs(
    attacker: &BattlePlayer,
    defender: &BattlePlayer,
    move_type: PokemonType,
    power: u8,
    critical: bool,
) -> DamageInputs {
    let physical = move_type.is_physical();
    let (attack_stat, defense_stat) = offense_stats(physical);

    let (attack, mut defense) = if critical {
        (
            unmodified_stat(attacker, attack_stat) as f64,
            unmodified_stat(defender, defense_stat) as f64,
        )
    } else {
        (modified_stat(attacker, attack_stat), modified_stat(defender, defense_stat))
    };

    let screened = if physical {
        defender.active.has_reflect()
    } else {
        defender.active.has_light_screen()
    };
    if screened && !critical {
        defense *= 2.0;
    }

    let attacker_species = attacker.active_pokemon().species();
    DamageInputs {
        level: attacker.active_pokemon().level(),
        power,
        attack,
        defense,
        stab: attacker_species.has_type(move_type),
        effectiveness: defender.active_pokemon().species().attack_effectiveness(move_type),
        critical,
    }
}

/// Computes the damage `move_` does from `attacker` to the opposing active
/// pokemon. Draws the crit roll before the damage roll.
pub fn calculate_damage(
    state: &BattleState,
    attacker: PlayerSide,
    move_: &Move,
    formula: &DamageFormula,
    rng: &mut BattleRng,
) -> DamageOutcome {
    let attacker_player = state.player(attacker);
    let defender_player = state.player(attacker.opponent());
    let attacking = attacker_player.active_pokemon();
    let defending = defender_player.active_pokemon();

    match formula {
        DamageFormula::Standard { power } | DamageFormula::HighCritical { power } => {
            let effectiveness = defending.species().attack_effectiveness(move_.move_type());
            if effectiveness == 0.0 {
                return DamageOutcome { damage: 0, critical: false, effectiveness, failed: false };
            }
            let high_crit = matches!(formula, DamageFormula::HighCritical { .. });
            let critical = roll_critical_hit(state, attacker, high_crit, rng);
            let inputs =
                standard_inputs(attacker_player, defender_player, move_.move_type(), *power, critical);
            let roll = damage_roll(state, rng);
            DamageOutcome {
                damage: standard_damage(&inputs, roll),
                critical,
                effectiveness,
                failed: false,
            }
        }
        DamageFormula::Constant(amount) => DamageOutcome::fixed(*amount),
        DamageFormula::Level => DamageOutcome::fixed(attacking.level() as u16),
        DamageFormula::Psywave => {
            let max = psywave_max(attacking.level());
            let damage = if state.ruleset.deterministic_damage() {
                max
            } else {
                rng.range(0, max as u32 + 1, "psywave damage") as u16
            };
            DamageOutcome::fixed(damage)
        }
        DamageFormula::SuperFang => DamageOutcome::fixed((defending.current_hp() / 2).max(1)),
        DamageFormula::OneHitKo => {
            let effectiveness = defending.species().attack_effectiveness(move_.move_type());
            if effectiveness == 0.0 || effective_speed(defender_player) > effective_speed(attacker_player) {
                DamageOutcome::failure(effectiveness)
            } else {
                DamageOutcome { damage: defending.current_hp(), critical: false, effectiveness, failed: false }
            }
        }
    }
}

/// Upper bound of Psywave damage: `max(floor(1.5 * level) - 1, 1)`.
pub fn psywave_max(level: u8) -> u16 {
    (level as u16 * 3 / 2).saturating_sub(1).max(1)
}

/// Damage a confused pokemon deals to itself: typeless, physical, no crit, no STAB.
pub fn confusion_self_damage(state: &BattleState, side: PlayerSide, rng: &mut BattleRng) -> u16 {
    let player = state.player(side);
    let inputs = DamageInputs {
        level: player.active_pokemon().level(),
        power: CONFUSION_SELF_HIT_POWER,
        attack: modified_stat(player, ModifiableStat::Attack),
        defense: modified_stat(player, ModifiableStat::Defense),
        stab: false,
        effectiveness: 1.0,
        critical: false,
    };
    standard_damage(&inputs, damage_roll(state, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn inputs(level: u8, power: u8, attack: f64, defense: f64) -> DamageInputs {
        DamageInputs { level, power, attack, defense, stab: false, effectiveness: 1.0, critical: false }
    }

    #[test]
    fn test_standard_damage_known_values() {
        // adjusted level 22, floor(40 * 1) = 40, 22 * 40 / 50 + 2 = 19
        let base = inputs(50, 40, 100.0, 100.0);
        assert_eq!(standard_damage(&base, 255), 19);
        assert_eq!(standard_damage(&base, 217), 16);

        let stab = DamageInputs { stab: true, ..base };
        assert_eq!(standard_damage(&stab, 255), 28);

        let super_effective = DamageInputs { effectiveness: 2.0, ..base };
        assert_eq!(standard_damage(&super_effective, 255), 38);

        let immune = DamageInputs { effectiveness: 0.0, ..base };
        assert_eq!(standard_damage(&immune, 255), 0);
    }

    #[test]
    fn test_critical_doubles_effective_level() {
        // Level 100 hits at adjusted level 42; a crit at 82.
        let normal = inputs(100, 50, 100.0, 100.0);
        let critical = DamageInputs { critical: true, ..normal };
        assert_eq!(standard_damage(&normal, 255), 42 * 50 / 50 + 2);
        assert_eq!(standard_damage(&critical, 255), 82 * 50 / 50 + 2);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(10, 14)]
    #[case(50, 74)]
    #[case(100, 149)]
    fn test_psywave_max(#[case] level: u8, #[case] expected: u16) {
        assert_eq!(psywave_max(level), expected);
    }
}
