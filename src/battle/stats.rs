use schema::ModifiableStat;

use crate::battle::conditions::{ActivePokemon, MAX_STAGE, MIN_STAGE};
use crate::battle::state::BattleRng;
use crate::player::BattlePlayer;

/// Stage multipliers in hundredths, indexed by `stage + 6`.
const STAGE_NUMERATORS: [u16; 13] = [25, 28, 33, 40, 50, 66, 100, 150, 200, 250, 300, 350, 400];

/// Multiplier for a stat stage in [-6, 6]. Out-of-range stages are clamped.
pub fn stage_multiplier(stage: i8) -> f64 {
    let index = (stage.clamp(MIN_STAGE, MAX_STAGE) - MIN_STAGE) as usize;
    STAGE_NUMERATORS[index] as f64 / 100.0
}

/// Raw stat of the active pokemon, before stages.
pub fn unmodified_stat(player: &BattlePlayer, stat: ModifiableStat) -> u16 {
    let stats = player.active_pokemon().stats();
    match stat {
        ModifiableStat::Attack => stats.attack,
        ModifiableStat::Defense => stats.defense,
        ModifiableStat::Special => stats.special,
        ModifiableStat::Speed => stats.speed,
        // Accuracy and evasion have no base value; they only scale rolls.
        ModifiableStat::Evasion | ModifiableStat::Accuracy => 0,
    }
}

/// Raw stat scaled by the active pokemon's current stage.
pub fn modified_stat(player: &BattlePlayer, stat: ModifiableStat) -> f64 {
    unmodified_stat(player, stat) as f64 * stage_multiplier(player.active.stat_stage(stat))
}

pub fn effective_speed(player: &BattlePlayer) -> f64 {
    modified_stat(player, ModifiableStat::Speed)
}

pub fn accuracy_multiplier(active: &ActivePokemon) -> f64 {
    stage_multiplier(active.stat_stage(ModifiableStat::Accuracy))
}

/// Higher evasion makes the holder harder to hit, so the stage is inverted.
pub fn evasion_multiplier(active: &ActivePokemon) -> f64 {
    stage_multiplier(-active.stat_stage(ModifiableStat::Evasion))
}

/// Rolls the accuracy check for a move with scaled accuracy `accuracy`
/// (`None` never misses).
pub fn move_hits(
    accuracy: Option<u8>,
    attacker: &ActivePokemon,
    defender: &ActivePokemon,
    rng: &mut BattleRng,
) -> bool {
    let Some(accuracy) = accuracy else {
        return true;
    };
    let threshold = (accuracy as f64 * accuracy_multiplier(attacker) * evasion_multiplier(defender))
        .clamp(0.0, 255.0);
    let roll = rng.range(0, 255, "accuracy roll");
    (roll as f64) < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-6, 0.25)]
    #[case(-1, 0.66)]
    #[case(0, 1.0)]
    #[case(1, 1.5)]
    #[case(6, 4.0)]
    #[case(9, 4.0)]
    fn test_stage_multiplier(#[case] stage: i8, #[case] expected: f64) {
        assert_eq!(stage_multiplier(stage), expected);
    }

    #[test]
    fn test_evasion_is_inverted() {
        let mut active = ActivePokemon::new();
        active.modify_stat(ModifiableStat::Evasion, 1);
        assert_eq!(evasion_multiplier(&active), 0.66);
        active.modify_stat(ModifiableStat::Accuracy, -2);
        assert_eq!(accuracy_multiplier(&active), 0.5);
    }

    #[test]
    fn test_move_hits_compares_against_threshold() {
        let neutral = ActivePokemon::new();
        // 95% accuracy scales to 242.
        let mut rng = BattleRng::new_for_test(vec![241, 242]);
        assert!(move_hits(Some(242), &neutral, &neutral, &mut rng));
        assert!(!move_hits(Some(242), &neutral, &neutral, &mut rng));

        let mut evasive = ActivePokemon::new();
        evasive.modify_stat(ModifiableStat::Evasion, 6);
        // 255 * 0.25 = 63.75
        let mut rng = BattleRng::new_for_test(vec![63, 64]);
        assert!(move_hits(Some(255), &neutral, &evasive, &mut rng));
        assert!(!move_hits(Some(255), &neutral, &evasive, &mut rng));
    }

    #[test]
    fn test_never_miss_moves_skip_the_roll() {
        let neutral = ActivePokemon::new();
        let mut rng = BattleRng::new_for_test(vec![]);
        assert!(move_hits(None, &neutral, &neutral, &mut rng));
    }
}
