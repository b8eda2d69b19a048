use schema::ModifiableStat;
use serde::{Deserialize, Serialize};
use strum::EnumCount;

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Flag-style volatile conditions on the creature in play.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolatileCondition {
    LeechSeed,
    Mist,
    Reflect,
    LightScreen,
    FocusEnergy,
    Flinched,
}

impl std::fmt::Display for VolatileCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VolatileCondition::LeechSeed => "leech seed",
            VolatileCondition::Mist => "mist",
            VolatileCondition::Reflect => "Reflect",
            VolatileCondition::LightScreen => "Light Screen",
            VolatileCondition::FocusEnergy => "focus energy",
            VolatileCondition::Flinched => "flinching",
        };
        write!(f, "{}", name)
    }
}

/// Transient modifiers for the creature a side has in play. A fresh value
/// replaces it every time a switch brings a roster slot into play.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivePokemon {
    stat_stages: [i8; ModifiableStat::COUNT],
    /// Move attempts left while confused.
    confusion: Option<u8>,
    toxic_counter: Option<u8>,
    leech_seed: bool,
    mist: bool,
    reflect: bool,
    light_screen: bool,
    focus_energy: bool,
    flinched: bool,
}

impl ActivePokemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stat_stage(&self, stat: ModifiableStat) -> i8 {
        self.stat_stages[stat.index()]
    }

    pub fn stat_stages(&self) -> &[i8; ModifiableStat::COUNT] {
        &self.stat_stages
    }

    /// Shifts a stage by `delta`, clamped to [-6, 6]. Returns the applied change.
    pub fn modify_stat(&mut self, stat: ModifiableStat, delta: i8) -> i8 {
        let old = self.stat_stages[stat.index()];
        let new = old.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        self.stat_stages[stat.index()] = new;
        new - old
    }

    pub fn has_condition(&self, condition: VolatileCondition) -> bool {
        match condition {
            VolatileCondition::LeechSeed => self.leech_seed,
            VolatileCondition::Mist => self.mist,
            VolatileCondition::Reflect => self.reflect,
            VolatileCondition::LightScreen => self.light_screen,
            VolatileCondition::FocusEnergy => self.focus_energy,
            VolatileCondition::Flinched => self.flinched,
        }
    }

    pub fn set_condition(&mut self, condition: VolatileCondition, active: bool) {
        let flag = match condition {
            VolatileCondition::LeechSeed => &mut self.leech_seed,
            VolatileCondition::Mist => &mut self.mist,
            VolatileCondition::Reflect => &mut self.reflect,
            VolatileCondition::LightScreen => &mut self.light_screen,
            VolatileCondition::FocusEnergy => &mut self.focus_energy,
            VolatileCondition::Flinched => &mut self.flinched,
        };
        *flag = active;
    }

    pub fn is_confused(&self) -> bool {
        self.confusion.is_some()
    }

    pub fn confusion(&self) -> Option<u8> {
        self.confusion
    }

    pub fn set_confusion(&mut self, turns: Option<u8>) {
        self.confusion = turns;
    }

    pub fn toxic_counter(&self) -> Option<u8> {
        self.toxic_counter
    }

    pub fn set_toxic_counter(&mut self, counter: Option<u8>) {
        self.toxic_counter = counter;
    }

    pub fn is_seeded(&self) -> bool {
        self.leech_seed
    }

    pub fn has_mist(&self) -> bool {
        self.mist
    }

    pub fn has_reflect(&self) -> bool {
        self.reflect
    }

    pub fn has_light_screen(&self) -> bool {
        self.light_screen
    }

    pub fn has_focus_energy(&self) -> bool {
        self.focus_energy
    }

    pub fn is_flinched(&self) -> bool {
        self.flinched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(&[6, 6], 6)]
    #[case(&[-6, -1], -6)]
    #[case(&[2, 2, 2, 2], 6)]
    #[case(&[-2, -2, -2, -2, 5], 5)]
    #[case(&[6, -12], -6)]
    #[case(&[i8::MAX, i8::MIN], -6)]
    fn test_stat_stages_stay_clamped(#[case] deltas: &[i8], #[case] expected: i8) {
        for stat in ModifiableStat::iter() {
            let mut active = ActivePokemon::new();
            for &delta in deltas {
                active.modify_stat(stat, delta);
                assert!((MIN_STAGE..=MAX_STAGE).contains(&active.stat_stage(stat)));
            }
            assert_eq!(active.stat_stage(stat), expected);
        }
    }

    #[test]
    fn test_modify_stat_reports_applied_change() {
        let mut active = ActivePokemon::new();
        assert_eq!(active.modify_stat(ModifiableStat::Attack, 2), 2);
        assert_eq!(active.modify_stat(ModifiableStat::Attack, 5), 4);
        assert_eq!(active.modify_stat(ModifiableStat::Attack, 1), 0);
        assert_eq!(active.stat_stage(ModifiableStat::Defense), 0);
    }

    #[test]
    fn test_conditions_toggle() {
        let mut active = ActivePokemon::new();
        assert!(!active.has_mist());
        active.set_condition(VolatileCondition::Mist, true);
        assert!(active.has_mist());
        assert!(active.has_condition(VolatileCondition::Mist));
        active.set_condition(VolatileCondition::Mist, false);
        assert!(!active.has_mist());

        active.set_confusion(Some(3));
        assert!(active.is_confused());
        active.set_toxic_counter(Some(1));
        assert_eq!(active.toxic_counter(), Some(1));
    }
}
