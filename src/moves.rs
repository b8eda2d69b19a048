use schema::{DamageFormula, MoveEffect, MoveRecord, PokemonType, SecondaryEffect, Status};
use serde::Serialize;

use crate::errors::{MoveDataError, MoveDataResult};

/// Name of the move every creature falls back to once it is out of PP.
pub const STRUGGLE: &str = "Struggle";

/// Immutable move catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Move {
    name: String,
    pp: u8,
    move_type: PokemonType,
    /// Scaled to `1..=255`; `None` never misses.
    accuracy: Option<u8>,
    priority: i8,
    effect: MoveEffect,
}

impl Move {
    /// Builds a move, scaling `accuracy_percent` (1-100) onto the 0-255 roll domain.
    pub fn new(
        name: impl Into<String>,
        pp: u8,
        move_type: PokemonType,
        accuracy_percent: Option<u8>,
        priority: i8,
        effect: MoveEffect,
    ) -> MoveDataResult<Self> {
        let name = name.into();

        if pp == 0 {
            return Err(MoveDataError::InvalidPp { name });
        }

        let accuracy = match accuracy_percent {
            None => None,
            Some(percent @ 1..=100) => Some(scale_accuracy(percent)),
            Some(percent) => {
                return Err(MoveDataError::InvalidAccuracy { name, accuracy: percent });
            }
        };

        if !(-1..=1).contains(&priority) {
            return Err(MoveDataError::InvalidPriority { name, priority });
        }

        validate_effect(&name, &effect)?;

        Ok(Self {
            name,
            pp,
            move_type,
            accuracy,
            priority,
            effect,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pp(&self) -> u8 {
        self.pp
    }

    pub fn move_type(&self) -> PokemonType {
        self.move_type
    }

    pub fn accuracy(&self) -> Option<u8> {
        self.accuracy
    }

    pub fn priority(&self) -> i8 {
        self.priority
    }

    pub fn effect(&self) -> &MoveEffect {
        &self.effect
    }

    pub fn is_struggle(&self) -> bool {
        self.name == STRUGGLE
    }

    pub fn is_physical(&self) -> bool {
        self.move_type.is_physical()
    }

    pub fn is_damaging(&self) -> bool {
        self.effect.is_damaging()
    }

    pub fn is_one_hit_ko(&self) -> bool {
        self.effect.is_one_hit_ko()
    }

    pub fn raises_evasion(&self) -> bool {
        self.effect.raises_evasion()
    }
}

impl TryFrom<MoveRecord> for Move {
    type Error = MoveDataError;

    fn try_from(record: MoveRecord) -> MoveDataResult<Self> {
        Move::new(
            record.name,
            record.pp,
            record.move_type,
            record.accuracy,
            record.priority,
            record.effect,
        )
    }
}

fn scale_accuracy(percent: u8) -> u8 {
    (percent as u16 * 255 / 100) as u8
}

fn validate_effect(name: &str, effect: &MoveEffect) -> MoveDataResult<()> {
    let invalid = |details: &str| MoveDataError::InvalidEffect {
        name: name.to_string(),
        details: details.to_string(),
    };

    match effect {
        MoveEffect::Damaging(formula) => match formula {
            DamageFormula::Standard { power: 0 } | DamageFormula::HighCritical { power: 0 } => {
                Err(MoveDataError::InvalidPower { name: name.to_string() })
            }
            DamageFormula::Constant(0) => Err(MoveDataError::InvalidPower { name: name.to_string() }),
            _ => Ok(()),
        },
        MoveEffect::Repeating { inner, .. } | MoveEffect::Recoil { inner, .. }
            if !inner.is_damaging() =>
        {
            Err(invalid("wrapped effect must be damaging"))
        }
        MoveEffect::SideEffect { inner, .. } if !inner.is_damaging() => {
            Err(invalid("wrapped effect must be damaging"))
        }
        MoveEffect::Repeating { inner, .. } => validate_effect(name, inner),
        MoveEffect::Recoil { divisor: 0, .. } => Err(invalid("recoil divisor must be positive")),
        MoveEffect::Recoil { inner, .. } => validate_effect(name, inner),
        MoveEffect::SideEffect { chance, .. } if *chance > 100 => {
            Err(invalid("side-effect chance must be 0-100"))
        }
        MoveEffect::SideEffect { inner, extra, .. } => {
            match extra {
                SecondaryEffect::Status(Status::None) => {
                    return Err(invalid("side effect cannot inflict no status"));
                }
                SecondaryEffect::LowerStat { stages: 0, .. } => {
                    return Err(invalid("stat change needs at least one stage"));
                }
                _ => {}
            }
            validate_effect(name, inner)
        }
        MoveEffect::StatModify { stages: 0, .. } => Err(invalid("stat change needs at least one stage")),
        MoveEffect::StatusInflict(Status::None) => Err(invalid("status move cannot inflict no status")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{HitDistribution, ModifiableStat, Target};

    fn tackle_effect() -> MoveEffect {
        MoveEffect::Damaging(DamageFormula::Standard { power: 35 })
    }

    #[test]
    fn test_accuracy_is_scaled_into_roll_domain() {
        let sure = Move::new("Sure", 10, PokemonType::Normal, Some(100), 0, tackle_effect()).unwrap();
        assert_eq!(sure.accuracy(), Some(255));

        let shaky = Move::new("Shaky", 10, PokemonType::Normal, Some(1), 0, tackle_effect()).unwrap();
        assert_eq!(shaky.accuracy(), Some(2));

        let tackle = Move::new("Tackle", 35, PokemonType::Normal, Some(95), 0, tackle_effect()).unwrap();
        assert_eq!(tackle.accuracy(), Some(242));
    }

    #[test]
    fn test_move_validation_failures() {
        assert!(matches!(
            Move::new("NoPP", 0, PokemonType::Normal, Some(100), 0, tackle_effect()),
            Err(MoveDataError::InvalidPp { .. })
        ));
        assert!(matches!(
            Move::new("TooAccurate", 10, PokemonType::Normal, Some(101), 0, tackle_effect()),
            Err(MoveDataError::InvalidAccuracy { accuracy: 101, .. })
        ));
        assert!(matches!(
            Move::new("NeverHits", 10, PokemonType::Normal, Some(0), 0, tackle_effect()),
            Err(MoveDataError::InvalidAccuracy { accuracy: 0, .. })
        ));
        assert!(matches!(
            Move::new("TooFast", 10, PokemonType::Normal, Some(100), 2, tackle_effect()),
            Err(MoveDataError::InvalidPriority { priority: 2, .. })
        ));
        assert!(matches!(
            Move::new(
                "Powerless",
                10,
                PokemonType::Normal,
                Some(100),
                0,
                MoveEffect::Damaging(DamageFormula::Standard { power: 0 })
            ),
            Err(MoveDataError::InvalidPower { .. })
        ));
    }

    #[test]
    fn test_wrappers_require_damaging_inner_effect() {
        let wrapped_status = MoveEffect::Repeating {
            hits: HitDistribution::Double,
            inner: Box::new(MoveEffect::StatusInflict(Status::Sleep)),
        };
        assert!(matches!(
            Move::new("Odd", 10, PokemonType::Normal, Some(100), 0, wrapped_status),
            Err(MoveDataError::InvalidEffect { .. })
        ));

        let side_effect = MoveEffect::SideEffect {
            chance: 30,
            inner: Box::new(tackle_effect()),
            extra: SecondaryEffect::LowerStat { stat: ModifiableStat::Speed, stages: 1 },
        };
        let valid = Move::new("Fine", 10, PokemonType::Water, Some(100), 0, side_effect).unwrap();
        assert!(valid.is_damaging());
        assert_eq!(valid.effect().power(), Some(35));
    }

    #[test]
    fn test_effect_queries() {
        let double_team = Move::new(
            "Double Team",
            15,
            PokemonType::Normal,
            None,
            0,
            MoveEffect::StatModify { stat: ModifiableStat::Evasion, stages: 1, target: Target::User },
        )
        .unwrap();
        assert!(double_team.raises_evasion());
        assert!(!double_team.is_damaging());

        let horn_drill = Move::new(
            "Horn Drill",
            5,
            PokemonType::Normal,
            Some(30),
            0,
            MoveEffect::Damaging(DamageFormula::OneHitKo),
        )
        .unwrap();
        assert!(horn_drill.is_one_hit_ko());
        assert!(horn_drill.is_physical());
    }
}
