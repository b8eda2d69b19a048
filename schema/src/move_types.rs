use crate::battle_data::{ModifiableStat, Status, Target};
use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};

/// How a damaging effect turns a hit into HP loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DamageFormula {
    /// The standard formula with a normal critical-hit threshold.
    Standard { power: u8 },
    /// The standard formula with the high critical-hit threshold.
    HighCritical { power: u8 },
    /// Always deals this much damage.
    Constant(u16),
    /// Deals damage equal to the user's level.
    Level,
    /// Deals a random amount scaled from the user's level.
    Psywave,
    /// Halves the target's current HP.
    SuperFang,
    /// Knocks the target out unless it is faster or immune.
    OneHitKo,
}

impl DamageFormula {
    pub fn power(&self) -> Option<u8> {
        match self {
            DamageFormula::Standard { power } | DamageFormula::HighCritical { power } => Some(*power),
            _ => None,
        }
    }

    /// Formulas that go through the crit roll and the stat/type math.
    pub fn uses_standard_math(&self) -> bool {
        matches!(self, DamageFormula::Standard { .. } | DamageFormula::HighCritical { .. })
    }
}

/// Distribution over the number of hits of a repeating move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitDistribution {
    /// Always two hits.
    Double,
    /// 2 or 3 hits at 3/8 each, 4 or 5 hits at 1/8 each.
    TwoToFive,
}

impl HitDistribution {
    /// `(hit count, weight)` pairs.
    pub fn weights(self) -> &'static [(u8, u32)] {
        match self {
            HitDistribution::Double => &[(2, 1)],
            HitDistribution::TwoToFive => &[(2, 3), (3, 3), (4, 1), (5, 1)],
        }
    }
}

/// The extra effect rolled for after a side-effect move's damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SecondaryEffect {
    LowerStat { stat: ModifiableStat, stages: u8 },
    Flinch,
    Status(Status),
    Confuse,
}

/// The closed set of move behaviours. Wrapper variants compose a damaging
/// inner effect with extra behaviour instead of subclassing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    Damaging(DamageFormula),
    Repeating {
        hits: HitDistribution,
        inner: Box<MoveEffect>,
    },
    SideEffect {
        chance: u8,
        inner: Box<MoveEffect>,
        extra: SecondaryEffect,
    },
    Recoil {
        inner: Box<MoveEffect>,
        divisor: u8,
    },
    /// Raises the user's stat (`Target::User`) or lowers the opponent's (`Target::Target`).
    StatModify {
        stat: ModifiableStat,
        stages: u8,
        target: Target,
    },
    StatusInflict(Status),
    Confuse,
    LeechSeed,
    Mist,
    Toxic,
    FocusEnergy,
    Reflect,
    LightScreen,
    NoEffect,
}

impl MoveEffect {
    /// The damage formula at the bottom of a (possibly wrapped) damaging effect.
    pub fn damage_formula(&self) -> Option<&DamageFormula> {
        match self {
            MoveEffect::Damaging(formula) => Some(formula),
            MoveEffect::Repeating { inner, .. }
            | MoveEffect::SideEffect { inner, .. }
            | MoveEffect::Recoil { inner, .. } => inner.damage_formula(),
            _ => None,
        }
    }

    pub fn is_damaging(&self) -> bool {
        self.damage_formula().is_some()
    }

    pub fn power(&self) -> Option<u8> {
        self.damage_formula().and_then(DamageFormula::power)
    }

    pub fn is_one_hit_ko(&self) -> bool {
        matches!(self.damage_formula(), Some(DamageFormula::OneHitKo))
    }

    pub fn raises_evasion(&self) -> bool {
        matches!(
            self,
            MoveEffect::StatModify { stat: ModifiableStat::Evasion, target: Target::User, .. }
        )
    }
}

/// A move as written in a catalog file. Accuracy is a 1-100 percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub name: String,
    pub pp: u8,
    pub move_type: PokemonType,
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub priority: i8,
    pub effect: MoveEffect,
}
