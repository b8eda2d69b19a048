use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumCount, EnumIter};

/// Mutually exclusive, non-volatile status condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum Status {
    #[default]
    None,
    Sleep,
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

impl Status {
    pub fn is_none(self) -> bool {
        self == Status::None
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::None => write!(f, "None"),
            Status::Sleep => write!(f, "Sleep"),
            Status::Poison => write!(f, "Poison"),
            Status::Burn => write!(f, "Burn"),
            Status::Freeze => write!(f, "Freeze"),
            Status::Paralysis => write!(f, "Paralysis"),
        }
    }
}

/// Stats that moves can raise or lower during a battle.
/// The discriminant is the slot in an active pokemon's stage array.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
pub enum ModifiableStat {
    Attack,
    Defense,
    Special,
    Speed,
    Evasion,
    Accuracy,
}

impl ModifiableStat {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ModifiableStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifiableStat::Attack => write!(f, "Attack"),
            ModifiableStat::Defense => write!(f, "Defense"),
            ModifiableStat::Special => write!(f, "Special"),
            ModifiableStat::Speed => write!(f, "Speed"),
            ModifiableStat::Evasion => write!(f, "evasiveness"),
            ModifiableStat::Accuracy => write!(f, "accuracy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Target,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User => write!(f, "User"),
            Target::Target => write!(f, "Target"),
        }
    }
}
