use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// The seven battle-relevant stats that can hold a stage modifier.
/// The first five also exist as computed stats on a creature; accuracy and
/// evasion only exist as stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum Stat {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Stat {
    /// Index into a per-slot stage array.
    pub fn index(self) -> usize {
        match self {
            Stat::Attack => 0,
            Stat::Defense => 1,
            Stat::SpAttack => 2,
            Stat::SpDefense => 3,
            Stat::Speed => 4,
            Stat::Accuracy => 5,
            Stat::Evasion => 6,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpAttack => "Sp. Attack",
            Stat::SpDefense => "Sp. Defense",
            Stat::Speed => "Speed",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasion",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}
