use serde::{Deserialize, Serialize};
use std::fmt;

/// A persistent status condition carried by the creature itself. Unlike
/// volatile conditions, these survive switching out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    /// Remaining sleep turns; the creature wakes when the counter hits zero.
    Sleep { turns: u8 },
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

impl StatusCondition {
    pub fn kind(&self) -> StatusKind {
        match self {
            StatusCondition::Sleep { .. } => StatusKind::Sleep,
            StatusCondition::Poison => StatusKind::Poison,
            StatusCondition::Burn => StatusKind::Burn,
            StatusCondition::Freeze => StatusKind::Freeze,
            StatusCondition::Paralysis => StatusKind::Paralysis,
        }
    }
}

/// Content-side identifier for a status, as carried by move and ability data.
/// Turning a kind into a live `StatusCondition` may need a random roll (sleep
/// duration), which is the engine's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum StatusKind {
    Sleep,
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusKind::Sleep => "sleep",
            StatusKind::Poison => "poison",
            StatusKind::Burn => "burn",
            StatusKind::Freeze => "freeze",
            StatusKind::Paralysis => "paralysis",
        };
        write!(f, "{}", display_name)
    }
}
