use crate::errors::SetupError;
use serde::{Deserialize, Serialize};

/// Battle-level knobs, validated once before the first turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Active slots per side: 1 (singles), 2 (doubles), or 3 (triples).
    pub slots_per_side: usize,
    /// Hard turn cap; 0 means unlimited. A capped battle ends in a draw.
    pub max_turns: u32,
    /// When false, held items are stripped before the battle starts.
    pub allow_items: bool,
    /// When false, voluntary switches are ignored (forced replacements after
    /// a faint still happen).
    pub allow_switching: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            slots_per_side: 1,
            max_turns: 0,
            allow_items: true,
            allow_switching: true,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(1..=3).contains(&self.slots_per_side) {
            return Err(SetupError::InvalidSlotCount(self.slots_per_side));
        }
        Ok(())
    }
}
