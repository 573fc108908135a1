use serde::{Deserialize, Serialize};

/// One row of the ability catalog. Abilities are referenced by id; their
/// in-battle behavior lives in the engine's handler registry, so unknown ids
/// are inert rather than invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityData {
    pub id: String,
    pub name: String,
    pub description: String,
}
