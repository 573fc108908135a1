use serde::{Deserialize, Serialize};

/// One row of the held-item catalog. Like abilities, items are referenced by
/// id and resolved against the engine's handler registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Consumable items are discarded after their handler fires once.
    pub consumable: bool,
}
