use crate::elements::ElementType;
use crate::stats::BaseStats;
use serde::{Deserialize, Serialize};

/// One row of the species catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: String,
    pub dex_number: u16,
    pub name: String,
    pub primary: ElementType,
    pub secondary: Option<ElementType>,
    pub base_stats: BaseStats,
    pub description: String,
}

impl SpeciesData {
    /// The species' elements as (primary, optional secondary).
    pub fn elements(&self) -> (ElementType, Option<ElementType>) {
        (self.primary, self.secondary)
    }

    pub fn has_element(&self, element: ElementType) -> bool {
        self.primary == element || self.secondary == Some(element)
    }
}
