use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Venom,
    Earth,
    Wind,
    Mystic,
    Shade,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ElementType {
    /// Effectiveness multiplier for a single attacking element against a
    /// single defending element.
    /// Returns: 2.0 = super effective, 1.0 = neutral, 0.5 = resisted, 0.0 = immune
    pub fn effectiveness_against(attacking: ElementType, defending: ElementType) -> f32 {
        use ElementType::*;

        match (attacking, defending) {
            // Normal
            (Normal, Shade) => 0.0,
            (Normal, _) => 1.0,

            // Fire
            (Fire, Fire) | (Fire, Water) => 0.5,
            (Fire, Grass) | (Fire, Ice) => 2.0,
            (Fire, _) => 1.0,

            // Water
            (Water, Water) | (Water, Grass) => 0.5,
            (Water, Fire) | (Water, Earth) => 2.0,
            (Water, _) => 1.0,

            // Grass
            (Grass, Fire) | (Grass, Grass) | (Grass, Wind) | (Grass, Venom) => 0.5,
            (Grass, Water) | (Grass, Earth) => 2.0,
            (Grass, _) => 1.0,

            // Electric
            (Electric, Grass) | (Electric, Electric) => 0.5,
            (Electric, Earth) => 0.0,
            (Electric, Water) | (Electric, Wind) => 2.0,
            (Electric, _) => 1.0,

            // Ice
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) => 0.5,
            (Ice, Grass) | (Ice, Earth) | (Ice, Wind) => 2.0,
            (Ice, _) => 1.0,

            // Fighting
            (Fighting, Wind) | (Fighting, Mystic) | (Fighting, Venom) => 0.5,
            (Fighting, Shade) => 0.0,
            (Fighting, Normal) | (Fighting, Ice) => 2.0,
            (Fighting, _) => 1.0,

            // Venom
            (Venom, Venom) | (Venom, Earth) | (Venom, Shade) => 0.5,
            (Venom, Grass) => 2.0,
            (Venom, _) => 1.0,

            // Earth
            (Earth, Grass) => 0.5,
            (Earth, Wind) => 0.0,
            (Earth, Fire) | (Earth, Electric) | (Earth, Venom) => 2.0,
            (Earth, _) => 1.0,

            // Wind
            (Wind, Electric) => 0.5,
            (Wind, Grass) | (Wind, Fighting) => 2.0,
            (Wind, _) => 1.0,

            // Mystic
            (Mystic, Mystic) => 0.5,
            (Mystic, Fighting) | (Mystic, Venom) => 2.0,
            (Mystic, _) => 1.0,

            // Shade
            (Shade, Normal) => 0.0,
            (Shade, Mystic) | (Shade, Shade) => 2.0,
            (Shade, _) => 1.0,
        }
    }

    /// Effectiveness against a possibly dual-element defender. The result is
    /// the product of the single-element multipliers, so it always lands in
    /// {0, 0.25, 0.5, 1, 2, 4}.
    pub fn effectiveness_dual(
        attacking: ElementType,
        primary: ElementType,
        secondary: Option<ElementType>,
    ) -> f32 {
        let first = Self::effectiveness_against(attacking, primary);
        match secondary {
            Some(second) => first * Self::effectiveness_against(attacking, second),
            None => first,
        }
    }
}
