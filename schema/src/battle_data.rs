use serde::{Deserialize, Serialize};
use std::fmt;

/// Field-wide weather. The engine tracks the remaining duration next to the
/// kind; 0 means the weather does not expire on its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum WeatherKind {
    Sunshine,
    Downpour,
    Sandstorm,
    Hailstorm,
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            WeatherKind::Sunshine => "harsh sunshine",
            WeatherKind::Downpour => "heavy rain",
            WeatherKind::Sandstorm => "a sandstorm",
            WeatherKind::Hailstorm => "a hailstorm",
        };
        write!(f, "{}", display_name)
    }
}

/// Field-wide terrain, tracked like weather.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum TerrainKind {
    Verdant,
    Misty,
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            TerrainKind::Verdant => "verdant terrain",
            TerrainKind::Misty => "misty terrain",
        };
        write!(f, "{}", display_name)
    }
}

/// A timed condition affecting one whole side of the field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum SideConditionKind {
    Tailwind,
}

impl fmt::Display for SideConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            SideConditionKind::Tailwind => "Tailwind",
        };
        write!(f, "{}", display_name)
    }
}

/// An entry hazard placed against one side, punishing creatures as they
/// switch in. Hazards persist until the battle ends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum HazardKind {
    Spikes,
    ToxicTrap,
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            HazardKind::Spikes => "spikes",
            HazardKind::ToxicTrap => "a toxic trap",
        };
        write!(f, "{}", display_name)
    }
}
