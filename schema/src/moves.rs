use crate::battle_data::{HazardKind, SideConditionKind, TerrainKind, WeatherKind};
use crate::elements::ElementType;
use crate::stats::Stat;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};

/// Which side of the damage formula a move uses, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Whom an effect applies to, relative to the move's user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Foe,
}

/// A data-described behavior attached to a move. Effects are pure content:
/// the engine's handler registry decides what each variant does in battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    InflictStatus {
        target: Target,
        status: StatusKind,
        chance: u8, // percent
    },
    StatChange {
        target: Target,
        stat: Stat,
        stages: i8,
        chance: u8, // percent
    },
    Recoil {
        percent: u8, // of damage dealt
    },
    Drain {
        percent: u8, // of damage dealt, healed to the user
    },
    Heal {
        percent: u8, // of the user's max HP
    },
    Flinch {
        chance: u8, // percent
    },
    Protect,
    Counter,
    Charge {
        /// While charging, the user cannot be hit by accuracy-checked moves.
        semi_invulnerable: bool,
    },
    SetWeather {
        weather: WeatherKind,
        turns: u8, // 0 = indefinite
    },
    SetTerrain {
        terrain: TerrainKind,
        turns: u8, // 0 = indefinite
    },
    SideCondition {
        target: Target,
        condition: SideConditionKind,
        turns: u8,
    },
    Hazard {
        hazard: HazardKind,
    },
}

/// Effect variant without payload, used as the handler-registry dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    InflictStatus,
    StatChange,
    Recoil,
    Drain,
    Heal,
    Flinch,
    Protect,
    Counter,
    Charge,
    SetWeather,
    SetTerrain,
    SideCondition,
    Hazard,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::InflictStatus { .. } => EffectKind::InflictStatus,
            Effect::StatChange { .. } => EffectKind::StatChange,
            Effect::Recoil { .. } => EffectKind::Recoil,
            Effect::Drain { .. } => EffectKind::Drain,
            Effect::Heal { .. } => EffectKind::Heal,
            Effect::Flinch { .. } => EffectKind::Flinch,
            Effect::Protect => EffectKind::Protect,
            Effect::Counter => EffectKind::Counter,
            Effect::Charge { .. } => EffectKind::Charge,
            Effect::SetWeather { .. } => EffectKind::SetWeather,
            Effect::SetTerrain { .. } => EffectKind::SetTerrain,
            Effect::SideCondition { .. } => EffectKind::SideCondition,
            Effect::Hazard { .. } => EffectKind::Hazard,
        }
    }
}

/// One row of the move catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    pub name: String,
    pub element: ElementType,
    pub category: MoveCategory,
    pub power: u16,
    /// None means the move never misses.
    pub accuracy: Option<u8>,
    pub priority: i8,
    /// Extra critical-hit stages granted by the move itself.
    pub crit_boost: u8,
    pub makes_contact: bool,
    pub max_pp: u8,
    pub effects: Vec<Effect>,
}

impl MoveData {
    /// Convenience: the first effect of the given kind, if any.
    pub fn effect_of_kind(&self, kind: EffectKind) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.kind() == kind)
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effect_of_kind(kind).is_some()
    }

    pub fn is_damaging(&self) -> bool {
        !matches!(self.category, MoveCategory::Status) && self.power > 0
    }
}
