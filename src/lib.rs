// In: src/lib.rs

//! Monster Arena Combat Engine
//!
//! The battle-resolution core of a turn-based creature-collecting game:
//! given two rosters of creatures with moves, abilities, and items, it
//! resolves a full battle to a win/loss/draw outcome, turn by turn, with
//! reproducible randomness and a headless presentation channel.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod battle;
pub mod content;
pub mod creature;
pub mod errors;
pub mod rng;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `monster-arena` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Re-export all core content-data definitions and static enums.
pub use schema::{
    // Supporting Types & Enums
    AbilityData,
    BaseStats,
    // Core Enums
    Effect,
    EffectKind,
    ElementType,
    HazardKind,
    ItemData,
    MoveCategory,
    // Core Data Structs
    MoveData,
    SideConditionKind,
    SpeciesData,
    Stat,
    StatusCondition,
    StatusKind,
    Target,
    TerrainKind,
    WeatherKind,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine types and the turn loop.
pub use battle::actions::{Action, DamageKind, TurnContext};
pub use battle::config::BattleConfig;
pub use battle::damage::{compute_damage, DamageContext};
pub use battle::decision::{DecisionSource, PreferFirstMove, ScriptedSource};
pub use battle::effects::{EffectHandler, EffectRegistry, PassiveHandler, Trigger, ValueKind};
pub use battle::engine::BattleEngine;
pub use battle::events::{BattleEvent, ChannelSink, EventLog, EventSink, NullSink};
pub use battle::field::{Field, Side, SideId, Slot, SlotRef, VolatileFlags};
pub use battle::outcome::{assess, BattleReport, Outcome};
pub use battle::queue::{BattleQueue, QueueObserver};
pub use battle::runner::{BattleRunner, BattleRunnerError, ExecutionResult};

// Core runtime types for a battle.
pub use creature::{Creature, MoveInstance};

// Primary content access.
pub use content::{CatalogDoc, Dex};

// Crate-specific error and result types.
pub use errors::{ContentError, ContentResult, EngineError, EngineResult, InternalError, SetupError};

// Random source contract.
pub use rng::{BattleRng, ScriptedRng, SeededRng};
