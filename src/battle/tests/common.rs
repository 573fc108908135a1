use crate::battle::actions::Action;
use crate::battle::config::BattleConfig;
use crate::battle::engine::BattleEngine;
use crate::battle::events::EventLog;
use crate::battle::field::{SideId, SlotRef};
use crate::content::Dex;
use crate::creature::Creature;
use crate::rng::BattleRng;
use schema::StatusCondition;
use std::sync::Arc;

/// A builder for creating test creatures from the demo catalog with common
/// defaults.
///
/// # Example
/// ```rust,ignore
/// let creature = TestCreatureBuilder::new("embercub")
///     .with_moves(&["tackle", "ember_burst"])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    species_id: String,
    level: u8,
    moves: Vec<String>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    ability: Option<String>,
    held_item: Option<String>,
}

impl TestCreatureBuilder {
    pub fn new(species_id: &str) -> Self {
        Self {
            species_id: species_id.to_string(),
            level: 50,
            moves: vec!["tackle".to_string()],
            status: None,
            current_hp: None,
            ability: None,
            held_item: None,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets current HP. If not set, HP starts at max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_ability(mut self, ability_id: &str) -> Self {
        self.ability = Some(ability_id.to_string());
        self
    }

    pub fn with_held_item(mut self, item_id: &str) -> Self {
        self.held_item = Some(item_id.to_string());
        self
    }

    pub fn build(self) -> Creature {
        let dex = Dex::demo();
        let species = dex
            .species(&self.species_id)
            .unwrap_or_else(|err| panic!("demo species lookup failed: {}", err));
        let rows: Vec<_> = self
            .moves
            .iter()
            .map(|id| {
                dex.move_data(id)
                    .unwrap_or_else(|err| panic!("demo move lookup failed: {}", err))
                    .clone()
            })
            .collect();
        let row_refs: Vec<_> = rows.iter().collect();
        let mut creature = Creature::from_species(species, self.level, &row_refs);
        if let Some(status) = self.status {
            creature.set_status(status);
        }
        if let Some(hp) = self.current_hp {
            let max = creature.max_hp();
            creature.take_damage(max.saturating_sub(hp));
        }
        if let Some(ability) = self.ability {
            creature = creature.with_ability(&ability);
        }
        if let Some(item) = self.held_item {
            creature = creature.with_held_item(&item);
        }
        creature
    }
}

/// A singles engine over the demo catalog with a seeded random source.
pub fn singles_engine(player: Vec<Creature>, enemy: Vec<Creature>, seed: u64) -> BattleEngine {
    BattleEngine::new(
        BattleConfig::default(),
        Arc::new(Dex::demo()),
        player,
        enemy,
        seed,
    )
    .expect("engine setup")
}

/// Same, but with an explicit random source (usually `ScriptedRng`).
pub fn singles_engine_with_rng(
    player: Vec<Creature>,
    enemy: Vec<Creature>,
    rng: Box<dyn BattleRng>,
) -> BattleEngine {
    BattleEngine::with_rng(
        BattleConfig::default(),
        Arc::new(Dex::demo()),
        player,
        enemy,
        rng,
    )
    .expect("engine setup")
}

/// Starts the engine (initial send-out) and discards the send-out events.
pub fn started(mut engine: BattleEngine) -> BattleEngine {
    let mut log = EventLog::new();
    engine.start(&mut log).expect("send-out");
    engine
}

pub fn player_slot() -> SlotRef {
    SlotRef::new(SideId::Player, 0)
}

pub fn enemy_slot() -> SlotRef {
    SlotRef::new(SideId::Enemy, 0)
}

pub fn player_move(move_id: &str) -> Action {
    Action::UseMove {
        user: player_slot(),
        target: enemy_slot(),
        move_id: move_id.to_string(),
    }
}

pub fn enemy_move(move_id: &str) -> Action {
    Action::UseMove {
        user: enemy_slot(),
        target: player_slot(),
        move_id: move_id.to_string(),
    }
}
