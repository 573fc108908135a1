//! The battle orchestrator.
//!
//! Wires the field, the handler registry, the turn-order resolver, and the
//! battle queue into a turn loop, and decides when the battle is over. One
//! engine owns one battle: its field, its queue, its seeded random source.
//! Many engines can run in parallel without sharing anything.

use crate::battle::actions::{Action, DamageKind, TurnContext};
use crate::battle::config::BattleConfig;
use crate::battle::decision::DecisionSource;
use crate::battle::effects::{EffectRegistry, Trigger};
use crate::battle::events::{BattleEvent, EventSink};
use crate::battle::field::{Field, Side, SideId, SlotRef};
use crate::battle::order::order_actions;
use crate::battle::outcome::{assess, BattleReport, Outcome, Tally};
use crate::battle::queue::{BattleQueue, QueueObserver};
use crate::content::Dex;
use crate::creature::Creature;
use crate::errors::{EngineResult, SetupError};
use crate::rng::{BattleRng, SeededRng};
use schema::{ElementType, StatusCondition, TerrainKind, WeatherKind};
use std::sync::Arc;

pub struct BattleEngine {
    field: Field,
    dex: Arc<Dex>,
    registry: EffectRegistry,
    config: BattleConfig,
    rng: Box<dyn BattleRng>,
    tally: Tally,
    started: bool,
}

impl BattleEngine {
    /// Builds an engine with the default handler set and a seeded random
    /// source. Fails fast on any setup-time contract violation.
    pub fn new(
        config: BattleConfig,
        dex: Arc<Dex>,
        player_roster: Vec<Creature>,
        enemy_roster: Vec<Creature>,
        seed: u64,
    ) -> EngineResult<Self> {
        Self::with_rng(
            config,
            dex,
            player_roster,
            enemy_roster,
            Box::new(SeededRng::new(seed)),
        )
    }

    pub fn with_rng(
        config: BattleConfig,
        dex: Arc<Dex>,
        mut player_roster: Vec<Creature>,
        mut enemy_roster: Vec<Creature>,
        rng: Box<dyn BattleRng>,
    ) -> EngineResult<Self> {
        config.validate()?;
        if player_roster.is_empty() {
            return Err(SetupError::EmptyRoster(SideId::Player).into());
        }
        if enemy_roster.is_empty() {
            return Err(SetupError::EmptyRoster(SideId::Enemy).into());
        }
        for creature in player_roster.iter().chain(enemy_roster.iter()) {
            validate_creature(creature, &dex)?;
        }
        if !config.allow_items {
            for creature in player_roster.iter_mut().chain(enemy_roster.iter_mut()) {
                creature.held_item = None;
            }
        }

        let field = Field::new(
            Side::new(SideId::Player, config.slots_per_side, player_roster),
            Side::new(SideId::Enemy, config.slots_per_side, enemy_roster),
        );

        Ok(Self {
            field,
            dex,
            registry: EffectRegistry::with_defaults(),
            config,
            rng,
            tally: Tally::default(),
            started: false,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Mutable field access for test setup.
    #[cfg(test)]
    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    pub fn dex(&self) -> &Dex {
        &self.dex
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn outcome(&self) -> Outcome {
        assess(&self.field)
    }

    /// Sends out each side's leading roster members. Runs through the queue
    /// so entry triggers and presentation behave exactly like a mid-battle
    /// switch.
    pub fn start(&mut self, sink: &mut dyn EventSink) -> EngineResult<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        let mut queue = BattleQueue::new();
        for side in [SideId::Player, SideId::Enemy] {
            let roster_len = self.field.side(side).roster.len();
            for index in 0..self.field.side(side).slot_count().min(roster_len) {
                queue.push_back(Action::Switch {
                    slot: SlotRef::new(side, index),
                    roster_index: index,
                });
            }
        }
        self.drain(&mut queue, sink, &mut [])
    }

    /// Collects every active slot's intended action: slots locked into a
    /// charged move act on their own, everyone else asks their side's
    /// decision source.
    pub fn collect_actions<'a>(
        &mut self,
        player_source: &'a mut dyn DecisionSource,
        enemy_source: &'a mut dyn DecisionSource,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        for slot_ref in self.field.active_slots() {
            if let Some(charge) = &self.field.slot(slot_ref).charge {
                actions.push(Action::UseMove {
                    user: slot_ref,
                    target: charge.target,
                    move_id: charge.move_id.clone(),
                });
                continue;
            }
            let source = match slot_ref.side {
                SideId::Player => &mut *player_source,
                SideId::Enemy => &mut *enemy_source,
            };
            if let Some(action) = source.choose_action(&self.field, &self.dex, slot_ref) {
                if !self.config.allow_switching && matches!(action, Action::Switch { .. }) {
                    continue;
                }
                actions.push(action);
            }
        }
        actions
    }

    /// Resolves one turn from already-collected actions: order, drain,
    /// residuals. Replacement fills are the caller's business (see `run`).
    pub fn run_turn(
        &mut self,
        actions: Vec<Action>,
        sink: &mut dyn EventSink,
        observers: &mut [&mut dyn QueueObserver],
    ) -> EngineResult<Outcome> {
        sink.publish(BattleEvent::TurnStarted {
            turn: self.field.turn,
        });
        for slot_ref in self.field.all_slots() {
            self.field.slot_mut(slot_ref).begin_turn();
        }

        let ordered = order_actions(&self.field, &self.dex, actions, self.rng.as_mut());
        let mut queue = BattleQueue::from_actions(ordered);
        self.drain(&mut queue, sink, observers)?;

        if !self.outcome().is_terminal() {
            self.end_of_turn(sink)?;
        }

        sink.publish(BattleEvent::TurnEnded);
        self.field.turn += 1;
        Ok(self.outcome())
    }

    /// Drives a whole battle to its terminal outcome.
    pub fn run(
        &mut self,
        player_source: &mut dyn DecisionSource,
        enemy_source: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> EngineResult<BattleReport> {
        self.start(sink)?;

        let outcome = loop {
            let assessed = self.outcome();
            if assessed.is_terminal() {
                break assessed;
            }
            if self.config.max_turns > 0 && self.field.turn > self.config.max_turns {
                break Outcome::Draw;
            }

            let actions = self.collect_actions(player_source, enemy_source);
            let after_turn = self.run_turn(actions, sink, &mut [])?;
            if !after_turn.is_terminal() {
                self.fill_vacancies(player_source, enemy_source, sink)?;
            }
        };

        sink.publish(BattleEvent::BattleEnded { outcome });
        Ok(BattleReport {
            outcome,
            turns: self.field.turn.saturating_sub(1),
            mvp: self.tally.mvp(),
            defeated: self.tally.defeated().to_vec(),
        })
    }

    /// After faints, brings reserves into empty slots. The side's decision
    /// source picks; the first available reserve is the fallback so a side
    /// never forfeits by omission.
    pub fn fill_vacancies<'a>(
        &mut self,
        player_source: &'a mut dyn DecisionSource,
        enemy_source: &'a mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> EngineResult<()> {
        let mut queue = BattleQueue::new();
        for slot_ref in self.field.all_slots() {
            if !self.field.slot(slot_ref).is_empty() {
                continue;
            }
            let reserves = self.field.side(slot_ref.side).available_reserves();
            if reserves.is_empty() {
                continue;
            }
            let source = match slot_ref.side {
                SideId::Player => &mut *player_source,
                SideId::Enemy => &mut *enemy_source,
            };
            let pick = source
                .choose_replacement(&self.field, slot_ref)
                .filter(|index| reserves.contains(index))
                .unwrap_or(reserves[0]);
            queue.push_back(Action::Switch {
                slot: slot_ref,
                roster_index: pick,
            });
            // Resolve each send-out immediately so the next pick sees it.
            self.drain(&mut queue, sink, &mut [])?;
        }
        Ok(())
    }

    /// Brings one chosen reserve into one empty slot, resolving entry
    /// triggers through the queue.
    pub fn fill_vacancy(
        &mut self,
        slot_ref: SlotRef,
        roster_index: usize,
        sink: &mut dyn EventSink,
    ) -> EngineResult<()> {
        let mut queue = BattleQueue::from_actions(vec![Action::Switch {
            slot: slot_ref,
            roster_index,
        }]);
        self.drain(&mut queue, sink, &mut [])
    }

    /// End-of-turn residual phase: status chip, weather chip, terrain
    /// recovery, end-of-turn passives, then the field's timers.
    fn end_of_turn(&mut self, sink: &mut dyn EventSink) -> EngineResult<()> {
        let mut queue = BattleQueue::new();

        for slot_ref in self.field.active_slots() {
            let Some(creature) = self.field.creature_at(slot_ref) else {
                continue;
            };
            let name = creature.name.clone();
            let max_hp = creature.max_hp();

            match creature.status {
                Some(StatusCondition::Poison) => {
                    queue.push_back(Action::message(format!("{} is hurt by poison!", name)));
                    queue.push_back(Action::Damage {
                        target: slot_ref,
                        amount: (max_hp / 8).max(1),
                        kind: DamageKind::Residual,
                        source: None,
                    });
                }
                Some(StatusCondition::Burn) => {
                    queue.push_back(Action::message(format!("{} is hurt by its burn!", name)));
                    queue.push_back(Action::Damage {
                        target: slot_ref,
                        amount: (max_hp / 16).max(1),
                        kind: DamageKind::Residual,
                        source: None,
                    });
                }
                _ => {}
            }

            match self.field.weather.map(|state| state.kind) {
                Some(WeatherKind::Sandstorm) if !creature.has_element(ElementType::Earth) => {
                    queue.push_back(Action::message(format!(
                        "{} is buffeted by the sandstorm!",
                        name
                    )));
                    queue.push_back(Action::Damage {
                        target: slot_ref,
                        amount: (max_hp / 16).max(1),
                        kind: DamageKind::Residual,
                        source: None,
                    });
                }
                Some(WeatherKind::Hailstorm) if !creature.has_element(ElementType::Ice) => {
                    queue.push_back(Action::message(format!(
                        "{} is pelted by the hail!",
                        name
                    )));
                    queue.push_back(Action::Damage {
                        target: slot_ref,
                        amount: (max_hp / 16).max(1),
                        kind: DamageKind::Residual,
                        source: None,
                    });
                }
                _ => {}
            }

            if matches!(
                self.field.terrain.map(|state| state.kind),
                Some(TerrainKind::Verdant)
            ) && creature.current_hp() < max_hp
            {
                queue.push_back(Action::Heal {
                    target: slot_ref,
                    amount: (max_hp / 16).max(1),
                });
            }

            let passives = self.registry.trigger_passives(
                Trigger::OnEndOfTurn,
                slot_ref,
                None,
                &self.field,
                self.rng.as_mut(),
            );
            for action in passives {
                queue.push_back(action);
            }
        }

        self.drain(&mut queue, sink, &mut [])?;

        // Timers and streak upkeep happen after residuals resolve.
        let (expired_weather, expired_terrain) = self.field.tick_field_timers();
        if expired_weather.is_some() {
            sink.publish(BattleEvent::WeatherChanged { weather: None });
        }
        if expired_terrain.is_some() {
            sink.publish(BattleEvent::TerrainChanged { terrain: None });
        }
        for side in [SideId::Player, SideId::Enemy] {
            for condition in self.field.side_mut(side).tick_conditions() {
                sink.publish(BattleEvent::SideConditionEnded { side, condition });
            }
        }
        for slot_ref in self.field.active_slots() {
            let slot = self.field.slot_mut(slot_ref);
            if !slot.protect_attempted {
                slot.protect_streak = 0;
            }
        }
        Ok(())
    }

    fn drain(
        &mut self,
        queue: &mut BattleQueue,
        sink: &mut dyn EventSink,
        observers: &mut [&mut dyn QueueObserver],
    ) -> EngineResult<()> {
        let mut ctx = TurnContext {
            dex: self.dex.as_ref(),
            registry: &self.registry,
            rng: self.rng.as_mut(),
            tally: &mut self.tally,
        };
        queue.run(&mut self.field, &mut ctx, sink, observers)
    }
}

fn validate_creature(creature: &Creature, dex: &Dex) -> Result<(), SetupError> {
    let mut has_move = false;
    for instance in creature.moves.iter().flatten() {
        has_move = true;
        if dex.move_data(&instance.move_id).is_err() {
            return Err(SetupError::UnknownContent {
                creature: creature.name.clone(),
                id: instance.move_id.clone(),
            });
        }
    }
    if !has_move {
        return Err(SetupError::NoMoves(creature.name.clone()));
    }
    Ok(())
}
