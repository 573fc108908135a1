//! The submit-based battle runner.
//!
//! Interactive callers (a UI, a network session) cannot hand the engine a
//! pair of decision sources and walk away; they learn each participant's
//! choice at its own pace. The runner holds submitted actions until every
//! active slot has one, then resolves the whole turn at once. The waits in
//! between are the battle's only suspension points, and no state mutates
//! while they last.

use crate::battle::actions::Action;
use crate::battle::engine::BattleEngine;
use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::field::{Field, SlotRef};
use crate::battle::outcome::Outcome;
use crate::errors::{EngineError, EngineResult};
use std::collections::HashMap;
use std::fmt;

/// What one resolved turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub events: Vec<BattleEvent>,
    pub outcome: Outcome,
    pub turn_completed: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BattleRunnerError {
    /// The slot is empty, charging a move, or not on the field.
    SlotNotAwaiting(SlotRef),
    AlreadySubmitted(SlotRef),
    /// Fainted slots must be refilled before the next turn's actions.
    ReplacementsPending,
    NotAwaitingReplacement(SlotRef),
    InvalidReplacement { slot: SlotRef, roster_index: usize },
    BattleOver,
    Engine(EngineError),
}

impl fmt::Display for BattleRunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleRunnerError::SlotNotAwaiting(slot) => {
                write!(f, "{} is not awaiting an action", slot)
            }
            BattleRunnerError::AlreadySubmitted(slot) => {
                write!(f, "{} already submitted an action", slot)
            }
            BattleRunnerError::ReplacementsPending => {
                write!(f, "replacements must be chosen before the next turn")
            }
            BattleRunnerError::NotAwaitingReplacement(slot) => {
                write!(f, "{} is not awaiting a replacement", slot)
            }
            BattleRunnerError::InvalidReplacement { slot, roster_index } => {
                write!(f, "roster member {} cannot fill {}", roster_index, slot)
            }
            BattleRunnerError::BattleOver => write!(f, "the battle has ended"),
            BattleRunnerError::Engine(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for BattleRunnerError {}

impl From<EngineError> for BattleRunnerError {
    fn from(err: EngineError) -> Self {
        BattleRunnerError::Engine(err)
    }
}

pub struct BattleRunner {
    engine: BattleEngine,
    pending: HashMap<SlotRef, Action>,
    log: EventLog,
}

impl BattleRunner {
    /// Wraps an engine and performs the initial send-out. Events accumulate
    /// in the runner's log until drained.
    pub fn new(mut engine: BattleEngine) -> EngineResult<Self> {
        let mut log = EventLog::new();
        engine.start(&mut log)?;
        Ok(Self {
            engine,
            pending: HashMap::new(),
            log,
        })
    }

    pub fn field(&self) -> &Field {
        self.engine.field()
    }

    pub fn outcome(&self) -> Outcome {
        self.engine.outcome()
    }

    pub fn is_battle_over(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// Drains events accumulated outside turn execution (send-outs,
    /// replacements).
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.log.drain()
    }

    /// Empty slots that must be refilled before the next turn can run.
    pub fn awaiting_replacements(&self) -> Vec<SlotRef> {
        self.engine
            .field()
            .all_slots()
            .into_iter()
            .filter(|slot_ref| {
                self.engine.field().slot(*slot_ref).is_empty()
                    && !self
                        .engine
                        .field()
                        .side(slot_ref.side)
                        .available_reserves()
                        .is_empty()
            })
            .collect()
    }

    /// Active slots still owing an action this turn. Slots locked into a
    /// charged move act on their own and are not listed.
    pub fn awaiting_actions(&self) -> Vec<SlotRef> {
        if self.is_battle_over() || !self.awaiting_replacements().is_empty() {
            return Vec::new();
        }
        self.engine
            .field()
            .active_slots()
            .into_iter()
            .filter(|slot_ref| {
                self.engine.field().slot(*slot_ref).charge.is_none()
                    && !self.pending.contains_key(slot_ref)
            })
            .collect()
    }

    /// Submits one slot's action. When the last awaited slot submits, the
    /// turn resolves immediately and its result is returned.
    pub fn submit_action(
        &mut self,
        slot_ref: SlotRef,
        action: Action,
    ) -> Result<Option<ExecutionResult>, BattleRunnerError> {
        if self.is_battle_over() {
            return Err(BattleRunnerError::BattleOver);
        }
        if !self.awaiting_replacements().is_empty() {
            return Err(BattleRunnerError::ReplacementsPending);
        }
        if self.pending.contains_key(&slot_ref) {
            return Err(BattleRunnerError::AlreadySubmitted(slot_ref));
        }
        let awaited = self
            .engine
            .field()
            .active_slots()
            .into_iter()
            .any(|active| active == slot_ref && self.engine.field().slot(active).charge.is_none());
        if !awaited {
            return Err(BattleRunnerError::SlotNotAwaiting(slot_ref));
        }

        self.pending.insert(slot_ref, action);
        if self.awaiting_actions().is_empty() {
            return self.execute_turn().map(Some);
        }
        Ok(None)
    }

    /// Fills one fainted slot with a chosen reserve, returning the send-out
    /// events.
    pub fn submit_replacement(
        &mut self,
        slot_ref: SlotRef,
        roster_index: usize,
    ) -> Result<Vec<BattleEvent>, BattleRunnerError> {
        if !self.awaiting_replacements().contains(&slot_ref) {
            return Err(BattleRunnerError::NotAwaitingReplacement(slot_ref));
        }
        if !self
            .engine
            .field()
            .side(slot_ref.side)
            .available_reserves()
            .contains(&roster_index)
        {
            return Err(BattleRunnerError::InvalidReplacement {
                slot: slot_ref,
                roster_index,
            });
        }
        self.engine
            .fill_vacancy(slot_ref, roster_index, &mut self.log)?;
        Ok(self.log.drain())
    }

    fn execute_turn(&mut self) -> Result<ExecutionResult, BattleRunnerError> {
        // Charged moves join the submitted actions automatically.
        let mut actions: Vec<Action> = Vec::new();
        for slot_ref in self.engine.field().active_slots() {
            if let Some(charge) = &self.engine.field().slot(slot_ref).charge {
                actions.push(Action::UseMove {
                    user: slot_ref,
                    target: charge.target,
                    move_id: charge.move_id.clone(),
                });
            }
        }
        actions.extend(std::mem::take(&mut self.pending).into_values());

        let outcome = self.engine.run_turn(actions, &mut self.log, &mut [])?;
        Ok(ExecutionResult {
            events: self.log.drain(),
            outcome,
            turn_completed: self.engine.field().turn.saturating_sub(1),
        })
    }
}
