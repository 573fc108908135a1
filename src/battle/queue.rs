//! The battle queue: sequences actions and expands their reactions.
//!
//! Reactions are inserted at the very front of the queue, preserving their
//! declared order, so consequence chains resolve depth-first before anything
//! that was queued earlier gets to run.

use crate::battle::actions::{Action, TurnContext};
use crate::battle::events::EventSink;
use crate::battle::field::Field;
use crate::errors::{EngineResult, InternalError};
use std::collections::VecDeque;

/// Hard ceiling on actions executed per drain. Hitting it means an effect
/// graph is feeding reactions back into itself, which is an engine bug, not
/// a game state.
pub const QUEUE_ITERATION_LIMIT: usize = 512;

/// First-class observation hooks, so debugging tooling never has to reach
/// into the queue's internals.
pub trait QueueObserver {
    fn action_started(&mut self, _action: &Action) {}
    fn action_finished(&mut self, _action: &Action, _reaction_count: usize) {}
}

pub struct BattleQueue {
    pending: VecDeque<Action>,
}

impl BattleQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self {
            pending: actions.into(),
        }
    }

    pub fn push_back(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Front-inserts reactions, keeping their relative order: if the list is
    /// [A, B], A will run first.
    fn insert_reactions(&mut self, reactions: Vec<Action>) {
        for reaction in reactions.into_iter().rev() {
            self.pending.push_front(reaction);
        }
    }

    /// Drains the queue: pop, run logic, run visual, front-insert reactions,
    /// repeat until empty or the ceiling trips.
    pub fn run(
        &mut self,
        field: &mut Field,
        ctx: &mut TurnContext,
        sink: &mut dyn EventSink,
        observers: &mut [&mut dyn QueueObserver],
    ) -> EngineResult<()> {
        let mut executed = 0;
        while let Some(action) = self.pending.pop_front() {
            if executed >= QUEUE_ITERATION_LIMIT {
                return Err(InternalError::ReactionLimitExceeded {
                    executed,
                    limit: QUEUE_ITERATION_LIMIT,
                }
                .into());
            }
            for observer in observers.iter_mut() {
                observer.action_started(&action);
            }

            let reactions = action.execute_logic(field, ctx);
            action.execute_visual(field, sink);
            let reaction_count = reactions.len();
            self.insert_reactions(reactions);

            for observer in observers.iter_mut() {
                observer.action_finished(&action, reaction_count);
            }
            executed += 1;
        }
        Ok(())
    }
}

impl Default for BattleQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::actions::Action;
    use crate::battle::effects::EffectRegistry;
    use crate::battle::events::{BattleEvent, EventLog};
    use crate::battle::field::{Side, SideId, SlotRef};
    use crate::battle::outcome::Tally;
    use crate::content::Dex;
    use crate::creature::Creature;
    use crate::errors::EngineError;
    use crate::rng::ScriptedRng;
    use pretty_assertions::assert_eq;
    use schema::{ElementType, Stat};

    fn simple_field() -> Field {
        let creature = Creature::new_for_test(
            "Test",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, 60],
            [const { None }; 4],
        );
        let mut field = Field::new(
            Side::new(SideId::Player, 1, vec![creature.clone()]),
            Side::new(SideId::Enemy, 1, vec![creature]),
        );
        field
            .slot_mut(SlotRef::new(SideId::Player, 0))
            .set_occupant(0);
        field
            .slot_mut(SlotRef::new(SideId::Enemy, 0))
            .set_occupant(0);
        field
    }

    struct CountingObserver {
        started: usize,
        finished: usize,
        reactions_seen: usize,
    }

    impl QueueObserver for CountingObserver {
        fn action_started(&mut self, _action: &Action) {
            self.started += 1;
        }
        fn action_finished(&mut self, _action: &Action, reaction_count: usize) {
            self.finished += 1;
            self.reactions_seen += reaction_count;
        }
    }

    #[test]
    fn reactions_run_before_previously_queued_actions() {
        let mut field = simple_field();
        let dex = Dex::demo();
        let registry = EffectRegistry::with_defaults();
        let mut rng = ScriptedRng::new(vec![]);
        let mut tally = Tally::default();
        let mut ctx = crate::battle::actions::TurnContext {
            dex: &dex,
            registry: &registry,
            rng: &mut rng,
            tally: &mut tally,
        };
        let mut sink = EventLog::new();

        let slot = SlotRef::new(SideId::Player, 0);
        // The stat change's Emit reaction must be heard before the message
        // that was queued after it.
        let mut queue = BattleQueue::from_actions(vec![
            Action::StatChange {
                target: slot,
                stat: Stat::Attack,
                delta: 1,
            },
            Action::message("queued earlier, runs later"),
        ]);
        queue
            .run(&mut field, &mut ctx, &mut sink, &mut [])
            .expect("queue drains");

        let events = sink.events();
        assert!(matches!(
            events[0],
            BattleEvent::StatStageChanged { delta: 1, .. }
        ));
        assert_eq!(
            events[1],
            BattleEvent::Message {
                text: "queued earlier, runs later".to_string()
            }
        );
    }

    #[test]
    fn observers_hear_every_action_and_its_reaction_count() {
        let mut field = simple_field();
        let dex = Dex::demo();
        let registry = EffectRegistry::with_defaults();
        let mut rng = ScriptedRng::new(vec![]);
        let mut tally = Tally::default();
        let mut ctx = crate::battle::actions::TurnContext {
            dex: &dex,
            registry: &registry,
            rng: &mut rng,
            tally: &mut tally,
        };
        let mut sink = EventLog::new();
        let mut observer = CountingObserver {
            started: 0,
            finished: 0,
            reactions_seen: 0,
        };

        let slot = SlotRef::new(SideId::Player, 0);
        let mut queue = BattleQueue::from_actions(vec![Action::StatChange {
            target: slot,
            stat: Stat::Attack,
            delta: 1,
        }]);
        queue
            .run(&mut field, &mut ctx, &mut sink, &mut [&mut observer])
            .expect("queue drains");

        // The stat change plus its one Emit reaction.
        assert_eq!(observer.started, 2);
        assert_eq!(observer.finished, 2);
        assert_eq!(observer.reactions_seen, 1);
    }

    #[test]
    fn iteration_ceiling_is_a_fatal_error() {
        let mut field = simple_field();
        let dex = Dex::demo();
        let registry = EffectRegistry::with_defaults();
        let mut rng = ScriptedRng::new(vec![]);
        let mut tally = Tally::default();
        let mut ctx = crate::battle::actions::TurnContext {
            dex: &dex,
            registry: &registry,
            rng: &mut rng,
            tally: &mut tally,
        };
        let mut sink = EventLog::new();

        let actions = (0..QUEUE_ITERATION_LIMIT + 1)
            .map(|index| Action::message(format!("pathological {}", index)))
            .collect();
        let mut queue = BattleQueue::from_actions(actions);
        let result = queue.run(&mut field, &mut ctx, &mut sink, &mut []);

        assert!(matches!(
            result,
            Err(EngineError::Internal(
                InternalError::ReactionLimitExceeded { .. }
            ))
        ));
    }
}
