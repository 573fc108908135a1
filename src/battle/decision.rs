//! Decision sources: where intended actions come from.
//!
//! A decision source inspects the field and answers with the next action for
//! a slot, or None to stand idle. Sources see the field immutably; nothing
//! they do can change battle state directly. Player-input layers and real AI
//! strategies live outside this crate behind this same trait.

use crate::battle::actions::Action;
use crate::battle::field::{Field, SlotRef};
use crate::content::Dex;
use std::collections::VecDeque;

pub trait DecisionSource {
    /// The next intended action for the creature in `slot`, or None to pass.
    fn choose_action(&mut self, field: &Field, dex: &Dex, slot: SlotRef) -> Option<Action>;

    /// Pick a roster index to fill an empty slot after a faint. None lets
    /// the engine fall back to the first available reserve.
    fn choose_replacement(&mut self, _field: &Field, _slot: SlotRef) -> Option<usize> {
        None
    }
}

/// Serves a fixed script of actions, then passes. The workhorse of tests.
#[derive(Default)]
pub struct ScriptedSource {
    actions: VecDeque<Action>,
    replacements: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions: actions.into(),
            replacements: VecDeque::new(),
        }
    }

    pub fn with_replacements(mut self, replacements: Vec<usize>) -> Self {
        self.replacements = replacements.into();
        self
    }
}

impl DecisionSource for ScriptedSource {
    fn choose_action(&mut self, _field: &Field, _dex: &Dex, _slot: SlotRef) -> Option<Action> {
        self.actions.pop_front()
    }

    fn choose_replacement(&mut self, _field: &Field, _slot: SlotRef) -> Option<usize> {
        self.replacements.pop_front()
    }
}

/// Always uses the first move that still has PP against the first opposing
/// creature. Enough brain to drive batch simulations to completion.
pub struct PreferFirstMove;

impl DecisionSource for PreferFirstMove {
    fn choose_action(&mut self, field: &Field, _dex: &Dex, slot: SlotRef) -> Option<Action> {
        let creature = field.creature_at(slot)?;
        let move_id = creature
            .moves
            .iter()
            .flatten()
            .find(|instance| instance.pp > 0)
            .map(|instance| instance.move_id.clone())?;
        let target = field.first_active_slot(slot.side.opponent())?;
        Some(Action::UseMove {
            user: slot,
            target,
            move_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::{Side, SideId};
    use crate::creature::{Creature, MoveInstance};
    use pretty_assertions::assert_eq;
    use schema::ElementType;

    #[test]
    fn prefer_first_move_skips_empty_pp() {
        let drained = MoveInstance {
            move_id: "tackle".to_string(),
            pp: 0,
        };
        let fresh = MoveInstance {
            move_id: "slam".to_string(),
            pp: 3,
        };
        let attacker = Creature::new_for_test(
            "Attacker",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, 60],
            [Some(drained), Some(fresh), None, None],
        );
        let defender = Creature::new_for_test(
            "Defender",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, 60],
            [const { None }; 4],
        );
        let mut field = Field::new(
            Side::new(SideId::Player, 1, vec![attacker]),
            Side::new(SideId::Enemy, 1, vec![defender]),
        );
        let user = SlotRef::new(SideId::Player, 0);
        let target = SlotRef::new(SideId::Enemy, 0);
        field.slot_mut(user).set_occupant(0);
        field.slot_mut(target).set_occupant(0);

        let dex = Dex::demo();
        let action = PreferFirstMove.choose_action(&field, &dex, user);
        assert_eq!(
            action,
            Some(Action::UseMove {
                user,
                target,
                move_id: "slam".to_string(),
            })
        );
    }

    #[test]
    fn scripted_source_drains_then_passes() {
        let field = Field::new(
            Side::new(SideId::Player, 1, vec![]),
            Side::new(SideId::Enemy, 1, vec![]),
        );
        let dex = Dex::demo();
        let slot = SlotRef::new(SideId::Player, 0);
        let mut source = ScriptedSource::new(vec![Action::message("only one")]);
        assert!(source.choose_action(&field, &dex, slot).is_some());
        assert_eq!(source.choose_action(&field, &dex, slot), None);
    }
}
