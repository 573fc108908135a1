//! Handler for stat-stage changes.

use crate::battle::actions::Action;
use crate::battle::effects::{resolve_target, EffectHandler, EffectRegistry};
use crate::battle::field::{Field, SlotRef};
use crate::rng::BattleRng;
use schema::{Effect, MoveData};

pub struct StatChangeHandler;

impl EffectHandler for StatChangeHandler {
    fn can_apply(&self, effect: &Effect, user: SlotRef, target: SlotRef, field: &Field) -> bool {
        let Effect::StatChange { target: who, .. } = effect else {
            return false;
        };
        let slot = resolve_target(*who, user, target);
        field
            .creature_at(slot)
            .map(|creature| !creature.is_fainted())
            .unwrap_or(false)
    }

    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        target: SlotRef,
        _move_data: &MoveData,
        _field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::StatChange {
            target: who,
            stat,
            stages,
            chance,
        } = effect
        else {
            return Vec::new();
        };
        if !rng.chance(*chance) {
            return Vec::new();
        }
        vec![Action::StatChange {
            target: resolve_target(*who, user, target),
            stat: *stat,
            delta: *stages,
        }]
    }
}
