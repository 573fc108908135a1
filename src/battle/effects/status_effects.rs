//! Handlers for status infliction, flinching, and protection.

use crate::battle::actions::{protect_success_chance, Action};
use crate::battle::effects::{resolve_target, EffectHandler, EffectRegistry};
use crate::battle::field::{Field, SlotRef};
use crate::creature::Creature;
use crate::rng::BattleRng;
use schema::{Effect, ElementType, MoveData, StatusCondition, StatusKind};

/// A creature's own element wards off the matching affliction.
fn element_blocks_status(creature: &Creature, status: StatusKind) -> bool {
    let warding = match status {
        StatusKind::Burn => ElementType::Fire,
        StatusKind::Freeze => ElementType::Ice,
        StatusKind::Poison => ElementType::Venom,
        StatusKind::Paralysis => ElementType::Electric,
        StatusKind::Sleep => return false,
    };
    creature.has_element(warding)
}

pub struct StatusHandler;

impl EffectHandler for StatusHandler {
    fn can_apply(&self, effect: &Effect, user: SlotRef, target: SlotRef, field: &Field) -> bool {
        let Effect::InflictStatus {
            target: who,
            status,
            ..
        } = effect
        else {
            return false;
        };
        let slot = resolve_target(*who, user, target);
        let Some(creature) = field.creature_at(slot) else {
            return false;
        };
        !creature.is_fainted() && creature.status.is_none() && !element_blocks_status(creature, *status)
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
        let Effect::InflictStatus {
            target: who,
            status,
            chance,
        } = effect
        else {
            return Vec::new();
        };
        if !rng.chance(*chance) {
            return Vec::new();
        }
        let condition = match status {
            StatusKind::Sleep => StatusCondition::Sleep {
                turns: rng.next_int_range(1, 3) as u8,
            },
            StatusKind::Poison => StatusCondition::Poison,
            StatusKind::Burn => StatusCondition::Burn,
            StatusKind::Freeze => StatusCondition::Freeze,
            StatusKind::Paralysis => StatusCondition::Paralysis,
        };
        vec![Action::InflictStatus {
            target: resolve_target(*who, user, target),
            status: condition,
        }]
    }
}

pub struct FlinchHandler;

impl EffectHandler for FlinchHandler {
    fn process(
        &self,
        effect: &Effect,
        _user: SlotRef,
        target: SlotRef,
        _move_data: &MoveData,
        _field: &Field,
        damage_dealt: u16,
        _registry: &EffectRegistry,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Flinch { chance } = effect else {
            return Vec::new();
        };
        // A flinch rider only lands when the hit itself did.
        if damage_dealt == 0 || !rng.chance(*chance) {
            return Vec::new();
        }
        vec![Action::Flinch { target }]
    }
}

pub struct ProtectHandler;

impl EffectHandler for ProtectHandler {
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        _target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Protect = effect else {
            return Vec::new();
        };
        let streak = field.slot(user).protect_streak;
        let success = rng.next_f64() < protect_success_chance(streak);
        vec![Action::Guard {
            slot: user,
            success,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::{Side, SideId};
    use crate::rng::ScriptedRng;
    use pretty_assertions::assert_eq;
    use schema::Target;

    fn field_with(defender: Creature) -> (Field, SlotRef, SlotRef) {
        let attacker = Creature::new_for_test(
            "Attacker",
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
        (field, user, target)
    }

    #[test]
    fn fire_creatures_cannot_be_burned() {
        let defender = Creature::new_for_test(
            "Salamander",
            (ElementType::Fire, None),
            [100, 60, 60, 60, 60, 60],
            [const { None }; 4],
        );
        let (field, user, target) = field_with(defender);
        let effect = Effect::InflictStatus {
            target: Target::Foe,
            status: StatusKind::Burn,
            chance: 100,
        };
        assert!(!StatusHandler.can_apply(&effect, user, target, &field));

        let paralyze = Effect::InflictStatus {
            target: Target::Foe,
            status: StatusKind::Paralysis,
            chance: 100,
        };
        assert!(StatusHandler.can_apply(&paralyze, user, target, &field));
    }

    #[test]
    fn sleep_duration_is_rolled_at_infliction() {
        let defender = Creature::new_for_test(
            "Dozer",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, 60],
            [const { None }; 4],
        );
        let (field, user, target) = field_with(defender);
        let effect = Effect::InflictStatus {
            target: Target::Foe,
            status: StatusKind::Sleep,
            chance: 100,
        };
        let dex = crate::content::Dex::demo();
        let move_data = dex.move_data("dream_mist").unwrap();
        let registry = EffectRegistry::empty();
        // The 100% chance consumes no roll; next_int_range(1, 3) maps the
        // scripted 1 to 2 sleep turns.
        let mut rng = ScriptedRng::new(vec![1]);
        let reactions =
            StatusHandler.process(&effect, user, target, move_data, &field, 0, &registry, &mut rng);
        assert_eq!(
            reactions,
            vec![Action::InflictStatus {
                target,
                status: StatusCondition::Sleep { turns: 2 },
            }]
        );
    }

    #[test]
    fn flinch_needs_a_landed_hit() {
        let defender = Creature::new_for_test(
            "Target",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, 60],
            [const { None }; 4],
        );
        let (field, user, target) = field_with(defender);
        let effect = Effect::Flinch { chance: 100 };
        let dex = crate::content::Dex::demo();
        let move_data = dex.move_data("bite").unwrap();
        let registry = EffectRegistry::empty();

        let mut rng = ScriptedRng::new(vec![0]);
        let landed =
            FlinchHandler.process(&effect, user, target, move_data, &field, 30, &registry, &mut rng);
        assert_eq!(landed, vec![Action::Flinch { target }]);

        let mut rng = ScriptedRng::new(vec![0]);
        let whiffed =
            FlinchHandler.process(&effect, user, target, move_data, &field, 0, &registry, &mut rng);
        assert_eq!(whiffed, Vec::new());
    }
}
