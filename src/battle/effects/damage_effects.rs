//! Handlers whose magnitudes derive from the damage pipeline: recoil, drain,
//! direct healing, and counterattacks.

use crate::battle::actions::{Action, DamageKind};
use crate::battle::effects::{EffectHandler, EffectRegistry, ValueKind};
use crate::battle::field::{Field, SlotRef};
use crate::rng::BattleRng;
use schema::{Effect, MoveData};

/// Recoil and drain are percentages of the pipeline's final damage figure,
/// NOT of the HP the defender actually lost. On an overkill hit the two
/// diverge, and the pipeline figure is authoritative.
fn portion_of_damage(damage_dealt: u16, percent: u8) -> u16 {
    ((damage_dealt as u32 * percent as u32) / 100).max(1) as u16
}

pub struct RecoilHandler;

impl EffectHandler for RecoilHandler {
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        _target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        damage_dealt: u16,
        registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Recoil { percent } = effect else {
            return Vec::new();
        };
        if damage_dealt == 0 {
            return Vec::new();
        }
        let recoil = portion_of_damage(damage_dealt, *percent);
        let recoil =
            registry.modify_value(recoil as i32, ValueKind::RecoilDamage, user, field);
        if recoil <= 0 {
            return Vec::new();
        }
        let name = field
            .creature_at(user)
            .map(|creature| creature.name.clone())
            .unwrap_or_default();
        vec![
            Action::message(format!("{} is damaged by recoil!", name)),
            Action::Damage {
                target: user,
                amount: recoil as u16,
                kind: DamageKind::Recoil,
                source: None,
            },
        ]
    }
}

pub struct DrainHandler;

impl EffectHandler for DrainHandler {
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        damage_dealt: u16,
        registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Drain { percent } = effect else {
            return Vec::new();
        };
        if damage_dealt == 0 {
            return Vec::new();
        }
        let heal = portion_of_damage(damage_dealt, *percent);
        let heal = registry.modify_value(heal as i32, ValueKind::DrainHeal, user, field);
        if heal <= 0 {
            return Vec::new();
        }
        let victim = field
            .creature_at(target)
            .map(|creature| creature.name.clone())
            .unwrap_or_default();
        vec![
            Action::message(format!("{} had its energy drained!", victim)),
            Action::Heal {
                target: user,
                amount: heal as u16,
            },
        ]
    }
}

pub struct HealHandler;

impl EffectHandler for HealHandler {
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        _target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Heal { percent } = effect else {
            return Vec::new();
        };
        let Some(creature) = field.creature_at(user) else {
            return Vec::new();
        };
        if creature.current_hp() == creature.max_hp() {
            return vec![Action::message(format!(
                "{}'s HP is already full!",
                creature.name
            ))];
        }
        let amount = ((creature.max_hp() as u32 * *percent as u32) / 100).max(1) as u16;
        vec![Action::Heal {
            target: user,
            amount,
        }]
    }
}

pub struct CounterHandler;

impl EffectHandler for CounterHandler {
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Counter = effect else {
            return Vec::new();
        };
        // Returns double the physical damage this slot took this turn.
        let taken = field.slot(user).physical_damage_taken;
        if taken == 0 {
            return vec![Action::message("But it failed!")];
        }
        vec![Action::Damage {
            target,
            amount: taken.saturating_mul(2),
            kind: DamageKind::Counter,
            source: Some(user),
        }]
    }
}
