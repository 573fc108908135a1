//! The default ability and held-item handlers.
//!
//! Each one exercises a different corner of the passive contract: contact
//! triggers, entry triggers, end-of-turn residuals, value rewrites, and
//! OHKO prevention.

use crate::battle::actions::{Action, DamageKind};
use crate::battle::effects::{OhkoPrevention, PassiveHandler, Trigger, ValueKind};
use crate::battle::field::{Field, SlotRef};
use crate::rng::BattleRng;
use schema::{Stat, StatusCondition};

/// Ability: contact with the owner may paralyze the attacker.
pub struct StaticCoat;

impl PassiveHandler for StaticCoat {
    fn on_trigger(
        &self,
        trigger: Trigger,
        owner: SlotRef,
        other: Option<SlotRef>,
        field: &Field,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        if trigger != Trigger::OnContact {
            return Vec::new();
        }
        let Some(attacker) = other else {
            return Vec::new();
        };
        let attacker_clear = field
            .creature_at(attacker)
            .map(|creature| !creature.is_fainted() && creature.status.is_none())
            .unwrap_or(false);
        if !attacker_clear || !rng.chance(30) {
            return Vec::new();
        }
        let owner_name = field
            .creature_at(owner)
            .map(|creature| creature.name.clone())
            .unwrap_or_default();
        vec![
            Action::message(format!("{}'s Static Coat crackles!", owner_name)),
            Action::InflictStatus {
                target: attacker,
                status: StatusCondition::Paralysis,
            },
        ]
    }
}

/// Ability: contact with the owner hurts the attacker.
pub struct BrambleHide;

impl PassiveHandler for BrambleHide {
    fn on_trigger(
        &self,
        trigger: Trigger,
        _owner: SlotRef,
        other: Option<SlotRef>,
        field: &Field,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        if trigger != Trigger::OnContact {
            return Vec::new();
        }
        let Some(attacker) = other else {
            return Vec::new();
        };
        let Some(creature) = field.creature_at(attacker) else {
            return Vec::new();
        };
        if creature.is_fainted() {
            return Vec::new();
        }
        vec![
            Action::message(format!("{} was torn by Bramble Hide!", creature.name)),
            Action::Damage {
                target: attacker,
                amount: (creature.max_hp() / 8).max(1),
                kind: DamageKind::Residual,
                source: None,
            },
        ]
    }
}

/// Ability: lowers the Attack of every opposing creature on entry.
pub struct DreadfulPresence;

impl PassiveHandler for DreadfulPresence {
    fn on_trigger(
        &self,
        trigger: Trigger,
        owner: SlotRef,
        _other: Option<SlotRef>,
        field: &Field,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        if trigger != Trigger::OnEntry {
            return Vec::new();
        }
        let owner_name = field
            .creature_at(owner)
            .map(|creature| creature.name.clone())
            .unwrap_or_default();
        let mut reactions = vec![Action::message(format!(
            "{}'s Dreadful Presence bears down!",
            owner_name
        ))];
        let foe_side = owner.side.opponent();
        for index in 0..field.side(foe_side).slot_count() {
            let slot_ref = SlotRef::new(foe_side, index);
            if field.creature_at(slot_ref).is_some() {
                reactions.push(Action::StatChange {
                    target: slot_ref,
                    stat: Stat::Attack,
                    delta: -1,
                });
            }
        }
        reactions
    }
}

/// Ability: the owner takes no recoil from its own moves.
pub struct SureFooted;

impl PassiveHandler for SureFooted {
    fn modify_value(
        &self,
        _value: i32,
        kind: ValueKind,
        _owner: SlotRef,
        _field: &Field,
    ) -> Option<i32> {
        match kind {
            ValueKind::RecoilDamage => Some(0),
            _ => None,
        }
    }
}

/// Ability: stage changes applied to the owner are inverted.
pub struct ContrarySpirit;

impl PassiveHandler for ContrarySpirit {
    fn modify_value(
        &self,
        value: i32,
        kind: ValueKind,
        _owner: SlotRef,
        _field: &Field,
    ) -> Option<i32> {
        match kind {
            ValueKind::StatStageDelta => Some(-value),
            _ => None,
        }
    }
}

/// Ability: at full HP, the owner survives any single hit with 1 HP.
pub struct LastStand;

impl PassiveHandler for LastStand {
    fn prevent_ohko(&self, owner: SlotRef, field: &Field, _incoming: u16) -> Option<OhkoPrevention> {
        let creature = field.creature_at(owner)?;
        if creature.current_hp() != creature.max_hp() || creature.max_hp() < 2 {
            return None;
        }
        Some(OhkoPrevention {
            capped_damage: creature.max_hp() - 1,
            announcement: format!("{} held on with Last Stand!", creature.name),
            consumes_item: false,
        })
    }
}

/// Item: restores a sixteenth of max HP at the end of every turn.
pub struct SustainHerb;

impl PassiveHandler for SustainHerb {
    fn on_trigger(
        &self,
        trigger: Trigger,
        owner: SlotRef,
        _other: Option<SlotRef>,
        field: &Field,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        if trigger != Trigger::OnEndOfTurn {
            return Vec::new();
        }
        let Some(creature) = field.creature_at(owner) else {
            return Vec::new();
        };
        if creature.is_fainted() || creature.current_hp() == creature.max_hp() {
            return Vec::new();
        }
        vec![
            Action::message(format!(
                "{} restored a little HP using its Sustain Herb!",
                creature.name
            )),
            Action::Heal {
                target: owner,
                amount: (creature.max_hp() / 16).max(1),
            },
        ]
    }
}

/// Item: drained HP is boosted by 30%.
pub struct SiphonRoot;

impl PassiveHandler for SiphonRoot {
    fn modify_value(
        &self,
        value: i32,
        kind: ValueKind,
        _owner: SlotRef,
        _field: &Field,
    ) -> Option<i32> {
        match kind {
            ValueKind::DrainHeal => Some(value * 130 / 100),
            _ => None,
        }
    }
}

/// Item: at full HP, the holder survives any single hit with 1 HP, then the
/// charm crumbles.
pub struct GritCharm;

impl PassiveHandler for GritCharm {
    fn prevent_ohko(&self, owner: SlotRef, field: &Field, _incoming: u16) -> Option<OhkoPrevention> {
        let creature = field.creature_at(owner)?;
        if creature.current_hp() != creature.max_hp() || creature.max_hp() < 2 {
            return None;
        }
        Some(OhkoPrevention {
            capped_damage: creature.max_hp() - 1,
            announcement: format!("{} hung on using its Grit Charm!", creature.name),
            consumes_item: true,
        })
    }
}
