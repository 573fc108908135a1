//! The damage pipeline.
//!
//! Every damaging interaction builds one `DamageContext` that keeps all of
//! its intermediate multipliers, so downstream consumers (recoil, drain,
//! presentation, tests) read the same audited numbers the pipeline used.

use crate::battle::field::{Field, SlotRef};
use crate::battle::stats::{effective_attack, effective_defense};
use crate::rng::BattleRng;
use schema::{ElementType, MoveData};
use serde::{Deserialize, Serialize};

pub const CRIT_MULTIPLIER: f32 = 1.5;
pub const STAB_MULTIPLIER: f32 = 1.5;

/// The audited result of one damage computation. Read-only once built;
/// recoil and drain magnitudes derive from `damage` here, not from the HP
/// a defender actually lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageContext {
    pub attacker: SlotRef,
    pub defender: SlotRef,
    pub move_id: String,
    pub base_damage: u32,
    pub critical: f32,
    pub stab: f32,
    pub effectiveness: f32,
    pub random_factor: f32,
    pub damage: u16,
}

impl DamageContext {
    pub fn was_critical(&self) -> bool {
        self.critical > 1.0
    }

    pub fn is_immune(&self) -> bool {
        self.effectiveness == 0.0
    }
}

/// Critical-hit chance as one-in-N, raised by the move's crit boost.
fn crit_denominator(crit_boost: u8) -> u32 {
    match crit_boost {
        0 => 16,
        1 => 8,
        2 => 4,
        _ => 2,
    }
}

/// Runs the full pipeline for one hit. The order of multipliers is fixed:
/// critical, STAB, type effectiveness, random roll.
pub fn compute_damage(
    field: &Field,
    attacker: SlotRef,
    defender: SlotRef,
    move_data: &MoveData,
    rng: &mut dyn BattleRng,
) -> DamageContext {
    let attacker_creature = field.creature_at(attacker);
    let defender_creature = field.creature_at(defender);

    let level = attacker_creature.map_or(1, |creature| creature.level) as u32;
    let attack = effective_attack(field, attacker, move_data).max(1) as u32;
    let defense = effective_defense(field, defender, move_data).max(1) as u32;
    let power = move_data.power as u32;

    let base_damage = (2 * level / 5 + 2) * power * attack / defense / 50 + 2;

    let critical = if rng.next_int(crit_denominator(move_data.crit_boost)) == 0 {
        CRIT_MULTIPLIER
    } else {
        1.0
    };

    let stab = match attacker_creature {
        Some(creature) if creature.has_element(move_data.element) => STAB_MULTIPLIER,
        _ => 1.0,
    };

    let effectiveness = match defender_creature {
        Some(creature) => ElementType::effectiveness_dual(
            move_data.element,
            creature.elements.0,
            creature.elements.1,
        ),
        None => 1.0,
    };

    let random_factor = rng.next_int_range(85, 100) as f32 / 100.0;

    let raw = base_damage as f32 * critical * stab * effectiveness * random_factor;
    let damage = if effectiveness == 0.0 {
        0
    } else {
        (raw as u32).clamp(1, u16::MAX as u32) as u16
    };

    DamageContext {
        attacker,
        defender,
        move_id: move_data.id.clone(),
        base_damage,
        critical,
        stab,
        effectiveness,
        random_factor,
        damage,
    }
}
