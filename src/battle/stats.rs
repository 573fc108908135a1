use crate::battle::field::{Field, SlotRef};
use schema::{MoveCategory, MoveData, SideConditionKind, Stat, StatusCondition};

/// Stage multiplier for the five core stats.
/// Positive stages: (2 + s) / 2. Negative stages: 2 / (2 - s).
/// So -6 is a quarter and +6 is four times the base value.
pub fn stage_multiplier(stage: i8) -> f32 {
    let stage = stage.clamp(-6, 6);
    if stage >= 0 {
        (2 + stage) as f32 / 2.0
    } else {
        2.0 / (2 - stage) as f32
    }
}

/// Accuracy/evasion stage multipliers use thirds rather than halves.
pub fn accuracy_stage_multiplier(stage: i8) -> f32 {
    let stage = stage.clamp(-6, 6);
    if stage >= 0 {
        (3 + stage) as f32 / 3.0
    } else {
        3.0 / (3 - stage) as f32
    }
}

/// Effective speed for turn ordering: base speed adjusted by stage, status,
/// and side-wide multipliers. An empty slot orders at speed 0 so field-wide
/// or system actions sort after everything else in their bracket.
pub fn effective_speed(field: &Field, slot_ref: SlotRef) -> f32 {
    let Some(creature) = field.creature_at(slot_ref) else {
        return 0.0;
    };

    let stage = field.slot(slot_ref).stage(Stat::Speed);
    let mut speed = creature.base_speed() as f32 * stage_multiplier(stage);

    if matches!(creature.status, Some(StatusCondition::Paralysis)) {
        speed *= 0.5;
    }
    if field
        .side(slot_ref.side)
        .has_condition(SideConditionKind::Tailwind)
    {
        speed *= 2.0;
    }

    speed
}

/// The attacker-side stat for a damaging move, stage-adjusted.
/// Status moves have no offensive stat and report 0.
pub fn effective_attack(field: &Field, slot_ref: SlotRef, move_data: &MoveData) -> u16 {
    let Some(creature) = field.creature_at(slot_ref) else {
        return 0;
    };
    let (base, stat) = match move_data.category {
        MoveCategory::Physical => (creature.stats[1], Stat::Attack),
        MoveCategory::Special => (creature.stats[3], Stat::SpAttack),
        MoveCategory::Status => return 0,
    };
    let stage = field.slot(slot_ref).stage(stat);
    (base as f32 * stage_multiplier(stage)).round() as u16
}

/// The defender-side stat for a damaging move, stage-adjusted.
pub fn effective_defense(field: &Field, slot_ref: SlotRef, move_data: &MoveData) -> u16 {
    let Some(creature) = field.creature_at(slot_ref) else {
        return 0;
    };
    let (base, stat) = match move_data.category {
        MoveCategory::Physical => (creature.stats[2], Stat::Defense),
        MoveCategory::Special => (creature.stats[4], Stat::SpDefense),
        MoveCategory::Status => return 0,
    };
    let stage = field.slot(slot_ref).stage(stat);
    (base as f32 * stage_multiplier(stage)).round() as u16
}
