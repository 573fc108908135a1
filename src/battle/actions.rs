//! The action command set.
//!
//! Every unit of battle change is an `Action` with a two-phase contract: the
//! logic phase mutates the field and returns follow-up actions ("reactions"),
//! the visual phase only publishes presentation events. Reactions run before
//! anything that was queued earlier, so consequences stay next to causes: a
//! hit that faints its target resolves the faint before the hit's status
//! rider gets a turn to speak.

use crate::battle::damage::compute_damage;
use crate::battle::effects::{EffectRegistry, Trigger, ValueKind};
use crate::battle::events::{BattleEvent, EventSink};
use crate::battle::field::{ChargeState, Field, SideId, SlotRef, VolatileFlags};
use crate::battle::outcome::Tally;
use crate::battle::stats::accuracy_stage_multiplier;
use crate::content::Dex;
use crate::rng::BattleRng;
use schema::{
    Effect, EffectKind, HazardKind, MoveCategory, MoveData, SideConditionKind, Stat,
    StatusCondition, Target, TerrainKind, WeatherKind,
};
use serde::{Deserialize, Serialize};

/// Everything an action's logic phase may consult besides the field itself.
/// Built fresh by the engine for each turn; handlers reach the registry and
/// the battle's random source through it.
pub struct TurnContext<'a> {
    pub dex: &'a Dex,
    pub registry: &'a EffectRegistry,
    pub rng: &'a mut dyn BattleRng,
    pub tally: &'a mut Tally,
}

/// What kind of damage an HP reduction is; decides which per-turn counter it
/// feeds and whether it can be countered in turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Physical,
    Special,
    Counter,
    Recoil,
    Residual,
    Hazard,
}

/// An immutable-once-issued battle command. Created by decision sources, by
/// effect handlers, or by another action's logic phase; consumed exactly once
/// by the battle queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A creature attempts its chosen move.
    UseMove {
        user: SlotRef,
        target: SlotRef,
        move_id: String,
    },
    /// HP reduction, from any source.
    Damage {
        target: SlotRef,
        amount: u16,
        kind: DamageKind,
        source: Option<SlotRef>,
    },
    Heal {
        target: SlotRef,
        amount: u16,
    },
    InflictStatus {
        target: SlotRef,
        status: StatusCondition,
    },
    CureStatus {
        target: SlotRef,
    },
    StatChange {
        target: SlotRef,
        stat: Stat,
        delta: i8,
    },
    /// Bring a roster member into a slot, resetting all slot state.
    Switch {
        slot: SlotRef,
        roster_index: usize,
    },
    /// Exactly one of these is produced per HP-to-zero event.
    Faint {
        slot: SlotRef,
        name: String,
    },
    /// Resolve a protect attempt whose roll already happened.
    Guard {
        slot: SlotRef,
        success: bool,
    },
    Flinch {
        target: SlotRef,
    },
    SetWeather {
        weather: WeatherKind,
        turns: u8,
    },
    SetTerrain {
        terrain: TerrainKind,
        turns: u8,
    },
    ApplySideCondition {
        side: SideId,
        condition: SideConditionKind,
        turns: u8,
    },
    PlaceHazard {
        side: SideId,
        hazard: HazardKind,
    },
    /// Plain narration.
    Message {
        text: String,
    },
    /// Publish a prebuilt event in the visual phase; no logic at all.
    Emit(BattleEvent),
}

impl Action {
    pub fn message(text: impl Into<String>) -> Self {
        Action::Message { text: text.into() }
    }

    /// The action's priority bracket for turn ordering. Switches outrank
    /// every move; moves carry their catalog priority; anything else (system
    /// actions fed to the resolver directly) sits in bracket 0.
    pub fn priority(&self, dex: &Dex) -> i8 {
        match self {
            Action::Switch { .. } => 6,
            Action::UseMove { move_id, .. } => dex
                .move_data(move_id)
                .map(|data| data.priority)
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// The slot whose speed breaks ties for this action, if any.
    pub fn user_slot(&self) -> Option<SlotRef> {
        match self {
            Action::UseMove { user, .. } => Some(*user),
            Action::Switch { slot, .. } => Some(*slot),
            Action::Damage { target, .. }
            | Action::Heal { target, .. }
            | Action::InflictStatus { target, .. }
            | Action::CureStatus { target }
            | Action::StatChange { target, .. }
            | Action::Flinch { target } => Some(*target),
            Action::Faint { slot, .. } | Action::Guard { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    /// The logic phase: mutate the field, return reactions in the order they
    /// should run. In-game failures are reported as message reactions, never
    /// as errors.
    pub fn execute_logic(&self, field: &mut Field, ctx: &mut TurnContext) -> Vec<Action> {
        match self {
            Action::UseMove {
                user,
                target,
                move_id,
            } => use_move_logic(*user, *target, move_id, field, ctx),
            Action::Damage {
                target,
                amount,
                kind,
                source,
            } => damage_logic(*target, *amount, *kind, *source, field, ctx),
            Action::Heal { target, amount } => heal_logic(*target, *amount, field),
            Action::InflictStatus { target, status } => {
                inflict_status_logic(*target, *status, field)
            }
            Action::CureStatus { target } => cure_status_logic(*target, field),
            Action::StatChange {
                target,
                stat,
                delta,
            } => stat_change_logic(*target, *stat, *delta, field, ctx),
            Action::Switch { slot, roster_index } => {
                switch_logic(*slot, *roster_index, field, ctx)
            }
            Action::Faint { slot, .. } => faint_logic(*slot, field, ctx),
            Action::Guard { slot, success } => guard_logic(*slot, *success, field),
            Action::Flinch { target } => {
                field
                    .slot_mut(*target)
                    .volatiles
                    .insert(VolatileFlags::FLINCHED);
                Vec::new()
            }
            Action::SetWeather { weather, turns } => {
                field.weather = Some(crate::battle::field::WeatherState {
                    kind: *weather,
                    turns_remaining: *turns,
                });
                Vec::new()
            }
            Action::SetTerrain { terrain, turns } => {
                field.terrain = Some(crate::battle::field::TerrainState {
                    kind: *terrain,
                    turns_remaining: *turns,
                });
                Vec::new()
            }
            Action::ApplySideCondition {
                side,
                condition,
                turns,
            } => {
                field.side_mut(*side).set_condition(*condition, *turns);
                Vec::new()
            }
            Action::PlaceHazard { side, hazard } => {
                if field.side_mut(*side).place_hazard(*hazard) {
                    vec![Action::Emit(BattleEvent::HazardPlaced {
                        side: *side,
                        hazard: *hazard,
                    })]
                } else {
                    vec![Action::message("But it failed!")]
                }
            }
            Action::Message { .. } | Action::Emit(_) => Vec::new(),
        }
    }

    /// The visual phase: publish presentation events. Must not touch battle
    /// state; actions whose outcome is conditional announce through `Emit`
    /// reactions instead and stay silent here.
    pub fn execute_visual(&self, field: &Field, sink: &mut dyn EventSink) {
        match self {
            Action::Damage { target, amount, .. } => {
                if let Some(creature) = field.creature_at(*target) {
                    sink.publish(BattleEvent::DamageDealt {
                        target: *target,
                        target_name: creature.name.clone(),
                        amount: *amount,
                        remaining_hp: creature.current_hp(),
                        max_hp: creature.max_hp(),
                    });
                }
            }
            Action::Switch { slot, .. } => {
                if let Some(creature) = field.creature_at(*slot) {
                    sink.publish(BattleEvent::SwitchedIn {
                        slot: *slot,
                        name: creature.name.clone(),
                    });
                }
            }
            Action::Faint { slot, name } => {
                sink.publish(BattleEvent::Fainted {
                    slot: *slot,
                    name: name.clone(),
                });
            }
            Action::SetWeather { weather, .. } => {
                sink.publish(BattleEvent::WeatherChanged {
                    weather: Some(*weather),
                });
            }
            Action::SetTerrain { terrain, .. } => {
                sink.publish(BattleEvent::TerrainChanged {
                    terrain: Some(*terrain),
                });
            }
            Action::ApplySideCondition {
                side, condition, ..
            } => {
                sink.publish(BattleEvent::SideConditionApplied {
                    side: *side,
                    condition: *condition,
                });
            }
            Action::Message { text } => {
                sink.publish(BattleEvent::Message { text: text.clone() });
            }
            Action::Emit(event) => sink.publish(event.clone()),
            // Conditional outcomes announce via Emit reactions.
            Action::UseMove { .. }
            | Action::Heal { .. }
            | Action::InflictStatus { .. }
            | Action::CureStatus { .. }
            | Action::StatChange { .. }
            | Action::Guard { .. }
            | Action::Flinch { .. }
            | Action::PlaceHazard { .. } => {}
        }
    }
}

/// Success chance of a protect attempt after `streak` consecutive uses:
/// 1, 1/2, 1/4, ... of certainty.
pub fn protect_success_chance(streak: u8) -> f64 {
    1.0 / (1u64 << streak.min(63)) as f64
}

/// Does this move do anything to the opposing slot? Decides whether
/// protection, semi-invulnerability, and accuracy gates apply.
fn move_targets_foe(move_data: &MoveData) -> bool {
    if move_data.is_damaging() {
        return true;
    }
    move_data.effects.iter().any(|effect| match effect {
        Effect::InflictStatus { target, .. } | Effect::StatChange { target, .. } => {
            matches!(target, Target::Foe)
        }
        Effect::Counter => true,
        _ => false,
    })
}

fn use_move_logic(
    user: SlotRef,
    target: SlotRef,
    move_id: &str,
    field: &mut Field,
    ctx: &mut TurnContext,
) -> Vec<Action> {
    let dex = ctx.dex;
    let registry = ctx.registry;

    let Some(attacker) = field.creature_at(user) else {
        return Vec::new();
    };
    if attacker.is_fainted() {
        return Vec::new();
    }
    let attacker_name = attacker.name.clone();
    let attacker_status = attacker.status;

    let mut reactions = Vec::new();

    // Volatile and status gates, checked before anything is spent.
    if field.slot(user).has_volatile(VolatileFlags::FLINCHED) {
        return vec![Action::message(format!(
            "{} flinched and couldn't move!",
            attacker_name
        ))];
    }

    match attacker_status {
        Some(StatusCondition::Sleep { turns }) if turns > 0 => {
            if let Some(creature) = field.creature_at_mut(user) {
                creature.status = Some(StatusCondition::Sleep { turns: turns - 1 });
            }
            return vec![Action::message(format!(
                "{} is fast asleep.",
                attacker_name
            ))];
        }
        Some(StatusCondition::Sleep { .. }) => {
            if let Some(creature) = field.creature_at_mut(user) {
                creature.cure_status();
            }
            reactions.push(Action::message(format!("{} woke up!", attacker_name)));
        }
        Some(StatusCondition::Freeze) => {
            if ctx.rng.chance(20) {
                if let Some(creature) = field.creature_at_mut(user) {
                    creature.cure_status();
                }
                reactions.push(Action::message(format!("{} thawed out!", attacker_name)));
            } else {
                return vec![Action::message(format!(
                    "{} is frozen solid!",
                    attacker_name
                ))];
            }
        }
        Some(StatusCondition::Paralysis) => {
            if ctx.rng.chance(25) {
                return vec![Action::message(format!(
                    "{} is fully paralyzed!",
                    attacker_name
                ))];
            }
        }
        _ => {}
    }

    let Ok(move_data) = dex.move_data(move_id) else {
        reactions.push(Action::message("But it failed!"));
        return reactions;
    };
    let move_data = move_data.clone();

    // Two-turn move bookkeeping: either release a stored charge or begin one.
    let releasing_charge = match &field.slot(user).charge {
        Some(charge) => charge.move_id == move_data.id,
        None => false,
    };
    if releasing_charge {
        let slot = field.slot_mut(user);
        slot.charge = None;
        slot.volatiles
            .remove(VolatileFlags::CHARGING | VolatileFlags::SEMI_INVULNERABLE);
    } else {
        // Spend PP on the turn the move is committed.
        if let Some(creature) = field.creature_at_mut(user) {
            if creature.use_move(&move_data.id).is_err() {
                reactions.push(Action::message("But it failed!"));
                return reactions;
            }
        }

        if let Some(Effect::Charge { semi_invulnerable }) =
            move_data.effect_of_kind(EffectKind::Charge)
        {
            let semi_invulnerable = *semi_invulnerable;
            let slot = field.slot_mut(user);
            slot.charge = Some(ChargeState {
                move_id: move_data.id.clone(),
                target,
            });
            slot.volatiles.insert(VolatileFlags::CHARGING);
            if semi_invulnerable {
                slot.volatiles.insert(VolatileFlags::SEMI_INVULNERABLE);
            }
            reactions.push(Action::Emit(BattleEvent::MoveUsed {
                user,
                user_name: attacker_name.clone(),
                move_name: move_data.name.clone(),
            }));
            reactions.push(Action::message(format!(
                "{} is gathering power!",
                attacker_name
            )));
            return reactions;
        }
    }

    reactions.push(Action::Emit(BattleEvent::MoveUsed {
        user,
        user_name: attacker_name.clone(),
        move_name: move_data.name.clone(),
    }));

    if move_targets_foe(&move_data) {
        let defender_alive = field
            .creature_at(target)
            .map(|creature| !creature.is_fainted())
            .unwrap_or(false);
        if !defender_alive {
            reactions.push(Action::message("But there was no target!"));
            return reactions;
        }

        if field.slot(target).has_volatile(VolatileFlags::PROTECTED) {
            let defender_name = field.creature_at(target).unwrap().name.clone();
            reactions.push(Action::message(format!(
                "{} protected itself!",
                defender_name
            )));
            return reactions;
        }

        if field
            .slot(target)
            .has_volatile(VolatileFlags::SEMI_INVULNERABLE)
        {
            reactions.push(Action::Emit(BattleEvent::MoveMissed {
                user,
                user_name: attacker_name.clone(),
            }));
            return reactions;
        }

        if let Some(base_accuracy) = move_data.accuracy {
            let stage = (field.slot(user).stage(Stat::Accuracy)
                - field.slot(target).stage(Stat::Evasion))
            .clamp(-6, 6);
            let threshold = (base_accuracy as f32 * accuracy_stage_multiplier(stage))
                .round()
                .clamp(1.0, 100.0) as u32;
            if ctx.rng.next_int(100) >= threshold {
                reactions.push(Action::Emit(BattleEvent::MoveMissed {
                    user,
                    user_name: attacker_name.clone(),
                }));
                return reactions;
            }
        }
    }

    let mut damage_dealt = 0;
    if move_data.is_damaging() {
        let context = compute_damage(field, user, target, &move_data, ctx.rng);
        let kind = match move_data.category {
            MoveCategory::Physical => DamageKind::Physical,
            _ => DamageKind::Special,
        };
        reactions.extend(registry.damage_applier().apply(&context, kind));
        if context.is_immune() {
            return reactions;
        }
        damage_dealt = context.damage;

        if move_data.makes_contact {
            reactions.extend(registry.trigger_passives(
                Trigger::OnContact,
                target,
                Some(user),
                field,
                ctx.rng,
            ));
        }
    }

    // Data-driven effects, in declaration order. Handlers roll their own
    // chances and derive magnitudes from the pipeline's damage figure.
    for effect in &move_data.effects {
        if registry.can_apply(effect, user, target, field) {
            reactions.extend(registry.process(
                effect,
                user,
                target,
                &move_data,
                field,
                damage_dealt,
                ctx.rng,
            ));
        }
    }

    reactions
}

fn damage_logic(
    target: SlotRef,
    amount: u16,
    kind: DamageKind,
    source: Option<SlotRef>,
    field: &mut Field,
    ctx: &mut TurnContext,
) -> Vec<Action> {
    let Some(creature) = field.creature_at(target) else {
        return Vec::new();
    };
    if creature.is_fainted() {
        return Vec::new();
    }
    let name = creature.name.clone();
    let hp_before = creature.current_hp();

    let mut reactions = Vec::new();
    let mut applied = amount;

    // OHKO prevention only guards direct hits, not residual chip.
    if matches!(
        kind,
        DamageKind::Physical | DamageKind::Special | DamageKind::Counter
    ) && applied >= hp_before
    {
        if let Some(prevention) = ctx.registry.check_ohko_prevention(field, target, applied) {
            applied = prevention.capped_damage;
            reactions.push(Action::message(prevention.announcement.clone()));
            if prevention.consumes_item {
                if let Some(creature) = field.creature_at_mut(target) {
                    creature.held_item = None;
                }
            }
        }
    }

    let fainted = field
        .creature_at_mut(target)
        .map(|creature| creature.take_damage(applied))
        .unwrap_or(false);

    // Per-turn counters feed counter-style effects.
    match kind {
        DamageKind::Physical => {
            let slot = field.slot_mut(target);
            slot.physical_damage_taken = slot.physical_damage_taken.saturating_add(applied);
        }
        DamageKind::Special => {
            let slot = field.slot_mut(target);
            slot.special_damage_taken = slot.special_damage_taken.saturating_add(applied);
        }
        _ => {}
    }

    // Damage credit for the MVP pick.
    if let Some(source) = source {
        if source.side == SideId::Player && target.side == SideId::Enemy {
            if let Some(roster_index) = field.slot(source).occupant() {
                ctx.tally
                    .record_damage(roster_index, applied.min(hp_before));
            }
        }
    }

    if fainted {
        reactions.push(Action::Faint { slot: target, name });
    }
    reactions
}

fn heal_logic(target: SlotRef, amount: u16, field: &mut Field) -> Vec<Action> {
    let Some(creature) = field.creature_at_mut(target) else {
        return Vec::new();
    };
    if creature.is_fainted() {
        return Vec::new();
    }
    let restored = creature.heal(amount);
    if restored == 0 {
        return Vec::new();
    }
    vec![Action::Emit(BattleEvent::Healed {
        target,
        target_name: creature.name.clone(),
        amount: restored,
        new_hp: creature.current_hp(),
    })]
}

fn inflict_status_logic(
    target: SlotRef,
    status: StatusCondition,
    field: &mut Field,
) -> Vec<Action> {
    let Some(creature) = field.creature_at(target) else {
        return Vec::new();
    };
    if creature.is_fainted() {
        return Vec::new();
    }
    let name = creature.name.clone();

    // Misty terrain wards every creature against fresh status.
    if matches!(
        field.terrain,
        Some(crate::battle::field::TerrainState {
            kind: TerrainKind::Misty,
            ..
        })
    ) {
        return vec![Action::message(format!(
            "The mist protects {}!",
            name
        ))];
    }

    if field.creature_at_mut(target).unwrap().set_status(status) {
        vec![Action::Emit(BattleEvent::StatusInflicted {
            target,
            target_name: name,
            status: status.kind(),
        })]
    } else {
        vec![Action::message(format!(
            "It doesn't affect {}...",
            name
        ))]
    }
}

fn cure_status_logic(target: SlotRef, field: &mut Field) -> Vec<Action> {
    let Some(creature) = field.creature_at_mut(target) else {
        return Vec::new();
    };
    let name = creature.name.clone();
    match creature.cure_status() {
        Some(status) => vec![Action::Emit(BattleEvent::StatusCured {
            target,
            target_name: name,
            status: status.kind(),
        })],
        None => Vec::new(),
    }
}

fn stat_change_logic(
    target: SlotRef,
    stat: Stat,
    delta: i8,
    field: &mut Field,
    ctx: &mut TurnContext,
) -> Vec<Action> {
    let Some(creature) = field.creature_at(target) else {
        return Vec::new();
    };
    if creature.is_fainted() {
        return Vec::new();
    }
    let name = creature.name.clone();

    // Abilities may rewrite the delta (e.g. stat-reversal).
    let delta = ctx
        .registry
        .modify_value(delta as i32, ValueKind::StatStageDelta, target, field) as i8;

    let applied = field.slot_mut(target).apply_stage_delta(stat, delta);
    let new_stage = field.slot(target).stage(stat);
    if applied == 0 {
        return vec![Action::message(format!(
            "{}'s {} won't go any further!",
            name, stat
        ))];
    }
    vec![Action::Emit(BattleEvent::StatStageChanged {
        target,
        target_name: name,
        stat,
        delta: applied,
        new_stage,
    })]
}

fn switch_logic(
    slot_ref: SlotRef,
    roster_index: usize,
    field: &mut Field,
    ctx: &mut TurnContext,
) -> Vec<Action> {
    let side = field.side(slot_ref.side);
    let valid = side
        .roster
        .get(roster_index)
        .map(|creature| !creature.is_fainted())
        .unwrap_or(false)
        && !side
            .slots()
            .iter()
            .any(|slot| slot.occupant() == Some(roster_index));
    if !valid {
        return vec![Action::message("But it failed!")];
    }

    // Installing the occupant wipes stages, volatiles, protect streak,
    // per-turn counters, and charge state in one stroke.
    field.slot_mut(slot_ref).set_occupant(roster_index);

    let mut reactions = Vec::new();
    let arriving = field.creature_at(slot_ref).unwrap();
    let arriving_name = arriving.name.clone();
    let max_hp = arriving.max_hp();

    // Entry hazards bite before anything else.
    for hazard in field.side(slot_ref.side).hazards().iter().copied() {
        match hazard {
            HazardKind::Spikes => {
                let airborne = arriving.has_element(schema::ElementType::Wind);
                if !airborne {
                    reactions.push(Action::message(format!(
                        "{} was hurt by the spikes!",
                        arriving_name
                    )));
                    reactions.push(Action::Damage {
                        target: slot_ref,
                        amount: (max_hp / 8).max(1),
                        kind: DamageKind::Hazard,
                        source: None,
                    });
                }
            }
            HazardKind::ToxicTrap => {
                let immune = arriving.has_element(schema::ElementType::Venom);
                if !immune {
                    reactions.push(Action::InflictStatus {
                        target: slot_ref,
                        status: StatusCondition::Poison,
                    });
                }
            }
        }
    }

    // Entry abilities fire after hazards.
    reactions.extend(ctx.registry.trigger_passives(
        Trigger::OnEntry,
        slot_ref,
        None,
        field,
        ctx.rng,
    ));

    reactions
}

fn faint_logic(slot_ref: SlotRef, field: &mut Field, ctx: &mut TurnContext) -> Vec<Action> {
    if let Some(creature) = field.creature_at(slot_ref) {
        if slot_ref.side == SideId::Enemy {
            ctx.tally.record_defeated(creature.name.clone());
        }
    }
    // Fainting clears the slot's volatile state and occupant reference.
    field.slot_mut(slot_ref).clear_occupant();
    Vec::new()
}

fn guard_logic(slot_ref: SlotRef, success: bool, field: &mut Field) -> Vec<Action> {
    let name = field
        .creature_at(slot_ref)
        .map(|creature| creature.name.clone())
        .unwrap_or_default();
    let slot = field.slot_mut(slot_ref);
    slot.protect_attempted = true;
    if success {
        slot.volatiles.insert(VolatileFlags::PROTECTED);
        slot.protect_streak = slot.protect_streak.saturating_add(1);
        vec![Action::message(format!("{} braced itself!", name))]
    } else {
        slot.protect_streak = 0;
        vec![Action::message("But it failed!")]
    }
}
