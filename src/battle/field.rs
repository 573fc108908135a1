//! The two-sided battle topology: Field, Side, and Slot.
//!
//! A slot owns all battle-only state for its occupant. That state is reset
//! every time the occupant changes, which is what makes switching a clean
//! escape from stat drops and volatile conditions.

use crate::creature::Creature;
use bitflags::bitflags;
use schema::{HazardKind, SideConditionKind, Stat, TerrainKind, WeatherKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    Player,
    Enemy,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::Player => SideId::Enemy,
            SideId::Enemy => SideId::Player,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SideId::Player => 0,
            SideId::Enemy => 1,
        }
    }
}

/// Addresses one slot on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub side: SideId,
    pub index: usize,
}

impl SlotRef {
    pub fn new(side: SideId, index: usize) -> Self {
        Self { side, index }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            SideId::Player => "player",
            SideId::Enemy => "enemy",
        };
        write!(f, "{} slot {}", side, self.index + 1)
    }
}

bitflags! {
    /// Volatile conditions, cleared whenever the slot's occupant changes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VolatileFlags: u8 {
        const FLINCHED          = 1 << 0;
        const PROTECTED         = 1 << 1;
        const CHARGING          = 1 << 2;
        const SEMI_INVULNERABLE = 1 << 3;
    }
}

impl Serialize for VolatileFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for VolatileFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(VolatileFlags::from_bits_truncate(bits))
    }
}

/// Bookkeeping for a two-turn move started last turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    pub move_id: String,
    pub target: SlotRef,
}

/// One position on a side. Holds at most one active roster member plus that
/// occupant's battle-only state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    occupant: Option<usize>,
    /// Indexed by `Stat::index()`; each entry stays in [-6, 6].
    stages: [i8; 7],
    pub volatiles: VolatileFlags,
    /// Consecutive successful-or-attempted protect uses by this occupant.
    pub protect_streak: u8,
    /// Whether protection was attempted this turn; checked at turn end to
    /// decide if the streak resets.
    pub protect_attempted: bool,
    /// Physical and special damage received this turn, for counter effects.
    pub physical_damage_taken: u16,
    pub special_damage_taken: u16,
    pub charge: Option<ChargeState>,
}

impl Slot {
    pub fn new() -> Self {
        Self {
            occupant: None,
            stages: [0; 7],
            volatiles: VolatileFlags::empty(),
            protect_streak: 0,
            protect_attempted: false,
            physical_damage_taken: 0,
            special_damage_taken: 0,
            charge: None,
        }
    }

    pub fn occupant(&self) -> Option<usize> {
        self.occupant
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Installs an occupant, wiping every piece of battle-only state.
    pub fn set_occupant(&mut self, roster_index: usize) {
        self.reset_battle_state();
        self.occupant = Some(roster_index);
    }

    /// Clears the slot, wiping every piece of battle-only state.
    pub fn clear_occupant(&mut self) {
        self.reset_battle_state();
        self.occupant = None;
    }

    fn reset_battle_state(&mut self) {
        self.stages = [0; 7];
        self.volatiles = VolatileFlags::empty();
        self.protect_streak = 0;
        self.protect_attempted = false;
        self.physical_damage_taken = 0;
        self.special_damage_taken = 0;
        self.charge = None;
    }

    pub fn stage(&self, stat: Stat) -> i8 {
        self.stages[stat.index()]
    }

    /// Applies a stage delta, clamping the result to [-6, 6]. Returns the
    /// change actually applied (0 when already at the cap).
    pub fn apply_stage_delta(&mut self, stat: Stat, delta: i8) -> i8 {
        let current = self.stages[stat.index()];
        let updated = (current + delta).clamp(-6, 6);
        self.stages[stat.index()] = updated;
        updated - current
    }

    pub fn has_volatile(&self, flag: VolatileFlags) -> bool {
        self.volatiles.contains(flag)
    }

    /// Per-turn reset: protection and flinches lapse, damage counters zero.
    /// The protect streak itself survives; turn-end logic decides whether it
    /// resets based on `protect_attempted`.
    pub fn begin_turn(&mut self) {
        self.volatiles
            .remove(VolatileFlags::FLINCHED | VolatileFlags::PROTECTED);
        self.protect_attempted = false;
        self.physical_damage_taken = 0;
        self.special_damage_taken = 0;
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

/// One side of the battle: its slots, its full roster, and everything that
/// targets the side as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub id: SideId,
    slots: Vec<Slot>,
    pub roster: Vec<Creature>,
    /// Side-wide conditions with remaining turns (0 = indefinite).
    conditions: HashMap<SideConditionKind, u8>,
    /// Entry hazards placed against this side.
    hazards: HashSet<HazardKind>,
}

impl Side {
    pub fn new(id: SideId, slot_count: usize, roster: Vec<Creature>) -> Self {
        Self {
            id,
            slots: (0..slot_count).map(|_| Slot::new()).collect(),
            roster,
            conditions: HashMap::new(),
            hazards: HashSet::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Roster members able to switch in: not fainted and not already out.
    pub fn available_reserves(&self) -> Vec<usize> {
        self.roster
            .iter()
            .enumerate()
            .filter(|(index, creature)| {
                !creature.is_fainted()
                    && !self
                        .slots
                        .iter()
                        .any(|slot| slot.occupant() == Some(*index))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// True while any roster member can still fight.
    pub fn has_able_member(&self) -> bool {
        self.roster.iter().any(|creature| !creature.is_fainted())
    }

    pub fn has_condition(&self, kind: SideConditionKind) -> bool {
        self.conditions.contains_key(&kind)
    }

    pub fn set_condition(&mut self, kind: SideConditionKind, turns: u8) {
        self.conditions.insert(kind, turns);
    }

    /// Decrements timed conditions, returning the ones that expired.
    pub fn tick_conditions(&mut self) -> Vec<SideConditionKind> {
        let mut expired = Vec::new();
        self.conditions.retain(|kind, turns| {
            if *turns == 0 {
                return true; // indefinite
            }
            *turns -= 1;
            if *turns == 0 {
                expired.push(*kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn hazards(&self) -> &HashSet<HazardKind> {
        &self.hazards
    }

    /// Returns false if the hazard was already placed.
    pub fn place_hazard(&mut self, hazard: HazardKind) -> bool {
        self.hazards.insert(hazard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    /// 0 = does not expire.
    pub turns_remaining: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainState {
    pub kind: TerrainKind,
    /// 0 = does not expire.
    pub turns_remaining: u8,
}

/// The whole battlefield. Owned by exactly one battle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    sides: [Side; 2],
    pub weather: Option<WeatherState>,
    pub terrain: Option<TerrainState>,
    pub turn: u32,
}

impl Field {
    pub fn new(player: Side, enemy: Side) -> Self {
        debug_assert_eq!(player.id, SideId::Player);
        debug_assert_eq!(enemy.id, SideId::Enemy);
        Self {
            sides: [player, enemy],
            weather: None,
            terrain: None,
            turn: 1,
        }
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut Side {
        &mut self.sides[id.index()]
    }

    pub fn slot(&self, slot_ref: SlotRef) -> &Slot {
        self.side(slot_ref.side).slot(slot_ref.index)
    }

    pub fn slot_mut(&mut self, slot_ref: SlotRef) -> &mut Slot {
        self.side_mut(slot_ref.side).slot_mut(slot_ref.index)
    }

    pub fn creature_at(&self, slot_ref: SlotRef) -> Option<&Creature> {
        let roster_index = self.slot(slot_ref).occupant()?;
        self.side(slot_ref.side).roster.get(roster_index)
    }

    pub fn creature_at_mut(&mut self, slot_ref: SlotRef) -> Option<&mut Creature> {
        let roster_index = self.slot(slot_ref).occupant()?;
        self.side_mut(slot_ref.side).roster.get_mut(roster_index)
    }

    /// Every slot reference on the field, player side first.
    pub fn all_slots(&self) -> Vec<SlotRef> {
        let mut refs = Vec::new();
        for side in [SideId::Player, SideId::Enemy] {
            for index in 0..self.side(side).slot_count() {
                refs.push(SlotRef::new(side, index));
            }
        }
        refs
    }

    /// Occupied slots only, player side first.
    pub fn active_slots(&self) -> Vec<SlotRef> {
        self.all_slots()
            .into_iter()
            .filter(|slot_ref| !self.slot(*slot_ref).is_empty())
            .collect()
    }

    /// First occupied slot on the given side, if any. The default target for
    /// decision sources that do not pick one.
    pub fn first_active_slot(&self, side: SideId) -> Option<SlotRef> {
        (0..self.side(side).slot_count())
            .map(|index| SlotRef::new(side, index))
            .find(|slot_ref| !self.slot(*slot_ref).is_empty())
    }

    /// Counts down weather and terrain, returning what expired this turn.
    pub fn tick_field_timers(&mut self) -> (Option<WeatherKind>, Option<TerrainKind>) {
        let mut expired_weather = None;
        if let Some(weather) = &mut self.weather {
            if weather.turns_remaining > 0 {
                weather.turns_remaining -= 1;
                if weather.turns_remaining == 0 {
                    expired_weather = Some(weather.kind);
                }
            }
        }
        if expired_weather.is_some() {
            self.weather = None;
        }

        let mut expired_terrain = None;
        if let Some(terrain) = &mut self.terrain {
            if terrain.turns_remaining > 0 {
                terrain.turns_remaining -= 1;
                if terrain.turns_remaining == 0 {
                    expired_terrain = Some(terrain.kind);
                }
            }
        }
        if expired_terrain.is_some() {
            self.terrain = None;
        }

        (expired_weather, expired_terrain)
    }
}
