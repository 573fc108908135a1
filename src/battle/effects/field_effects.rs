//! Handlers for weather, terrain, side conditions, and entry hazards.

use crate::battle::actions::Action;
use crate::battle::effects::{EffectHandler, EffectRegistry};
use crate::battle::field::{Field, SlotRef};
use crate::rng::BattleRng;
use schema::{Effect, MoveData, Target};

pub struct WeatherHandler;

impl EffectHandler for WeatherHandler {
    fn process(
        &self,
        effect: &Effect,
        _user: SlotRef,
        _target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::SetWeather { weather, turns } = effect else {
            return Vec::new();
        };
        if field.weather.map(|state| state.kind) == Some(*weather) {
            return vec![Action::message("But it failed!")];
        }
        vec![Action::SetWeather {
            weather: *weather,
            turns: *turns,
        }]
    }
}

pub struct TerrainHandler;

impl EffectHandler for TerrainHandler {
    fn process(
        &self,
        effect: &Effect,
        _user: SlotRef,
        _target: SlotRef,
        _move_data: &MoveData,
        field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::SetTerrain { terrain, turns } = effect else {
            return Vec::new();
        };
        if field.terrain.map(|state| state.kind) == Some(*terrain) {
            return vec![Action::message("But it failed!")];
        }
        vec![Action::SetTerrain {
            terrain: *terrain,
            turns: *turns,
        }]
    }
}

pub struct SideConditionHandler;

impl EffectHandler for SideConditionHandler {
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
        let Effect::SideCondition {
            target,
            condition,
            turns,
        } = effect
        else {
            return Vec::new();
        };
        let side = match target {
            Target::User => user.side,
            Target::Foe => user.side.opponent(),
        };
        if field.side(side).has_condition(*condition) {
            return vec![Action::message("But it failed!")];
        }
        vec![Action::ApplySideCondition {
            side,
            condition: *condition,
            turns: *turns,
        }]
    }
}

pub struct HazardHandler;

impl EffectHandler for HazardHandler {
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        _target: SlotRef,
        _move_data: &MoveData,
        _field: &Field,
        _damage_dealt: u16,
        _registry: &EffectRegistry,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Effect::Hazard { hazard } = effect else {
            return Vec::new();
        };
        // Hazards always land on the side opposing the user.
        vec![Action::PlaceHazard {
            side: user.side.opponent(),
            hazard: *hazard,
        }]
    }
}
