//! The effect-handler dispatch registry.
//!
//! Move effects are pure content (`schema::Effect`); what each variant does
//! in battle is decided here. The registry is assembled once at engine
//! construction and never mutated afterwards: dispatch is a lookup from
//! `EffectKind` to its one handler, and ability/item behavior is keyed by
//! identifier plus a trigger index. An effect with no registered handler is
//! a forward-compatible no-op, never an error.

mod damage_effects;
mod field_effects;
mod passives;
mod stat_effects;
mod status_effects;

use crate::battle::actions::{Action, DamageKind};
use crate::battle::damage::DamageContext;
use crate::battle::events::BattleEvent;
use crate::battle::field::{Field, SlotRef};
use crate::rng::BattleRng;
use schema::{Effect, EffectKind, MoveData};
use std::collections::HashMap;

use self::damage_effects::{CounterHandler, DrainHandler, HealHandler, RecoilHandler};
use self::field_effects::{
    HazardHandler, SideConditionHandler, TerrainHandler, WeatherHandler,
};
use self::passives::{
    BrambleHide, ContrarySpirit, DreadfulPresence, GritCharm, LastStand, SiphonRoot, StaticCoat,
    SureFooted, SustainHerb,
};
use self::stat_effects::StatChangeHandler;
use self::status_effects::{FlinchHandler, ProtectHandler, StatusHandler};

/// Resolves an effect's declared target to a concrete slot.
pub(crate) fn resolve_target(
    who: schema::Target,
    user: SlotRef,
    target: SlotRef,
) -> SlotRef {
    match who {
        schema::Target::User => user,
        schema::Target::Foe => target,
    }
}

/// When an ability or item handler gets a chance to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The owner was hit by a contact move; `other` is the attacker's slot.
    OnContact,
    /// The owner just switched in.
    OnEntry,
    /// The end-of-turn residual phase.
    OnEndOfTurn,
}

/// A computed magnitude a passive handler may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    RecoilDamage,
    DrainHeal,
    StatStageDelta,
}

/// The outcome of an OHKO-prevention check against a lethal hit.
#[derive(Debug, Clone, PartialEq)]
pub struct OhkoPrevention {
    /// The damage actually applied instead of the lethal amount.
    pub capped_damage: u16,
    pub announcement: String,
    /// True when a consumable held item absorbed the hit.
    pub consumes_item: bool,
}

/// One handler per effect variant.
pub trait EffectHandler {
    /// Whether the effect is worth processing at all in this situation.
    fn can_apply(&self, _effect: &Effect, _user: SlotRef, _target: SlotRef, _field: &Field) -> bool {
        true
    }

    /// Turn the effect into reactions. `damage_dealt` is the damage
    /// pipeline's final figure for the triggering hit (0 for status moves);
    /// magnitude-by-percentage effects derive from it, not from HP lost.
    #[allow(clippy::too_many_arguments)]
    fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        target: SlotRef,
        move_data: &MoveData,
        field: &Field,
        damage_dealt: u16,
        registry: &EffectRegistry,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action>;
}

/// Ability and held-item behavior. All methods default to "do nothing" so a
/// handler only implements the hooks it cares about.
pub trait PassiveHandler {
    fn on_trigger(
        &self,
        _trigger: Trigger,
        _owner: SlotRef,
        _other: Option<SlotRef>,
        _field: &Field,
        _rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        Vec::new()
    }

    /// Rewrite a computed magnitude, or None to leave it alone.
    fn modify_value(
        &self,
        _value: i32,
        _kind: ValueKind,
        _owner: SlotRef,
        _field: &Field,
    ) -> Option<i32> {
        None
    }

    /// Chance to blunt a hit that would take the owner from its current HP
    /// to zero.
    fn prevent_ohko(&self, _owner: SlotRef, _field: &Field, _incoming: u16) -> Option<OhkoPrevention> {
        None
    }
}

/// The per-engine dispatch table. Built once, read-only thereafter.
pub struct EffectRegistry {
    handlers: HashMap<EffectKind, Box<dyn EffectHandler>>,
    abilities: HashMap<String, Box<dyn PassiveHandler>>,
    ability_triggers: HashMap<Trigger, Vec<String>>,
    items: HashMap<String, Box<dyn PassiveHandler>>,
    item_triggers: HashMap<Trigger, Vec<String>>,
}

impl EffectRegistry {
    /// An empty registry: every effect becomes a no-op. Useful in tests.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            abilities: HashMap::new(),
            ability_triggers: HashMap::new(),
            items: HashMap::new(),
            item_triggers: HashMap::new(),
        }
    }

    /// The default handler set the engine ships with.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();

        registry.register_handler(EffectKind::InflictStatus, Box::new(StatusHandler));
        registry.register_handler(EffectKind::StatChange, Box::new(StatChangeHandler));
        registry.register_handler(EffectKind::Recoil, Box::new(RecoilHandler));
        registry.register_handler(EffectKind::Drain, Box::new(DrainHandler));
        registry.register_handler(EffectKind::Heal, Box::new(HealHandler));
        registry.register_handler(EffectKind::Flinch, Box::new(FlinchHandler));
        registry.register_handler(EffectKind::Protect, Box::new(ProtectHandler));
        registry.register_handler(EffectKind::Counter, Box::new(CounterHandler));
        registry.register_handler(EffectKind::SetWeather, Box::new(WeatherHandler));
        registry.register_handler(EffectKind::SetTerrain, Box::new(TerrainHandler));
        registry.register_handler(EffectKind::SideCondition, Box::new(SideConditionHandler));
        registry.register_handler(EffectKind::Hazard, Box::new(HazardHandler));
        // EffectKind::Charge is resolved inside the move-use logic itself:
        // it is bookkeeping on the user's slot, not a dispatchable change.

        registry.register_ability("static_coat", &[Trigger::OnContact], Box::new(StaticCoat));
        registry.register_ability("bramble_hide", &[Trigger::OnContact], Box::new(BrambleHide));
        registry.register_ability(
            "dreadful_presence",
            &[Trigger::OnEntry],
            Box::new(DreadfulPresence),
        );
        registry.register_ability("sure_footed", &[], Box::new(SureFooted));
        registry.register_ability("contrary_spirit", &[], Box::new(ContrarySpirit));
        registry.register_ability("last_stand", &[], Box::new(LastStand));

        registry.register_item("sustain_herb", &[Trigger::OnEndOfTurn], Box::new(SustainHerb));
        registry.register_item("siphon_root", &[], Box::new(SiphonRoot));
        registry.register_item("grit_charm", &[], Box::new(GritCharm));

        registry
    }

    fn register_handler(&mut self, kind: EffectKind, handler: Box<dyn EffectHandler>) {
        self.handlers.insert(kind, handler);
    }

    fn register_ability(
        &mut self,
        id: &str,
        triggers: &[Trigger],
        handler: Box<dyn PassiveHandler>,
    ) {
        self.abilities.insert(id.to_string(), handler);
        for trigger in triggers {
            self.ability_triggers
                .entry(*trigger)
                .or_default()
                .push(id.to_string());
        }
    }

    fn register_item(&mut self, id: &str, triggers: &[Trigger], handler: Box<dyn PassiveHandler>) {
        self.items.insert(id.to_string(), handler);
        for trigger in triggers {
            self.item_triggers
                .entry(*trigger)
                .or_default()
                .push(id.to_string());
        }
    }

    pub fn has_handler(&self, kind: EffectKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Exact-id lookup for ability handlers.
    pub fn ability_handler(&self, id: &str) -> Option<&dyn PassiveHandler> {
        self.abilities.get(id).map(|handler| handler.as_ref())
    }

    /// Exact-id lookup for item handlers.
    pub fn item_handler(&self, id: &str) -> Option<&dyn PassiveHandler> {
        self.items.get(id).map(|handler| handler.as_ref())
    }

    pub fn can_apply(&self, effect: &Effect, user: SlotRef, target: SlotRef, field: &Field) -> bool {
        match self.handlers.get(&effect.kind()) {
            Some(handler) => handler.can_apply(effect, user, target, field),
            None => false,
        }
    }

    /// Dispatch by effect-variant identity. Unknown variants degrade to an
    /// empty reaction list so new content never breaks an old engine.
    #[allow(clippy::too_many_arguments)]
    pub fn process(
        &self,
        effect: &Effect,
        user: SlotRef,
        target: SlotRef,
        move_data: &MoveData,
        field: &Field,
        damage_dealt: u16,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        match self.handlers.get(&effect.kind()) {
            Some(handler) => handler.process(
                effect,
                user,
                target,
                move_data,
                field,
                damage_dealt,
                self,
                rng,
            ),
            None => Vec::new(),
        }
    }

    /// Fires the trigger-keyed ability and item handlers carried by the
    /// creature in `owner`. Contact triggers pass the attacking slot as
    /// `other`.
    pub fn trigger_passives(
        &self,
        trigger: Trigger,
        owner: SlotRef,
        other: Option<SlotRef>,
        field: &Field,
        rng: &mut dyn BattleRng,
    ) -> Vec<Action> {
        let Some(creature) = field.creature_at(owner) else {
            return Vec::new();
        };
        let mut reactions = Vec::new();

        if let Some(ability_id) = &creature.ability {
            if self.is_registered_for(&self.ability_triggers, trigger, ability_id) {
                if let Some(handler) = self.abilities.get(ability_id) {
                    reactions.extend(handler.on_trigger(trigger, owner, other, field, rng));
                }
            }
        }
        if let Some(item_id) = &creature.held_item {
            if self.is_registered_for(&self.item_triggers, trigger, item_id) {
                if let Some(handler) = self.items.get(item_id) {
                    reactions.extend(handler.on_trigger(trigger, owner, other, field, rng));
                }
            }
        }
        reactions
    }

    fn is_registered_for(
        &self,
        index: &HashMap<Trigger, Vec<String>>,
        trigger: Trigger,
        id: &str,
    ) -> bool {
        index
            .get(&trigger)
            .map(|ids| ids.iter().any(|registered| registered == id))
            .unwrap_or(false)
    }

    /// Runs a computed magnitude past the owner's ability and item, in that
    /// order. Returns the (possibly rewritten) value.
    pub fn modify_value(&self, value: i32, kind: ValueKind, owner: SlotRef, field: &Field) -> i32 {
        let Some(creature) = field.creature_at(owner) else {
            return value;
        };
        let mut value = value;
        if let Some(ability_id) = &creature.ability {
            if let Some(handler) = self.abilities.get(ability_id) {
                if let Some(rewritten) = handler.modify_value(value, kind, owner, field) {
                    value = rewritten;
                }
            }
        }
        if let Some(item_id) = &creature.held_item {
            if let Some(handler) = self.items.get(item_id) {
                if let Some(rewritten) = handler.modify_value(value, kind, owner, field) {
                    value = rewritten;
                }
            }
        }
        value
    }

    /// Asks the defender's ability, then its item, whether a lethal hit is
    /// blunted. First claimant wins.
    pub fn check_ohko_prevention(
        &self,
        field: &Field,
        defender: SlotRef,
        incoming: u16,
    ) -> Option<OhkoPrevention> {
        let creature = field.creature_at(defender)?;
        if let Some(ability_id) = &creature.ability {
            if let Some(handler) = self.abilities.get(ability_id) {
                if let Some(prevention) = handler.prevent_ohko(defender, field, incoming) {
                    return Some(prevention);
                }
            }
        }
        if let Some(item_id) = &creature.held_item {
            if let Some(handler) = self.items.get(item_id) {
                if let Some(prevention) = handler.prevent_ohko(defender, field, incoming) {
                    return Some(prevention);
                }
            }
        }
        None
    }

    /// A damage-application helper, derived on demand without mutating the
    /// registry.
    pub fn damage_applier(&self) -> DamageApplier<'_> {
        DamageApplier { registry: self }
    }
}

/// Turns an audited `DamageContext` into the reactions that announce and
/// apply it. Created per request by `EffectRegistry::damage_applier`.
pub struct DamageApplier<'a> {
    #[allow(dead_code)]
    registry: &'a EffectRegistry,
}

impl DamageApplier<'_> {
    pub fn apply(&self, context: &DamageContext, kind: DamageKind) -> Vec<Action> {
        if context.is_immune() {
            return vec![Action::Emit(BattleEvent::Effectiveness { multiplier: 0.0 })];
        }
        let mut actions = Vec::new();
        if context.was_critical() {
            actions.push(Action::Emit(BattleEvent::CriticalHit));
        }
        if context.effectiveness != 1.0 {
            actions.push(Action::Emit(BattleEvent::Effectiveness {
                multiplier: context.effectiveness,
            }));
        }
        actions.push(Action::Damage {
            target: context.defender,
            amount: context.damage,
            kind,
            source: Some(context.attacker),
        });
        actions
    }
}
