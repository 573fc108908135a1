//! Presentation events.
//!
//! The visual phase of every action publishes `BattleEvent`s through an
//! `EventSink`. Sinks never feed back into battle logic, which is what lets
//! the engine run headless at full speed with a `NullSink`.

use crate::battle::field::{SideId, SlotRef};
use crate::battle::outcome::Outcome;
use schema::{HazardKind, SideConditionKind, Stat, StatusKind, TerrainKind, WeatherKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn management
    TurnStarted {
        turn: u32,
    },
    TurnEnded,

    // Moves
    MoveUsed {
        user: SlotRef,
        user_name: String,
        move_name: String,
    },
    MoveMissed {
        user: SlotRef,
        user_name: String,
    },
    CriticalHit,
    Effectiveness {
        multiplier: f32,
    },

    // Damage and healing
    DamageDealt {
        target: SlotRef,
        target_name: String,
        amount: u16,
        remaining_hp: u16,
        max_hp: u16,
    },
    Healed {
        target: SlotRef,
        target_name: String,
        amount: u16,
        new_hp: u16,
    },
    Fainted {
        slot: SlotRef,
        name: String,
    },

    // Status and stages
    StatusInflicted {
        target: SlotRef,
        target_name: String,
        status: StatusKind,
    },
    StatusCured {
        target: SlotRef,
        target_name: String,
        status: StatusKind,
    },
    StatStageChanged {
        target: SlotRef,
        target_name: String,
        stat: Stat,
        delta: i8,
        new_stage: i8,
    },

    // Switching and field state
    SwitchedIn {
        slot: SlotRef,
        name: String,
    },
    WeatherChanged {
        weather: Option<WeatherKind>,
    },
    TerrainChanged {
        terrain: Option<TerrainKind>,
    },
    SideConditionApplied {
        side: SideId,
        condition: SideConditionKind,
    },
    SideConditionEnded {
        side: SideId,
        condition: SideConditionKind,
    },
    HazardPlaced {
        side: SideId,
        hazard: HazardKind,
    },

    // Free-form narration for non-events (misses, immunities, failures)
    Message {
        text: String,
    },

    // Battle end
    BattleEnded {
        outcome: Outcome,
    },
}

impl BattleEvent {
    /// Human-readable rendering. Silent events (those whose meaning is
    /// carried entirely by other events) return None.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn } => Some(format!("=== Turn {} ===", turn)),
            BattleEvent::TurnEnded => None,
            BattleEvent::MoveUsed {
                user_name,
                move_name,
                ..
            } => Some(format!("{} used {}!", user_name, move_name)),
            BattleEvent::MoveMissed { user_name, .. } => {
                Some(format!("{}'s attack missed!", user_name))
            }
            BattleEvent::CriticalHit => Some("A critical hit!".to_string()),
            BattleEvent::Effectiveness { multiplier } => match *multiplier {
                m if m == 0.0 => Some("It had no effect!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                m if m > 1.0 => Some("It's super effective!".to_string()),
                _ => None,
            },
            BattleEvent::DamageDealt {
                target_name,
                amount,
                ..
            } => Some(format!("{} took {} damage!", target_name, amount)),
            BattleEvent::Healed {
                target_name,
                amount,
                ..
            } => Some(format!("{} recovered {} HP!", target_name, amount)),
            BattleEvent::Fainted { name, .. } => Some(format!("{} fainted!", name)),
            BattleEvent::StatusInflicted {
                target_name,
                status,
                ..
            } => Some(format!("{} was afflicted by {}!", target_name, status)),
            BattleEvent::StatusCured {
                target_name,
                status,
                ..
            } => Some(format!("{} was cured of its {}!", target_name, status)),
            BattleEvent::StatStageChanged {
                target_name,
                stat,
                delta,
                ..
            } => {
                if *delta > 0 {
                    Some(format!("{}'s {} rose!", target_name, stat))
                } else if *delta < 0 {
                    Some(format!("{}'s {} fell!", target_name, stat))
                } else {
                    Some(format!("{}'s {} won't go any further!", target_name, stat))
                }
            }
            BattleEvent::SwitchedIn { name, .. } => Some(format!("{} was sent out!", name)),
            BattleEvent::WeatherChanged { weather } => match weather {
                Some(kind) => Some(format!("{} swept over the field!", capitalize(kind))),
                None => Some("The weather returned to normal.".to_string()),
            },
            BattleEvent::TerrainChanged { terrain } => match terrain {
                Some(kind) => Some(format!("{} spread across the field!", capitalize(kind))),
                None => Some("The terrain faded away.".to_string()),
            },
            BattleEvent::SideConditionApplied { condition, .. } => {
                Some(format!("{} took effect!", condition))
            }
            BattleEvent::SideConditionEnded { condition, .. } => {
                Some(format!("{} wore off.", condition))
            }
            BattleEvent::HazardPlaced { hazard, .. } => {
                Some(format!("{} scattered around the opposing side!", capitalize(hazard)))
            }
            BattleEvent::Message { text } => Some(text.clone()),
            BattleEvent::BattleEnded { outcome } => Some(match outcome {
                Outcome::Victory => "You won the battle!".to_string(),
                Outcome::Defeat => "You lost the battle!".to_string(),
                Outcome::Draw => "The battle ended in a draw!".to_string(),
                Outcome::Ongoing => "The battle rages on.".to_string(),
            }),
        }
    }
}

fn capitalize(value: impl fmt::Display) -> String {
    let text = value.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => text,
    }
}

/// Where visual-phase notifications go. Implementations must not reach back
/// into battle state.
pub trait EventSink {
    fn publish(&mut self, event: BattleEvent);
}

/// Discards everything; the headless sink.
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: BattleEvent) {}
}

/// In-memory recording sink, the default for tests and debugging.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Debug printing helper for tests: one event per line, indented.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    pub fn print_formatted(&self) {
        for event in &self.events {
            if let Some(line) = event.format() {
                println!("  {}", line);
            }
        }
    }

    /// Count of events matching a predicate; the workhorse of assertions.
    pub fn count_matching(&self, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, event: BattleEvent) {
        self.events.push(event);
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Forwards events into a tokio channel so a presentation task can consume
/// them independently of the battle loop. Dropped receivers are tolerated:
/// the battle must finish even if nobody is watching.
pub struct ChannelSink {
    sender: tokio::sync::mpsc::UnboundedSender<BattleEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<BattleEvent>) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn publish(&mut self, event: BattleEvent) {
        let _ = self.sender.send(event);
    }
}
