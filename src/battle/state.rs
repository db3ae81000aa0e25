use crate::battle::action::{Action, Side};
use crate::battle::order::OrderMode;
use crate::battle::rng::BattleRng;
use crate::combatant::Combatant;
use crate::conditions::{BlockReason, PrimaryCondition, TickSource, VolatileCondition};
use crate::damage::CritTier;
use crate::errors::{BattleResult, StateError};
use crate::field::FieldState;
use crate::items::ItemId;
use crate::moves::MoveId;
use crate::stats::StatKind;
use serde::{Deserialize, Serialize};

/// Wild encounters allow flee and capture; trainer battles allow neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleKind {
    Wild,
    Trainer,
}

/// The battle phase machine. `Message` is a suspend point where the engine
/// waits for the caller to drain pending log lines before continuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    Init,
    Start,
    Message,
    Input,
    Order,
    Resolve,
    Aftermath,
    /// The named side must send out a replacement combatant.
    Switch(Side),
    End,
    Reward,
    Complete,
}

impl BattlePhase {
    pub fn name(&self) -> &'static str {
        match self {
            BattlePhase::Init => "Init",
            BattlePhase::Start => "Start",
            BattlePhase::Message => "Message",
            BattlePhase::Input => "Input",
            BattlePhase::Order => "Order",
            BattlePhase::Resolve => "Resolve",
            BattlePhase::Aftermath => "Aftermath",
            BattlePhase::Switch(_) => "Switch",
            BattlePhase::End => "End",
            BattlePhase::Reward => "Reward",
            BattlePhase::Complete => "Complete",
        }
    }
}

/// Everything that happens in a battle, in order. Events format to
/// player-facing log lines; `None` means the event is bookkeeping only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    BattleStarted { player: String, enemy: String },
    TurnStarted { turn: u32 },
    SentOut { side: Side, name: String },
    Recalled { side: Side, name: String },
    MoveUsed { name: String, move_id: MoveId },
    MoveMissed { name: String },
    MoveHadNoEffect { name: String },
    DamageDealt { name: String, amount: u16, hits: u8 },
    CriticalHit { tier: CritTier },
    EffectivenessNoted { label: String },
    ActionBlocked { name: String, reason: BlockReason },
    ActionSkipped { name: String },
    ActionFailed { name: String, detail: String },
    StatusInflicted { name: String, condition: PrimaryCondition },
    StatusCured { name: String, condition: PrimaryCondition },
    StatusResisted { name: String, condition: PrimaryCondition },
    StatusDamage { name: String, source: TickSource, amount: u16 },
    VolatileInflicted { name: String, condition: VolatileCondition },
    VolatileExpired { name: String, condition: VolatileCondition },
    StageChanged { name: String, stat: StatKind, delta: i8 },
    StageAtLimit { name: String, stat: StatKind, raised: bool },
    Healed { name: String, amount: u16 },
    ItemUsed { side: Side, item: ItemId },
    Fainted { name: String },
    FleeSucceeded,
    FleeFailed,
    TameAttempted { name: String, chance: f64 },
    TameShake { name: String, shakes: u8 },
    TameSucceeded { name: String },
    ExpGained { name: String, amount: u32 },
    LeveledUp { name: String, level: u8 },
    MoveLearned { name: String, move_id: MoveId },
    MoveWantsLearning { name: String, move_id: MoveId },
    MoneyEarned { amount: u32 },
    FieldFaded { what: String },
    BattleWon,
    BattleLost,
}

impl BattleEvent {
    /// Format this event as a log line, or None for silent events.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { player, enemy } => {
                Some(format!("{} faces a hostile {}!", player, enemy))
            }
            BattleEvent::TurnStarted { .. } => None,
            BattleEvent::SentOut { name, .. } => Some(format!("{} joins the fray!", name)),
            BattleEvent::Recalled { name, .. } => Some(format!("{} falls back!", name)),
            BattleEvent::MoveUsed { name, move_id } => {
                Some(format!("{} uses {}!", name, move_id.display_name()))
            }
            BattleEvent::MoveMissed { name } => Some(format!("{}'s attack misses!", name)),
            BattleEvent::MoveHadNoEffect { name } => {
                Some(format!("It has no effect on {}...", name))
            }
            BattleEvent::DamageDealt { name, amount, hits } => {
                if *hits > 1 {
                    Some(format!("{} takes {} damage over {} hits!", name, amount, hits))
                } else {
                    Some(format!("{} takes {} damage!", name, amount))
                }
            }
            BattleEvent::CriticalHit { tier } => match tier {
                CritTier::Devastating => Some("A devastating critical hit!".to_string()),
                _ => Some("A critical hit!".to_string()),
            },
            BattleEvent::EffectivenessNoted { label } => match label.as_str() {
                "double" | "quad" => Some("It's super effective!".to_string()),
                "half" | "quarter" => Some("It's not very effective...".to_string()),
                _ => None,
            },
            BattleEvent::ActionBlocked { name, reason } => Some(match reason {
                BlockReason::Asleep => format!("{} is fast asleep.", name),
                BlockReason::Frozen => format!("{} is frozen solid!", name),
                BlockReason::FullyParalyzed => {
                    format!("{} is paralyzed and can't move!", name)
                }
                BlockReason::Flinched => format!("{} flinched!", name),
            }),
            BattleEvent::ActionSkipped { name } => {
                Some(format!("{} is down and can't act!", name))
            }
            BattleEvent::ActionFailed { name, .. } => {
                Some(format!("{}'s move failed!", name))
            }
            BattleEvent::StatusInflicted { name, condition } => {
                Some(format!("{} is afflicted by {}!", name, condition.name()))
            }
            BattleEvent::StatusCured { name, condition } => {
                Some(format!("{} shakes off the {}!", name, condition.name()))
            }
            BattleEvent::StatusResisted { name, condition } => {
                Some(format!("{} resists the {}!", name, condition.name()))
            }
            BattleEvent::StatusDamage {
                name,
                source,
                amount,
            } => Some(format!(
                "{} takes {} damage from the {}!",
                name,
                amount,
                source.name()
            )),
            BattleEvent::VolatileInflicted { name, condition } => {
                Some(format!("{} is caught in {}!", name, condition.name()))
            }
            BattleEvent::VolatileExpired { name, condition } => {
                Some(format!("{} is freed from the {}.", name, condition.name()))
            }
            BattleEvent::StageChanged { name, stat, delta } => {
                let direction = match delta {
                    d if *d >= 2 => "rises sharply",
                    d if *d == 1 => "rises",
                    d if *d == -1 => "falls",
                    _ => "falls sharply",
                };
                Some(format!("{}'s {} {}!", name, stat.name(), direction))
            }
            BattleEvent::StageAtLimit { name, stat, raised } => Some(format!(
                "{}'s {} can go no {}!",
                name,
                stat.name(),
                if *raised { "higher" } else { "lower" }
            )),
            BattleEvent::Healed { name, amount } => {
                Some(format!("{} recovers {} HP!", name, amount))
            }
            BattleEvent::ItemUsed { item, .. } => {
                Some(format!("A {} is used!", item.display_name()))
            }
            BattleEvent::Fainted { name } => Some(format!("{} is knocked out!", name)),
            BattleEvent::FleeSucceeded => Some("Got away safely!".to_string()),
            BattleEvent::FleeFailed => Some("Couldn't escape!".to_string()),
            BattleEvent::TameAttempted { .. } => None,
            BattleEvent::TameShake { name, shakes } => Some(match shakes {
                0 => format!("{} breaks free immediately!", name),
                1 => format!("{} struggles and breaks free!", name),
                2 => format!("So close! {} slips away at the last moment!", name),
                _ => format!("{} almost gave in...!", name),
            }),
            BattleEvent::TameSucceeded { name } => {
                Some(format!("{} is tamed and joins the party!", name))
            }
            BattleEvent::ExpGained { name, amount } => {
                Some(format!("{} gains {} experience!", name, amount))
            }
            BattleEvent::LeveledUp { name, level } => {
                Some(format!("{} grows to level {}!", name, level))
            }
            BattleEvent::MoveLearned { name, move_id } => {
                Some(format!("{} learns {}!", name, move_id.display_name()))
            }
            BattleEvent::MoveWantsLearning { name, move_id } => Some(format!(
                "{} wants to learn {}, but already knows four moves.",
                name,
                move_id.display_name()
            )),
            BattleEvent::MoneyEarned { amount } => {
                Some(format!("Earned {} coins!", amount))
            }
            BattleEvent::FieldFaded { what } => Some(format!("The {} fades.", what)),
            BattleEvent::BattleWon => Some("Victory!".to_string()),
            BattleEvent::BattleLost => Some("There are no able combatants left...".to_string()),
        }
    }
}

/// Ordered event log with a drain cursor for the UI's message pump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
    cursor: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// True while formatted lines are waiting to be drained.
    pub fn has_pending(&self) -> bool {
        self.events[self.cursor..]
            .iter()
            .any(|e| e.format().is_some())
    }

    /// Format and return all undrained log lines, advancing the cursor.
    pub fn drain(&mut self) -> Vec<String> {
        let lines = self.events[self.cursor..]
            .iter()
            .filter_map(BattleEvent::format)
            .collect();
        self.cursor = self.events.len();
        lines
    }
}

/// One side's roster: battle-local clones of the supplied combatants plus
/// per-battle counters (escape attempts, taming irritation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub name: String,
    pub members: Vec<Combatant>,
    pub active: usize,
    pub flee_attempts: u8,
    pub irritation: f64,
}

impl SideState {
    pub fn new(name: String, members: Vec<Combatant>) -> Self {
        let active = members
            .iter()
            .position(|m| !m.is_fainted())
            .unwrap_or(0);
        Self {
            name,
            members,
            active,
            flee_attempts: 0,
            irritation: 0.0,
        }
    }

    pub fn active(&self) -> &Combatant {
        &self.members[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Combatant {
        &mut self.members[self.active]
    }

    /// True when any benched member could still be sent out.
    pub fn has_reserves(&self) -> bool {
        self.members
            .iter()
            .enumerate()
            .any(|(i, m)| i != self.active && !m.is_fainted())
    }

    pub fn is_defeated(&self) -> bool {
        self.members.iter().all(|m| m.is_fainted())
    }

    /// Bench indices that are valid switch targets.
    pub fn switch_candidates(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(i, m)| *i != self.active && !m.is_fainted())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Full serializable battle state. The engine drives it through the phase
/// machine; nothing outside the engine mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub kind: BattleKind,
    pub sides: [SideState; 2],
    pub phase: BattlePhase,
    /// Phase to resume after the Message suspend point.
    pub resume: BattlePhase,
    pub pending_actions: [Option<Action>; 2],
    pub turn: u32,
    pub field: FieldState,
    pub order_mode: OrderMode,
    pub rng: BattleRng,
    pub bus: EventBus,
    /// Set when a win condition is reached; None for flee or capture endings.
    pub winner: Option<Side>,
    /// The tamed combatant, when a capture ended the battle.
    pub captured: Option<Combatant>,
    pub fled: bool,
}

impl BattleState {
    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side.index()]
    }

    pub fn expect_phase(&self, expected: BattlePhase) -> BattleResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(StateError::WrongPhase {
                expected: expected.name(),
                found: self.phase.name(),
            }
            .into())
        }
    }

    /// Suspend in Message until the caller drains the log, then resume at
    /// the given phase.
    pub fn suspend_for_messages(&mut self, resume: BattlePhase) {
        self.resume = resume;
        self.phase = BattlePhase::Message;
    }
}
