use crate::items::ItemId;
use serde::{Deserialize, Serialize};

/// The two sides of a battle. The player side is the only one allowed to
/// flee, capture, or use bag items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

/// One queued action per side per turn. A closed tagged union: the engine
/// validates every variant against the live state before queuing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Use the move in the given slot of the active combatant.
    Attack { side: Side, move_slot: usize },
    /// Swap the active combatant for a benched one.
    Switch { side: Side, bench_index: usize },
    /// Use a bag item on the active combatant.
    UseItem { side: Side, item: ItemId },
    /// Attempt to escape a wild battle.
    Flee { side: Side },
    /// Attempt to tame the opposing active combatant, optionally with bait.
    Capture { side: Side, bait: Option<ItemId> },
    /// Do nothing; fallback when no move is usable.
    Pass { side: Side },
}

impl Action {
    pub fn side(&self) -> Side {
        match self {
            Action::Attack { side, .. }
            | Action::Switch { side, .. }
            | Action::UseItem { side, .. }
            | Action::Flee { side }
            | Action::Capture { side, .. }
            | Action::Pass { side } => *side,
        }
    }

    /// Priority tier outside the attack path. Attacks use the move's own
    /// priority, resolved by the order sorter against the catalog.
    pub fn base_priority(&self) -> i8 {
        match self {
            Action::Flee { .. } => 6,
            Action::Switch { .. } => 5,
            Action::UseItem { .. } => 4,
            Action::Capture { .. } => 3,
            Action::Attack { .. } => 0,
            Action::Pass { .. } => 0,
        }
    }
}
