//! The battle engine: phase machine, turn ordering, AI, and taming.

pub mod action;
pub mod ai;
pub mod engine;
pub mod order;
pub mod rewards;
pub mod rng;
pub mod state;
pub mod taming;

#[cfg(test)]
mod tests;

pub use action::{Action, Side};
pub use ai::{AiLevel, ScoringAi};
pub use engine::{Battle, BattleConfig, GameData};
pub use order::OrderMode;
pub use rewards::{BattleOutcome, SyncPayload};
pub use rng::BattleRng;
pub use state::{BattleEvent, BattleKind, BattlePhase, BattleState, EventBus, SideState};
pub use taming::{TamingBreakdown, TamingOutcome};
