//! Turn-based monster battle engine.
//!
//! The crate is a pure state machine: the caller supplies rosters, a move
//! catalog, and player actions; the engine resolves turns deterministically
//! from a single seeded random stream and reports everything through an
//! ordered event log. Roster changes flow back only through the outcome's
//! sync payload.

pub mod battle;
pub mod combatant;
pub mod conditions;
pub mod damage;
pub mod elements;
pub mod errors;
pub mod field;
pub mod items;
pub mod moves;
pub mod stats;

pub use battle::{
    Action, AiLevel, Battle, BattleConfig, BattleEvent, BattleKind, BattleOutcome, BattlePhase,
    BattleRng, GameData, OrderMode, Side,
};
pub use combatant::{Combatant, CombatantSpec, Rank, TamingProfile};
pub use conditions::{PrimaryCondition, VolatileCondition};
pub use damage::{CritTier, DamageResult};
pub use elements::Element;
pub use errors::{ActionError, BattleError, BattleResult, DataError, StateError};
pub use field::{FieldState, Terrain, Weather};
pub use items::ItemId;
pub use moves::{MoveCatalog, MoveData, MoveId};
