use crate::battle::action::Side;
use crate::items::ItemId;
use crate::moves::MoveId;
use std::fmt;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq)]
pub enum BattleError {
    /// Error in catalog or combatant construction data
    Data(DataError),
    /// Error in battle state consistency
    State(StateError),
    /// Error in a submitted action
    Action(ActionError),
}

/// Errors raised while building catalogs or combatants
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// The specified move was not found in the catalog
    MoveNotFound(MoveId),
    /// A move definition failed validation
    InvalidMove(MoveId, String),
    /// A combatant definition failed validation
    InvalidCombatant(String),
}

/// Errors raised by battle state validation
#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    /// A side was constructed with no combatants
    EmptySide(Side),
    /// A side has no conscious combatant left at construction
    NoConsciousCombatant(Side),
    /// An operation was attempted in the wrong phase
    WrongPhase { expected: &'static str, found: &'static str },
    /// Battle state is in an inconsistent or corrupted state
    InconsistentState(String),
}

/// Errors raised when validating a submitted action.
/// These are recoverable: the offending side is re-prompted.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// The acting side already has an action queued
    ActionAlreadyQueued(Side),
    /// Move slot index is out of bounds
    InvalidMoveSlot(usize),
    /// The chosen move has no uses remaining
    NoUsesRemaining(MoveId),
    /// The chosen move is disabled
    MoveDisabled(MoveId),
    /// Switch target index is out of bounds
    InvalidSwitchTarget(usize),
    /// Switch target is fainted
    SwitchTargetFainted(usize),
    /// Switch target is already active
    SwitchTargetActive(usize),
    /// The item cannot be used this way in battle
    ItemNotUsable(ItemId),
    /// Capture is not allowed in this battle (trainer battle or wrong side)
    CaptureNotAllowed,
    /// Fleeing is not allowed in this battle
    FleeNotAllowed,
    /// The action was submitted for the wrong side or a fainted actor
    NoActor(Side),
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::Data(err) => write!(f, "Data error: {}", err),
            BattleError::State(err) => write!(f, "State error: {}", err),
            BattleError::Action(err) => write!(f, "Action error: {}", err),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MoveNotFound(id) => write!(f, "Move not found: {:?}", id),
            DataError::InvalidMove(id, details) => write!(f, "Invalid move {:?}: {}", id, details),
            DataError::InvalidCombatant(details) => write!(f, "Invalid combatant: {}", details),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::EmptySide(side) => write!(f, "Side {:?} has no combatants", side),
            StateError::NoConsciousCombatant(side) => {
                write!(f, "Side {:?} has no conscious combatant", side)
            }
            StateError::WrongPhase { expected, found } => {
                write!(f, "Expected phase {}, found {}", expected, found)
            }
            StateError::InconsistentState(details) => {
                write!(f, "Inconsistent battle state: {}", details)
            }
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::ActionAlreadyQueued(side) => {
                write!(f, "Side {:?} already has an action queued", side)
            }
            ActionError::InvalidMoveSlot(slot) => write!(f, "Invalid move slot: {}", slot),
            ActionError::NoUsesRemaining(id) => write!(f, "No uses remaining for {:?}", id),
            ActionError::MoveDisabled(id) => write!(f, "Move {:?} is disabled", id),
            ActionError::InvalidSwitchTarget(idx) => write!(f, "Invalid switch target: {}", idx),
            ActionError::SwitchTargetFainted(idx) => {
                write!(f, "Switch target {} has fainted", idx)
            }
            ActionError::SwitchTargetActive(idx) => {
                write!(f, "Switch target {} is already in battle", idx)
            }
            ActionError::ItemNotUsable(item) => write!(f, "Item {:?} cannot be used here", item),
            ActionError::CaptureNotAllowed => write!(f, "Capture is not allowed here"),
            ActionError::FleeNotAllowed => write!(f, "Fleeing is not allowed here"),
            ActionError::NoActor(side) => write!(f, "Side {:?} has no actor for that action", side),
        }
    }
}

impl std::error::Error for BattleError {}
impl std::error::Error for DataError {}
impl std::error::Error for StateError {}
impl std::error::Error for ActionError {}

impl From<DataError> for BattleError {
    fn from(err: DataError) -> Self {
        BattleError::Data(err)
    }
}

impl From<StateError> for BattleError {
    fn from(err: StateError) -> Self {
        BattleError::State(err)
    }
}

impl From<ActionError> for BattleError {
    fn from(err: ActionError) -> Self {
        BattleError::Action(err)
    }
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;
