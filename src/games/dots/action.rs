//! First-class input events, their outcomes and rule errors.
//!
//! Every user interaction is an [`Action`]. Actions can be serialized into
//! scripts, replayed against a session, and logged as they are applied.

use super::types::{PointId, Position};
use serde::{Deserialize, Serialize};

/// An input event reaching the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Select a pool index, replacing any earlier selection.
    SelectPoolIndex {
        /// Pool index to select.
        index: usize,
    },
    /// Select a pool index, or clear it if it is already selected.
    TogglePoolIndex {
        /// Pool index to toggle.
        index: usize,
    },
    /// Clear the selection.
    Deselect,
    /// Tap on the canvas.
    TapAt {
        /// Tap location.
        position: Position,
    },
    /// Start a drag.
    BeginDrag {
        /// Drag start.
        position: Position,
    },
    /// Pointer moved during a drag.
    ContinueDrag {
        /// Current pointer location.
        position: Position,
    },
    /// Drag released.
    EndDrag {
        /// Release location.
        position: Position,
    },
    /// Leave setup and start play.
    StartGame,
    /// Throw everything away and return to setup.
    ResetGame,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::SelectPoolIndex { index } => write!(f, "select {}", index),
            Action::TogglePoolIndex { index } => write!(f, "toggle {}", index),
            Action::Deselect => write!(f, "deselect"),
            Action::TapAt { position } => write!(f, "tap {}", position),
            Action::BeginDrag { position } => write!(f, "drag start {}", position),
            Action::ContinueDrag { position } => write!(f, "drag {}", position),
            Action::EndDrag { position } => write!(f, "drag end {}", position),
            Action::StartGame => write!(f, "start game"),
            Action::ResetGame => write!(f, "new game"),
        }
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A pool index is now selected.
    Selected {
        /// The selected index.
        index: usize,
    },
    /// The selection was cleared.
    Deselected,
    /// A seed point was placed.
    SeedPlaced {
        /// The new point.
        id: PointId,
    },
    /// A secondary point was placed.
    SecondaryPlaced {
        /// The placed point.
        id: PointId,
    },
    /// A line was started at a point.
    DragStarted {
        /// The anchoring point.
        anchor: PointId,
    },
    /// The in-progress line grew by one sample.
    DragExtended,
    /// A line was committed.
    SegmentCommitted {
        /// Index of the segment in the committed list.
        index: usize,
        /// Start anchor.
        from: PointId,
        /// End anchor.
        to: PointId,
    },
    /// Play started.
    GameStarted,
    /// The session was reset.
    GameReset,
    /// The event has no effect in the current state.
    Ignored,
}

/// Rule violation. None of these end the session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RuleError {
    /// A pool is already full.
    #[display("Pool is full ({} points)", _0)]
    CapacityExceeded(usize),

    /// The pool slot (or seed index) was already used.
    #[display("Slot {} is already placed", _0)]
    AlreadyPlaced(usize),

    /// The position is too close to a point or not on any line.
    #[display("Cannot place a point at {}", _0)]
    InvalidTarget(String),

    /// The line would give a point more connections than allowed.
    #[display("Line would give {} more than {} connections", _0, _1)]
    QuotaExceeded(PointId, u32),

    /// Not enough seed points to start.
    #[display("Need at least {} points to start, have {}", required, placed)]
    NotEnoughPoints {
        /// Seeds required.
        required: usize,
        /// Seeds placed.
        placed: usize,
    },

    /// The index addresses no pool slot.
    #[display("No pool slot at index {}", _0)]
    UnknownSlot(usize),

    /// Another point must be connected before selecting again.
    #[display("Draw a line before selecting another point")]
    SelectionLocked,

    /// The action does not apply to the current phase.
    #[display("Not available while {}", _0)]
    WrongPhase(super::types::SessionPhase),

    /// A post-condition failed after a transition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::types::Pool;

    #[test]
    fn test_action_json_shape() {
        let action = Action::TapAt {
            position: Position::new(1.0, 2.0),
        };
        let json = serde_json::to_string(&action).expect("serializable");
        assert_eq!(json, r#"{"action":"tap_at","position":{"x":1.0,"y":2.0}}"#);

        let back: Action = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, action);
    }

    #[test]
    fn test_unit_action_parses() {
        let action: Action = serde_json::from_str(r#"{"action":"start_game"}"#).expect("valid");
        assert_eq!(action, Action::StartGame);
    }

    #[test]
    fn test_error_messages() {
        let err = RuleError::QuotaExceeded(PointId::new(Pool::Seed, 2), 3);
        assert_eq!(err.to_string(), "Line would give seed#2 more than 3 connections");

        let err = RuleError::NotEnoughPoints { required: 3, placed: 1 };
        assert_eq!(err.to_string(), "Need at least 3 points to start, have 1");
    }
}
