//! Contract-based validation for session transitions.
//!
//! Contracts pair a precondition, checked before a candidate is applied, with a
//! postcondition comparing the session before and after: {P} action {Q}.

use super::action::RuleError;
use super::invariants::{DotsInvariants, InvariantSet};
use super::registry::SPLIT_CONNECTIONS;
use super::rules::{is_valid_secondary_placement, would_exceed_limit};
use super::session::GameSession;
use super::types::{PointId, Position};
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), RuleError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), RuleError>;
}

/// Checks every session invariant, folding violations into one error.
pub fn check_invariants(session: &GameSession) -> Result<(), RuleError> {
    DotsInvariants::check_all(session).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        RuleError::InvariantViolation(descriptions)
    })
}

fn total_connections(session: &GameSession) -> u32 {
    session.registry().iter().map(|p| p.connections()).sum()
}

// ─────────────────────────────────────────────────────────────
//  Line Contract
// ─────────────────────────────────────────────────────────────

/// A line about to be committed between two resolved points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCandidate {
    /// Start anchor.
    pub from: PointId,
    /// End anchor (equal to `from` for a self-loop).
    pub to: PointId,
}

/// Contract for committing a line.
///
/// Preconditions:
/// - Both anchors are placed points
/// - Neither anchor would exceed its connection quota
///
/// Postconditions:
/// - Exactly one segment was added
/// - Exactly two line ends were added across all counters
/// - All session invariants hold
pub struct LineContract;

impl Contract<GameSession, LineCandidate> for LineContract {
    #[instrument(skip(session))]
    fn pre(session: &GameSession, line: &LineCandidate) -> Result<(), RuleError> {
        let registry = session.registry();
        let from = registry
            .get(line.from)
            .filter(|p| p.is_placed())
            .ok_or(RuleError::UnknownSlot(line.from.slot))?;
        let to = registry
            .get(line.to)
            .filter(|p| p.is_placed())
            .ok_or(RuleError::UnknownSlot(line.to.slot))?;

        let max = session.rules().max_connections;
        if would_exceed_limit(from, to, max) {
            let full = if from.id() == to.id() || from.connections() + 1 > max { from } else { to };
            return Err(RuleError::QuotaExceeded(full.id(), max));
        }
        Ok(())
    }

    fn post(before: &GameSession, after: &GameSession) -> Result<(), RuleError> {
        if after.segments().len() != before.segments().len() + 1 {
            return Err(RuleError::InvariantViolation(
                "Line commit must add exactly one segment".to_string(),
            ));
        }
        if total_connections(after) != total_connections(before) + 2 {
            return Err(RuleError::InvariantViolation(
                "Line commit must add exactly two line ends".to_string(),
            ));
        }
        check_invariants(after)
    }
}

// ─────────────────────────────────────────────────────────────
//  Placement Contract
// ─────────────────────────────────────────────────────────────

/// A secondary point about to be positioned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCandidate {
    /// Slot being positioned.
    pub slot: PointId,
    /// Target position.
    pub position: Position,
    /// Whether the selection gate currently allows a placement.
    pub selection_allowed: bool,
}

/// Contract for positioning a secondary point.
///
/// Preconditions:
/// - The slot exists and is not yet placed
/// - The position is a valid secondary placement
/// - The split connections fit within the quota
///
/// Postconditions:
/// - Exactly one more point is placed
/// - All session invariants hold
pub struct PlacementContract;

impl Contract<GameSession, PlacementCandidate> for PlacementContract {
    #[instrument(skip(session))]
    fn pre(session: &GameSession, candidate: &PlacementCandidate) -> Result<(), RuleError> {
        let slot = session
            .registry()
            .get(candidate.slot)
            .ok_or(RuleError::UnknownSlot(candidate.slot.slot))?;
        if slot.is_placed() {
            return Err(RuleError::AlreadyPlaced(candidate.slot.slot));
        }

        if !is_valid_secondary_placement(
            candidate.position,
            session.registry().iter(),
            session.segments(),
            candidate.selection_allowed,
            session.rules(),
        ) {
            return Err(RuleError::InvalidTarget(candidate.position.to_string()));
        }

        // A valid placement always lands on a line.
        let max = session.rules().max_connections;
        if SPLIT_CONNECTIONS > max {
            return Err(RuleError::QuotaExceeded(candidate.slot, max));
        }
        Ok(())
    }

    fn post(before: &GameSession, after: &GameSession) -> Result<(), RuleError> {
        let placed_before = before.registry().placed().count();
        let placed_after = after.registry().placed().count();
        if placed_after != placed_before + 1 {
            return Err(RuleError::InvariantViolation(
                "Placement must place exactly one point".to_string(),
            ));
        }
        check_invariants(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::types::Pool;
    use crate::games::dots::RuleConfig;

    fn playing_session() -> GameSession {
        let mut session = GameSession::default();
        for (i, x) in [10.0, 110.0, 210.0].into_iter().enumerate() {
            session.select_pool_index(i).expect("available");
            session.tap_at(Position::new(x, 10.0)).expect("placed");
        }
        session.start_game().expect("enough seeds");
        session
    }

    #[test]
    fn test_line_pre_accepts_fresh_points() {
        let session = playing_session();
        let line = LineCandidate {
            from: PointId::new(Pool::Seed, 0),
            to: PointId::new(Pool::Seed, 1),
        };
        assert!(LineContract::pre(&session, &line).is_ok());
    }

    #[test]
    fn test_line_pre_rejects_unplaced_anchor() {
        let session = playing_session();
        let line = LineCandidate {
            from: PointId::new(Pool::Seed, 0),
            to: PointId::new(Pool::SecondaryA, 0),
        };
        assert_eq!(LineContract::pre(&session, &line), Err(RuleError::UnknownSlot(0)));
    }

    #[test]
    fn test_line_post_detects_missing_segment() {
        let session = playing_session();
        assert!(LineContract::post(&session, &session).is_err());
    }

    #[test]
    fn test_placement_pre_rejects_off_line() {
        let session = playing_session();
        let candidate = PlacementCandidate {
            slot: PointId::new(Pool::SecondaryA, 0),
            position: Position::new(60.0, 10.0),
            selection_allowed: true,
        };
        // No lines yet, so nothing to place on.
        assert!(matches!(
            PlacementContract::pre(&session, &candidate),
            Err(RuleError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_placement_pre_rejects_split_over_quota() {
        let rules = RuleConfig {
            max_connections: 1,
            ..RuleConfig::default()
        };
        let mut session = GameSession::new(rules);
        for (i, x) in [10.0, 50.0, 90.0].into_iter().enumerate() {
            session.select_pool_index(i).expect("available");
            session.tap_at(Position::new(x, 10.0)).expect("placed");
        }
        session.start_game().expect("enough seeds");
        session.begin_drag(Position::new(10.0, 10.0));
        session.end_drag(Position::new(50.0, 10.0)).expect("within quota");

        let slot = PointId::new(Pool::SecondaryA, 0);
        let candidate = PlacementCandidate {
            slot,
            position: Position::new(30.0, 10.0),
            selection_allowed: true,
        };
        assert_eq!(
            PlacementContract::pre(&session, &candidate),
            Err(RuleError::QuotaExceeded(slot, 1))
        );
    }

    #[test]
    fn test_invariants_hold_for_new_session() {
        assert!(check_invariants(&GameSession::default()).is_ok());
        assert!(check_invariants(&playing_session()).is_ok());
    }
}
