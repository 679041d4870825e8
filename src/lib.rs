//! Go Dot Go - point and line rule engine
//!
//! Players place seed points, connect points with freehand lines and drop
//! secondary points onto existing lines. No point may carry more than three
//! line ends.
//!
//! # Architecture
//!
//! - **Session**: [`GameSession`] owns all state and applies [`Action`]s
//! - **Registry**: [`PointRegistry`] holds the seed and secondary pools
//! - **Rules**: pure predicates for placement and connection quotas
//! - **Snapshot**: [`Snapshot`] is the read-only view a renderer draws
//! - **Script**: [`Script`] and [`replay`] drive a session headlessly
//!
//! # Example
//!
//! ```
//! use godotgo::{GameSession, Position, SessionPhase};
//!
//! let mut session = GameSession::default();
//! for (i, x) in [10.0, 50.0, 90.0].into_iter().enumerate() {
//!     session.select_pool_index(i).unwrap();
//!     session.tap_at(Position::new(x, 10.0)).unwrap();
//! }
//! session.start_game().unwrap();
//! assert_eq!(session.phase(), SessionPhase::Playing);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod script;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Scripted replay
pub use script::{Script, ScriptError, StepReport, replay};

// Crate-level exports - Rule engine
pub use games::dots::{
    Action, AnchoredSegmentsInvariant, ColorTag, ConnectionQuotaInvariant, Contract,
    DotsInvariants, DragStroke, GameSession, Invariant, InvariantSet, InvariantViolation,
    LINE_TOLERANCE, LineCandidate, LineContract, Outcome, PhasePoolsInvariant,
    PlacementCandidate, PlacementContract, PlacementPath, PlacementWarning, Point, PointId,
    PointRegistry, PointView, Pool, Position, RuleConfig, RuleError, SNAP_RADIUS,
    SPLIT_CONNECTIONS, SegmentView, Segment, SessionPhase, Snapshot, can_start_game,
    check_invariants, distance_to_segment, is_near_placed_point, is_on_polyline,
    is_valid_secondary_placement, lies_on_any_segment, lies_on_segment, nearest_placed_point,
    would_exceed_limit,
};
