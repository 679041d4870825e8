//! Point and line rule engine.
//!
//! Players place seed points during setup, then draw lines between points and
//! drop secondary points onto those lines. Every point may carry at most three
//! line ends.

mod action;
mod contracts;
mod geometry;
mod invariants;
mod registry;
mod rule_config;
mod rules;
mod session;
mod snapshot;
mod types;
mod warning;

pub use action::{Action, Outcome, RuleError};
pub use contracts::{
    Contract, LineCandidate, LineContract, PlacementCandidate, PlacementContract,
    check_invariants,
};
pub use geometry::{
    LINE_TOLERANCE, SNAP_RADIUS, distance_to_segment, is_on_polyline, nearest_placed_point,
};
pub use invariants::{
    AnchoredSegmentsInvariant, ConnectionQuotaInvariant, DotsInvariants, Invariant,
    InvariantSet, InvariantViolation, PhasePoolsInvariant,
};
pub use registry::{PointRegistry, SPLIT_CONNECTIONS};
pub use rule_config::{PlacementPath, RuleConfig};
pub use rules::{
    can_start_game, is_near_placed_point, is_valid_secondary_placement, lies_on_any_segment,
    lies_on_segment, would_exceed_limit,
};
pub use session::{DragStroke, GameSession};
pub use snapshot::{PointView, SegmentView, Snapshot};
pub use types::{ColorTag, Point, PointId, Pool, Position, Segment, SessionPhase};
pub use warning::PlacementWarning;
