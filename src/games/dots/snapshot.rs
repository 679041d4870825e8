//! Read-only render view of a session.

use super::session::GameSession;
use super::types::{ColorTag, Point, PointId, Pool, Position, Segment, SessionPhase};
use serde::Serialize;
use std::time::Instant;

/// One point as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointView {
    /// Identity.
    pub id: PointId,
    /// Position once placed.
    pub position: Option<Position>,
    /// Whether the point is on the board.
    pub placed: bool,
    /// Line ends incident to the point.
    pub connections: u32,
    /// Whether the point sits on a committed line.
    pub on_line: bool,
    /// Display color.
    pub color: ColorTag,
}

impl From<&Point> for PointView {
    fn from(point: &Point) -> Self {
        Self {
            id: point.id(),
            position: point.position(),
            placed: point.is_placed(),
            connections: point.connections(),
            on_line: point.is_on_line(),
            color: point.color(),
        }
    }
}

/// One committed line as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentView {
    /// Stroke from start anchor to end anchor.
    pub path: Vec<Position>,
    /// Start anchor.
    pub from: PointId,
    /// End anchor.
    pub to: PointId,
    /// Display color.
    pub color: ColorTag,
}

impl From<&Segment> for SegmentView {
    fn from(segment: &Segment) -> Self {
        let (from, to) = segment.anchors();
        Self {
            path: segment.path().to_vec(),
            from,
            to,
            color: segment.color(),
        }
    }
}

/// Everything the presentation layer needs to draw a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Current phase.
    pub phase: SessionPhase,
    /// Selected pool index.
    pub selection: Option<usize>,
    /// Seed indices still available (setup only).
    pub available_indices: Vec<usize>,
    /// Whether a new secondary point may be selected.
    pub can_select_new_point: bool,
    /// Whether the start button is enabled.
    pub can_start_game: bool,
    /// Committed lines in commit order.
    pub segments: Vec<SegmentView>,
    /// Stroke currently being drawn.
    pub in_progress: Option<Vec<Position>>,
    /// Seed points.
    pub seeds: Vec<PointView>,
    /// First secondary pool.
    pub secondary_a: Vec<PointView>,
    /// Second secondary pool.
    pub secondary_b: Vec<PointView>,
    /// Whether the invalid-placement warning is showing.
    pub show_invalid_placement_warning: bool,
}

impl Snapshot {
    /// Captures the session as it looks at `now`.
    pub fn capture(session: &GameSession, now: Instant) -> Self {
        let registry = session.registry();
        let views = |pool: Pool| -> Vec<PointView> {
            registry.pool(pool).iter().map(PointView::from).collect()
        };

        Self {
            phase: session.phase(),
            selection: session.selection(),
            available_indices: session.available_indices().to_vec(),
            can_select_new_point: session.can_select_new_point(),
            can_start_game: session.can_start_game(),
            segments: session.segments().iter().map(SegmentView::from).collect(),
            in_progress: session.drag().map(|stroke| stroke.path().to_vec()),
            seeds: views(Pool::Seed),
            secondary_a: views(Pool::SecondaryA),
            secondary_b: views(Pool::SecondaryB),
            show_invalid_placement_warning: session.is_warning_visible(now),
        }
    }
}
