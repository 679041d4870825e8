//! Connection rules: start gate, secondary placement validity and line quotas.
//!
//! Everything here is a pure check. Nothing mutates state, so a rejected
//! candidate can never leave a partial update behind.

use super::geometry::is_on_polyline;
use super::rule_config::{PlacementPath, RuleConfig};
use super::types::{Point, Position, Segment};
use tracing::{debug, instrument};

/// Returns true once enough seeds are placed to leave setup.
#[instrument]
pub fn can_start_game(placed_seed_count: usize, rules: &RuleConfig) -> bool {
    placed_seed_count >= rules.min_seeds_to_start
}

/// Returns true if `position` lies on `segment` under the configured geometry.
pub fn lies_on_segment(position: Position, segment: &Segment, rules: &RuleConfig) -> bool {
    match rules.placement_path {
        PlacementPath::Freehand => is_on_polyline(position, segment.path(), rules.line_tolerance),
        PlacementPath::Anchors => is_on_polyline(position, &segment.chord(), rules.line_tolerance),
    }
}

/// Returns true if `position` lies on at least one committed segment.
pub fn lies_on_any_segment<'a, I>(position: Position, segments: I, rules: &RuleConfig) -> bool
where
    I: IntoIterator<Item = &'a Segment>,
{
    segments
        .into_iter()
        .any(|segment| lies_on_segment(position, segment, rules))
}

/// Returns true if a placed point is strictly closer than `min_distance` to `position`.
pub fn is_near_placed_point<'a, I>(position: Position, points: I, min_distance: f64) -> bool
where
    I: IntoIterator<Item = &'a Point>,
{
    points
        .into_iter()
        .filter_map(Point::placed_position)
        .any(|placed| placed.distance_to(position) < min_distance)
}

/// Decides whether a secondary point may be placed at `position`.
///
/// The position must be allowed by the selection gate, keep its distance from
/// every placed point, and sit on top of a committed line (the new point splits it).
#[instrument(skip(points, segments, rules))]
pub fn is_valid_secondary_placement<'a, P, S>(
    position: Position,
    points: P,
    segments: S,
    selection_allowed: bool,
    rules: &RuleConfig,
) -> bool
where
    P: IntoIterator<Item = &'a Point>,
    S: IntoIterator<Item = &'a Segment>,
{
    if !selection_allowed {
        debug!("Placement rejected: no selection allowed");
        return false;
    }

    if is_near_placed_point(position, points, rules.min_point_distance) {
        debug!("Placement rejected: too close to a placed point");
        return false;
    }

    lies_on_any_segment(position, segments, rules)
}

/// Returns true if connecting `start` to `end` would break a connection quota.
///
/// A self-loop adds two line ends to its single point; any other line adds one
/// to each end. Evaluate before touching any counter.
#[instrument(skip(start, end), fields(start_id = %start.id(), end_id = %end.id()))]
pub fn would_exceed_limit(start: &Point, end: &Point, max_connections: u32) -> bool {
    if start.id() == end.id() {
        return start.connections() + 2 > max_connections;
    }
    start.connections() + 1 > max_connections || end.connections() + 1 > max_connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::types::{PointId, Pool};

    fn pos(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    fn seed_with(slot: usize, connections: u32) -> Point {
        let mut point = Point::seed(slot, pos(slot as f64 * 50.0, 0.0));
        point.add_connections(connections);
        point
    }

    fn horizontal_segment() -> Segment {
        let a = PointId::new(Pool::Seed, 0);
        let b = PointId::new(Pool::Seed, 1);
        Segment::new(vec![pos(0.0, 0.0), pos(50.0, 30.0), pos(100.0, 0.0)], (a, b))
            .expect("valid path")
    }

    #[test]
    fn test_can_start_game_threshold() {
        let rules = RuleConfig::default();
        assert!(!can_start_game(0, &rules));
        assert!(!can_start_game(1, &rules));
        assert!(!can_start_game(2, &rules));
        assert!(can_start_game(3, &rules));
        assert!(can_start_game(7, &rules));
    }

    #[test]
    fn test_self_loop_counts_two() {
        assert!(!would_exceed_limit(&seed_with(0, 0), &seed_with(0, 0), 3));
        assert!(!would_exceed_limit(&seed_with(0, 1), &seed_with(0, 1), 3));
        assert!(would_exceed_limit(&seed_with(0, 2), &seed_with(0, 2), 3));
    }

    #[test]
    fn test_edge_checks_both_ends() {
        assert!(!would_exceed_limit(&seed_with(0, 2), &seed_with(1, 2), 3));
        assert!(would_exceed_limit(&seed_with(0, 3), &seed_with(1, 0), 3));
        assert!(would_exceed_limit(&seed_with(0, 0), &seed_with(1, 3), 3));
    }

    #[test]
    fn test_placement_requires_selection() {
        let rules = RuleConfig::default();
        let segments = [horizontal_segment()];
        let points: [Point; 0] = [];
        assert!(!is_valid_secondary_placement(pos(25.0, 15.0), &points, &segments, false, &rules));
        assert!(is_valid_secondary_placement(pos(25.0, 15.0), &points, &segments, true, &rules));
    }

    #[test]
    fn test_placement_too_close_to_point() {
        let rules = RuleConfig::default();
        let segments = [horizontal_segment()];
        let points = [Point::seed(0, pos(0.0, 0.0))];
        assert!(!is_valid_secondary_placement(pos(10.0, 6.0), &points, &segments, true, &rules));
    }

    #[test]
    fn test_placement_off_line() {
        let rules = RuleConfig::default();
        let segments = [horizontal_segment()];
        let points: [Point; 0] = [];
        assert!(!is_valid_secondary_placement(pos(50.0, -40.0), &points, &segments, true, &rules));
    }

    #[test]
    fn test_anchor_geometry_ignores_stroke_shape() {
        let freehand = RuleConfig::default();
        let anchors = RuleConfig {
            placement_path: PlacementPath::Anchors,
            ..RuleConfig::default()
        };
        let segment = horizontal_segment();
        // The bend at (50, 30) is only part of the freehand stroke.
        assert!(lies_on_segment(pos(50.0, 30.0), &segment, &freehand));
        assert!(!lies_on_segment(pos(50.0, 30.0), &segment, &anchors));
        assert!(lies_on_segment(pos(50.0, 0.0), &segment, &anchors));
    }
}
