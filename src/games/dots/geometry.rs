//! Geometry helpers: point-to-line distance, on-line tests and snapping.

use super::types::{Point, Position};
use tracing::instrument;

/// Default tolerance for [`is_on_polyline`].
pub const LINE_TOLERANCE: f64 = 10.0;

/// Default radius for [`nearest_placed_point`].
pub const SNAP_RADIUS: f64 = 15.0;

/// Perpendicular distance from `point` to the infinite line through `a` and `b`.
///
/// Uses the implicit line form `A·x + B·y + C = 0` with `A = b.y − a.y`,
/// `B = a.x − b.x`, `C = b.x·a.y − a.x·b.y`.
///
/// Returns `None` when `a == b`, since a zero-length segment defines no line.
pub fn distance_to_segment(point: Position, a: Position, b: Position) -> Option<f64> {
    let coef_a = b.y - a.y;
    let coef_b = a.x - b.x;
    let coef_c = b.x * a.y - a.x * b.y;

    let norm = coef_a.hypot(coef_b);
    if norm == 0.0 {
        return None;
    }
    Some((coef_a * point.x + coef_b * point.y + coef_c).abs() / norm)
}

/// Returns true if `point` lies within `tolerance` of any consecutive pair of `polyline`.
///
/// A pair only matches when `point` is also inside the pair's bounding box grown
/// by `tolerance` on every side, so positions past a segment's ends are not
/// mistaken for positions on it. Zero-length pairs never match.
pub fn is_on_polyline(point: Position, polyline: &[Position], tolerance: f64) -> bool {
    polyline.windows(2).any(|pair| {
        let (start, end) = (pair[0], pair[1]);
        let Some(distance) = distance_to_segment(point, start, end) else {
            return false;
        };
        if distance > tolerance {
            return false;
        }

        let min_x = start.x.min(end.x) - tolerance;
        let max_x = start.x.max(end.x) + tolerance;
        let min_y = start.y.min(end.y) - tolerance;
        let max_y = start.y.max(end.y) + tolerance;

        (min_x..=max_x).contains(&point.x) && (min_y..=max_y).contains(&point.y)
    })
}

/// Finds the placed point closest to `point`, if one lies within `snap_radius`.
///
/// Unplaced candidates are ignored. When two candidates are equally close the
/// earlier one in iteration order wins; callers should not rely on that.
#[instrument(skip(candidates))]
pub fn nearest_placed_point<'a, I>(point: Position, candidates: I, snap_radius: f64) -> Option<&'a Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    candidates
        .into_iter()
        .filter_map(|candidate| {
            candidate
                .placed_position()
                .map(|pos| (candidate, pos.distance_to(point)))
        })
        .filter(|(_, distance)| *distance <= snap_radius)
        .min_by(|(_, lhs), (_, rhs)| lhs.total_cmp(rhs))
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::types::Pool;

    fn pos(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_distance_horizontal_line() {
        let d = distance_to_segment(pos(5.0, 3.0), pos(0.0, 0.0), pos(10.0, 0.0));
        assert_eq!(d, Some(3.0));
    }

    #[test]
    fn test_distance_diagonal_line() {
        let d = distance_to_segment(pos(0.0, 2.0), pos(0.0, 0.0), pos(2.0, 2.0))
            .expect("non-degenerate");
        assert!((d - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_distance_degenerate_segment() {
        assert_eq!(distance_to_segment(pos(1.0, 1.0), pos(4.0, 4.0), pos(4.0, 4.0)), None);
    }

    #[test]
    fn test_on_polyline_within_tolerance() {
        let line = [pos(0.0, 0.0), pos(100.0, 0.0)];
        assert!(is_on_polyline(pos(50.0, 9.5), &line, LINE_TOLERANCE));
        assert!(!is_on_polyline(pos(50.0, 10.5), &line, LINE_TOLERANCE));
    }

    #[test]
    fn test_on_polyline_rejects_beyond_ends() {
        let line = [pos(0.0, 0.0), pos(100.0, 0.0)];
        // Collinear but far past the end.
        assert!(!is_on_polyline(pos(150.0, 0.0), &line, LINE_TOLERANCE));
        // Just inside the expanded bounding box.
        assert!(is_on_polyline(pos(109.0, 0.0), &line, LINE_TOLERANCE));
    }

    #[test]
    fn test_on_polyline_checks_every_pair() {
        let stroke = [pos(0.0, 0.0), pos(50.0, 0.0), pos(50.0, 50.0)];
        assert!(is_on_polyline(pos(52.0, 30.0), &stroke, LINE_TOLERANCE));
    }

    #[test]
    fn test_on_polyline_short_or_degenerate() {
        assert!(!is_on_polyline(pos(0.0, 0.0), &[pos(0.0, 0.0)], LINE_TOLERANCE));
        assert!(!is_on_polyline(pos(0.0, 0.0), &[pos(0.0, 0.0), pos(0.0, 0.0)], LINE_TOLERANCE));
    }

    #[test]
    fn test_nearest_prefers_closest_placed() {
        let near = Point::seed(0, pos(10.0, 0.0));
        let nearer = Point::seed(1, pos(4.0, 0.0));
        let pending = Point::pending(Pool::SecondaryA, 0);
        let points = [near, nearer, pending];

        let found = nearest_placed_point(pos(0.0, 0.0), &points, SNAP_RADIUS).expect("in radius");
        assert_eq!(found.id().slot, 1);
    }

    #[test]
    fn test_nearest_outside_radius() {
        let points = [Point::seed(0, pos(20.0, 0.0))];
        assert!(nearest_placed_point(pos(0.0, 0.0), &points, SNAP_RADIUS).is_none());
        // Radius is inclusive.
        let points = [Point::seed(0, pos(15.0, 0.0))];
        assert!(nearest_placed_point(pos(0.0, 0.0), &points, SNAP_RADIUS).is_some());
    }
}
