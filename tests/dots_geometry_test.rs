//! Tests for geometry helpers and placement rules.

use godotgo::{
    GameSession, LINE_TOLERANCE, Pool, Position, RuleConfig, SNAP_RADIUS, distance_to_segment,
    is_on_polyline, is_valid_secondary_placement, nearest_placed_point,
};

fn pos(x: f64, y: f64) -> Position {
    Position::new(x, y)
}

#[test]
fn test_distance_is_perpendicular() {
    let d = distance_to_segment(pos(5.0, 3.0), pos(0.0, 0.0), pos(10.0, 0.0)).unwrap();
    assert!((d - 3.0).abs() < 1e-9);

    // Diagonal: (0, 2) is sqrt(2) away from y = x.
    let d = distance_to_segment(pos(0.0, 2.0), pos(0.0, 0.0), pos(4.0, 4.0)).unwrap();
    assert!((d - std::f64::consts::SQRT_2).abs() < 1e-9);
}

#[test]
fn test_degenerate_segment_has_no_distance() {
    assert_eq!(distance_to_segment(pos(1.0, 1.0), pos(3.0, 3.0), pos(3.0, 3.0)), None);
    assert!(!is_on_polyline(pos(3.0, 3.0), &[pos(3.0, 3.0), pos(3.0, 3.0)], LINE_TOLERANCE));
}

#[test]
fn test_polyline_tolerance_and_extent() {
    let line = [pos(0.0, 0.0), pos(100.0, 0.0)];
    assert!(is_on_polyline(pos(50.0, 10.0), &line, LINE_TOLERANCE));
    assert!(!is_on_polyline(pos(50.0, 10.5), &line, LINE_TOLERANCE));
    // Collinear but past the end of the segment.
    assert!(!is_on_polyline(pos(150.0, 0.0), &line, LINE_TOLERANCE));
    assert!(is_on_polyline(pos(105.0, 0.0), &line, LINE_TOLERANCE));
}

#[test]
fn test_polyline_checks_every_pair() {
    let stroke = [pos(0.0, 0.0), pos(50.0, 0.0), pos(50.0, 50.0)];
    assert!(is_on_polyline(pos(52.0, 30.0), &stroke, LINE_TOLERANCE));
    assert!(!is_on_polyline(pos(20.0, 30.0), &stroke, LINE_TOLERANCE));
    assert!(!is_on_polyline(pos(0.0, 0.0), &stroke[..1], LINE_TOLERANCE));
}

#[test]
fn test_snap_picks_nearest_placed_point() {
    let mut session = GameSession::default();
    for (i, x) in [0.0, 20.0].into_iter().enumerate() {
        session.select_pool_index(i).unwrap();
        session.tap_at(pos(x, 0.0)).unwrap();
    }
    let points = session.registry().pool(Pool::Seed);

    let nearest = nearest_placed_point(pos(12.0, 0.0), points, SNAP_RADIUS).unwrap();
    assert_eq!(nearest.position(), Some(pos(20.0, 0.0)));

    // Radius is inclusive.
    assert!(nearest_placed_point(pos(-15.0, 0.0), points, SNAP_RADIUS).is_some());
    assert!(nearest_placed_point(pos(-15.5, 0.0), points, SNAP_RADIUS).is_none());
}

#[test]
fn test_unplaced_points_never_snap() {
    let mut session = GameSession::default();
    for (i, x) in [0.0, 100.0, 200.0].into_iter().enumerate() {
        session.select_pool_index(i).unwrap();
        session.tap_at(pos(x, 0.0)).unwrap();
    }
    session.start_game().unwrap();

    let pending = session.registry().pool(Pool::SecondaryA);
    assert!(nearest_placed_point(pos(0.0, 0.0), pending, SNAP_RADIUS).is_none());
}

#[test]
fn test_placement_requires_a_line() {
    let session = GameSession::default();
    let rules = RuleConfig::default();
    assert!(!is_valid_secondary_placement(
        pos(50.0, 50.0),
        session.registry().iter(),
        session.segments(),
        true,
        &rules,
    ));
}
