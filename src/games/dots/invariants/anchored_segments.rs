//! Anchored segments invariant: every line hangs on placed points.

use super::super::{GameSession, PointId};
use super::Invariant;

/// Invariant: both anchors of every committed segment are placed points.
///
/// Also requires each segment's path to hold at least two positions.
pub struct AnchoredSegmentsInvariant;

impl Invariant<GameSession> for AnchoredSegmentsInvariant {
    fn holds(session: &GameSession) -> bool {
        let registry = session.registry();
        session.segments().iter().all(|segment| {
            let (from, to) = segment.anchors();
            let placed = |id: PointId| registry.get(id).is_some_and(|p| p.is_placed());
            segment.path().len() >= 2 && placed(from) && placed(to)
        })
    }

    fn description() -> &'static str {
        "Every segment connects placed points"
    }
}
