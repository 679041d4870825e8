//! Connection quota invariant: no point carries more line ends than allowed.

use super::super::GameSession;
use super::Invariant;

/// Invariant: every point's connection count is within the configured maximum.
pub struct ConnectionQuotaInvariant;

impl Invariant<GameSession> for ConnectionQuotaInvariant {
    fn holds(session: &GameSession) -> bool {
        let max = session.rules().max_connections;
        session.registry().iter().all(|point| point.connections() <= max)
    }

    fn description() -> &'static str {
        "No point exceeds its connection quota"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::{PointId, Pool, Position};

    fn one_seed() -> GameSession {
        let mut session = GameSession::default();
        session.select_pool_index(0).expect("available");
        session.tap_at(Position::new(5.0, 5.0)).expect("placed");
        session
    }

    #[test]
    fn test_at_quota_holds() {
        let mut session = one_seed();
        session
            .registry_mut()
            .increment_connections(PointId::new(Pool::Seed, 0), 3)
            .expect("seed exists");
        assert!(ConnectionQuotaInvariant::holds(&session));
    }

    #[test]
    fn test_over_quota_violates() {
        let mut session = one_seed();
        session
            .registry_mut()
            .increment_connections(PointId::new(Pool::Seed, 0), 4)
            .expect("seed exists");
        assert!(!ConnectionQuotaInvariant::holds(&session));
    }
}
