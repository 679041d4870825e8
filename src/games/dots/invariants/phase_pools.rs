//! Phase pools invariant: pool contents match the session phase.

use super::super::{GameSession, Pool, SessionPhase};
use super::Invariant;

/// Invariant: the pools look the way the current phase requires.
///
/// In setup there are no secondary points, and every placed seed used up
/// exactly one available index. In play both secondary pools are full-size
/// and no seed index remains available.
pub struct PhasePoolsInvariant;

impl Invariant<GameSession> for PhasePoolsInvariant {
    fn holds(session: &GameSession) -> bool {
        let rules = session.rules();
        let registry = session.registry();
        let seeds = registry.placed_seed_count();

        match session.phase() {
            SessionPhase::Setup => {
                registry.pool(Pool::SecondaryA).is_empty()
                    && registry.pool(Pool::SecondaryB).is_empty()
                    && seeds <= rules.seed_pool_size
                    && seeds + session.available_indices().len() == rules.seed_pool_size
            }
            SessionPhase::Playing => {
                registry.pool(Pool::SecondaryA).len() == rules.secondary_pool_size
                    && registry.pool(Pool::SecondaryB).len() == rules.secondary_pool_size
                    && session.available_indices().is_empty()
            }
        }
    }

    fn description() -> &'static str {
        "Pools match the session phase"
    }
}
