//! Properties every accepted action must preserve.

/// A property of a state.
pub trait Invariant<S> {
    /// Returns true if `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// Reported when the property fails.
    fn description() -> &'static str;
}

/// A failed invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// What failed.
    pub description: String,
}

impl InvariantViolation {
    /// Wraps a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants checked as a group; implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks every member and returns all failures, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member),+> InvariantSet<S> for ($($member,)+)
        where
            $($member: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let violations: Vec<_> = [$(($member::holds(state), $member::description())),+]
                    .into_iter()
                    .filter(|(holds, _)| !holds)
                    .map(|(_, description)| InvariantViolation::new(description))
                    .collect();
                if violations.is_empty() { Ok(()) } else { Err(violations) }
            }
        }
    };
}

impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);

pub mod anchored_segments;
pub mod connection_quota;
pub mod phase_pools;

pub use anchored_segments::AnchoredSegmentsInvariant;
pub use connection_quota::ConnectionQuotaInvariant;
pub use phase_pools::PhasePoolsInvariant;

/// All session invariants as a composable set.
pub type DotsInvariants = (
    ConnectionQuotaInvariant,
    AnchoredSegmentsInvariant,
    PhasePoolsInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::{GameSession, PointId, Pool, Position};

    #[test]
    fn test_invariant_set_holds_for_empty_session() {
        assert!(DotsInvariants::check_all(&GameSession::default()).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_each_violation() {
        let mut session = GameSession::default();
        session.select_pool_index(0).expect("available");
        session.tap_at(Position::new(0.0, 0.0)).expect("placed");

        // Secondary pools in setup, plus an over-quota seed.
        session.registry_mut().open_secondary_pools(7);
        session
            .registry_mut()
            .increment_connections(PointId::new(Pool::Seed, 0), 4)
            .expect("seed exists");

        let violations = DotsInvariants::check_all(&session).expect_err("two violations");
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (ConnectionQuotaInvariant, AnchoredSegmentsInvariant);
        assert!(TwoInvariants::check_all(&GameSession::default()).is_ok());
    }
}
