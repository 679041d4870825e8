//! Point registry: the seed pool, the two secondary pools and their counters.

use super::action::RuleError;
use super::rule_config::RuleConfig;
use super::rules::{is_valid_secondary_placement, lies_on_any_segment};
use super::types::{Point, PointId, Pool, Position, Segment};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// Connections a secondary point starts with when it splits a line.
pub const SPLIT_CONNECTIONS: u32 = 2;

/// Owns every point of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRegistry {
    seed_capacity: usize,
    seeds: Vec<Point>,
    secondary_a: Vec<Point>,
    secondary_b: Vec<Point>,
}

impl PointRegistry {
    /// Creates an empty registry whose seed pool holds at most `seed_capacity` points.
    #[instrument]
    pub fn new(seed_capacity: usize) -> Self {
        Self {
            seed_capacity,
            seeds: Vec::with_capacity(seed_capacity),
            secondary_a: Vec::new(),
            secondary_b: Vec::new(),
        }
    }

    /// Appends a placed seed point at `position`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::CapacityExceeded` once the seed pool is full.
    #[instrument(skip(self))]
    pub fn place_seed_point(&mut self, position: Position) -> Result<PointId, RuleError> {
        if self.seeds.len() >= self.seed_capacity {
            warn!(capacity = self.seed_capacity, "Seed pool is full");
            return Err(RuleError::CapacityExceeded(self.seed_capacity));
        }
        let point = Point::seed(self.seeds.len(), position);
        let id = point.id();
        self.seeds.push(point);
        debug!(%id, "Seed point placed");
        Ok(id)
    }

    /// Creates `size` unpositioned points in each secondary pool.
    ///
    /// Any previous secondary points are discarded.
    #[instrument(skip(self))]
    pub fn open_secondary_pools(&mut self, size: usize) {
        self.secondary_a = (0..size).map(|slot| Point::pending(Pool::SecondaryA, slot)).collect();
        self.secondary_b = (0..size).map(|slot| Point::pending(Pool::SecondaryB, slot)).collect();
    }

    /// Positions the secondary point `id` at `position`.
    ///
    /// The point starts with [`SPLIT_CONNECTIONS`] when it lands on a committed
    /// line, otherwise with none.
    ///
    /// # Errors
    ///
    /// - `RuleError::UnknownSlot` if `id` names no secondary slot
    /// - `RuleError::AlreadyPlaced` if the slot was positioned before
    /// - `RuleError::InvalidTarget` if `position` is not a valid placement
    #[instrument(skip(self, id, segments, rules), fields(%id))]
    pub fn position_secondary_point(
        &mut self,
        id: PointId,
        position: Position,
        segments: &[Segment],
        rules: &RuleConfig,
    ) -> Result<PointId, RuleError> {
        let slot = self.get(id).ok_or(RuleError::UnknownSlot(id.slot))?;
        if !id.pool.is_secondary() {
            return Err(RuleError::UnknownSlot(id.slot));
        }
        if slot.is_placed() {
            return Err(RuleError::AlreadyPlaced(id.slot));
        }

        if !is_valid_secondary_placement(position, self.iter(), segments, true, rules) {
            warn!(%position, "Invalid secondary placement");
            return Err(RuleError::InvalidTarget(position.to_string()));
        }

        let connections = if lies_on_any_segment(position, segments, rules) {
            SPLIT_CONNECTIONS
        } else {
            0
        };

        let point = self.get_mut(id).ok_or(RuleError::UnknownSlot(id.slot))?;
        point.place(position, connections);
        debug!(%position, connections, "Secondary point placed");
        Ok(id)
    }

    /// Finds the placed point stored at exactly `position`.
    ///
    /// Positions passed here come from snapping, so exact comparison is intended.
    pub fn resolve_point_at(&self, position: Position) -> Option<&Point> {
        self.placed().find(|point| point.position() == Some(position))
    }

    /// Adds `delta` to the point's connection counter without validating the quota.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownSlot` if `id` names no point.
    #[instrument(skip(self, id), fields(%id))]
    pub fn increment_connections(&mut self, id: PointId, delta: u32) -> Result<u32, RuleError> {
        let point = self.get_mut(id).ok_or(RuleError::UnknownSlot(id.slot))?;
        point.add_connections(delta);
        Ok(point.connections())
    }

    /// Recomputes every secondary point's on-line flag against all segments.
    #[instrument(skip_all, fields(segments = segments.len()))]
    pub fn refresh_on_line_flags(&mut self, segments: &[Segment], rules: &RuleConfig) {
        for point in self.secondary_a.iter_mut().chain(self.secondary_b.iter_mut()) {
            let on_line = point
                .placed_position()
                .is_some_and(|pos| lies_on_any_segment(pos, segments, rules));
            point.set_on_line(on_line);
        }
    }

    /// Looks up a point by identity.
    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.pool(id.pool).get(id.slot)
    }

    fn get_mut(&mut self, id: PointId) -> Option<&mut Point> {
        let pool = match id.pool {
            Pool::Seed => &mut self.seeds,
            Pool::SecondaryA => &mut self.secondary_a,
            Pool::SecondaryB => &mut self.secondary_b,
        };
        pool.get_mut(id.slot)
    }

    /// Returns all points of one pool in slot order.
    pub fn pool(&self, pool: Pool) -> &[Point] {
        match pool {
            Pool::Seed => &self.seeds,
            Pool::SecondaryA => &self.secondary_a,
            Pool::SecondaryB => &self.secondary_b,
        }
    }

    /// Iterates over every point: seeds first, then SecondaryA, then SecondaryB.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        Pool::iter().flat_map(move |pool| self.pool(pool))
    }

    /// Iterates over placed points only.
    pub fn placed(&self) -> impl Iterator<Item = &Point> {
        self.iter().filter(|point| point.is_placed())
    }

    /// Number of seeds on the board.
    pub fn placed_seed_count(&self) -> usize {
        self.seeds.len()
    }

    /// Capacity of the seed pool.
    pub fn seed_capacity(&self) -> usize {
        self.seed_capacity
    }
}
