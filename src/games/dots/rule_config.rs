//! Tunable constants of the rule engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which geometry of a committed line the "is on a line" test uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlacementPath {
    /// The freehand stroke recorded while dragging.
    #[default]
    Freehand,
    /// The straight line between the two anchors.
    Anchors,
}

/// Rule constants. Every field falls back to its default when absent from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Maximum line ends a single point may carry.
    pub max_connections: u32,
    /// Capacity of the seed pool.
    pub seed_pool_size: usize,
    /// Size of each secondary pool.
    pub secondary_pool_size: usize,
    /// Placed seeds required before play can start.
    pub min_seeds_to_start: usize,
    /// Perpendicular tolerance for the on-line test.
    pub line_tolerance: f64,
    /// Radius within which a drag snaps to a placed point.
    pub snap_radius: f64,
    /// Secondary points closer than this to a placed point are rejected.
    pub min_point_distance: f64,
    /// Drag samples closer than this to the previous sample are dropped.
    pub drag_sample_distance: f64,
    /// Lifetime of the invalid-placement warning, in milliseconds.
    pub warning_duration_ms: u64,
    /// Geometry used when testing whether a position lies on a line.
    pub placement_path: PlacementPath,
}

impl RuleConfig {
    /// Lifetime of the invalid-placement warning.
    pub fn warning_duration(&self) -> Duration {
        Duration::from_millis(self.warning_duration_ms)
    }

    /// Total number of selectable secondary slots (both pools).
    pub fn secondary_slots(&self) -> usize {
        self.secondary_pool_size * 2
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_connections: 3,
            seed_pool_size: 7,
            secondary_pool_size: 7,
            min_seeds_to_start: 3,
            line_tolerance: 10.0,
            snap_radius: 15.0,
            min_point_distance: 20.0,
            drag_sample_distance: 1.0,
            warning_duration_ms: 2000,
            placement_path: PlacementPath::Freehand,
        }
    }
}
