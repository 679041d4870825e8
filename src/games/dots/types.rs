//! Core domain types for the dot-connecting puzzle.

use serde::{Deserialize, Serialize};

/// A coordinate on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, derive_new::new)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Display color attached to points and committed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorTag {
    /// Seed points.
    Red,
    /// First secondary pool.
    Blue,
    /// Second secondary pool.
    Green,
    /// Committed lines.
    Line,
}

/// The pool a point is drawn from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Pool {
    /// Freely placed during setup.
    ///
    /// Declaration order is the registry's iteration order.
    Seed,
    /// Placed on a line during play (blue).
    SecondaryA,
    /// Placed on a line during play (green).
    SecondaryB,
}

impl Pool {
    /// Color used to draw points from this pool.
    pub fn color(self) -> ColorTag {
        match self {
            Pool::Seed => ColorTag::Red,
            Pool::SecondaryA => ColorTag::Blue,
            Pool::SecondaryB => ColorTag::Green,
        }
    }

    /// Returns true for the two pools that only open once play starts.
    pub fn is_secondary(self) -> bool {
        !matches!(self, Pool::Seed)
    }
}

/// Stable identity of a point: its pool and slot within that pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct PointId {
    /// Owning pool.
    pub pool: Pool,
    /// Slot index inside the pool.
    pub slot: usize,
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.pool, self.slot)
    }
}

/// A point on the board (placed or still waiting in its pool).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    id: PointId,
    position: Option<Position>,
    placed: bool,
    connections: u32,
    on_line: bool,
}

impl Point {
    /// Creates a placed seed point with no connections.
    pub(crate) fn seed(slot: usize, position: Position) -> Self {
        Self {
            id: PointId::new(Pool::Seed, slot),
            position: Some(position),
            placed: true,
            connections: 0,
            on_line: false,
        }
    }

    /// Creates an unpositioned secondary point.
    pub(crate) fn pending(pool: Pool, slot: usize) -> Self {
        Self {
            id: PointId::new(pool, slot),
            position: None,
            placed: false,
            connections: 0,
            on_line: false,
        }
    }

    /// Returns the point's identity.
    pub fn id(&self) -> PointId {
        self.id
    }

    /// Returns the position, or `None` while the point is unpositioned.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Returns true once the point is on the board.
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Number of line ends incident to this point.
    pub fn connections(&self) -> u32 {
        self.connections
    }

    /// Returns true if the point currently sits on a committed line.
    pub fn is_on_line(&self) -> bool {
        self.on_line
    }

    /// Position of a placed point.
    pub fn placed_position(&self) -> Option<Position> {
        self.position.filter(|_| self.placed)
    }

    /// Display color of the point.
    pub fn color(&self) -> ColorTag {
        self.id.pool.color()
    }

    pub(crate) fn place(&mut self, position: Position, connections: u32) {
        self.position = Some(position);
        self.placed = true;
        self.connections = connections;
    }

    pub(crate) fn add_connections(&mut self, delta: u32) {
        self.connections += delta;
    }

    pub(crate) fn set_on_line(&mut self, on_line: bool) {
        self.on_line = on_line;
    }
}

/// A committed line between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    path: Vec<Position>,
    anchors: (PointId, PointId),
    color: ColorTag,
}

impl Segment {
    /// Creates a segment from a path of at least two positions.
    ///
    /// Returns `None` if the path is too short to form a line.
    pub fn new(path: Vec<Position>, anchors: (PointId, PointId)) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }
        Some(Self {
            path,
            anchors,
            color: ColorTag::Line,
        })
    }

    /// The stroke as drawn, from the start anchor to the end anchor.
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// The two points this segment connects.
    pub fn anchors(&self) -> (PointId, PointId) {
        self.anchors
    }

    /// Display color.
    pub fn color(&self) -> ColorTag {
        self.color
    }

    /// Returns true if both ends attach to the same point.
    pub fn is_self_loop(&self) -> bool {
        self.anchors.0 == self.anchors.1
    }

    /// Straight anchor-to-anchor line (first and last path positions).
    pub fn chord(&self) -> [Position; 2] {
        // `new` guarantees at least two positions.
        [self.path[0], self.path[self.path.len() - 1]]
    }
}

/// Current phase of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// Seed points are being placed.
    #[default]
    Setup,
    /// Lines are being drawn and secondary points placed.
    Playing,
}
