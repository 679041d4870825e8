//! Game session: the state machine behind every user interaction.
//!
//! A session owns all points, lines and selection state. Input events go in
//! through its methods (or [`GameSession::apply`]), and the presentation layer
//! reads a [`Snapshot`] back after each call.

use super::action::{Action, Outcome, RuleError};
use super::contracts::{
    Contract, LineCandidate, LineContract, PlacementCandidate, PlacementContract,
};
use super::geometry::nearest_placed_point;
use super::registry::PointRegistry;
use super::rule_config::RuleConfig;
use super::rules::can_start_game;
use super::snapshot::Snapshot;
use super::types::{PointId, Pool, Position, Segment, SessionPhase};
use super::warning::PlacementWarning;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// A line being drawn: its starting point and the samples recorded so far.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStroke {
    anchor: PointId,
    path: Vec<Position>,
}

impl DragStroke {
    /// Point the stroke started from.
    pub fn anchor(&self) -> PointId {
        self.anchor
    }

    /// Samples recorded so far, beginning at the anchor.
    pub fn path(&self) -> &[Position] {
        &self.path
    }
}

/// One game, from setup to reset.
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: RuleConfig,
    phase: SessionPhase,
    registry: PointRegistry,
    segments: Vec<Segment>,
    selection: Option<usize>,
    available: Vec<usize>,
    can_select_new_point: bool,
    drag: Option<DragStroke>,
    warning: PlacementWarning,
}

impl GameSession {
    /// Creates a session in setup with every seed index available.
    #[instrument(skip(rules))]
    pub fn new(rules: RuleConfig) -> Self {
        Self {
            phase: SessionPhase::Setup,
            registry: PointRegistry::new(rules.seed_pool_size),
            segments: Vec::new(),
            selection: None,
            available: (0..rules.seed_pool_size).collect(),
            can_select_new_point: true,
            drag: None,
            warning: PlacementWarning::new(rules.warning_duration()),
            rules,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// Rule constants this session runs with.
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// All points.
    pub fn registry(&self) -> &PointRegistry {
        &self.registry
    }

    /// Committed lines in commit order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Currently selected pool index.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Seed indices not yet used (setup only).
    pub fn available_indices(&self) -> &[usize] {
        &self.available
    }

    /// False between a secondary placement and the next committed line.
    pub fn can_select_new_point(&self) -> bool {
        self.can_select_new_point
    }

    /// The line being drawn, if any.
    pub fn drag(&self) -> Option<&DragStroke> {
        self.drag.as_ref()
    }

    /// Returns true if enough seeds are placed to start.
    pub fn can_start_game(&self) -> bool {
        can_start_game(self.registry.placed_seed_count(), &self.rules)
    }

    /// Returns true if the invalid-placement warning is showing at `now`.
    pub fn is_warning_visible(&self, now: Instant) -> bool {
        self.warning.is_visible(now)
    }

    /// Maps a playing-phase selection index to its secondary slot.
    ///
    /// Indices below the pool size address SecondaryA; the next block addresses SecondaryB.
    pub fn secondary_slot(&self, index: usize) -> Option<PointId> {
        let size = self.rules.secondary_pool_size;
        if index < size {
            Some(PointId::new(Pool::SecondaryA, index))
        } else if index < size * 2 {
            Some(PointId::new(Pool::SecondaryB, index - size))
        } else {
            None
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Selection
    // ─────────────────────────────────────────────────────────────

    /// Selects a pool index, replacing any earlier selection.
    ///
    /// # Errors
    ///
    /// - `RuleError::UnknownSlot` if the index addresses no slot in this phase
    /// - `RuleError::AlreadyPlaced` if the slot was already used
    /// - `RuleError::SelectionLocked` while a placed point awaits its line
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn select_pool_index(&mut self, index: usize) -> Result<Outcome, RuleError> {
        match self.phase {
            SessionPhase::Setup => {
                if index >= self.rules.seed_pool_size {
                    return Err(RuleError::UnknownSlot(index));
                }
                if !self.available.contains(&index) {
                    return Err(RuleError::AlreadyPlaced(index));
                }
            }
            SessionPhase::Playing => {
                let id = self.secondary_slot(index).ok_or(RuleError::UnknownSlot(index))?;
                if !self.can_select_new_point {
                    debug!("Selection locked until a line is drawn");
                    return Err(RuleError::SelectionLocked);
                }
                if self.registry.get(id).is_some_and(|point| point.is_placed()) {
                    return Err(RuleError::AlreadyPlaced(index));
                }
            }
        }

        self.selection = Some(index);
        debug!(index, "Pool index selected");
        Ok(Outcome::Selected { index })
    }

    /// Clears the selection if `index` is selected, otherwise selects it.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::select_pool_index`].
    #[instrument(skip(self))]
    pub fn toggle_pool_index(&mut self, index: usize) -> Result<Outcome, RuleError> {
        if self.selection == Some(index) {
            return Ok(self.deselect());
        }
        self.select_pool_index(index)
    }

    /// Clears any selection.
    pub fn deselect(&mut self) -> Outcome {
        match self.selection.take() {
            Some(index) => {
                debug!(index, "Pool index deselected");
                Outcome::Deselected
            }
            None => Outcome::Ignored,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Placement
    // ─────────────────────────────────────────────────────────────

    /// Places the selected point at `position`.
    ///
    /// See [`GameSession::tap_at_time`].
    pub fn tap_at(&mut self, position: Position) -> Result<Outcome, RuleError> {
        self.tap_at_time(position, Instant::now())
    }

    /// Places the selected point at `position`, timing any warning from `now`.
    ///
    /// In setup the selected seed goes anywhere. In play the selected secondary
    /// point must land on a committed line, away from other points; a rejected
    /// position raises the invalid-placement warning. Without a selection the
    /// tap is ignored.
    ///
    /// # Errors
    ///
    /// - `RuleError::CapacityExceeded` if the seed pool is full
    /// - `RuleError::InvalidTarget` if the position is not a valid placement
    /// - `RuleError::AlreadyPlaced` if the selected slot is already placed
    #[instrument(skip(self, now), fields(phase = %self.phase, selection = ?self.selection))]
    pub fn tap_at_time(&mut self, position: Position, now: Instant) -> Result<Outcome, RuleError> {
        self.warning.expire(now);
        let Some(index) = self.selection else {
            debug!("Tap without selection ignored");
            return Ok(Outcome::Ignored);
        };

        match self.phase {
            SessionPhase::Setup => self.place_seed(index, position),
            SessionPhase::Playing => self.place_secondary(index, position, now),
        }
    }

    fn place_seed(&mut self, index: usize, position: Position) -> Result<Outcome, RuleError> {
        let before = self.clone();
        let id = self.registry.place_seed_point(position)?;
        self.selection = None;
        self.available.retain(|&available| available != index);
        self.verify(before)?;
        info!(%id, %position, "Seed point placed");
        Ok(Outcome::SeedPlaced { id })
    }

    fn place_secondary(
        &mut self,
        index: usize,
        position: Position,
        now: Instant,
    ) -> Result<Outcome, RuleError> {
        let id = self.secondary_slot(index).ok_or(RuleError::UnknownSlot(index))?;
        let candidate = PlacementCandidate {
            slot: id,
            position,
            selection_allowed: self.can_select_new_point,
        };

        if let Err(e) = PlacementContract::pre(self, &candidate) {
            if matches!(e, RuleError::InvalidTarget(_)) {
                self.warning.raise(now);
            }
            warn!(error = %e, "Placement rejected");
            return Err(e);
        }

        let before = self.clone();
        if let Err(e) =
            self.registry
                .position_secondary_point(id, position, &self.segments, &self.rules)
        {
            if matches!(e, RuleError::InvalidTarget(_)) {
                self.warning.raise(now);
            }
            warn!(error = %e, "Placement rejected");
            return Err(e);
        }

        self.selection = None;
        self.can_select_new_point = false;
        self.warning.clear();
        self.registry.refresh_on_line_flags(&self.segments, &self.rules);
        self.check_post::<PlacementContract, PlacementCandidate>(before)?;

        info!(%id, %position, "Secondary point placed");
        Ok(Outcome::SecondaryPlaced { id })
    }

    // ─────────────────────────────────────────────────────────────
    //  Line drawing
    // ─────────────────────────────────────────────────────────────

    /// Starts a line at the placed point nearest to `position`.
    ///
    /// Ignored outside play, while a line is already being drawn, or when no
    /// placed point lies within the snap radius.
    #[instrument(skip(self))]
    pub fn begin_drag(&mut self, position: Position) -> Outcome {
        if self.phase != SessionPhase::Playing || self.drag.is_some() {
            return Outcome::Ignored;
        }

        let Some(anchor) = self.snap(position) else {
            debug!("No point to start a line from");
            return Outcome::Ignored;
        };
        let Some(start) = self.registry.get(anchor).and_then(|p| p.placed_position()) else {
            return Outcome::Ignored;
        };

        self.drag = Some(DragStroke {
            anchor,
            path: vec![start],
        });
        debug!(%anchor, "Line started");
        Outcome::DragStarted { anchor }
    }

    /// Records a drag sample if it moved far enough from the previous one.
    pub fn continue_drag(&mut self, position: Position) -> Outcome {
        let min_step = self.rules.drag_sample_distance;
        let Some(stroke) = self.drag.as_mut() else {
            return Outcome::Ignored;
        };
        match stroke.path.last() {
            Some(last) if last.distance_to(position) <= min_step => Outcome::Ignored,
            _ => {
                stroke.path.push(position);
                Outcome::DragExtended
            }
        }
    }

    /// Finishes the line at the placed point nearest to `position`.
    ///
    /// The stroke is discarded without any state change when the release does
    /// not snap to a point or the line would exceed a connection quota.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::QuotaExceeded` if an endpoint has no connections left.
    #[instrument(skip(self))]
    pub fn end_drag(&mut self, position: Position) -> Result<Outcome, RuleError> {
        let Some(stroke) = self.drag.take() else {
            return Ok(Outcome::Ignored);
        };

        let Some(to) = self.snap(position) else {
            debug!("Line released away from any point, discarded");
            return Ok(Outcome::Ignored);
        };

        let start_position = stroke.path[0];
        let from = match self.registry.resolve_point_at(start_position) {
            Some(point) => point.id(),
            None => {
                warn!(anchor = %stroke.anchor, "Line anchor vanished, discarded");
                return Ok(Outcome::Ignored);
            }
        };

        let candidate = LineCandidate { from, to };
        if let Err(e) = LineContract::pre(self, &candidate) {
            // Over-quota lines are dropped silently; no user-facing warning.
            warn!(error = %e, "Line rejected");
            return Err(e);
        }

        let Some(end_position) = self.registry.get(to).and_then(|p| p.placed_position()) else {
            return Ok(Outcome::Ignored);
        };
        let mut path = stroke.path;
        path.push(end_position);
        let Some(segment) = Segment::new(path, (from, to)) else {
            return Ok(Outcome::Ignored);
        };

        let before = self.clone();
        self.segments.push(segment);
        if from == to {
            self.registry.increment_connections(from, 2)?;
        } else {
            self.registry.increment_connections(from, 1)?;
            self.registry.increment_connections(to, 1)?;
        }
        self.registry.refresh_on_line_flags(&self.segments, &self.rules);
        self.can_select_new_point = true;
        self.check_post::<LineContract, LineCandidate>(before)?;

        let index = self.segments.len() - 1;
        info!(index, %from, %to, "Line committed");
        Ok(Outcome::SegmentCommitted { index, from, to })
    }

    fn snap(&self, position: Position) -> Option<PointId> {
        nearest_placed_point(position, self.registry.iter(), self.rules.snap_radius)
            .map(|point| point.id())
    }

    // ─────────────────────────────────────────────────────────────
    //  Phase transitions
    // ─────────────────────────────────────────────────────────────

    /// Leaves setup and opens both secondary pools.
    ///
    /// # Errors
    ///
    /// - `RuleError::WrongPhase` if play already started
    /// - `RuleError::NotEnoughPoints` if too few seeds are placed
    #[instrument(skip(self))]
    pub fn start_game(&mut self) -> Result<Outcome, RuleError> {
        if self.phase != SessionPhase::Setup {
            return Err(RuleError::WrongPhase(self.phase));
        }
        if !self.can_start_game() {
            let placed = self.registry.placed_seed_count();
            warn!(placed, "Not enough points to start");
            return Err(RuleError::NotEnoughPoints {
                required: self.rules.min_seeds_to_start,
                placed,
            });
        }

        let before = self.clone();
        self.available.clear();
        self.selection = None;
        self.registry.open_secondary_pools(self.rules.secondary_pool_size);
        self.registry.refresh_on_line_flags(&self.segments, &self.rules);
        self.can_select_new_point = true;
        self.phase = SessionPhase::Playing;
        self.verify(before)?;

        info!(seeds = self.registry.placed_seed_count(), "Game started");
        Ok(Outcome::GameStarted)
    }

    /// Discards all state and returns to setup.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) -> Outcome {
        *self = Self::new(self.rules.clone());
        info!("Game reset");
        Outcome::GameReset
    }

    // ─────────────────────────────────────────────────────────────
    //  Dispatch and snapshots
    // ─────────────────────────────────────────────────────────────

    /// Applies an input event.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, RuleError> {
        self.apply_at(action, Instant::now())
    }

    /// Applies an input event, timing any warning from `now`.
    #[instrument(skip(self, action, now), fields(%action))]
    pub fn apply_at(&mut self, action: Action, now: Instant) -> Result<Outcome, RuleError> {
        match action {
            Action::SelectPoolIndex { index } => self.select_pool_index(index),
            Action::TogglePoolIndex { index } => self.toggle_pool_index(index),
            Action::Deselect => Ok(self.deselect()),
            Action::TapAt { position } => self.tap_at_time(position, now),
            Action::BeginDrag { position } => Ok(self.begin_drag(position)),
            Action::ContinueDrag { position } => Ok(self.continue_drag(position)),
            Action::EndDrag { position } => self.end_drag(position),
            Action::StartGame => self.start_game(),
            Action::ResetGame => Ok(self.reset_game()),
        }
    }

    /// Hides the invalid-placement warning once its time is up.
    pub fn expire_warning(&mut self, now: Instant) {
        self.warning.expire(now);
    }

    /// Render view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Instant::now())
    }

    /// Render view of the state as seen at `now`.
    pub fn snapshot_at(&self, now: Instant) -> Snapshot {
        Snapshot::capture(self, now)
    }

    // ─────────────────────────────────────────────────────────────
    //  Post-conditions
    // ─────────────────────────────────────────────────────────────

    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut PointRegistry {
        &mut self.registry
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Restores `before` if any session invariant fails.
    fn verify(&mut self, before: Self) -> Result<(), RuleError> {
        if let Err(e) = super::contracts::check_invariants(self) {
            warn!(error = %e, "Session invariants violated, transition rolled back");
            *self = before;
            return Err(e);
        }
        Ok(())
    }

    /// Restores `before` if the contract's post-condition fails.
    fn check_post<C, A>(&mut self, before: Self) -> Result<(), RuleError>
    where
        C: Contract<Self, A>,
    {
        if let Err(e) = C::post(&before, self) {
            warn!(error = %e, "Post-condition failed, transition rolled back");
            *self = before;
            return Err(e);
        }
        Ok(())
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}
