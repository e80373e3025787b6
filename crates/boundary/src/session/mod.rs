//! Editing session: the one mutable ring, its history, and derived data.
//!
//! Purpose
//! - Own the visible ring and a bounded undo/redo history, distinguishing
//!   transient updates (drag in progress, history untouched) from commits.
//! - Hand back an `EditOutcome` from every mutating call instead of invoking
//!   callbacks, so adapters decide what to redraw.
//!
//! Lifecycle
//! - The history is seeded with the initial ring. Transient updates mark the
//!   session dirty until the next `commit`. Batches suppress commits until the
//!   outermost `end_batch`, which records a single step.
//! - Metrics and validation are computed lazily and memoized until the ring
//!   value changes.
//!
//! The visible ring is always stored closed and normalized.

use std::cell::OnceCell;

use tracing::{debug, warn};

use crate::codec::{self, CodecError, Format};
use crate::edit::{self, EditError};
use crate::history::{History, DEFAULT_CAPACITY};
use crate::ring::{normalize, open, round_coord};
use crate::simplify::simplify;
use crate::snap::snap_to_edge;
use crate::topology::{ensure_orientation, would_cause_intersection};
use crate::validate::{validate, Metrics, Report, ValidationThresholds};
use crate::Coord;

/// Session configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionCfg {
    pub history_capacity: usize,
    pub thresholds: ValidationThresholds,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            thresholds: ValidationThresholds::default(),
        }
    }
}

/// What a mutating call produced: the new ring and what it derives to.
#[derive(Clone, Debug, PartialEq)]
pub struct EditOutcome {
    pub ring: Vec<Coord>,
    pub metrics: Metrics,
    pub validation: Report,
}

#[derive(Debug)]
pub struct Session {
    ring: Vec<Coord>,
    history: History<Vec<Coord>>,
    cfg: SessionCfg,
    batch_depth: usize,
    dirty: bool,
    report: OnceCell<Report>,
}

impl Session {
    /// Start a session on `ring` (either form). Invalid rings are accepted and
    /// reported through `validation()`.
    pub fn new(ring: &[Coord], cfg: SessionCfg) -> Self {
        let ring = normalize(ring).ring;
        Self {
            history: History::new(ring.clone(), cfg.history_capacity),
            ring,
            cfg,
            batch_depth: 0,
            dirty: false,
            report: OnceCell::new(),
        }
    }

    /// Session from an imported text; fails without creating anything.
    pub fn from_text(format: Format, text: &str, cfg: SessionCfg) -> Result<Self, CodecError> {
        Ok(Self::new(&format.decode(text)?, cfg))
    }

    /// Closed ring currently shown.
    pub fn ring(&self) -> &[Coord] {
        &self.ring
    }

    /// Open vertex list; index `i` addresses a real vertex.
    pub fn vertices(&self) -> Vec<Coord> {
        open(&self.ring)
    }

    pub fn validation(&self) -> &Report {
        self.report
            .get_or_init(|| validate(&self.ring, &self.cfg.thresholds))
    }

    pub fn metrics(&self) -> &Metrics {
        &self.validation().metrics
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.cfg.thresholds
    }

    /// Replace thresholds; validation is recomputed on next access.
    pub fn set_thresholds(&mut self, thresholds: ValidationThresholds) {
        self.cfg.thresholds = thresholds;
        self.report = OnceCell::new();
    }

    pub fn history(&self) -> &History<Vec<Coord>> {
        &self.history
    }

    /// A transient update is showing that has not been committed yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn can_undo(&self) -> bool {
        !self.in_batch() && (self.dirty || self.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        !self.in_batch() && self.history.can_redo()
    }

    fn set_ring(&mut self, ring: Vec<Coord>) {
        if ring != self.ring {
            self.ring = ring;
            self.report = OnceCell::new();
        }
    }

    fn outcome(&self) -> EditOutcome {
        let validation = self.validation().clone();
        EditOutcome {
            ring: self.ring.clone(),
            metrics: validation.metrics.clone(),
            validation,
        }
    }

    // ---- commits ---------------------------------------------------------

    /// Record the visible ring as a history step (ends any transient gesture).
    /// Inside a batch this is deferred to `end_batch`. Committing a ring equal
    /// to the current snapshot adds no step.
    pub fn commit(&mut self) -> EditOutcome {
        if self.in_batch() {
            return self.outcome();
        }
        self.dirty = false;
        if self.ring != *self.history.current() {
            let evicted = self.history.commit(self.ring.clone());
            debug!(
                vertices = open(&self.ring).len(),
                entries = self.history.len(),
                evicted,
                "commit"
            );
        }
        self.outcome()
    }

    /// Replace the ring (normalized) and commit it.
    pub fn commit_ring(&mut self, ring: &[Coord]) -> EditOutcome {
        self.set_ring(normalize(ring).ring);
        self.commit()
    }

    fn apply(&mut self, vertices: Vec<Coord>) -> EditOutcome {
        self.commit_ring(&vertices)
    }

    // ---- transient -------------------------------------------------------

    /// Show `ring` without touching history. Must be followed by `commit`
    /// when the gesture ends.
    pub fn transient_update(&mut self, ring: &[Coord]) -> EditOutcome {
        self.set_ring(normalize(ring).ring);
        self.dirty = true;
        self.outcome()
    }

    /// Drag feedback for one vertex. Moves that would make the ring cross
    /// itself are refused and leave the ring unchanged.
    pub fn update_vertex_transient(
        &mut self,
        index: usize,
        point: Coord,
    ) -> Result<EditOutcome, EditError> {
        let p = round_coord(point);
        let v = self.vertices();
        if index >= v.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: v.len(),
            });
        }
        if would_cause_intersection(&v, index, p) {
            warn!(index, lon = p.x, lat = p.y, "rejected self-intersecting move");
            return Err(EditError::WouldSelfIntersect { index });
        }
        let v = edit::replace_vertex(&v, index, p)?;
        // landing on a neighbour merges the two vertices
        self.set_ring(normalize(&v).ring);
        self.dirty = true;
        Ok(self.outcome())
    }

    // ---- undo / redo -----------------------------------------------------

    /// Revert an uncommitted transient update to the current snapshot, or
    /// else step back one snapshot. `None` when nothing is left to undo or a
    /// batch is open.
    pub fn undo(&mut self) -> Option<EditOutcome> {
        if self.in_batch() {
            return None;
        }
        if self.dirty {
            let ring = self.history.current().clone();
            debug!(cursor = self.history.cursor(), "undo transient");
            self.set_ring(ring);
            self.dirty = false;
            return Some(self.outcome());
        }
        let ring = self.history.undo()?.clone();
        debug!(cursor = self.history.cursor(), "undo");
        self.set_ring(ring);
        self.dirty = false;
        Some(self.outcome())
    }

    pub fn redo(&mut self) -> Option<EditOutcome> {
        if self.in_batch() {
            return None;
        }
        let ring = self.history.redo()?.clone();
        debug!(cursor = self.history.cursor(), "redo");
        self.set_ring(ring);
        self.dirty = false;
        Some(self.outcome())
    }

    // ---- batches ---------------------------------------------------------

    pub fn start_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close a batch; the outermost close commits once if the ring changed.
    pub fn end_batch(&mut self) -> Result<EditOutcome, EditError> {
        if self.batch_depth == 0 {
            return Err(EditError::NoOpenBatch);
        }
        self.batch_depth -= 1;
        Ok(self.commit())
    }

    // ---- edits -----------------------------------------------------------

    pub fn insert_vertex(&mut self, at: usize, point: Coord) -> Result<EditOutcome, EditError> {
        let v = edit::insert_vertex(&self.ring, at, point)?;
        Ok(self.apply(v))
    }

    /// Snap `point` onto the nearest edge within `tolerance_m` and split that
    /// edge there.
    pub fn insert_on_edge(
        &mut self,
        point: Coord,
        tolerance_m: f64,
    ) -> Result<EditOutcome, EditError> {
        let snap = snap_to_edge(point, &self.ring, tolerance_m);
        let edge = snap
            .edge_index
            .ok_or(EditError::NoEdgeInRange { tolerance_m })?;
        self.insert_vertex(edge + 1, snap.point)
    }

    pub fn remove_vertex(&mut self, index: usize) -> Result<EditOutcome, EditError> {
        let v = edit::remove_vertex(&self.ring, index)?;
        Ok(self.apply(v))
    }

    /// Committed move; the result may be invalid and is reported, not refused.
    pub fn move_vertex(&mut self, index: usize, point: Coord) -> Result<EditOutcome, EditError> {
        let v = edit::replace_vertex(&self.ring, index, point)?;
        Ok(self.apply(v))
    }

    pub fn move_vertex_by(
        &mut self,
        index: usize,
        distance_m: f64,
        bearing_deg: f64,
    ) -> Result<EditOutcome, EditError> {
        let v = edit::move_vertex_by(&self.ring, index, distance_m, bearing_deg)?;
        Ok(self.apply(v))
    }

    pub fn set_segment_length(
        &mut self,
        index: usize,
        length_m: f64,
    ) -> Result<EditOutcome, EditError> {
        let v = edit::set_segment_length(&self.ring, index, length_m)?;
        Ok(self.apply(v))
    }

    pub fn set_segment_bearing(
        &mut self,
        index: usize,
        bearing_deg: f64,
    ) -> Result<EditOutcome, EditError> {
        let v = edit::set_segment_bearing(&self.ring, index, bearing_deg)?;
        Ok(self.apply(v))
    }

    pub fn simplify(&mut self, tolerance_m: f64) -> EditOutcome {
        let v = simplify(&self.ring, tolerance_m);
        self.apply(v)
    }

    pub fn ensure_orientation(&mut self, clockwise: bool) -> EditOutcome {
        let v = ensure_orientation(&self.ring, clockwise);
        self.apply(v)
    }

    // ---- import / export -------------------------------------------------

    pub fn export(&self, format: Format) -> String {
        format.encode(&self.ring)
    }

    pub fn export_geojson(&self) -> String {
        codec::to_geojson(&self.ring)
    }

    pub fn export_wkt(&self) -> String {
        codec::to_wkt(&self.ring)
    }

    pub fn export_csv(&self) -> String {
        codec::to_csv(&self.ring)
    }

    /// Decode and commit. On failure the ring and history are untouched.
    pub fn import(&mut self, format: Format, text: &str) -> Result<EditOutcome, CodecError> {
        match format.decode(text) {
            Ok(ring) => Ok(self.commit_ring(&ring)),
            Err(e) => {
                warn!(format = format.extension(), error = %e, "import failed");
                Err(e)
            }
        }
    }

    pub fn import_geojson(&mut self, text: &str) -> Result<EditOutcome, CodecError> {
        self.import(Format::GeoJson, text)
    }

    pub fn import_wkt(&mut self, text: &str) -> Result<EditOutcome, CodecError> {
        self.import(Format::Wkt, text)
    }

    pub fn import_csv(&mut self, text: &str) -> Result<EditOutcome, CodecError> {
        self.import(Format::Csv, text)
    }
}

#[cfg(test)]
mod tests;
