//! The editable bracelet design.
//!
//! [`Design`] owns the current bead collection, the selected bracelet size and
//! the undo history. User edits go through the engine and are committed to
//! history only when accepted; size changes relayout without committing.

use crate::codec;
use crate::config::EngineConfig;
use crate::engine::{self, QuotaStatus};
use crate::error::{ParseError, PlacementError};
use crate::history::UndoHistory;
use crate::types::{Bead, BeadId, BraceletSize, DropRequest, Track};
use log::{debug, info, warn};

/// One history entry: the beads and the size their angles were computed for.
#[derive(Debug, Clone, PartialEq)]
struct Arrangement {
    beads: Vec<Bead>,
    size: BraceletSize,
}

/// A bracelet being designed.
#[derive(Debug, Clone)]
pub struct Design {
    beads: Vec<Bead>,
    size: BraceletSize,
    config: EngineConfig,
    history: UndoHistory<Arrangement>,
    has_unsaved_changes: bool,
}

impl Default for Design {
    fn default() -> Self {
        Self::new(BraceletSize::default(), EngineConfig::default())
    }
}

impl Design {
    /// Creates an empty design.
    pub fn new(size: BraceletSize, config: EngineConfig) -> Self {
        let history = UndoHistory::with_limit(config.max_history);
        Self {
            beads: Vec::new(),
            size,
            config,
            history,
            has_unsaved_changes: false,
        }
    }

    /// Creates a design around an existing collection, e.g. one just decoded.
    /// The collection is taken as-is; no history is recorded.
    pub fn with_beads(beads: Vec<Bead>, size: BraceletSize, config: EngineConfig) -> Self {
        let mut design = Self::new(size, config);
        design.beads = beads;
        design
    }

    /// The current beads, bracelet first in angle order, then waiting by slot.
    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    /// Looks up a bead by id.
    pub fn bead(&self, id: &BeadId) -> Option<&Bead> {
        self.beads.iter().find(|b| &b.id == id)
    }

    /// Selected bracelet size.
    pub fn size(&self) -> BraceletSize {
        self.size
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Track for the selected size.
    pub fn track(&self) -> Track {
        Track::new(self.size, &self.config)
    }

    /// True once an edit has happened since the last save or load.
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Marks the design as saved.
    pub fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
    }

    /// True if there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if there is an edit to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Quota usage on the current track.
    pub fn quota(&self) -> Result<QuotaStatus, PlacementError> {
        engine::quota_status(&self.beads, &self.track(), self.config.capacity_tolerance_mm)
    }

    /// Applies a drop. On rejection nothing changes, and a drop that leaves
    /// every bead where it was is not recorded.
    pub fn drop_bead(&mut self, request: &DropRequest) -> Result<(), PlacementError> {
        let next = engine::place(&self.beads, request, &self.track(), &self.config)?;
        if next == self.beads {
            debug!("drop left the design unchanged");
            return Ok(());
        }
        self.commit(next);
        Ok(())
    }

    /// Removes a bead.
    pub fn remove(&mut self, id: &BeadId) -> Result<(), PlacementError> {
        let next = engine::remove_bead(&self.beads, id)?;
        self.commit(next);
        Ok(())
    }

    /// Removes every bead. A no-op on an empty design.
    pub fn clear(&mut self) {
        if !self.beads.is_empty() {
            self.commit(Vec::new());
        }
    }

    /// Switches bracelet size and repacks the bracelet.
    ///
    /// Not an undo step, though the design counts as changed. The result may be over quota on a smaller size; check
    /// [`Design::quota`] to warn the user.
    pub fn set_size(&mut self, size: BraceletSize) -> Result<(), PlacementError> {
        if size == self.size {
            return Ok(());
        }
        let track = Track::new(size, &self.config);
        self.beads = engine::relayout(&self.beads, &track, self.config.relayout_start_angle)?;
        self.size = size;
        self.has_unsaved_changes = true;
        if let Ok(status) = self.quota() {
            if status.over_quota {
                warn!(
                    "bracelet {} is over quota after resize: {:.2}mm used of {:.2}mm",
                    size, status.used_mm, status.max_mm
                );
            }
        }
        Ok(())
    }

    /// Reverts the last edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.arrangement();
        match self.history.undo(&current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Re-applies the last undone edit. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.arrangement();
        match self.history.redo(&current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Encodes the current beads for save or share.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        codec::encode(&self.beads)
    }

    /// Replaces the beads with a decoded snapshot. Undoable.
    ///
    /// Waiting beads must fit the configured waiting area. On a parse error
    /// the design is left exactly as it was.
    pub fn load_snapshot(&mut self, text: &str) -> Result<(), ParseError> {
        let beads = codec::decode(text)?;
        codec::check_waiting_slots(&beads, self.config.waiting_slot_capacity)?;
        info!("loaded snapshot with {} beads", beads.len());
        self.commit(beads);
        Ok(())
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement {
            beads: self.beads.clone(),
            size: self.size,
        }
    }

    fn commit(&mut self, next: Vec<Bead>) {
        let previous = std::mem::replace(&mut self.beads, next);
        self.history.commit(Arrangement {
            beads: previous,
            size: self.size,
        });
        self.has_unsaved_changes = true;
        info!("committed design with {} beads", self.beads.len());
    }

    /// Makes a history entry current, repacking it if it was laid out for another size.
    fn restore(&mut self, arrangement: Arrangement) {
        self.has_unsaved_changes = true;
        if arrangement.size == self.size {
            self.beads = arrangement.beads;
            return;
        }
        let track = self.track();
        match engine::relayout(&arrangement.beads, &track, self.config.relayout_start_angle) {
            Ok(beads) => self.beads = beads,
            Err(e) => {
                warn!("restored design does not fit bracelet {}: {}", self.size, e);
                self.beads = arrangement.beads;
            }
        }
    }
}
