//! Error types for every fallible operation in the crate.
//!
//! Each concern gets its own enum so callers can match on exactly the
//! failures an operation can produce. None of these are fatal: a rejected
//! operation always leaves the caller's bead collection untouched.

use crate::types::BeadId;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a placement, relocation, removal or relayout was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// Adding the bead would push the bracelet past its arc-length quota.
    #[error(
        "not enough space: only {remaining_mm:.0} mm of arc left \
         (used {used_mm:.2} mm + {requested_mm:.2} mm > max {max_mm:.2} mm)"
    )]
    CapacityExceeded {
        /// Arc already consumed by the bracelet.
        used_mm: f64,
        /// Arc the new bead would consume.
        requested_mm: f64,
        /// Nominal quota of the track.
        max_mm: f64,
        /// Arc still free, floored at zero.
        remaining_mm: f64,
    },
    /// Both slots next to the anchor bead are already taken.
    #[error("no free space next to bead {anchor}")]
    NoAdjacentSpace {
        /// The bead closest to the requested angle.
        anchor: BeadId,
    },
    /// The bead is too large (or not positive) for the track to hold at all.
    #[error("a {diameter_mm} mm bead cannot fit on a track of radius {track_radius_mm} mm")]
    InvalidBeadSize {
        /// Offending bead diameter.
        diameter_mm: f64,
        /// Radius of the track centreline.
        track_radius_mm: f64,
    },
    /// A new bead reused an id that is already present.
    #[error("bead id {0} is already in use")]
    DuplicateIdentity(BeadId),
    /// A relocation or removal named a bead that does not exist.
    #[error("no bead with id {0}")]
    UnknownBead(BeadId),
    /// No free waiting slot at or after the requested one.
    #[error("waiting area has no free slot at or after {requested}")]
    WaitingAreaFull {
        /// Slot the drop asked for.
        requested: u32,
    },
    /// A bracelet drop asked for an angle that is not a finite number.
    #[error("cannot place a bead at angle {angle}")]
    InvalidAngle {
        /// The requested angle.
        angle: f64,
    },
    /// The bracelet's ordinals have reached the top of their range.
    #[error("no ordinal left to append bead {0} to the bracelet")]
    OrdinalOverflow(BeadId),
}

/// Malformed snapshot input.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not a valid snapshot record.
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// Two records share an id.
    #[error("snapshot contains bead id {0} more than once")]
    DuplicateIdentity(BeadId),
    /// Two waiting beads claim the same slot.
    #[error("snapshot places more than one bead in waiting slot {0}")]
    DuplicateWaitingSlot(u32),
    /// A waiting bead sits past the last slot of the waiting area.
    #[error("waiting slot {slot} is outside the waiting area ({capacity} slots)")]
    WaitingSlotOutOfRange {
        /// Slot held by the record.
        slot: u32,
        /// Number of slots in the waiting area.
        capacity: u32,
    },
    /// A field holds a value the engine cannot accept.
    #[error("bead {id}: invalid {field}")]
    InvalidField {
        /// Bead the field belongs to.
        id: BeadId,
        /// Name of the field, as written in the record.
        field: &'static str,
    },
}

/// Failures from a [`crate::DesignStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
    /// No design with that id.
    #[error("no saved design with id {0}")]
    NotFound(String),
    /// A stored entry could not be read back.
    #[error("stored design is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures loading an [`crate::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The config path.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid JSON for [`crate::EngineConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config value for {0}")]
    Invalid(&'static str),
}
