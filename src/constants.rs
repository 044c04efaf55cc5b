//! Shared engine-wide constants.
//! Centralizes the tweakable defaults that seed [`crate::EngineConfig`].

use std::f64::consts::FRAC_PI_2;

// Track
/// Thickness of the ring artwork, in millimetres. Subtracted from the bracelet
/// diameter to find the centreline the beads sit on.
pub const RING_THICKNESS_MM: f64 = 6.0;
/// Bracelet diameter for the S size, in millimetres.
pub const SMALL_DIAMETER_MM: f64 = 55.0;
/// Bracelet diameter for the M size, in millimetres.
pub const MEDIUM_DIAMETER_MM: f64 = 70.0;
/// Bracelet diameter for the L size, in millimetres.
pub const LARGE_DIAMETER_MM: f64 = 80.0;

// Capacity
/// Arc length (mm) a bracelet may run over its nominal quota before placements are refused.
pub const CAPACITY_TOLERANCE_MM: f64 = 1.0;
/// Angular slack (radians) forgiven when two beads sit exactly tangent.
pub const OCCUPANCY_SLACK_RAD: f64 = 1e-9;

// Waiting area
/// Number of linear slots in the waiting area.
pub const WAITING_SLOT_CAPACITY: u32 = 24;

// Relayout
/// Angle the sequential relayout starts from: the top of the circle.
pub const RELAYOUT_START_ANGLE: f64 = -FRAC_PI_2;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;
