//! Arc-length quota accounting for the bracelet.

use super::geometry::{arc_length, max_quota};
use crate::error::PlacementError;
use crate::types::{Bead, Track};
use serde::Serialize;

/// Arc consumed by every bracelet bead on `track`.
pub fn used_quota(beads: &[Bead], track: &Track) -> Result<f64, PlacementError> {
    beads
        .iter()
        .filter(|b| b.on_bracelet())
        .map(|b| arc_length(b.diameter_mm, track.radius_mm))
        .sum()
}

/// Snapshot of how full a bracelet is, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaStatus {
    /// Arc used by bracelet beads
    pub used_mm: f64,
    /// Nominal quota
    pub max_mm: f64,
    /// Arc still free, floored at zero
    pub remaining_mm: f64,
    /// True when the used arc is beyond quota plus tolerance (possible after a resize)
    pub over_quota: bool,
}

/// Computes the quota status of `beads` on `track`.
pub fn quota_status(beads: &[Bead], track: &Track, tolerance_mm: f64) -> Result<QuotaStatus, PlacementError> {
    let used_mm = used_quota(beads, track)?;
    let max_mm = max_quota(track.radius_mm);
    Ok(QuotaStatus {
        used_mm,
        max_mm,
        remaining_mm: (max_mm - used_mm).max(0.0),
        over_quota: used_mm > max_mm + tolerance_mm,
    })
}
