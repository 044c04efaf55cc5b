//! Overlap test for a candidate bead position.

use super::geometry::{angular_half_span, circular_distance};
use crate::error::PlacementError;
use crate::types::Bead;

/// Returns true if a bead of `diameter_mm` centred at `angle` would overlap any
/// bracelet bead in `existing`. Waiting beads are ignored.
///
/// Two beads overlap when their centres are closer (around the circle) than
/// the sum of their half-spans, less `slack` so exact tangency is allowed.
pub fn is_occupied(
    existing: &[Bead],
    angle: f64,
    diameter_mm: f64,
    track_radius_mm: f64,
    slack: f64,
) -> Result<bool, PlacementError> {
    let half = angular_half_span(diameter_mm, track_radius_mm)?;
    for bead in existing.iter().filter(|b| b.on_bracelet()) {
        let other = angular_half_span(bead.diameter_mm, track_radius_mm)?;
        if circular_distance(bead.angle, angle) < half + other - slack {
            return Ok(true);
        }
    }
    Ok(false)
}
