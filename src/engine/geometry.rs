//! Angular geometry of beads on a circular track.
//!
//! All angles are radians. A bead of diameter `d` centred on a track of radius
//! `r` covers the chord of length `d`, which subtends `2 * asin(d / 2r)` at the
//! centre. That angle, not the diameter, is what beads spend of the circle.

use crate::error::PlacementError;
use std::f64::consts::{PI, TAU};

/// Reduces any angle into `[0, 2π)`, folding negative values forward.
pub fn normalize_angle(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if reduced >= TAU {
        0.0
    } else {
        reduced
    }
}

/// Half of the angle a bead subtends at the track centre.
///
/// Fails with [`PlacementError::InvalidBeadSize`] if the bead is not positive
/// or is wider than the track itself.
pub fn angular_half_span(diameter_mm: f64, track_radius_mm: f64) -> Result<f64, PlacementError> {
    let half = diameter_mm / 2.0;
    if !(diameter_mm > 0.0) || !(track_radius_mm > 0.0) || half > track_radius_mm {
        return Err(PlacementError::InvalidBeadSize {
            diameter_mm,
            track_radius_mm,
        });
    }
    Ok((half / track_radius_mm).asin())
}

/// Arc length along the centreline consumed by a bead.
///
/// Close to the diameter for small beads, growing faster as the bead
/// approaches the track's own diameter.
pub fn arc_length(diameter_mm: f64, track_radius_mm: f64) -> Result<f64, PlacementError> {
    Ok(2.0 * angular_half_span(diameter_mm, track_radius_mm)? * track_radius_mm)
}

/// Total arc available on a track: its centreline circumference.
pub fn max_quota(track_radius_mm: f64) -> f64 {
    TAU * track_radius_mm
}

/// Shortest distance around the circle between two angles, in `[0, π]`.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let delta = (normalize_angle(a) - normalize_angle(b)).abs();
    delta.min(TAU - delta)
}

/// Which neighbour slot of an anchor a drop should fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Decreasing angle
    Left,
    /// Increasing angle
    Right,
}

/// Picks the side of `anchor` that `requested` lies on.
///
/// Uses the raw signed difference of the normalized angles: a difference in
/// `(0, π)` or below `-π` is to the right, anything else to the left.
pub fn side_of(anchor: f64, requested: f64) -> Side {
    let diff = normalize_angle(requested) - normalize_angle(anchor);
    if (diff > 0.0 && diff < PI) || diff < -PI {
        Side::Right
    } else {
        Side::Left
    }
}
