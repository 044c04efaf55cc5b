//! The bead placement engine.
//!
//! Every entry point borrows the current collection and returns the next one,
//! so callers own the document and can keep the previous value for undo.
//! Geometry is computed once per mutation; nothing here is tied to a redraw.

pub mod capacity;
pub mod geometry;
pub mod occupancy;
pub mod placement;
pub mod relayout;


use crate::types::Bead;
use std::cmp::Ordering;

pub use capacity::{quota_status, used_quota, QuotaStatus};
pub use geometry::{angular_half_span, arc_length, circular_distance, max_quota, normalize_angle};
pub use occupancy::is_occupied;
pub use placement::{place, remove_bead};
pub use relayout::relayout;

/// Puts a collection in canonical order: bracelet beads by angle (draw
/// order), then waiting beads by slot.
pub fn sort_canonical(beads: &mut [Bead]) {
    beads.sort_by(|a, b| match (a.on_bracelet(), b.on_bracelet()) {
        (true, true) => a.angle.total_cmp(&b.angle),
        (false, false) => a.ordinal.cmp(&b.ordinal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    });
}
