//! Re-deriving bracelet angles after the track size changes.

use super::geometry::{angular_half_span, normalize_angle};
use super::sort_canonical;
use crate::error::PlacementError;
use crate::types::{Bead, Track};
use log::debug;

/// Packs every bracelet bead edge to edge, in ordinal order, starting at `start_angle`.
///
/// Only angles change; ordinals and membership are kept. Quota is not
/// checked, so a shrink may leave the bracelet over quota, which callers
/// should report rather than treat as a failure. Beads sharing an ordinal
/// are ordered by id so repeated relayouts agree.
pub fn relayout(beads: &[Bead], track: &Track, start_angle: f64) -> Result<Vec<Bead>, PlacementError> {
    let mut result = beads.to_vec();
    let mut order: Vec<usize> = (0..result.len()).filter(|&i| result[i].on_bracelet()).collect();
    order.sort_by(|&a, &b| {
        result[a]
            .ordinal
            .cmp(&result[b].ordinal)
            .then_with(|| result[a].id.cmp(&result[b].id))
    });

    let mut current = start_angle;
    for index in order {
        let half = angular_half_span(result[index].diameter_mm, track.radius_mm)?;
        result[index].angle = normalize_angle(current + half);
        current += 2.0 * half;
    }

    debug!("relayout on r={:.2}mm placed beads through {:.4} rad", track.radius_mm, current);
    sort_canonical(&mut result);
    Ok(result)
}
