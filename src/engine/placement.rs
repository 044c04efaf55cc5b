//! Resolving drops into bead positions.
//!
//! A drop either lands in the waiting area, where it takes the first free slot
//! at or after the one requested, or on the bracelet, where it is snapped
//! against the nearest existing bead (the anchor). Every rejection returns an
//! error and leaves the caller's collection as it was.

use super::capacity::used_quota;
use super::geometry::{angular_half_span, arc_length, circular_distance, max_quota, normalize_angle, side_of, Side};
use super::occupancy::is_occupied;
use super::sort_canonical;
use crate::config::EngineConfig;
use crate::error::PlacementError;
use crate::types::{Bead, BeadId, DropRequest, DropTarget, Location, Track};
use log::{debug, warn};

/// Applies a drop to `beads` and returns the resulting collection.
///
/// For [`DropRequest::Relocate`] the bead is lifted out of the collection
/// first, so it never collides with its own previous position and keeps its
/// identity, size and cosmetic state.
pub fn place(
    beads: &[Bead],
    request: &DropRequest,
    track: &Track,
    config: &EngineConfig,
) -> Result<Vec<Bead>, PlacementError> {
    if let DropTarget::Bracelet { angle } = request.target() {
        if !angle.is_finite() {
            return Err(PlacementError::InvalidAngle { angle });
        }
    }

    let (mut working, bead) = match request {
        DropRequest::New { bead, target } => {
            if beads.iter().any(|b| b.id == bead.id) {
                return Err(PlacementError::DuplicateIdentity(bead.id.clone()));
            }
            let location = match target {
                DropTarget::Bracelet { .. } => Location::Bracelet,
                DropTarget::Waiting { .. } => Location::Waiting,
            };
            (beads.to_vec(), Bead::from_new(bead, location, 0.0, 0))
        }
        DropRequest::Relocate { id, .. } => {
            let index = beads
                .iter()
                .position(|b| &b.id == id)
                .ok_or_else(|| PlacementError::UnknownBead(id.clone()))?;
            let mut working = beads.to_vec();
            let bead = working.remove(index);
            (working, bead)
        }
    };

    let relocating = matches!(request, DropRequest::Relocate { .. });
    let placed = match request.target() {
        DropTarget::Waiting { slot } => to_waiting(&working, bead, slot, config)?,
        DropTarget::Bracelet { angle } => to_bracelet(&working, bead, angle, relocating, track, config)?,
    };

    working.push(placed);
    sort_canonical(&mut working);
    Ok(working)
}

/// Removes a bead (dragged out or deleted).
pub fn remove_bead(beads: &[Bead], id: &BeadId) -> Result<Vec<Bead>, PlacementError> {
    if !beads.iter().any(|b| &b.id == id) {
        return Err(PlacementError::UnknownBead(id.clone()));
    }
    Ok(beads.iter().filter(|b| &b.id != id).cloned().collect())
}

fn to_waiting(working: &[Bead], mut bead: Bead, slot: u32, config: &EngineConfig) -> Result<Bead, PlacementError> {
    let taken = |s: u32| working.iter().any(|b| b.waiting() && b.ordinal == s);
    let resolved = (slot..config.waiting_slot_capacity)
        .find(|s| !taken(*s))
        .ok_or(PlacementError::WaitingAreaFull { requested: slot })?;

    debug!("bead {} -> waiting slot {} (requested {})", bead.id, resolved, slot);
    bead.location = Location::Waiting;
    bead.ordinal = resolved;
    bead.angle = 0.0;
    Ok(bead)
}

fn to_bracelet(
    working: &[Bead],
    mut bead: Bead,
    requested: f64,
    relocating: bool,
    track: &Track,
    config: &EngineConfig,
) -> Result<Bead, PlacementError> {
    let radius = track.radius_mm;
    let half = angular_half_span(bead.diameter_mm, radius)?;

    let used_mm = used_quota(working, track)?;
    let requested_mm = arc_length(bead.diameter_mm, radius)?;
    let max_mm = max_quota(radius);
    if used_mm + requested_mm > max_mm + config.capacity_tolerance_mm {
        warn!(
            "rejecting bead {}: used={:.2}mm, new={:.2}mm, max={:.2}mm",
            bead.id, used_mm, requested_mm, max_mm
        );
        return Err(PlacementError::CapacityExceeded {
            used_mm,
            requested_mm,
            max_mm,
            remaining_mm: (max_mm - used_mm).max(0.0),
        });
    }
    debug!(
        "quota on r={:.2}mm: used={:.2}mm, new={:.2}mm, max={:.2}mm",
        radius, used_mm, requested_mm, max_mm
    );

    let on_track: Vec<&Bead> = working.iter().filter(|b| b.on_bracelet()).collect();
    let anchor = on_track.iter().copied().min_by(|a, b| {
        circular_distance(a.angle, requested).total_cmp(&circular_distance(b.angle, requested))
    });

    let angle = match anchor {
        None => normalize_angle(requested),
        Some(anchor) => {
            let reach = half + angular_half_span(anchor.diameter_mm, radius)?;
            let others: Vec<Bead> = on_track
                .iter()
                .filter(|b| b.id != anchor.id)
                .map(|b| (*b).clone())
                .collect();
            let slack = config.occupancy_slack_rad;

            let left = normalize_angle(anchor.angle - reach);
            let right = normalize_angle(anchor.angle + reach);
            let left_free = !is_occupied(&others, left, bead.diameter_mm, radius, slack)?;
            let right_free = !is_occupied(&others, right, bead.diameter_mm, radius, slack)?;

            match (left_free, right_free) {
                (true, true) => match side_of(anchor.angle, requested) {
                    Side::Right => right,
                    Side::Left => left,
                },
                (true, false) => left,
                (false, true) => right,
                (false, false) => {
                    warn!("rejecting bead {}: no space next to {}", bead.id, anchor.id);
                    return Err(PlacementError::NoAdjacentSpace {
                        anchor: anchor.id.clone(),
                    });
                }
            }
        }
    };

    // a bead already on the bracelet keeps its relayout position
    let keeps_ordinal = relocating && bead.on_bracelet();
    if !keeps_ordinal {
        bead.ordinal = next_bracelet_ordinal(working).ok_or_else(|| {
            warn!("rejecting bead {}: bracelet ordinals exhausted", bead.id);
            PlacementError::OrdinalOverflow(bead.id.clone())
        })?;
    }
    debug!("bead {} -> angle {:.4} (ordinal {})", bead.id, angle, bead.ordinal);
    bead.location = Location::Bracelet;
    bead.angle = angle;
    Ok(bead)
}

/// Ordinal for a bead appended to the bracelet: one past the largest in use.
/// `None` once the largest is `u32::MAX`.
fn next_bracelet_ordinal(working: &[Bead]) -> Option<u32> {
    match working.iter().filter(|b| b.on_bracelet()).map(|b| b.ordinal).max() {
        Some(last) => last.checked_add(1),
        None => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BraceletSize, NewBead};

    fn setup() -> (Track, EngineConfig) {
        let config = EngineConfig::default();
        (Track::new(BraceletSize::M, &config), config)
    }

    fn new_bead(id: &str, diameter_mm: f64) -> NewBead {
        NewBead {
            id: BeadId::from(id),
            diameter_mm,
            color: "#8a6bbf".into(),
            name: None,
            sku: None,
            image: None,
        }
    }

    fn drop_new(beads: &[Bead], id: &str, target: DropTarget) -> Result<Vec<Bead>, PlacementError> {
        let (track, config) = setup();
        let request = DropRequest::New {
            bead: new_bead(id, 10.0),
            target,
        };
        place(beads, &request, &track, &config)
    }

    fn find<'a>(beads: &'a [Bead], id: &str) -> &'a Bead {
        beads.iter().find(|b| b.id.as_str() == id).unwrap()
    }

    #[test]
    fn test_first_bead_takes_requested_angle() {
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: -0.5 }).unwrap();
        assert_eq!(beads.len(), 1);
        assert!((beads[0].angle - normalize_angle(-0.5)).abs() < 1e-12);
        assert_eq!(beads[0].ordinal, 0);
    }

    #[test]
    fn test_left_of_anchor() {
        let (track, _) = setup();
        let h = angular_half_span(10.0, track.radius_mm).unwrap();
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 1.0 }).unwrap();
        let beads = drop_new(&beads, "b", DropTarget::Bracelet { angle: 0.95 }).unwrap();
        assert!((find(&beads, "b").angle - (1.0 - 2.0 * h)).abs() < 1e-12);
        assert_eq!(find(&beads, "b").ordinal, 1);
    }

    #[test]
    fn test_falls_back_to_free_side() {
        let (track, _) = setup();
        let h = angular_half_span(10.0, track.radius_mm).unwrap();
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 1.0 }).unwrap();
        let beads = drop_new(&beads, "b", DropTarget::Bracelet { angle: 1.05 }).unwrap();
        // right of "a" is taken by "b", so a drop right of "a" goes left
        let beads = drop_new(&beads, "c", DropTarget::Bracelet { angle: 1.001 }).unwrap();
        assert!((find(&beads, "c").angle - (1.0 - 2.0 * h)).abs() < 1e-12);
    }

    #[test]
    fn test_no_adjacent_space() {
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 1.0 }).unwrap();
        let beads = drop_new(&beads, "b", DropTarget::Bracelet { angle: 1.05 }).unwrap();
        let beads = drop_new(&beads, "c", DropTarget::Bracelet { angle: 0.95 }).unwrap();
        let err = drop_new(&beads, "d", DropTarget::Bracelet { angle: 1.0 }).unwrap_err();
        assert_eq!(err, PlacementError::NoAdjacentSpace { anchor: BeadId::from("a") });
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.0 }).unwrap();
        let err = drop_new(&beads, "a", DropTarget::Waiting { slot: 0 }).unwrap_err();
        assert_eq!(err, PlacementError::DuplicateIdentity(BeadId::from("a")));
    }

    #[test]
    fn test_oversized_bead_rejected() {
        let (track, config) = setup();
        let request = DropRequest::New {
            bead: new_bead("big", 70.0),
            target: DropTarget::Bracelet { angle: 0.0 },
        };
        let err = place(&[], &request, &track, &config).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidBeadSize { .. }));
    }

    #[test]
    fn test_waiting_slot_scans_forward() {
        let beads = drop_new(&[], "a", DropTarget::Waiting { slot: 2 }).unwrap();
        let beads = drop_new(&beads, "b", DropTarget::Waiting { slot: 2 }).unwrap();
        assert_eq!(find(&beads, "a").ordinal, 2);
        assert_eq!(find(&beads, "b").ordinal, 3);
        assert_eq!(find(&beads, "b").location, Location::Waiting);
        assert_eq!(find(&beads, "b").angle, 0.0);
    }

    #[test]
    fn test_waiting_area_full() {
        let (_, config) = setup();
        let last = config.waiting_slot_capacity - 1;
        let beads = drop_new(&[], "a", DropTarget::Waiting { slot: last }).unwrap();
        let err = drop_new(&beads, "b", DropTarget::Waiting { slot: last }).unwrap_err();
        assert_eq!(err, PlacementError::WaitingAreaFull { requested: last });
    }

    #[test]
    fn test_relocate_within_bracelet_keeps_ordinal() {
        let (track, config) = setup();
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.0 }).unwrap();
        let beads = drop_new(&beads, "b", DropTarget::Bracelet { angle: 0.1 }).unwrap();
        let request = DropRequest::Relocate {
            id: BeadId::from("a"),
            target: DropTarget::Bracelet { angle: 3.0 },
        };
        let moved = place(&beads, &request, &track, &config).unwrap();
        let a = find(&moved, "a");
        assert_eq!(a.ordinal, 0);
        assert!(a.angle > 0.5);
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn test_relocate_onto_own_position_is_idempotent() {
        let (track, config) = setup();
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.7 }).unwrap();
        let request = DropRequest::Relocate {
            id: BeadId::from("a"),
            target: DropTarget::Bracelet { angle: 0.7 },
        };
        let moved = place(&beads, &request, &track, &config).unwrap();
        assert_eq!(moved, beads);
    }

    #[test]
    fn test_relocate_from_waiting_appends_ordinal() {
        let (track, config) = setup();
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.0 }).unwrap();
        let beads = drop_new(&beads, "w", DropTarget::Waiting { slot: 5 }).unwrap();
        let request = DropRequest::Relocate {
            id: BeadId::from("w"),
            target: DropTarget::Bracelet { angle: 0.2 },
        };
        let moved = place(&beads, &request, &track, &config).unwrap();
        let w = find(&moved, "w");
        assert_eq!(w.location, Location::Bracelet);
        assert_eq!(w.ordinal, 1);
    }

    #[test]
    fn test_relocate_unknown_bead() {
        let (track, config) = setup();
        let request = DropRequest::Relocate {
            id: BeadId::from("ghost"),
            target: DropTarget::Waiting { slot: 0 },
        };
        let err = place(&[], &request, &track, &config).unwrap_err();
        assert_eq!(err, PlacementError::UnknownBead(BeadId::from("ghost")));
    }

    #[test]
    fn test_bracelet_sorted_by_angle_then_waiting() {
        let beads = drop_new(&[], "w", DropTarget::Waiting { slot: 0 }).unwrap();
        let beads = drop_new(&beads, "a", DropTarget::Bracelet { angle: 2.0 }).unwrap();
        let beads = drop_new(&beads, "b", DropTarget::Bracelet { angle: 1.9 }).unwrap();
        let ids: Vec<&str> = beads.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "w"]);
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.5 }).unwrap();
        for angle in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                drop_new(&[], "x", DropTarget::Bracelet { angle }),
                Err(PlacementError::InvalidAngle { .. })
            ));
            assert!(matches!(
                drop_new(&beads, "x", DropTarget::Bracelet { angle }),
                Err(PlacementError::InvalidAngle { .. })
            ));
        }

        let (track, config) = setup();
        let request = DropRequest::Relocate {
            id: BeadId::from("a"),
            target: DropTarget::Bracelet { angle: f64::NAN },
        };
        assert!(matches!(
            place(&beads, &request, &track, &config),
            Err(PlacementError::InvalidAngle { .. })
        ));
    }

    #[test]
    fn test_ordinal_overflow_is_an_error() {
        let mut beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.0 }).unwrap();
        beads[0].ordinal = u32::MAX;
        let err = drop_new(&beads, "b", DropTarget::Bracelet { angle: 2.0 }).unwrap_err();
        assert_eq!(err, PlacementError::OrdinalOverflow(BeadId::from("b")));

        // moving the top bead around the bracelet keeps its ordinal, so it still works
        let (track, config) = setup();
        let request = DropRequest::Relocate {
            id: BeadId::from("a"),
            target: DropTarget::Bracelet { angle: 2.0 },
        };
        let moved = place(&beads, &request, &track, &config).unwrap();
        assert_eq!(find(&moved, "a").ordinal, u32::MAX);
    }

    #[test]
    fn test_next_ordinal_after_gap() {
        let mut beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.0 }).unwrap();
        beads[0].ordinal = 41;
        let beads = drop_new(&beads, "b", DropTarget::Bracelet { angle: 2.0 }).unwrap();
        assert_eq!(find(&beads, "b").ordinal, 42);
    }

    #[test]
    fn test_remove_bead() {
        let beads = drop_new(&[], "a", DropTarget::Bracelet { angle: 0.0 }).unwrap();
        let removed = remove_bead(&beads, &BeadId::from("a")).unwrap();
        assert!(removed.is_empty());
        assert!(remove_bead(&removed, &BeadId::from("a")).is_err());
    }
}
