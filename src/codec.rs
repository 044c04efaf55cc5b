//! Snapshot encoding of a bead collection.
//!
//! A snapshot is a pretty-printed JSON array of bead records, every field of
//! every bead included. Save-to-file, load-from-file and share-to-clipboard
//! all go through [`encode`] / [`decode`]; only the sink differs.
//!
//! Records carrying fields the engine does not know are rejected.

use crate::engine::geometry::normalize_angle;
use crate::error::ParseError;
use crate::types::Bead;
use std::collections::HashSet;

/// Serializes a bead collection to its snapshot text.
///
/// Fails only for non-finite numbers, which no valid collection holds.
pub fn encode(beads: &[Bead]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(beads)
}

/// Parses and validates snapshot text.
///
/// Nothing is mutated on failure; the caller keeps its previous collection.
pub fn decode(text: &str) -> Result<Vec<Bead>, ParseError> {
    let beads: Vec<Bead> = serde_json::from_str(text)?;
    validate(&beads)?;
    Ok(beads)
}

/// Checks the collection invariants a snapshot must satisfy.
pub fn validate(beads: &[Bead]) -> Result<(), ParseError> {
    let mut ids = HashSet::new();
    let mut slots = HashSet::new();
    for bead in beads {
        if !ids.insert(&bead.id) {
            return Err(ParseError::DuplicateIdentity(bead.id.clone()));
        }
        if !bead.diameter_mm.is_finite() || bead.diameter_mm <= 0.0 {
            return Err(invalid(bead, "diameterMM"));
        }
        if bead.on_bracelet() && normalize_angle(bead.angle) != bead.angle {
            return Err(invalid(bead, "angle"));
        }
        let cosmetic = [
            ("entryAngle", bead.entry_angle),
            ("exitAngle", bead.exit_angle),
            ("rotation", bead.rotation),
        ];
        for (field, value) in cosmetic {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(invalid(bead, field));
            }
        }
        if bead.waiting() && !slots.insert(bead.ordinal) {
            return Err(ParseError::DuplicateWaitingSlot(bead.ordinal));
        }
    }
    Ok(())
}

/// Checks that every waiting bead sits inside a waiting area of `capacity`
/// slots.
///
/// Kept apart from [`validate`] because the slot count is engine
/// configuration, not part of the snapshot.
pub fn check_waiting_slots(beads: &[Bead], capacity: u32) -> Result<(), ParseError> {
    match beads.iter().find(|b| b.waiting() && b.ordinal >= capacity) {
        Some(bead) => Err(ParseError::WaitingSlotOutOfRange {
            slot: bead.ordinal,
            capacity,
        }),
        None => Ok(()),
    }
}

fn invalid(bead: &Bead, field: &'static str) -> ParseError {
    ParseError::InvalidField {
        id: bead.id.clone(),
        field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BeadId, Location};

    fn bead(id: &str, location: Location, ordinal: u32, angle: f64) -> Bead {
        Bead {
            id: BeadId::from(id),
            ordinal,
            diameter_mm: 8.0,
            color: "#222".to_string(),
            name: None,
            sku: None,
            image: None,
            angle,
            entry_angle: None,
            exit_angle: None,
            location,
            rotation: None,
        }
    }

    #[test]
    fn test_record_field_names() {
        let mut b = bead("a", Location::Bracelet, 0, 1.5);
        b.entry_angle = Some(0.25);
        let text = encode(&[b]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let record = &value[0];
        assert_eq!(record["diameterMM"], 8.0);
        assert_eq!(record["location"], "bracelet");
        assert_eq!(record["entryAngle"], 0.25);
        assert!(record.get("exitAngle").is_none());
        assert!(record.get("image").is_none());
    }

    #[test]
    fn test_round_trip_keeps_awkward_floats() {
        let mut b = bead("a", Location::Bracelet, 0, 0.1 + 0.2);
        b.rotation = Some(std::f64::consts::PI / 7.0);
        let beads = vec![b, bead("w", Location::Waiting, 3, 0.0)];
        assert_eq!(decode(&encode(&beads).unwrap()).unwrap(), beads);
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(decode("{not json"), Err(ParseError::Json(_))));
        assert!(matches!(decode(r#"{"id": "a"}"#), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = r##"[{"id":"a","ordinal":0,"diameterMM":8,"color":"#222","angle":0,"location":"bracelet","price":3}]"##;
        assert!(matches!(decode(text), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_missing_optionals_accepted() {
        let text = r##"[{"id":"a","ordinal":0,"diameterMM":8,"color":"#222","angle":0.5,"location":"bracelet"}]"##;
        let beads = decode(text).unwrap();
        assert_eq!(beads[0].angle, 0.5);
        assert!(beads[0].rotation.is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let beads = vec![
            bead("a", Location::Bracelet, 0, 0.0),
            bead("a", Location::Waiting, 1, 0.0),
        ];
        let text = encode(&beads).unwrap();
        assert!(matches!(decode(&text), Err(ParseError::DuplicateIdentity(_))));
    }

    #[test]
    fn test_duplicate_waiting_slot_rejected() {
        let beads = vec![
            bead("a", Location::Waiting, 1, 0.0),
            bead("b", Location::Waiting, 1, 0.0),
        ];
        let text = encode(&beads).unwrap();
        assert!(matches!(decode(&text), Err(ParseError::DuplicateWaitingSlot(1))));
    }

    #[test]
    fn test_out_of_range_angle_rejected() {
        let text = encode(&[bead("a", Location::Bracelet, 0, 7.0)]).unwrap();
        assert!(matches!(
            decode(&text),
            Err(ParseError::InvalidField { field: "angle", .. })
        ));
    }

    #[test]
    fn test_waiting_slots_bounded_by_capacity() {
        let beads = vec![
            bead("a", Location::Waiting, 23, 0.0),
            bead("b", Location::Bracelet, 900, 1.0),
        ];
        assert!(check_waiting_slots(&beads, 24).is_ok());
        assert!(matches!(
            check_waiting_slots(&beads, 23),
            Err(ParseError::WaitingSlotOutOfRange { slot: 23, capacity: 23 })
        ));
    }

    #[test]
    fn test_non_positive_diameter_rejected() {
        let mut b = bead("a", Location::Waiting, 0, 0.0);
        b.diameter_mm = 0.0;
        let text = encode(&[b]).unwrap();
        assert!(matches!(
            decode(&text),
            Err(ParseError::InvalidField { field: "diameterMM", .. })
        ));
    }
}
