//! Core data types and structures for the bracelet designer.
//!
//! This module defines the fundamental data structures used throughout the engine,
//! including beads, their locations, drop requests and the track they sit on.

use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique, stable identifier for a bead. Never reused once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeadId(String);

impl BeadId {
    /// Generates a fresh id for a bead created from a template.
    pub fn generate() -> Self {
        Self(format!("b{}", Uuid::new_v4().simple()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for BeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BeadId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where a bead currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// On the circular track; `angle` is meaningful.
    Bracelet,
    /// In the linear staging area; `ordinal` is the slot index.
    Waiting,
}

/// A placed or stored bead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Bead {
    /// Unique identifier for this bead
    pub id: BeadId,
    /// Relayout sort key on the bracelet, slot index in the waiting area
    pub ordinal: u32,
    /// Physical diameter; fixed for the bead's lifetime
    #[serde(rename = "diameterMM")]
    pub diameter_mm: f64,
    /// Fallback tint used when no image is set
    pub color: String,
    /// Display name carried over from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Catalog entry this bead was made from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Opaque texture reference, never resolved by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Centre angle on the track in `[0, 2π)`; zero while waiting
    pub angle: f64,
    /// Local angle where the thread enters the bead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_angle: Option<f64>,
    /// Local angle where the thread leaves the bead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_angle: Option<f64>,
    /// Bracelet or waiting area
    pub location: Location,
    /// Local spin of the texture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Bead {
    /// Creates a bead from a new-bead drop payload.
    ///
    /// # Arguments
    ///
    /// * `new` - The payload carried by the drop
    /// * `location` - Where the bead is being put
    /// * `angle` - Resolved track angle (ignored for the waiting area)
    /// * `ordinal` - Relayout key or waiting slot
    ///
    /// # Returns
    ///
    /// A bead with no cosmetic thread or rotation state.
    pub fn from_new(new: &NewBead, location: Location, angle: f64, ordinal: u32) -> Self {
        Self {
            id: new.id.clone(),
            ordinal,
            diameter_mm: new.diameter_mm,
            color: new.color.clone(),
            name: new.name.clone(),
            sku: new.sku.clone(),
            image: new.image.clone(),
            angle: if location == Location::Bracelet { angle } else { 0.0 },
            entry_angle: None,
            exit_angle: None,
            location,
            rotation: None,
        }
    }

    /// Returns true if the bead sits on the bracelet.
    pub fn on_bracelet(&self) -> bool {
        self.location == Location::Bracelet
    }

    /// Returns true if the bead sits in the waiting area.
    pub fn waiting(&self) -> bool {
        self.location == Location::Waiting
    }
}

/// Payload for a bead that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBead {
    /// Id the bead will carry; must not already be in the collection
    pub id: BeadId,
    /// Bead diameter in millimetres
    pub diameter_mm: f64,
    /// Fallback tint
    pub color: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Catalog entry
    #[serde(default)]
    pub sku: Option<String>,
    /// Texture reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Where a drop landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DropTarget {
    /// Somewhere on the bracelet; the angle is where the cursor was released
    Bracelet {
        /// Requested angle in radians, any range
        angle: f64,
    },
    /// A slot of the waiting area
    Waiting {
        /// Requested slot index
        slot: u32,
    },
}

/// A drop on the design surface. Exactly one of two shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DropRequest {
    /// A bead dragged in from the catalog
    New {
        /// The bead to create
        bead: NewBead,
        /// Where it was dropped
        target: DropTarget,
    },
    /// An existing bead picked up and dropped again
    Relocate {
        /// Bead being moved
        id: BeadId,
        /// Where it was dropped
        target: DropTarget,
    },
}

impl DropRequest {
    /// The drop target, whichever shape the request has.
    pub fn target(&self) -> DropTarget {
        match self {
            DropRequest::New { target, .. } | DropRequest::Relocate { target, .. } => *target,
        }
    }
}

/// The enumerated bracelet sizes offered to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BraceletSize {
    /// Small
    S,
    /// Medium
    #[default]
    M,
    /// Large
    L,
}

impl BraceletSize {
    /// All sizes, smallest first.
    pub const ALL: [BraceletSize; 3] = [BraceletSize::S, BraceletSize::M, BraceletSize::L];
}

impl fmt::Display for BraceletSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BraceletSize::S => "S",
            BraceletSize::M => "M",
            BraceletSize::L => "L",
        };
        f.pad(label)
    }
}

impl std::str::FromStr for BraceletSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(BraceletSize::S),
            "M" => Ok(BraceletSize::M),
            "L" => Ok(BraceletSize::L),
            other => Err(format!("unknown bracelet size '{}', expected S, M or L", other)),
        }
    }
}

/// The circular centreline beads sit on. Derived from the bracelet size, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Outer bracelet diameter
    pub bracelet_diameter_mm: f64,
    /// Thickness of the ring
    pub ring_thickness_mm: f64,
    /// `(bracelet_diameter_mm - ring_thickness_mm) / 2`
    pub radius_mm: f64,
}

impl Track {
    /// Derives the track for a bracelet size using the configured size table.
    pub fn new(size: BraceletSize, config: &EngineConfig) -> Self {
        Self::from_diameter(config.diameter_for(size), config.ring_thickness_mm)
    }

    /// Derives a track from raw measurements.
    pub fn from_diameter(bracelet_diameter_mm: f64, ring_thickness_mm: f64) -> Self {
        Self {
            bracelet_diameter_mm,
            ring_thickness_mm,
            radius_mm: (bracelet_diameter_mm - ring_thickness_mm) / 2.0,
        }
    }
}
