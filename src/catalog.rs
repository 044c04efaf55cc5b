//! The bead catalog customers drag new beads from.
//!
//! Ships with a small built-in sample range and supports the filters the
//! configurator offers: by material and by whether a bead fits the chosen
//! bracelet at all.

use crate::engine::geometry::angular_half_span;
use crate::types::{Bead, BeadId, NewBead, Track};
use serde::{Deserialize, Serialize};

/// A catalog entry a bead can be created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadTemplate {
    /// Stable catalog key
    pub sku: String,
    /// Human-friendly display name
    pub name: String,
    /// Stone or material family
    pub material: String,
    /// Diameter in millimetres
    pub diameter_mm: f64,
    /// Unit price
    pub price: f64,
    /// Placeholder tint
    pub color: String,
    /// Texture reference, if any
    #[serde(default)]
    pub image: Option<String>,
}

impl BeadTemplate {
    /// Payload for a new bead made from this template, with a fresh id.
    pub fn to_new_bead(&self) -> NewBead {
        NewBead {
            id: BeadId::generate(),
            diameter_mm: self.diameter_mm,
            color: self.color.clone(),
            name: Some(self.name.clone()),
            sku: Some(self.sku.clone()),
            image: self.image.clone(),
        }
    }

    /// Returns true if the bead can sit on `track` at all.
    pub fn fits(&self, track: &Track) -> bool {
        angular_half_span(self.diameter_mm, track.radius_mm).is_ok()
    }
}

/// A list of bead templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// All entries, in display order
    pub templates: Vec<BeadTemplate>,
}

impl Catalog {
    /// The built-in sample range.
    pub fn sample() -> Self {
        let entry = |sku: &str, name: &str, material: &str, diameter_mm: f64, price: f64, color: &str| BeadTemplate {
            sku: sku.to_string(),
            name: name.to_string(),
            material: material.to_string(),
            diameter_mm,
            price,
            color: color.to_string(),
            image: None,
        };
        Self {
            templates: vec![
                entry("b1", "Jade Round", "Jade", 10.0, 38.0, "#7bb77a"),
                entry("b2", "Rose Quartz", "Quartz", 12.0, 45.0, "#f4b6c2"),
                entry("b3", "Obsidian", "Obsidian", 8.0, 22.0, "#222"),
                entry("b4", "Tiger's Eye", "Quartz", 10.0, 32.0, "#a46a2b"),
                entry("b5", "Amethyst", "Quartz", 10.0, 40.0, "#8a6bbf"),
                entry("b6", "White Agate", "Agate", 12.0, 36.0, "#eaeaea"),
                entry("b7", "Amber", "Amber", 8.0, 28.0, "#f2a65a"),
                entry("b8", "Pearl (Cultured)", "Pearl", 9.0, 55.0, "#f5f5f7"),
            ],
        }
    }

    /// Looks up a template by sku.
    pub fn get(&self, sku: &str) -> Option<&BeadTemplate> {
        self.templates.iter().find(|t| t.sku == sku)
    }

    /// Templates of one material, compared case-insensitively.
    pub fn by_material<'a>(&'a self, material: &'a str) -> impl Iterator<Item = &'a BeadTemplate> + 'a {
        self.templates
            .iter()
            .filter(move |t| t.material.eq_ignore_ascii_case(material))
    }

    /// Templates that can physically sit on `track`.
    pub fn compatible_with<'a>(&'a self, track: &'a Track) -> impl Iterator<Item = &'a BeadTemplate> + 'a {
        self.templates.iter().filter(move |t| t.fits(track))
    }

    /// Total price of the beads on the bracelet. Beads with no matching sku are not priced.
    pub fn price_of(&self, beads: &[Bead]) -> f64 {
        beads
            .iter()
            .filter(|b| b.on_bracelet())
            .filter_map(|b| b.sku.as_deref().and_then(|sku| self.get(sku)))
            .map(|t| t.price)
            .sum()
    }
}
