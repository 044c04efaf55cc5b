//! Engine configuration.
//!
//! The tolerances used by the placement engine are tunables rather than
//! precision guarantees, so they live here instead of being baked into the
//! geometry code. Every field has a default; a config file only needs to name
//! the values it overrides.

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::BraceletSize;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bracelet diameters in millimetres, one per size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeTable {
    /// Diameter of the S bracelet
    pub small_mm: f64,
    /// Diameter of the M bracelet
    pub medium_mm: f64,
    /// Diameter of the L bracelet
    pub large_mm: f64,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            small_mm: SMALL_DIAMETER_MM,
            medium_mm: MEDIUM_DIAMETER_MM,
            large_mm: LARGE_DIAMETER_MM,
        }
    }
}

/// Tunables for placement, relayout and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ring thickness subtracted from the bracelet diameter
    pub ring_thickness_mm: f64,
    /// How far (mm) the used arc may exceed the quota
    pub capacity_tolerance_mm: f64,
    /// Numerical slack forgiven at exact tangency
    pub occupancy_slack_rad: f64,
    /// Number of waiting-area slots
    pub waiting_slot_capacity: u32,
    /// Angle the relayout walk starts from
    pub relayout_start_angle: f64,
    /// Maximum retained undo entries
    pub max_history: usize,
    /// Bracelet diameters per size
    pub sizes: SizeTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ring_thickness_mm: RING_THICKNESS_MM,
            capacity_tolerance_mm: CAPACITY_TOLERANCE_MM,
            occupancy_slack_rad: OCCUPANCY_SLACK_RAD,
            waiting_slot_capacity: WAITING_SLOT_CAPACITY,
            relayout_start_angle: RELAYOUT_START_ANGLE,
            max_history: MAX_UNDO_HISTORY,
            sizes: SizeTable::default(),
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ring_thickness_mm >= 0.0) {
            return Err(ConfigError::Invalid("ring_thickness_mm"));
        }
        if !(self.capacity_tolerance_mm >= 0.0) {
            return Err(ConfigError::Invalid("capacity_tolerance_mm"));
        }
        if !(self.occupancy_slack_rad >= 0.0) {
            return Err(ConfigError::Invalid("occupancy_slack_rad"));
        }
        if !self.relayout_start_angle.is_finite() {
            return Err(ConfigError::Invalid("relayout_start_angle"));
        }
        for size in BraceletSize::ALL {
            if !(self.diameter_for(size) > self.ring_thickness_mm) {
                return Err(ConfigError::Invalid("sizes"));
            }
        }
        Ok(())
    }

    /// Bracelet diameter for a size.
    pub fn diameter_for(&self, size: BraceletSize) -> f64 {
        match size {
            BraceletSize::S => self.sizes.small_mm,
            BraceletSize::M => self.sizes.medium_mm,
            BraceletSize::L => self.sizes.large_mm,
        }
    }
}
