//! # Bracelet Designer
//!
//! The placement engine behind a bead bracelet configurator. Beads of varying
//! diameter are placed around a circular track without overlapping and within
//! the track's arc-length quota, or parked in a linear waiting area.
//!
//! ## Features
//! - Snap-to-neighbour placement with left/right side selection
//! - Capacity accounting against the track circumference
//! - Sequential relayout when the bracelet size changes
//! - Snapshot undo/redo history
//! - Lossless JSON snapshots for save, load and share
//!
//! Rendering, asset loading and network persistence belong to the host; the
//! engine only consumes and produces bead collections.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod document;
pub mod engine;
pub mod error;
pub mod history;
pub mod store;
mod types;

// Re-export public types and functions
pub use catalog::{BeadTemplate, Catalog};
pub use config::{EngineConfig, SizeTable};
pub use document::Design;
pub use engine::{place, quota_status, relayout, remove_bead, QuotaStatus};
pub use error::{ConfigError, ParseError, PlacementError, StoreError};
pub use history::UndoHistory;
pub use store::{DesignStore, DesignSummary, DirectoryStore, MemoryStore};
pub use types::*;

/// Runs the command-line designer.
///
/// # Example
///
/// ```no_run
/// fn main() -> anyhow::Result<()> {
///     bracelet_designer::run_cli()
/// }
/// ```
pub fn run_cli() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_default() {
        let design = Design::default();
        assert!(design.beads().is_empty());
        assert_eq!(design.size(), BraceletSize::M);
        assert!(!design.can_undo());
    }

    #[test]
    fn test_snapshot_of_empty_design() {
        let design = Design::default();
        assert_eq!(design.encode().unwrap(), "[]");
    }
}
