//! Command-line host for the placement engine.
//!
//! Each invocation loads a design file, applies one command and writes the
//! result back, the way an editor host owns the document between events.
//! The snapshot carries no bracelet size, so the host keeps it in a layout
//! file beside the snapshot (`design.json` gets `design.layout.json`).

use crate::catalog::Catalog;
use crate::codec;
use crate::config::EngineConfig;
use crate::document::Design;
use crate::store::{DesignStore, DirectoryStore};
use crate::types::{BeadId, BraceletSize, DropRequest, DropTarget, NewBead};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Design bead bracelets from the command line.
#[derive(Debug, Parser)]
#[command(name = "bracelet", version, about)]
pub struct Cli {
    /// Snapshot file holding the design being edited
    #[arg(long, short, default_value = "bracelet.json", env = "BRACELET_FILE")]
    pub file: PathBuf,

    /// Bracelet size to lay the design out for; defaults to the size it was
    /// last laid out for (M for a new design). A different size repacks it.
    #[arg(long, short)]
    pub size: Option<BraceletSize>,

    /// Engine config file (JSON); defaults are used when absent
    #[arg(long, env = "BRACELET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the design.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the beads and quota usage
    Show,
    /// Drop a new bead onto the bracelet
    Place {
        #[command(flatten)]
        bead: BeadSource,
        /// Angle (radians) the bead was dropped at
        #[arg(long, allow_hyphen_values = true)]
        angle: f64,
    },
    /// Drop a new bead into the waiting area
    Wait {
        #[command(flatten)]
        bead: BeadSource,
        /// Waiting slot the bead was dropped on
        #[arg(long, default_value_t = 0)]
        slot: u32,
    },
    /// Move an existing bead
    Move {
        /// Bead to move
        id: String,
        /// New angle on the bracelet
        #[arg(long, allow_hyphen_values = true, conflicts_with = "slot")]
        angle: Option<f64>,
        /// New waiting slot
        #[arg(long)]
        slot: Option<u32>,
    },
    /// Remove a bead
    Remove {
        /// Bead to remove
        id: String,
    },
    /// Switch bracelet size and repack
    Resize {
        /// New size
        to: BraceletSize,
    },
    /// List catalog beads that fit the bracelet
    Catalog {
        /// Only this material
        #[arg(long)]
        material: Option<String>,
    },
    /// Print the snapshot text for sharing
    Share,
    /// Save the design into a store directory
    Save {
        /// Store directory
        #[arg(long, default_value = "designs")]
        store: PathBuf,
        /// Display name
        name: String,
    },
    /// Replace the design with one from a store directory
    Load {
        /// Store directory
        #[arg(long, default_value = "designs")]
        store: PathBuf,
        /// Id printed by `save` or `list`
        id: String,
    },
    /// List designs in a store directory
    List {
        /// Store directory
        #[arg(long, default_value = "designs")]
        store: PathBuf,
    },
}

/// Where a new bead comes from: a catalog sku or explicit measurements.
#[derive(Debug, Args)]
pub struct BeadSource {
    /// Catalog sku
    #[arg(long, conflicts_with = "diameter")]
    pub sku: Option<String>,
    /// Diameter in millimetres
    #[arg(long)]
    pub diameter: Option<f64>,
    /// Tint when no sku is given
    #[arg(long, default_value = "#ff00ff")]
    pub color: String,
}

impl BeadSource {
    fn resolve(&self, catalog: &Catalog) -> Result<NewBead> {
        match (&self.sku, self.diameter) {
            (Some(sku), _) => Ok(catalog
                .get(sku)
                .with_context(|| format!("no catalog bead with sku {}", sku))?
                .to_new_bead()),
            (None, Some(diameter_mm)) => Ok(NewBead {
                id: BeadId::generate(),
                diameter_mm,
                color: self.color.clone(),
                name: None,
                sku: None,
                image: None,
            }),
            (None, None) => bail!("give either --sku or --diameter"),
        }
    }
}

/// Parses the command line and runs it.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Runs an already-parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let catalog = Catalog::sample();
    let mut design = open_design(&cli.file, cli.size, config)?;

    match cli.command {
        Command::Show => print_design(&design, &catalog)?,
        Command::Place { bead, angle } => {
            let bead = bead.resolve(&catalog)?;
            let id = bead.id.clone();
            design.drop_bead(&DropRequest::New {
                bead,
                target: DropTarget::Bracelet { angle },
            })?;
            println!("placed {}", id);
        }
        Command::Wait { bead, slot } => {
            let bead = bead.resolve(&catalog)?;
            let id = bead.id.clone();
            design.drop_bead(&DropRequest::New {
                bead,
                target: DropTarget::Waiting { slot },
            })?;
            println!("parked {}", id);
        }
        Command::Move { id, angle, slot } => {
            let target = match (angle, slot) {
                (Some(angle), _) => DropTarget::Bracelet { angle },
                (None, Some(slot)) => DropTarget::Waiting { slot },
                (None, None) => bail!("give either --angle or --slot"),
            };
            design.drop_bead(&DropRequest::Relocate {
                id: BeadId::from(id),
                target,
            })?;
        }
        Command::Remove { id } => design.remove(&BeadId::from(id))?,
        Command::Resize { to } => {
            design.set_size(to)?;
            let status = design.quota()?;
            if status.over_quota {
                println!(
                    "warning: {:.1} mm of beads on a {:.1} mm bracelet",
                    status.used_mm, status.max_mm
                );
            }
            println!("resized to {}", to);
        }
        Command::Catalog { material } => {
            let track = design.track();
            for template in catalog.compatible_with(&track) {
                if material.as_deref().map_or(true, |m| template.material.eq_ignore_ascii_case(m)) {
                    println!(
                        "{:<4} {:<18} {:<9} {:>5.1} mm  {:>6.2}",
                        template.sku, template.name, template.material, template.diameter_mm, template.price
                    );
                }
            }
        }
        Command::Share => println!("{}", design.encode()?),
        Command::Save { store, name } => {
            let mut store = DirectoryStore::open(store)?;
            let id = store.save(&name, &design.encode()?)?;
            println!("{}", id);
        }
        Command::Load { store, id } => {
            let store = DirectoryStore::open(store)?;
            design.load_snapshot(&store.load(&id)?)?;
        }
        Command::List { store } => {
            let store = DirectoryStore::open(store)?;
            for summary in store.list()? {
                println!("{}  {}", summary.id, summary.name);
            }
        }
    }

    if design.has_unsaved_changes() {
        write_design(&cli.file, &design)?;
    }
    Ok(())
}

/// Host settings stored beside the snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct Layout {
    size: BraceletSize,
}

fn layout_path(path: &Path) -> PathBuf {
    path.with_extension("layout.json")
}

fn read_layout(path: &Path) -> Result<Option<BraceletSize>> {
    let layout_path = layout_path(path);
    if !layout_path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&layout_path)
        .with_context(|| format!("failed to read {}", layout_path.display()))?;
    let layout: Layout =
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", layout_path.display()))?;
    Ok(Some(layout.size))
}

fn open_design(path: &Path, requested: Option<BraceletSize>, config: EngineConfig) -> Result<Design> {
    let stored = read_layout(path)?;
    if !path.exists() {
        log::info!("{} does not exist yet, starting an empty design", path.display());
        return Ok(Design::new(requested.or(stored).unwrap_or_default(), config));
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let beads = codec::decode(&text).with_context(|| format!("failed to load {}", path.display()))?;
    codec::check_waiting_slots(&beads, config.waiting_slot_capacity)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let mut design = Design::with_beads(beads, stored.unwrap_or_default(), config);
    if let Some(size) = requested.filter(|s| *s != design.size()) {
        log::info!("relaying out {} from {} to {}", path.display(), design.size(), size);
        design.set_size(size)?;
    }
    Ok(design)
}

fn write_design(path: &Path, design: &Design) -> Result<()> {
    std::fs::write(path, design.encode()?).with_context(|| format!("failed to write {}", path.display()))?;
    let layout_path = layout_path(path);
    let layout = serde_json::to_string_pretty(&Layout { size: design.size() })?;
    std::fs::write(&layout_path, layout).with_context(|| format!("failed to write {}", layout_path.display()))?;
    log::info!("wrote {} beads to {}", design.beads().len(), path.display());
    Ok(())
}

fn print_design(design: &Design, catalog: &Catalog) -> Result<()> {
    let status = design.quota()?;
    println!(
        "bracelet {}: {:.2} / {:.2} mm used, {:.0} mm left{}",
        design.size(),
        status.used_mm,
        status.max_mm,
        status.remaining_mm,
        if status.over_quota { " (over quota)" } else { "" }
    );
    for bead in design.beads() {
        let place = if bead.on_bracelet() {
            format!("angle {:.4}", bead.angle)
        } else {
            format!("waiting slot {}", bead.ordinal)
        };
        println!(
            "  {:<34} {:>5.1} mm  #{:<3} {}  {}",
            bead.id,
            bead.diameter_mm,
            bead.ordinal,
            place,
            bead.name.as_deref().unwrap_or(&bead.color)
        );
    }
    println!("price: {:.2}", catalog.price_of(design.beads()));
    Ok(())
}
