//! Persistence collaborators for saved designs.
//!
//! The engine never calls a store itself: the host encodes a design with
//! [`crate::codec`], hands the text to [`DesignStore::save`], and later decodes
//! whatever [`DesignStore::load`] returns.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Entry in a store listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSummary {
    /// Id assigned by the store
    pub id: String,
    /// Name given when saving
    pub name: String,
}

/// Something that can keep named snapshots.
pub trait DesignStore {
    /// Saves a snapshot under a display name and returns its new id.
    fn save(&mut self, name: &str, snapshot: &str) -> Result<String, StoreError>;

    /// Returns the snapshot text saved under `id`.
    fn load(&self, id: &str) -> Result<String, StoreError>;

    /// Lists saved designs.
    fn list(&self) -> Result<Vec<DesignSummary>, StoreError>;
}

/// On-disk form of a saved design.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDesign {
    name: String,
    snapshot: String,
}

fn new_design_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A store keeping one JSON file per design in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Directory the store writes to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn read(&self, path: &Path) -> Result<StoredDesign, StoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl DesignStore for DirectoryStore {
    fn save(&mut self, name: &str, snapshot: &str) -> Result<String, StoreError> {
        let id = new_design_id();
        let path = self.path_for(&id);
        let stored = StoredDesign {
            name: name.to_string(),
            snapshot: snapshot.to_string(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("saved design '{}' to {}", name, path.display());
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<String, StoreError> {
        // ids are generated hex strings; anything else cannot name a file of ours
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.read(&path)?.snapshot)
    }

    fn list(&self) -> Result<Vec<DesignSummary>, StoreError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut designs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            match self.read(&path) {
                Ok(stored) => designs.push(DesignSummary { id, name: stored.name }),
                Err(e) => log::warn!("skipping unreadable design {}: {}", path.display(), e),
            }
        }
        designs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(designs)
    }
}

/// A store held in memory, for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    designs: BTreeMap<String, StoredDesign>,
}

impl DesignStore for MemoryStore {
    fn save(&mut self, name: &str, snapshot: &str) -> Result<String, StoreError> {
        let id = new_design_id();
        self.designs.insert(
            id.clone(),
            StoredDesign {
                name: name.to_string(),
                snapshot: snapshot.to_string(),
            },
        );
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<String, StoreError> {
        self.designs
            .get(id)
            .map(|d| d.snapshot.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<DesignSummary>, StoreError> {
        let mut designs: Vec<DesignSummary> = self
            .designs
            .iter()
            .map(|(id, d)| DesignSummary {
                id: id.clone(),
                name: d.name.clone(),
            })
            .collect();
        designs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(designs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &mut dyn DesignStore) {
        let first = store.save("summer", "[]").unwrap();
        let second = store.save("autumn", "[1]").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.load(&first).unwrap(), "[]");
        assert_eq!(store.load(&second).unwrap(), "[1]");

        let names: Vec<String> = store.list().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["autumn".to_string(), "summer".to_string()]);

        assert!(matches!(store.load("missing"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::default());
    }

    #[test]
    fn test_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path().join("designs")).unwrap();
        exercise(&mut store);
    }

    #[test]
    fn test_directory_store_rejects_path_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(store.load("../etc/passwd"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_directory_store_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path()).unwrap();
        store.save("kept", "[]").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "kept");
    }
}
