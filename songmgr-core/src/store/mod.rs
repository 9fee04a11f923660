//! JSON-backed stores kept in the game's asset directory
//!
//! Both stores follow the same discipline: load the whole file, mutate in
//! memory, write the whole file back. A missing or unreadable file loads as
//! the empty store so first runs and hand-edited files never block a command.

mod catalog;
mod registry;

pub use catalog::{SongCatalog, CATALOG_FILE};
pub use registry::{LevelAssociation, LevelMusicRegistry, PrunedSlot, REGISTRY_FILE};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a store, substituting the default when the file is missing or invalid
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No store at {}, starting empty", path.display());
            return T::default();
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {}. Treating as empty.", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(store) => {
            tracing::debug!("Loaded store from {}", path.display());
            store
        }
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}. Treating as empty.", path.display(), e);
            T::default()
        }
    }
}

/// Write a store as 4-space indented JSON, the layout the game ships with
fn save<T: Serialize>(path: &Path, store: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    store
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    std::fs::write(path, buf).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Saved store to {}", path.display());
    Ok(())
}
