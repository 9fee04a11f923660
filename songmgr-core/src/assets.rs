//! The game's asset directory, where bank files and both stores live

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::store::{CATALOG_FILE, REGISTRY_FILE};

/// File access scoped to one asset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// Location of a bank file, by bank name
    pub fn bank_path(&self, bank: &str) -> PathBuf {
        self.root.join(format!("{bank}.bank"))
    }

    /// Write a file directly inside the asset directory
    pub fn write_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        ensure_plain_name(file_name)?;
        let path = self.root.join(file_name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Remove a bank file, logging instead of failing
    ///
    /// Returns a warning message when the file could not be removed.
    pub fn remove_bank(&self, bank: &str) -> Option<String> {
        if ensure_plain_name(bank).is_err() {
            let warning = format!("Refusing to remove bank with path separators: {bank}");
            tracing::warn!("{}", warning);
            return Some(warning);
        }
        self.remove_or_warn(&self.bank_path(bank))
    }

    /// Remove a store or bank file, logging instead of failing
    pub fn remove_or_warn(&self, path: &Path) -> Option<String> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Removed {}", path.display());
                None
            }
            Err(e) => {
                let warning = format!("Failed to remove file {}", path.display());
                tracing::warn!("{}: {}", warning, e);
                Some(warning)
            }
        }
    }
}

fn ensure_plain_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!("Invalid file name '{}'", name);
    }
    Ok(())
}
