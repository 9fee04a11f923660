//! Imported songs store (customsongs-mgr-imported.json)
//!
//! Every song that has been imported from a mod archive, whether or not it
//! is currently assigned to a level.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::song::Song;

/// File name of the catalog inside the asset directory
pub const CATALOG_FILE: &str = "customsongs-mgr-imported.json";

/// The song catalog, one entry per case-folded bank name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongCatalog {
    #[serde(rename = "imported_songs", default)]
    songs: Vec<Song>,
}

impl SongCatalog {
    /// Load the catalog, or an empty one if the file is missing or invalid
    pub fn load_from_path(path: &Path) -> Self {
        super::load_or_default(path)
    }

    /// Persist the full catalog
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        super::save(path, self)
    }

    /// All songs in import order
    pub fn list(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Find a song by bank name, ignoring case
    pub fn get(&self, bank: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.has_bank(bank))
    }

    /// Add a song, replacing any entry with the same bank wholesale
    ///
    /// Returns the replaced entry, if there was one.
    pub fn upsert(&mut self, song: Song) -> Option<Song> {
        let replaced = self.remove(&song.bank);
        self.songs.push(song);
        replaced
    }

    /// Remove a song by bank name; absent names are ignored
    pub fn remove(&mut self, bank: &str) -> Option<Song> {
        let index = self.songs.iter().position(|s| s.has_bank(bank))?;
        Some(self.songs.remove(index))
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }
}
