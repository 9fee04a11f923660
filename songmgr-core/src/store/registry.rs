//! Level music registry (customsongs.json, read by the game)
//!
//! A sparse list of levels whose main and/or boss music is replaced. A level
//! that is not listed plays its vanilla music. Entries never end up with both
//! slots empty: clearing the last slot drops the whole entry.
//!
//! The file belongs to the game, so keys this tool does not manage (at the
//! top level or inside a level entry) are kept and written back after the
//! managed ones.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::level::{Level, Slot};
use crate::song::{same_name, Song};

/// File name of the registry inside the asset directory
pub const REGISTRY_FILE: &str = "customsongs.json";

/// The songs assigned to one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelAssociation {
    #[serde(rename = "LevelName")]
    pub level_name: String,

    #[serde(rename = "MainMusic", default, skip_serializing_if = "Option::is_none")]
    pub main_music: Option<Song>,

    #[serde(rename = "BossMusic", default, skip_serializing_if = "Option::is_none")]
    pub boss_music: Option<Song>,

    /// Any other per-level keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LevelAssociation {
    fn new(level_name: impl Into<String>) -> Self {
        Self {
            level_name: level_name.into(),
            main_music: None,
            boss_music: None,
            extra: Map::new(),
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<&Song> {
        match slot {
            Slot::Main => self.main_music.as_ref(),
            Slot::Boss => self.boss_music.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Song> {
        match slot {
            Slot::Main => &mut self.main_music,
            Slot::Boss => &mut self.boss_music,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main_music.is_none() && self.boss_music.is_none()
    }

    fn is_level(&self, name: &str) -> bool {
        same_name(&self.level_name, name.trim())
    }
}

/// A slot cleared because the song it held went away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedSlot {
    pub level_name: String,
    pub slot: Slot,
}

/// The registry of level to song assignments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelMusicRegistry {
    #[serde(rename = "customLevelMusic", default)]
    associations: Vec<LevelAssociation>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl LevelMusicRegistry {
    /// Load the registry, or an empty one if the file is missing or invalid
    pub fn load_from_path(path: &Path) -> Self {
        let mut registry: Self = super::load_or_default(path);
        registry.associations.retain(|a| !a.is_empty());
        registry
    }

    /// Persist the full registry
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        super::save(path, self)
    }

    pub fn get_all(&self) -> &[LevelAssociation] {
        &self.associations
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    /// Find a level's entry, ignoring case
    pub fn get(&self, level_name: &str) -> Option<&LevelAssociation> {
        self.associations.iter().find(|a| a.is_level(level_name))
    }

    /// Assign a copy of `song` to a level's slot, keeping the other slot
    ///
    /// Returns the bank previously occupying the slot, if any.
    pub fn set_slot(&mut self, level: Level, slot: Slot, song: &Song) -> Option<String> {
        let index = match self
            .associations
            .iter()
            .position(|a| a.is_level(level.as_str()))
        {
            Some(index) => index,
            None => {
                self.associations.push(LevelAssociation::new(level.as_str()));
                self.associations.len() - 1
            }
        };

        let entry = &mut self.associations[index];
        entry.level_name = level.as_str().to_string();
        entry
            .slot_mut(slot)
            .replace(song.clone())
            .map(|previous| previous.bank)
    }

    /// Clear a level's slot, dropping the entry once both slots are empty
    ///
    /// Unknown levels and empty slots are silently ignored.
    pub fn remove_slot(&mut self, level_name: &str, slot: Slot) -> Option<Song> {
        let index = self
            .associations
            .iter()
            .position(|a| a.is_level(level_name))?;

        let removed = self.associations[index].slot_mut(slot).take();
        if self.associations[index].is_empty() {
            self.associations.remove(index);
        }
        removed
    }

    /// Clear every slot holding the given bank, pruning emptied entries
    pub fn remove_bank(&mut self, bank: &str) -> Vec<PrunedSlot> {
        let mut pruned = Vec::new();

        for entry in &mut self.associations {
            for slot in [Slot::Main, Slot::Boss] {
                let holds_bank = entry.slot(slot).is_some_and(|s| s.has_bank(bank));
                if holds_bank {
                    entry.slot_mut(slot).take();
                    pruned.push(PrunedSlot {
                        level_name: entry.level_name.clone(),
                        slot,
                    });
                }
            }
        }

        self.associations.retain(|a| !a.is_empty());
        pruned
    }

    /// Drop every assignment (back to vanilla music)
    ///
    /// Unmanaged top-level keys stay.
    pub fn clear(&mut self) {
        self.associations.clear();
    }
}
