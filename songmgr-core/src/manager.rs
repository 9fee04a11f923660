//! Song management operations
//!
//! Each operation loads the store(s) it needs from the asset directory,
//! changes them in memory and writes them back whole. Operations return an
//! outcome describing what happened; rendering is left to the caller.

use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveReader, PackageLayout};
use crate::assets::AssetDir;
use crate::config::Config;
use crate::error::SongMgrError;
use crate::level::{Level, Slot};
use crate::song::Song;
use crate::store::{LevelAssociation, LevelMusicRegistry, PrunedSlot, SongCatalog};

/// Result of importing a mod package
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub song: Song,
    /// Where the bank file was written
    pub bank_path: PathBuf,
    /// Catalog entry that was overwritten, if the bank was already imported
    pub replaced: Option<Song>,
}

/// Result of assigning a song to a level slot
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub level: Level,
    pub slot: Slot,
    pub bank: String,
    /// Bank that previously occupied the slot
    pub replaced: Option<String>,
}

/// Result of clearing a level slot
#[derive(Debug, Clone)]
pub struct UninstallOutcome {
    pub level_name: String,
    pub slot: Slot,
    /// Song that was assigned, `None` if the slot was already empty
    pub removed: Option<Song>,
}

/// Result of deleting an imported song
#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    pub bank: String,
    /// Whether the catalog held the song
    pub catalog_removed: bool,
    /// Level slots that referenced the song and were cleared
    pub pruned: Vec<PrunedSlot>,
    pub warnings: Vec<String>,
}

/// Result of removing every imported song
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    pub deleted: Vec<String>,
    pub warnings: Vec<String>,
}

/// Entry point for every song management command
pub struct SongManager {
    config: Config,
}

impl SongManager {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn assets(&self) -> &AssetDir {
        &self.config.assets
    }

    fn load_catalog(&self) -> SongCatalog {
        SongCatalog::load_from_path(&self.assets().catalog_path())
    }

    fn save_catalog(&self, catalog: &SongCatalog) -> Result<()> {
        catalog.save_to_path(&self.assets().catalog_path())
    }

    fn load_registry(&self) -> LevelMusicRegistry {
        LevelMusicRegistry::load_from_path(&self.assets().registry_path())
    }

    fn save_registry(&self, registry: &LevelMusicRegistry) -> Result<()> {
        registry.save_to_path(&self.assets().registry_path())
    }

    /// All imported songs, in import order
    pub fn list(&self) -> Vec<Song> {
        self.load_catalog().list().to_vec()
    }

    /// Current level assignments
    pub fn installed(&self) -> Vec<LevelAssociation> {
        self.load_registry().get_all().to_vec()
    }

    /// Full metadata of one imported song
    pub fn info(&self, name: &str) -> Result<Song> {
        self.load_catalog()
            .get(name)
            .cloned()
            .ok_or_else(|| song_not_found(name))
    }

    /// Import a mod package from disk
    pub fn import(&self, archive_path: &Path) -> Result<ImportOutcome> {
        let mut reader = archive::open_archive(archive_path)?;
        self.import_from(reader.as_mut(), archive_path)
    }

    /// Import a mod package through an already opened reader
    ///
    /// The bank file is installed as `<Bank>.bank` using the record's own
    /// spelling, so delete and clean find it on case-sensitive filesystems.
    /// Without a matching record it keeps the archive's file name and the
    /// `SongMetadataMissing` error leaves it installed but uncataloged.
    pub fn import_from(
        &self,
        reader: &mut dyn ArchiveReader,
        source: &Path,
    ) -> Result<ImportOutcome> {
        let layout = PackageLayout::locate(&reader.entry_names(), source)?;
        let bank = layout.bank_name().to_string();

        let metadata_error = |reason: String| SongMgrError::ArchiveMetadata {
            path: source.to_path_buf(),
            reason,
        };
        let metadata = reader
            .read_json(&layout.metadata_entry)
            .map_err(|e| metadata_error(format!("{e:#}")))?;
        let record = first_music_record(&metadata).ok_or_else(|| {
            metadata_error("expected a non-empty customLevelMusic list".to_string())
        })?;

        let song = song_for_bank(record, &bank);
        let file_name = match &song {
            Some(song) => format!("{}.bank", song.bank),
            None => layout.bank_file_name().to_string(),
        };

        let bytes = reader.read_entry(&layout.bank_entry)?;
        let bank_path = self.assets().write_file(&file_name, &bytes)?;
        tracing::info!("Installed bank file {}", bank_path.display());

        let song = song.ok_or_else(|| SongMgrError::SongMetadataMissing {
            bank: bank.clone(),
            installed_to: bank_path.clone(),
        })?;

        let mut catalog = self.load_catalog();
        let replaced = catalog.upsert(song.clone());
        self.save_catalog(&catalog)?;

        if replaced.is_some() {
            tracing::info!("Replaced existing catalog entry for {}", song.bank);
        }

        Ok(ImportOutcome {
            song,
            bank_path,
            replaced,
        })
    }

    /// Assign an imported song to a level's main or boss music
    pub fn install(&self, level_name: &str, song_name: &str, slot: Slot) -> Result<InstallOutcome> {
        let level = Level::resolve(level_name).ok_or_else(|| SongMgrError::InvalidLevelName {
            name: level_name.to_string(),
        })?;

        let catalog = self.load_catalog();
        let song = catalog.get(song_name).ok_or_else(|| song_not_found(song_name))?;

        let mut registry = self.load_registry();
        let replaced = registry.set_slot(level, slot, song);
        self.save_registry(&registry)?;

        tracing::info!("Assigned {} to {} ({})", song.bank, level, slot);
        Ok(InstallOutcome {
            level,
            slot,
            bank: song.bank.clone(),
            replaced,
        })
    }

    /// Clear a level's main or boss music
    ///
    /// The level name is not checked against the level set; unknown levels
    /// and empty slots are a no-op and leave customsongs.json untouched.
    pub fn uninstall(&self, level_name: &str, slot: Slot) -> Result<UninstallOutcome> {
        let mut registry = self.load_registry();
        let removed = registry.remove_slot(level_name, slot);
        if removed.is_some() {
            self.save_registry(&registry)?;
        }

        let level_name = registry
            .get(level_name)
            .map(|a| a.level_name.clone())
            .or_else(|| Level::resolve(level_name).map(|l| l.as_str().to_string()))
            .unwrap_or_else(|| level_name.to_string());

        if let Some(song) = &removed {
            tracing::info!("Removed {} from {} ({})", song.bank, level_name, slot);
        }
        Ok(UninstallOutcome {
            level_name,
            slot,
            removed,
        })
    }

    /// Delete an imported song: its bank file, catalog entry and level slots
    pub fn delete(&self, name: &str) -> Result<DeleteOutcome> {
        let mut catalog = self.load_catalog();
        let removed = catalog.remove(name);
        let bank = removed
            .as_ref()
            .map(|s| s.bank.clone())
            .unwrap_or_else(|| name.to_string());

        let mut outcome = DeleteOutcome {
            bank: bank.clone(),
            catalog_removed: removed.is_some(),
            ..Default::default()
        };

        outcome.warnings.extend(self.assets().remove_bank(&bank));

        if outcome.catalog_removed {
            self.save_catalog(&catalog)?;
        }

        let mut registry = self.load_registry();
        outcome.pruned = registry.remove_bank(&bank);
        if !outcome.pruned.is_empty() {
            self.save_registry(&registry)?;
            tracing::info!(
                "Cleared {} level slot(s) that used {}",
                outcome.pruned.len(),
                bank
            );
        }

        Ok(outcome)
    }

    /// Remove every assignment and every imported song
    pub fn clean(&self) -> Result<CleanOutcome> {
        let mut registry = self.load_registry();
        registry.clear();
        self.save_registry(&registry)?;

        let catalog = self.load_catalog();
        let mut outcome = CleanOutcome::default();
        for song in catalog.list() {
            outcome.warnings.extend(self.assets().remove_bank(&song.bank));
            outcome.deleted.push(song.bank.clone());
        }

        let catalog_path = self.assets().catalog_path();
        if catalog_path.exists() {
            outcome
                .warnings
                .extend(self.assets().remove_or_warn(&catalog_path));
        }

        Ok(outcome)
    }

    /// Drop every level assignment, keeping imported songs
    ///
    /// Returns how many levels had custom music.
    pub fn make_vanilla(&self) -> Result<usize> {
        let mut registry = self.load_registry();
        let cleared = registry.get_all().len();
        registry.clear();
        self.save_registry(&registry)?;
        Ok(cleared)
    }
}

fn song_not_found(name: &str) -> anyhow::Error {
    SongMgrError::SongNotFound {
        name: name.to_string(),
    }
    .into()
}

/// First entry of a package's customLevelMusic list
fn first_music_record(metadata: &Value) -> Option<&Value> {
    metadata
        .get("customLevelMusic")?
        .as_array()?
        .first()
        .filter(|record| record.is_object())
}

/// The MainMusic or BossMusic node describing `bank`, main taking priority
fn song_for_bank(record: &Value, bank: &str) -> Option<Song> {
    [Slot::Main, Slot::Boss]
        .iter()
        .filter_map(|slot| record.get(slot.key()).and_then(Song::from_value))
        .find(|song| song.has_bank(bank))
}
