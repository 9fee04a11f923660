//! Error types for song management with clear, actionable messages

use std::path::PathBuf;
use thiserror::Error;

use crate::level::Level;

/// Errors that abort a song management operation
#[derive(Error, Debug)]
pub enum SongMgrError {
    /// The archive does not hold exactly one bank and one customsongs.json
    #[error("Invalid archive {path}: expected exactly one .bank file and exactly one .json file called customsongs.json (found {banks} .bank, {jsons} .json)")]
    ArchiveShape {
        path: PathBuf,
        banks: usize,
        jsons: usize,
    },

    /// customsongs.json could not be understood
    #[error("customsongs.json in {path} appears to be invalid: {reason}")]
    ArchiveMetadata { path: PathBuf, reason: String },

    /// The bank was extracted but no music record points at it
    #[error("In customsongs.json, can't find a node containing the custom song bank ({bank}).\nBank file was installed to {installed_to} but manual setup is needed for the json.")]
    SongMetadataMissing { bank: String, installed_to: PathBuf },

    /// No imported song matches the requested name
    #[error("Can't find imported song with name \"{name}\". Try using the list command to check songs.")]
    SongNotFound { name: String },

    /// Level name is not one of the game's levels
    #[error("Invalid vanilla level name \"{name}\".\nValid level names: {}", Level::names().join(", "))]
    InvalidLevelName { name: String },

    /// No usable game asset directory could be found
    #[error("Couldn't find the Metal Hellsinger installation folder (looked in: {}).\nPass --asset-dir, set SONGMGR_ASSET_DIR, or add the folder to search_paths in {settings}.", format_candidates(.searched))]
    AssetDirNotFound {
        searched: Vec<PathBuf>,
        settings: String,
    },
}

fn format_candidates(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nowhere".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_lists_valid_names() {
        let err = SongMgrError::InvalidLevelName {
            name: "Limbo".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("\"Limbo\""));
        assert!(message.contains("Voke"));
        assert!(message.contains("Hell_Gates"));
    }

    #[test]
    fn test_metadata_missing_mentions_installed_bank() {
        let err = SongMgrError::SongMetadataMissing {
            bank: "boss1".to_string(),
            installed_to: PathBuf::from("/game/boss1.bank"),
        };
        let message = err.to_string();
        assert!(message.contains("(boss1)"));
        assert!(message.contains("/game/boss1.bank"));
    }

    #[test]
    fn test_asset_dir_not_found_lists_candidates() {
        let err = SongMgrError::AssetDirNotFound {
            searched: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            settings: "settings.yaml".to_string(),
        };
        assert!(err.to_string().contains("/a, /b"));
    }
}
