//! Locating the game's asset directory
//!
//! Resolution order, first hit wins:
//! 1. `--asset-dir` on the command line
//! 2. the `SONGMGR_ASSET_DIR` environment variable
//! 3. `asset_dir` in the settings file
//! 4. the first existing directory among the settings file's `search_paths`
//!    and the usual Steam install locations

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::assets::AssetDir;
use crate::error::SongMgrError;

/// Environment variable naming the asset directory
pub const ASSET_DIR_ENV: &str = "SONGMGR_ASSET_DIR";

/// Settings file name inside the config directory
const SETTINGS_FILE: &str = "settings.yaml";

const GAME_ASSETS: &str = "steamapps/common/Metal Hellsinger/Metal_Data/StreamingAssets";

/// User settings (settings.yaml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    /// Fixed asset directory, skipping discovery
    #[serde(default)]
    pub asset_dir: Option<PathBuf>,

    /// Extra directories to probe before the built-in Steam locations
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

impl Settings {
    /// Load settings from a specific path; a missing file is the defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    /// Default settings file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("", "", "songmgr")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("songmgr")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join(SETTINGS_FILE))
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub asset_dir: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
}

/// Resolved configuration handed to every operation
#[derive(Debug, Clone)]
pub struct Config {
    pub assets: AssetDir,
}

impl Config {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets: AssetDir::new(asset_dir),
        }
    }

    /// Resolve the asset directory from flags, environment and settings
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let settings_path = match &overrides.settings_path {
            Some(path) => path.clone(),
            None => Settings::default_path()?,
        };
        let settings = Settings::load_from_path(&settings_path)?;
        let from_env = std::env::var_os(ASSET_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let explicit = overrides
            .asset_dir
            .clone()
            .or(from_env)
            .or_else(|| settings.asset_dir.clone());

        let asset_dir = match explicit {
            Some(dir) => require_dir(dir, &settings_path)?,
            None => discover(&settings, &settings_path)?,
        };

        tracing::debug!("Using asset directory {}", asset_dir.display());
        Ok(Self::new(asset_dir))
    }
}

fn require_dir(dir: PathBuf, settings_path: &Path) -> Result<PathBuf> {
    if dir.is_dir() {
        return Ok(dir);
    }
    Err(SongMgrError::AssetDirNotFound {
        searched: vec![dir],
        settings: settings_path.display().to_string(),
    }
    .into())
}

fn discover(settings: &Settings, settings_path: &Path) -> Result<PathBuf> {
    let candidates: Vec<PathBuf> = settings
        .search_paths
        .iter()
        .cloned()
        .chain(steam_candidates())
        .collect();

    match candidates.iter().find(|dir| dir.is_dir()) {
        Some(dir) => Ok(dir.clone()),
        None => Err(SongMgrError::AssetDirNotFound {
            searched: candidates,
            settings: settings_path.display().to_string(),
        }
        .into()),
    }
}

/// Where Steam usually installs the game
fn steam_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(r"C:\Program Files (x86)\Steam").join(GAME_ASSETS),
        PathBuf::from(r"E:\SteamLibrary").join(GAME_ASSETS),
    ];

    if let Some(home) = dirs::home_dir() {
        // Steam on macOS and Linux capitalizes SteamApps
        let assets = GAME_ASSETS.replacen("steamapps", "SteamApps", 1);
        candidates.push(home.join("Library/Application Support/Steam").join(&assets));
        candidates.push(home.join(".steam/steam").join(&assets));
    }

    candidates
}
