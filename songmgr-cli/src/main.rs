//! songmgr - custom level music manager for Metal: Hellsinger
//!
//! Imports song mods into the game's asset directory and assigns them to
//! levels by editing the game's customsongs.json.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use songmgr_core::config::{Config, ConfigOverrides};
use songmgr_core::{Slot, SongManager};

mod render;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "songmgr",
    about = "Import custom songs and assign them to Metal: Hellsinger levels",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Game asset directory (Metal_Data/StreamingAssets); discovered if omitted
    #[clap(long, global = true)]
    asset_dir: Option<PathBuf>,

    /// Override the settings file path
    #[clap(long, global = true)]
    settings: Option<PathBuf>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Parser, Debug)]
enum Command {
    /// List all imported songs
    #[clap(alias = "imported")]
    List {
        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// List current level/song associations (customsongs.json)
    Installed {
        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show metadata for an imported song
    Info {
        /// Song (bank) name; several words are joined with spaces
        #[clap(required = true)]
        song: Vec<String>,
    },

    /// Import a zip containing one .bank file and a customsongs.json
    Import {
        /// Path to the mod archive (.zip, or .tar.gz)
        archive: PathBuf,
    },

    /// Assign an imported song to a level as its stage music
    #[clap(alias = "install-main")]
    Install {
        /// Level name (case-insensitive)
        level: String,
        /// Song (bank) name; several words are joined with spaces
        #[clap(required = true)]
        song: Vec<String>,
    },

    /// Assign an imported song to a level as its boss music
    InstallBoss {
        /// Level name (case-insensitive)
        level: String,
        /// Song (bank) name; several words are joined with spaces
        #[clap(required = true)]
        song: Vec<String>,
    },

    /// Remove a level's custom stage music
    #[clap(alias = "uninstall-main")]
    Uninstall {
        /// Level name
        level: String,
    },

    /// Remove a level's custom boss music
    UninstallBoss {
        /// Level name
        level: String,
    },

    /// Remove every level/song association, keeping songs imported
    #[clap(alias = "clear")]
    Vanilla,

    /// Un-import a song and delete its bank file
    Delete {
        /// Song (bank) name; several words are joined with spaces
        #[clap(required = true)]
        song: Vec<String>,
    },

    /// Un-import all songs, delete their bank files and reset customsongs.json
    #[clap(alias = "delete-all")]
    Clean,
}

/// Initialize tracing with CLI flags
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // logs to stderr, output to stdout
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    let config = Config::resolve(&ConfigOverrides {
        asset_dir: cli.asset_dir,
        settings_path: cli.settings,
    })?;
    let manager = SongManager::new(config);

    match cli.command {
        Command::List { json } => render::list(&manager, json),
        Command::Installed { json } => render::installed(&manager, json),
        Command::Info { song } => render::info(&manager, &song.join(" ")),
        Command::Import { archive } => {
            let outcome = manager.import(&archive)?;
            render::imported(&outcome);
            Ok(())
        }
        Command::Install { level, song } => install(&manager, &level, &song, Slot::Main),
        Command::InstallBoss { level, song } => install(&manager, &level, &song, Slot::Boss),
        Command::Uninstall { level } => uninstall(&manager, &level, Slot::Main),
        Command::UninstallBoss { level } => uninstall(&manager, &level, Slot::Boss),
        Command::Vanilla => {
            let cleared = manager.make_vanilla()?;
            println!("Removed custom music from {cleared} level(s). Done.");
            Ok(())
        }
        Command::Delete { song } => {
            let outcome = manager.delete(&song.join(" "))?;
            render::deleted(&outcome);
            Ok(())
        }
        Command::Clean => {
            let outcome = manager.clean()?;
            render::cleaned(&outcome);
            Ok(())
        }
    }
}

fn install(manager: &SongManager, level: &str, song: &[String], slot: Slot) -> Result<()> {
    let outcome = manager.install(level, &song.join(" "), slot)?;
    render::installed_song(&outcome);
    Ok(())
}

fn uninstall(manager: &SongManager, level: &str, slot: Slot) -> Result<()> {
    let outcome = manager.uninstall(level, slot)?;
    render::uninstalled(&outcome);
    Ok(())
}
