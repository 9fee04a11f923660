//! songmgr core library exports
//!
//! Keeps track of custom songs imported from mod packages and of which
//! level plays which song, persisted as two JSON stores in the game's
//! asset directory.

pub mod archive;
pub mod assets;
pub mod config;
pub mod error;
pub mod level;
pub mod manager;
pub mod song;
pub mod store;

pub use error::SongMgrError;
pub use level::{Level, Slot};
pub use manager::SongManager;
pub use song::Song;
