//! Test helper functions for integration tests

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use zip::write::SimpleFileOptions;

/// Initialize logging for tests (only once per test run)
#[allow(dead_code)]
static INIT: Once = Once::new();

#[allow(dead_code)]
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Write a zip archive with the given entries
pub fn write_zip(path: &Path, files: &[(&str, &[u8])]) -> PathBuf {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    std::fs::write(path, bytes).unwrap();
    path.to_path_buf()
}

/// Write a mod package whose first record points `slot_key` at `bank`
pub fn write_song_package(dir: &Path, bank: &str, slot_key: &str, bpm: u32) -> PathBuf {
    let metadata = serde_json::json!({
        "customLevelMusic": [ {
            "LevelName": "Voke",
            slot_key: {
                "Bank": bank,
                "Event": format!("{{{bank}}}"),
                "LowHealthBeatEvent": "{00000000-0000-0000-0000-000000000000}",
                "BeatInputOffset": 0.0,
                "BPM": bpm,
                "MusicVolume": 1.0
            }
        } ]
    });

    let bank_entry = format!("{bank}/{bank}.bank");
    let metadata_entry = format!("{bank}/customsongs.json");
    let metadata = metadata.to_string();

    write_zip(
        &dir.join(format!("{bank}.zip")),
        &[
            (bank_entry.as_str(), b"FMOD SoundBank".as_slice()),
            (metadata_entry.as_str(), metadata.as_bytes()),
        ],
    )
}
