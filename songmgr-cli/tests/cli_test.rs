//! Integration tests running the songmgr binary against a scratch asset directory

use anyhow::Result;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Run songmgr with the given args against `asset_dir`
fn run(asset_dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_songmgr"))
        .arg("--asset-dir")
        .arg(asset_dir)
        .arg("--settings")
        .arg(asset_dir.join("no-settings.yaml"))
        .args(args)
        .output()?;
    Ok(output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run and require success
fn run_ok(asset_dir: &Path, args: &[&str]) -> Result<String> {
    let output = run(asset_dir, args)?;
    if !output.status.success() {
        anyhow::bail!(
            "songmgr {:?} failed:\nstderr: {}\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stderr),
            stdout(&output)
        );
    }
    Ok(stdout(&output))
}

fn write_package(dir: &Path, bank: &str) -> Result<PathBuf> {
    let metadata = serde_json::json!({
        "customLevelMusic": [ { "LevelName": "Voke", "MainMusic": { "Bank": bank, "BPM": 128 } } ]
    })
    .to_string();

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(format!("{bank}.bank"), SimpleFileOptions::default())?;
    writer.write_all(b"FMOD")?;
    writer.start_file("customsongs.json", SimpleFileOptions::default())?;
    writer.write_all(metadata.as_bytes())?;
    let bytes = writer.finish()?.into_inner();

    let path = dir.join(format!("{bank}.zip"));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn read_registry(asset_dir: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(asset_dir.join("customsongs.json"))?;
    Ok(serde_json::from_str(&content)?)
}

#[test]
fn test_import_install_uninstall_flow() -> Result<()> {
    let game = TempDir::new()?;
    let downloads = TempDir::new()?;
    let package = write_package(downloads.path(), "My Song")?;

    let out = run_ok(game.path(), &["import", package.to_str().unwrap()])?;
    assert!(out.contains("Song successfully imported as My Song."));
    assert!(game.path().join("My Song.bank").exists());

    // Unquoted multi-word song names are joined
    let out = run_ok(game.path(), &["install", "voke", "my", "song"])?;
    assert!(out.contains("Voke now plays My Song"));

    let registry = read_registry(game.path())?;
    assert_eq!(registry["customLevelMusic"][0]["LevelName"], "Voke");
    assert_eq!(registry["customLevelMusic"][0]["MainMusic"]["BPM"], 128);

    let out = run_ok(game.path(), &["installed"])?;
    assert!(out.contains("Voke"));
    assert!(out.contains("My Song"));

    run_ok(game.path(), &["uninstall-main", "Voke"])?;
    let registry = read_registry(game.path())?;
    assert_eq!(registry, serde_json::json!({ "customLevelMusic": [] }));
    Ok(())
}

#[test]
fn test_list_and_info() -> Result<()> {
    let game = TempDir::new()?;
    let downloads = TempDir::new()?;

    let out = run_ok(game.path(), &["list"])?;
    assert!(out.contains("No songs are currently imported."));

    let package = write_package(downloads.path(), "anthem")?;
    run_ok(game.path(), &["import", package.to_str().unwrap()])?;

    let out = run_ok(game.path(), &["imported"])?;
    assert!(out.contains("anthem"));

    let out = run_ok(game.path(), &["info", "ANTHEM"])?;
    assert!(out.contains("Info for imported song anthem:"));
    assert!(out.contains("\tBPM: 128"));

    let out = run_ok(game.path(), &["list", "--json"])?;
    let songs: serde_json::Value = serde_json::from_str(&out)?;
    assert_eq!(songs[0]["Bank"], "anthem");
    Ok(())
}

#[test]
fn test_validation_failures_exit_nonzero() -> Result<()> {
    let game = TempDir::new()?;

    let output = run(game.path(), &["install", "Limbo", "whatever"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid vanilla level name"));

    let output = run(game.path(), &["install-boss", "Voke", "missing"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Can't find imported song"));

    let output = run(game.path(), &["install", "Voke"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_delete_and_clean() -> Result<()> {
    let game = TempDir::new()?;
    let downloads = TempDir::new()?;
    for bank in ["one", "two"] {
        let package = write_package(downloads.path(), bank)?;
        run_ok(game.path(), &["import", package.to_str().unwrap()])?;
    }
    run_ok(game.path(), &["install-boss", "Nihil", "one"])?;

    let out = run_ok(game.path(), &["delete", "one"])?;
    assert!(out.contains("Song deleted."));
    assert!(!game.path().join("one.bank").exists());
    assert_eq!(
        read_registry(game.path())?,
        serde_json::json!({ "customLevelMusic": [] })
    );

    run_ok(game.path(), &["install", "Stygia", "two"])?;
    let out = run_ok(game.path(), &["delete-all"])?;
    assert!(out.contains("Deleted 1 imported song(s)"));
    assert!(!game.path().join("two.bank").exists());
    assert!(!game.path().join("customsongs-mgr-imported.json").exists());
    assert_eq!(
        read_registry(game.path())?,
        serde_json::json!({ "customLevelMusic": [] })
    );
    Ok(())
}

#[test]
fn test_vanilla_keeps_imports() -> Result<()> {
    let game = TempDir::new()?;
    let downloads = TempDir::new()?;
    let package = write_package(downloads.path(), "keep")?;
    run_ok(game.path(), &["import", package.to_str().unwrap()])?;
    run_ok(game.path(), &["install", "Yhelm", "keep"])?;

    run_ok(game.path(), &["clear"])?;
    assert_eq!(
        read_registry(game.path())?,
        serde_json::json!({ "customLevelMusic": [] })
    );
    assert!(run_ok(game.path(), &["list"])?.contains("keep"));
    Ok(())
}

#[test]
fn test_missing_asset_dir_fails() -> Result<()> {
    let game = TempDir::new()?;
    let output = run(&game.path().join("not-here"), &["list"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("installation folder"));
    Ok(())
}
