//! Human-readable output for each command

use anyhow::Result;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use songmgr_core::manager::{
    CleanOutcome, DeleteOutcome, ImportOutcome, InstallOutcome, UninstallOutcome,
};
use songmgr_core::store::LevelAssociation;
use songmgr_core::{Slot, SongManager};

/// Table row for imported songs
#[derive(Tabled)]
struct SongRow {
    #[tabled(rename = "Bank")]
    bank: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Used by")]
    used_by: String,
}

/// Table row for level associations
#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Main")]
    main: String,
    #[tabled(rename = "Boss")]
    boss: String,
}

fn table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn list(manager: &SongManager, json_output: bool) -> Result<()> {
    let songs = manager.list();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&songs)?);
        return Ok(());
    }

    if songs.is_empty() {
        println!("No songs are currently imported.");
        return Ok(());
    }

    let associations = manager.installed();
    let rows: Vec<SongRow> = songs
        .iter()
        .map(|song| SongRow {
            bank: song.bank.clone(),
            fields: song.extra.len() + 1,
            used_by: usage(&associations, &song.bank),
        })
        .collect();

    println!("{} song(s) are currently imported:\n", songs.len());
    println!("{}", table(&rows));
    Ok(())
}

/// Levels and slots currently playing a bank
fn usage(associations: &[LevelAssociation], bank: &str) -> String {
    let uses: Vec<String> = associations
        .iter()
        .flat_map(|a| {
            [Slot::Main, Slot::Boss]
                .into_iter()
                .filter(|slot| a.slot(*slot).is_some_and(|s| s.has_bank(bank)))
                .map(|slot| format!("{} ({})", a.level_name, slot))
                .collect::<Vec<_>>()
        })
        .collect();

    if uses.is_empty() {
        "-".to_string()
    } else {
        uses.join(", ")
    }
}

pub fn installed(manager: &SongManager, json_output: bool) -> Result<()> {
    let associations = manager.installed();

    if json_output {
        let value = serde_json::json!({ "customLevelMusic": associations });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if associations.is_empty() {
        println!("No songs are currently installed as level/song associations.");
        return Ok(());
    }

    let bank_of = |a: &LevelAssociation, slot: Slot| {
        a.slot(slot)
            .map(|s| s.bank.clone())
            .unwrap_or_else(|| "-".to_string())
    };
    let rows: Vec<LevelRow> = associations
        .iter()
        .map(|a| LevelRow {
            level: a.level_name.clone(),
            main: bank_of(a, Slot::Main),
            boss: bank_of(a, Slot::Boss),
        })
        .collect();

    println!("Custom level/song associations:\n");
    println!("{}", table(&rows));
    Ok(())
}

pub fn info(manager: &SongManager, name: &str) -> Result<()> {
    let song = manager.info(name)?;

    println!("Info for imported song {}:", song.bank);
    for (field, value) in song.fields() {
        println!("\t{field}: {value}");
    }
    Ok(())
}

pub fn imported(outcome: &ImportOutcome) {
    if outcome.replaced.is_some() {
        println!("NOTICE: Replaced existing song with identical bank name.");
    }
    println!("Song successfully imported as {}.", outcome.song.bank);
}

pub fn installed_song(outcome: &InstallOutcome) {
    if let Some(previous) = &outcome.replaced {
        println!("Switching out from {} to {}.", previous, outcome.bank);
    }
    println!(
        "{} now plays {} as its {} music.",
        outcome.level,
        outcome.bank,
        outcome.slot.label().to_lowercase()
    );
}

pub fn uninstalled(outcome: &UninstallOutcome) {
    match &outcome.removed {
        Some(song) => println!(
            "Removed {} from {} ({}).",
            song.bank, outcome.level_name, outcome.slot
        ),
        None => println!(
            "{} has no custom {} music; nothing to remove.",
            outcome.level_name,
            outcome.slot.label().to_lowercase()
        ),
    }
}

pub fn deleted(outcome: &DeleteOutcome) {
    for warning in &outcome.warnings {
        println!("Warning: {warning}");
    }
    for pruned in &outcome.pruned {
        println!(
            "Removed {} from {} ({}).",
            outcome.bank, pruned.level_name, pruned.slot
        );
    }
    if outcome.catalog_removed {
        println!("Song deleted.");
    } else {
        println!("No imported song named \"{}\".", outcome.bank);
    }
}

pub fn cleaned(outcome: &CleanOutcome) {
    for warning in &outcome.warnings {
        println!("Warning: {warning}");
    }
    println!(
        "Deleted {} imported song(s) and reset customsongs.json.",
        outcome.deleted.len()
    );
}
