//! Mod package readers
//!
//! A song mod ships as an archive holding one FMOD `.bank` file and a
//! `customsongs.json` describing it. Zip is what mod sites distribute;
//! gzip'd tarballs are accepted as well.

use anyhow::{Context, Result};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::SongMgrError;

/// Name of the metadata entry every mod package carries
pub const METADATA_ENTRY: &str = "customsongs.json";

const BANK_EXTENSION: &str = ".bank";

/// Read access to the files inside a mod package
pub trait ArchiveReader {
    /// Names of all file entries, as stored in the archive
    fn entry_names(&self) -> Vec<String>;

    /// Raw bytes of one entry
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>>;

    /// Parse one entry as JSON
    fn read_json(&mut self, name: &str) -> Result<serde_json::Value> {
        let bytes = self.read_entry(name)?;
        serde_json::from_slice(&bytes).with_context(|| format!("{name} is not valid JSON"))
    }
}

/// Open a package, picking the reader from the file extension
pub fn open_archive(path: &Path) -> Result<Box<dyn ArchiveReader>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(Box::new(TarballReader::open(path)?))
    } else {
        Ok(Box::new(ZipArchiveReader::open(path)?))
    }
}

/// Zip-backed package reader
pub struct ZipArchiveReader<R> {
    archive: zip::ZipArchive<R>,
}

impl ZipArchiveReader<std::fs::File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Self::new(file).with_context(|| format!("Failed to read zip archive {}", path.display()))
    }
}

impl ZipArchiveReader<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> ZipArchiveReader<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).context("Invalid zip archive")?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> ArchiveReader for ZipArchiveReader<R> {
    fn entry_names(&self) -> Vec<String> {
        self.archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(String::from)
            .collect()
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .with_context(|| format!("Entry {name} not found in archive"))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("Failed to extract {name}"))?;
        Ok(bytes)
    }
}

/// Tarball-backed package reader; entries are buffered on open
pub struct TarballReader {
    entries: Vec<(String, Vec<u8>)>,
}

impl TarballReader {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to load {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Failed to read tarball {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let gz_decoder = flate2::read::GzDecoder::new(Cursor::new(bytes));
        let mut archive = tar::Archive::new(gz_decoder);

        let mut entries = Vec::new();
        for entry in archive.entries().context("Failed to extract tarball")? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry.path()?.to_string_lossy().into_owned();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }

        Ok(Self { entries })
    }
}

impl ArchiveReader for TarballReader {
    fn entry_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, data)| data.clone())
            .with_context(|| format!("Entry {name} not found in archive"))
    }
}

/// Where the two required files live inside a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    /// Archive entry of the `.bank` file
    pub bank_entry: String,
    /// Archive entry of `customsongs.json`
    pub metadata_entry: String,
}

impl PackageLayout {
    /// Check a package has exactly one bank and exactly one customsongs.json
    pub fn locate(entries: &[String], archive_path: &Path) -> Result<Self, SongMgrError> {
        let banks: Vec<&String> = entries
            .iter()
            .filter(|e| bank_stem(file_name(e)).is_some())
            .collect();
        let jsons: Vec<&String> = entries
            .iter()
            .filter(|e| file_name(e).to_lowercase().ends_with(".json"))
            .collect();

        match (banks.as_slice(), jsons.as_slice()) {
            ([bank], [json]) if file_name(json).eq_ignore_ascii_case(METADATA_ENTRY) => Ok(Self {
                bank_entry: (*bank).clone(),
                metadata_entry: (*json).clone(),
            }),
            _ => Err(SongMgrError::ArchiveShape {
                path: PathBuf::from(archive_path),
                banks: banks.len(),
                jsons: jsons.len(),
            }),
        }
    }

    /// File name the bank is installed under
    pub fn bank_file_name(&self) -> &str {
        file_name(&self.bank_entry)
    }

    /// Bank name, i.e. the bank file name without its extension
    pub fn bank_name(&self) -> &str {
        let name = self.bank_file_name();
        bank_stem(name).unwrap_or(name)
    }
}

/// Final path component of an archive entry
fn file_name(entry: &str) -> &str {
    entry
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(entry)
}

/// Bank file name without its extension, or `None` for other files
fn bank_stem(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(BANK_EXTENSION.len())?;
    let (stem, extension) = (name.get(..split)?, name.get(split..)?);
    (extension.eq_ignore_ascii_case(BANK_EXTENSION) && !stem.is_empty()).then_some(stem)
}
