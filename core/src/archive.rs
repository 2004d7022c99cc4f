//! ZIP bundles of language files
//!
//! A bundle holds one `<language>.properties` entry per table column. The
//! same layout can be read back so that a bundle re-uploads as a batch.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::export::file_name_for;
use crate::formats::FileFormat;
use crate::table::{Table, TableError};

/// Default file name offered for a bundle download
pub const BUNDLE_FILE_NAME: &str = "properties.zip";

/// Errors while building or reading a bundle
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Nothing to archive: the table has no languages")]
    Empty,
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Stored => CompressionMethod::Stored,
            Self::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// One language file inside a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// File name without any directory part (e.g. "de.properties")
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Package every language of `table` into an in-memory zip.
pub fn build_bundle(table: &Table, compression: Compression) -> ArchiveResult<Vec<u8>> {
    if table.languages().is_empty() {
        return Err(ArchiveError::Empty);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(compression.method())
        .unix_permissions(0o644);

    for language in table.languages() {
        let text = table.serialize(language)?;
        writer.start_file(file_name_for(language), options.clone())?;
        writer.write_all(text.as_bytes())?;
    }

    let cursor = writer.finish()?;
    let bytes = cursor.into_inner();
    info!(
        "bundled {} language file(s) ({} bytes)",
        table.languages().len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Build a bundle and write it to `path`, creating parent directories.
pub fn write_bundle(table: &Table, path: &Path, compression: Compression) -> ArchiveResult<()> {
    let bytes = build_bundle(table, compression)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// `.properties` entries of a zip, in archive order.
///
/// Directories and other files are ignored; nested paths are reduced to
/// their file name.
pub fn read_bundle(bytes: &[u8]) -> ArchiveResult<Vec<BundleEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let entry_path = entry.name().to_string();
        if FileFormat::from_path(Path::new(&entry_path)) != FileFormat::Properties {
            debug!("skipping non-properties bundle entry '{}'", entry_path);
            continue;
        }

        let file_name = entry_path
            .rsplit('/')
            .next()
            .unwrap_or(&entry_path)
            .to_string();
        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents)?;

        entries.push(BundleEntry {
            file_name,
            contents,
        });
    }

    Ok(entries)
}
