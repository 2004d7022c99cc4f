//! Reading a batch of uploaded language files
//!
//! All reads run concurrently and are joined before anything is parsed
//! into a table: the key union must be complete before the first merge.
//! A file that cannot be read still contributes its (empty) column.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::encoding::decode_text;
use crate::formats::properties::PropertiesHandler;
use crate::formats::{language_label, FileFormat, FormatHandler, ParsedFile};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Read task failed: {0}")]
    Task(String),
}

/// A file whose read failed; it was merged as an empty column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub file_name: String,
    pub language: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    /// One entry per uploaded file, in upload order
    pub files: Vec<ParsedFile>,
    pub failures: Vec<UploadFailure>,
}

impl UploadBatch {
    pub fn languages(&self) -> Vec<&str> {
        self.files.iter().map(|file| file.language.as_str()).collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Run every read concurrently and wait until all of them have settled.
///
/// Results come back in input order regardless of completion order.
pub async fn settle_all<T, F>(reads: Vec<F>) -> Vec<Result<T, ReadError>>
where
    F: Future<Output = io::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = reads.into_iter().map(tokio::spawn).collect();

    let mut settled = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = match handle.await {
            Ok(result) => result.map_err(ReadError::from),
            Err(join_err) => Err(ReadError::Task(join_err.to_string())),
        };
        settled.push(outcome);
    }
    settled
}

/// Read, decode and parse files from disk.
pub async fn read_files<P: AsRef<Path>>(paths: &[P]) -> UploadBatch {
    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    let names: Vec<String> = paths.iter().map(|path| file_name_of(path)).collect();

    let reads: Vec<_> = paths
        .into_iter()
        .map(|path| async move { tokio::fs::read(path).await })
        .collect();
    let settled = settle_all(reads).await;

    assemble(names.into_iter().zip(settled))
}

/// Decode and parse files already held in memory as `(file name, bytes)`.
pub fn from_contents<I, S>(files: I) -> UploadBatch
where
    I: IntoIterator<Item = (S, Vec<u8>)>,
    S: Into<String>,
{
    assemble(files.into_iter().map(|(name, bytes)| {
        let name: String = name.into();
        (name, Ok::<_, ReadError>(bytes))
    }))
}

fn assemble<I>(reads: I) -> UploadBatch
where
    I: IntoIterator<Item = (String, Result<Vec<u8>, ReadError>)>,
{
    let handler = PropertiesHandler::new();
    let mut batch = UploadBatch::default();

    for (file_name, read) in reads {
        let language = language_label(&file_name);
        if FileFormat::from_path(Path::new(&file_name)) != FileFormat::Properties {
            debug!("'{}' has no .properties extension; parsing anyway", file_name);
        }

        match read {
            Ok(bytes) => {
                let (text, encoding) = decode_text(&bytes);
                debug!("read '{}' as {:?}", file_name, encoding);
                batch.files.push(handler.parse(&text, &language));
            }
            Err(err) => {
                warn!("failed to read '{}': {}", file_name, err);
                batch.failures.push(UploadFailure {
                    file_name,
                    language: language.clone(),
                    message: err.to_string(),
                });
                batch.files.push(ParsedFile::empty(language));
            }
        }
    }

    info!(
        "upload settled: {} file(s), {} failure(s)",
        batch.files.len(),
        batch.failures.len()
    );
    batch
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
