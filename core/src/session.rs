//! The editing session: sole owner of the translation table
//!
//! Every change to the table goes through one of the methods below. A new
//! upload replaces the table wholesale, including any unsaved edits.

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::archive::{self, ArchiveError};
use crate::config::EditorConfig;
use crate::export::{self, ExportError, ExportOutcome};
use crate::quality::{self, CellIssue, CheckOutcome};
use crate::samples::sample_batch;
use crate::table::{CellRef, Table, TableError};
use crate::upload::{self, UploadBatch, UploadFailure};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Could not build the bundle ({0}); export the languages one by one instead")]
    Archive(#[from] ArchiveError),
}

#[derive(Debug, Default)]
pub struct EditorSession {
    table: Table,
    config: EditorConfig,
    failures: Vec<UploadFailure>,
    dirty: bool,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A session using the user's config file, see [`EditorConfig::load_or_default`].
    pub fn with_user_config() -> Self {
        Self::new(EditorConfig::load_or_default())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Files of the latest upload that could not be read
    pub fn upload_failures(&self) -> &[UploadFailure] {
        &self.failures
    }

    /// Whether the table changed since it was loaded or fully exported
    pub fn has_unsaved_edits(&self) -> bool {
        self.dirty
    }

    /// Replace the table with the merge of `batch`.
    pub fn load_batch(&mut self, batch: UploadBatch) {
        if self.dirty {
            warn!("discarding unsaved edits of the previous upload");
        }
        self.table = Table::merge(&batch.files);
        self.failures = batch.failures;
        self.dirty = false;
        info!(
            "loaded {} language(s), {} key(s)",
            self.table.languages().len(),
            self.table.len()
        );
    }

    pub async fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) {
        let batch = upload::read_files(paths).await;
        self.load_batch(batch);
    }

    pub fn load_contents<S: Into<String>>(&mut self, files: Vec<(S, Vec<u8>)>) {
        self.load_batch(upload::from_contents(files));
    }

    /// Load every `.properties` entry of a zip bundle as one upload.
    pub fn load_bundle(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let entries = archive::read_bundle(bytes)?;
        self.load_batch(upload::from_contents(
            entries
                .into_iter()
                .map(|entry| (entry.file_name, entry.contents)),
        ));
        Ok(())
    }

    pub fn load_samples(&mut self) {
        self.load_batch(sample_batch());
    }

    pub fn edit_cell(
        &mut self,
        key: &str,
        language: &str,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.table.edit_cell(key, language, value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn rename_key(&mut self, old_key: &str, new_key: &str) -> Result<(), SessionError> {
        self.table.rename_key(old_key, new_key)?;
        self.dirty = true;
        Ok(())
    }

    /// Append an empty row and return its placeholder key.
    pub fn add_row(&mut self) -> String {
        self.dirty = true;
        let prefix = self.config.key_prefix().to_string();
        self.table.add_row_with_prefix(&prefix)
    }

    pub fn delete_row(&mut self, key: &str) -> bool {
        let removed = self.table.delete_row(key);
        self.dirty |= removed;
        removed
    }

    pub fn sort_by_key(&mut self) {
        self.table.sort_by_key();
        self.dirty = true;
    }

    pub fn next_cell(&self, key: &str, language: &str) -> Result<Option<CellRef>, SessionError> {
        Ok(self.table.next_cell(key, language)?)
    }

    pub fn suggest(&self, key: &str, source_language: &str) -> Result<Option<String>, SessionError> {
        Ok(quality::suggest_translation(&self.table, key, source_language)?)
    }

    pub fn suggestion_sources(
        &self,
        key: &str,
        target_language: &str,
    ) -> Result<Vec<&str>, SessionError> {
        Ok(quality::suggestion_sources(&self.table, key, target_language)?)
    }

    pub fn check(&self, key: &str, language: &str) -> Result<CheckOutcome, SessionError> {
        Ok(quality::check_translation(
            &self.table,
            key,
            language,
            &self.config.quality,
        )?)
    }

    pub fn review(&self) -> Vec<CellIssue> {
        quality::review(&self.table, &self.config.quality)
    }

    pub fn serialize(&self, language: &str) -> Result<String, SessionError> {
        Ok(self.table.serialize(language)?)
    }

    pub fn export_language(&self, dir: &Path, language: &str) -> Result<ExportOutcome, SessionError> {
        let contents = self.table.serialize(language)?;
        Ok(export::write_language_file(
            dir,
            language,
            &contents,
            self.config.export.create_backup,
        )?)
    }

    /// Write every language to `dir`, one file each.
    pub fn export_all(&mut self, dir: &Path) -> Result<Vec<ExportOutcome>, SessionError> {
        let outcomes = self
            .table
            .languages()
            .iter()
            .map(|language| self.export_language(dir, language))
            .collect::<Result<Vec<_>, _>>()?;
        self.dirty = false;
        Ok(outcomes)
    }

    pub fn bundle_bytes(&self) -> Result<Vec<u8>, SessionError> {
        Ok(archive::build_bundle(
            &self.table,
            self.config.export.compression,
        )?)
    }

    /// Write all languages as one zip at `path`.
    pub fn export_bundle(&mut self, path: &Path) -> Result<PathBuf, SessionError> {
        archive::write_bundle(&self.table, path, self.config.export.compression)?;
        self.dirty = false;
        Ok(path.to_path_buf())
    }
}
