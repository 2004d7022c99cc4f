//! Key-aligned translation table
//!
//! Rows are keyed by property key, columns are languages in upload order.
//! Every row carries exactly one value per language; a missing translation
//! is an empty string.

use std::collections::BTreeSet;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::formats::properties::PropertiesHandler;
use crate::formats::{FormatHandler, ParsedFile, PropertyMap};

/// Prefix of keys synthesised by [`Table::add_row`].
pub const DEFAULT_NEW_KEY_PREFIX: &str = "new.key";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Key already exists: {0}")]
    DuplicateKey(String),

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub key: String,
    /// One value per language, aligned with [`Table::languages`]
    pub values: Vec<String>,
}

/// Address of a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    pub key: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    languages: Vec<String>,
    rows: Vec<Row>,
    #[serde(skip)]
    next_row_id: u64,
}

// The key counter is bookkeeping, not content.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.languages == other.languages && self.rows == other.rows
    }
}

impl Eq for Table {}

/// Reject keys that would not survive a serialize/parse round trip.
pub fn validate_key(key: &str) -> Result<(), TableError> {
    let invalid = |reason| {
        Err(TableError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };

    if key.trim().is_empty() {
        return invalid("key must not be empty");
    }
    if key.trim() != key {
        return invalid("key must not start or end with whitespace");
    }
    if key.contains('=') {
        return invalid("key must not contain '='");
    }
    if key.contains(['\n', '\r']) {
        return invalid("key must not contain line breaks");
    }
    if key.starts_with('#') || key.starts_with('!') {
        return invalid("key must not start with a comment marker");
    }
    Ok(())
}

/// Normalise a cell value so it reads back unchanged after serialize/parse.
///
/// Surrounding whitespace is trimmed (the parser trims it too); line breaks
/// are rejected since they would start a new entry in the file.
pub fn validate_value<'a>(key: &str, value: &'a str) -> Result<&'a str, TableError> {
    if value.contains(['\n', '\r']) {
        return Err(TableError::InvalidValue {
            key: key.to_string(),
            reason: "value must not contain line breaks",
        });
    }
    Ok(value.trim())
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from every parsed file of one upload.
    ///
    /// Columns follow upload order. A repeated language label keeps the
    /// column of its first occurrence and takes the later file's mapping.
    /// Rows are the union of all keys, sorted ascending by byte order.
    pub fn merge(files: &[ParsedFile]) -> Self {
        let mut languages: Vec<String> = Vec::with_capacity(files.len());
        let mut columns: Vec<&PropertyMap> = Vec::with_capacity(files.len());

        for file in files {
            match languages.iter().position(|lang| lang == &file.language) {
                Some(index) => {
                    warn!(
                        "language '{}' uploaded more than once; using the last file",
                        file.language
                    );
                    columns[index] = &file.properties;
                }
                None => {
                    languages.push(file.language.clone());
                    columns.push(&file.properties);
                }
            }
        }

        let keys: BTreeSet<&str> = columns
            .iter()
            .flat_map(|column| column.keys().map(String::as_str))
            .collect();

        let rows: Vec<Row> = keys
            .into_iter()
            .map(|key| Row {
                key: key.to_string(),
                values: columns
                    .iter()
                    .map(|column| column.get(key).cloned().unwrap_or_default())
                    .collect(),
            })
            .collect();

        debug!(
            "merged {} language(s) into {} row(s)",
            languages.len(),
            rows.len()
        );

        Self {
            languages,
            rows,
            next_row_id: 0,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn value(&self, key: &str, language: &str) -> Result<&str, TableError> {
        let column = self.language_index(language)?;
        let row = self
            .row(key)
            .ok_or_else(|| TableError::UnknownKey(key.to_string()))?;
        Ok(row.values[column].as_str())
    }

    /// The mapping of one language column, empty values included.
    pub fn column(&self, language: &str) -> Result<PropertyMap, TableError> {
        let column = self.language_index(language)?;
        Ok(self
            .rows
            .iter()
            .map(|row| (row.key.clone(), row.values[column].clone()))
            .collect())
    }

    /// Every empty cell, row-major.
    pub fn missing_cells(&self) -> Vec<CellRef> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.values
                    .iter()
                    .zip(&self.languages)
                    .filter(|(value, _)| value.is_empty())
                    .map(|(_, language)| CellRef {
                        key: row.key.clone(),
                        language: language.clone(),
                    })
            })
            .collect()
    }

    pub fn edit_cell(
        &mut self,
        key: &str,
        language: &str,
        value: impl Into<String>,
    ) -> Result<(), TableError> {
        let column = self.language_index(language)?;
        let index = self
            .position(key)
            .ok_or_else(|| TableError::UnknownKey(key.to_string()))?;
        let value = value.into();
        let value = validate_value(key, &value)?;
        self.rows[index].values[column] = value.to_string();
        Ok(())
    }

    /// Rename a row in place. Position and values are untouched.
    pub fn rename_key(&mut self, old_key: &str, new_key: &str) -> Result<(), TableError> {
        let new_key = new_key.trim();
        if old_key == new_key {
            return Ok(());
        }
        validate_key(new_key)?;

        let index = self
            .position(old_key)
            .ok_or_else(|| TableError::UnknownKey(old_key.to_string()))?;
        if self.contains_key(new_key) {
            return Err(TableError::DuplicateKey(new_key.to_string()));
        }

        self.rows[index].key = new_key.to_string();
        Ok(())
    }

    /// Append an empty row under a fresh placeholder key and return the key.
    pub fn add_row(&mut self) -> String {
        self.add_row_with_prefix(DEFAULT_NEW_KEY_PREFIX)
    }

    pub fn add_row_with_prefix(&mut self, prefix: &str) -> String {
        let key = loop {
            self.next_row_id += 1;
            let candidate = format!("{}.{}", prefix, self.next_row_id);
            if !self.contains_key(&candidate) {
                break candidate;
            }
        };

        self.rows.push(Row {
            key: key.clone(),
            values: vec![String::new(); self.languages.len()],
        });
        key
    }

    /// Remove the row with `key`; returns whether a row was removed.
    pub fn delete_row(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn sort_by_key(&mut self) {
        self.rows.sort_by(|a, b| a.key.cmp(&b.key));
    }

    /// The cell reached by tabbing from (`key`, `language`): the next
    /// language in the row, else the first language of the next row.
    /// `None` past the last cell of the table.
    pub fn next_cell(&self, key: &str, language: &str) -> Result<Option<CellRef>, TableError> {
        let column = self.language_index(language)?;
        let index = self
            .position(key)
            .ok_or_else(|| TableError::UnknownKey(key.to_string()))?;

        let (row, column) = if column + 1 < self.languages.len() {
            (index, column + 1)
        } else if index + 1 < self.rows.len() {
            (index + 1, 0)
        } else {
            return Ok(None);
        };

        Ok(Some(CellRef {
            key: self.rows[row].key.clone(),
            language: self.languages[column].clone(),
        }))
    }

    /// Render one language column as `.properties` text in row order.
    pub fn serialize(&self, language: &str) -> Result<String, TableError> {
        let column = self.language_index(language)?;
        let entries: Vec<(&str, &str)> = self
            .rows
            .iter()
            .map(|row| (row.key.as_str(), row.values[column].as_str()))
            .collect();
        Ok(PropertiesHandler::new().serialize(&entries))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.key == key)
    }

    fn language_index(&self, language: &str) -> Result<usize, TableError> {
        self.languages
            .iter()
            .position(|lang| lang == language)
            .ok_or_else(|| TableError::UnknownLanguage(language.to_string()))
    }
}
