/// Format handlers for translation resource files
pub mod properties;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Key -> value mapping of one language file.
pub type PropertyMap = BTreeMap<String, String>;

const PROPERTIES_SUFFIX: &str = ".properties";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Properties,
    Unknown,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "properties" => Self::Properties,
            _ => Self::Unknown,
        }
    }

    /// Detect format from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

/// One uploaded language file after parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    /// Column label, derived from the file name
    pub language: String,
    pub properties: PropertyMap,
}

impl ParsedFile {
    pub fn new(language: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            language: language.into(),
            properties,
        }
    }

    /// A file that contributes its column but no keys (e.g. a failed read).
    pub fn empty(language: impl Into<String>) -> Self {
        Self::new(language, PropertyMap::new())
    }
}

/// Derive the language label from an uploaded file name.
///
/// Any directory part is dropped and a trailing `.properties` suffix is
/// removed; other names are used as-is.
pub fn language_label(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    base.strip_suffix(PROPERTIES_SUFFIX)
        .unwrap_or(base)
        .to_string()
}

/// Trait for format-specific handlers
pub trait FormatHandler: Send + Sync {
    /// Read one file's text into a key -> value mapping
    fn parse(&self, content: &str, language: &str) -> ParsedFile;

    /// Render ordered entries back to file text
    fn serialize(&self, entries: &[(&str, &str)]) -> String;

    /// Get the format this handler supports
    fn format(&self) -> FileFormat;
}
