//! Configuration for the editor session
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::archive::Compression;
use crate::quality::QualityLimits;
use crate::table::{validate_key, DEFAULT_NEW_KEY_PREFIX};

const CONFIG_DIR_NAME: &str = "properties-editor";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Copy an existing file aside before overwriting it
    pub create_backup: bool,
    pub compression: Compression,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            create_backup: false,
            compression: Compression::Deflated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Prefix of placeholder keys created by "add row"
    pub new_key_prefix: String,
    pub quality: QualityLimits,
    pub export: ExportOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            new_key_prefix: DEFAULT_NEW_KEY_PREFIX.to_string(),
            quality: QualityLimits::default(),
            export: ExportOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;

        match format {
            ConfigFormat::Json => Self::from_json(&content),
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(&content)?),
        }
    }

    /// Save configuration, choosing the format from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => self.to_json()?,
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Load from JSON string (for UI integration)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert to JSON string (for UI integration)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `<config dir>/properties-editor/config.json`, when the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// The user's config file, or defaults when it is absent or unreadable.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(Self::default_path().as_deref())
    }

    pub fn load_or_default_from(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.exists() => Self::load(path).unwrap_or_else(|err| {
                warn!("ignoring config at {}: {}", path.display(), err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// The configured key prefix, or the default when it would produce
    /// keys that cannot be written back.
    pub fn key_prefix(&self) -> &str {
        if validate_key(&self.new_key_prefix).is_ok() {
            &self.new_key_prefix
        } else {
            DEFAULT_NEW_KEY_PREFIX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.new_key_prefix, "new.key");
        assert_eq!(config.quality.min_ratio, 0.3);
        assert_eq!(config.quality.max_ratio, 3.0);
        assert!(!config.export.create_backup);
        assert_eq!(config.export.compression, Compression::Deflated);
    }

    #[test]
    fn test_json_serialization() {
        let mut config = EditorConfig::default();
        config.export.create_backup = true;
        let json = config.to_json().unwrap();
        assert!(json.contains("\"newKeyPrefix\""));

        let deserialized = EditorConfig::from_json(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "quality": { "maxRatio": 5.0 } }"#).unwrap();
        assert_eq!(config.quality.max_ratio, 5.0);
        assert_eq!(config.quality.min_ratio, 0.3);
        assert_eq!(config.new_key_prefix, "new.key");
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editor.yml");
        fs::write(
            &path,
            "newKeyPrefix: custom\nexport:\n  createBackup: true\n  compression: stored\n",
        )
        .unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.key_prefix(), "custom");
        assert!(config.export.create_backup);
        assert_eq!(config.export.compression, Compression::Stored);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut config = EditorConfig::default();
        config.new_key_prefix = "draft".into();

        for name in ["nested/config.json", "config.yaml"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(EditorConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert_eq!(EditorConfig::load_or_default_from(Some(missing.as_path())), EditorConfig::default());
        assert_eq!(EditorConfig::load_or_default_from(None), EditorConfig::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(EditorConfig::load_or_default_from(Some(broken.as_path())), EditorConfig::default());

        let valid = dir.path().join("config.json");
        fs::write(&valid, r#"{ "newKeyPrefix": "ui.new" }"#).unwrap();
        assert_eq!(
            EditorConfig::load_or_default_from(Some(valid.as_path())).key_prefix(),
            "ui.new"
        );
    }

    #[test]
    fn test_invalid_prefix_falls_back() {
        let config = EditorConfig {
            new_key_prefix: "bad=prefix".into(),
            ..EditorConfig::default()
        };
        assert_eq!(config.key_prefix(), "new.key");
    }
}
