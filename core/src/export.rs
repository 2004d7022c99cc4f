use chrono::Local;
use log::info;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const PROPERTIES_EXTENSION: &str = "properties";

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub language: String,
    pub backup_path: Option<PathBuf>,
    pub final_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("Could not back up the previous file: {0}")]
    BackupCreate(String),
    #[error("Target has no parent directory: {0}")]
    NoParent(PathBuf),
}

/// Download/file name of a language column: `<language>.properties`.
pub fn file_name_for(language: &str) -> String {
    format!("{language}.{PROPERTIES_EXTENSION}")
}

/// Write `contents` as `<dir>/<language>.properties`.
///
/// The file is written next to the target and renamed into place. With
/// `backup`, an existing target is first copied to
/// `<language>.properties.bak.<timestamp>`.
pub fn write_language_file(
    dir: &Path,
    language: &str,
    contents: &str,
    backup: bool,
) -> Result<ExportOutcome, ExportError> {
    let target = dir.join(file_name_for(language));
    let backup_path = write_and_swap(&target, contents.as_bytes(), backup)?;
    info!("exported '{}' to {}", language, target.display());

    Ok(ExportOutcome {
        language: language.to_string(),
        backup_path,
        final_path: target,
    })
}

fn write_and_swap(
    target: &Path,
    contents: &[u8],
    backup: bool,
) -> Result<Option<PathBuf>, ExportError> {
    let parent = target
        .parent()
        .ok_or_else(|| ExportError::NoParent(target.to_path_buf()))?;
    fs::create_dir_all(parent)?;

    let backup_path = if backup && target.exists() {
        let timestamp = Local::now().format("%Y%m%d%H%M%S");
        let mut name = target.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".bak.{timestamp}"));
        let candidate = parent.join(name);

        fs::copy(target, &candidate).map_err(|err| ExportError::BackupCreate(err.to_string()))?;
        Some(candidate)
    } else {
        None
    };

    let temp_path = build_temp_path(target);
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&temp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    #[cfg(target_os = "windows")]
    {
        use std::io::ErrorKind;
        if let Err(err) = fs::rename(&temp_path, target) {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(target)?;
                fs::rename(&temp_path, target)?;
            } else {
                return Err(ExportError::Io(err));
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        fs::rename(&temp_path, target)?;
    }

    Ok(backup_path)
}

fn build_temp_path(target: &Path) -> PathBuf {
    let mut temp = target.to_path_buf();
    let pid = std::process::id();
    let suffix = format!("__tmp__pid_{}", pid);
    match temp.file_name() {
        Some(name) => {
            let mut os_string = name.to_os_string();
            os_string.push(suffix);
            temp.set_file_name(os_string);
        }
        None => {
            temp.push(format!("temp_{pid}"));
        }
    }
    temp
}
