//! Configuration management for BookBits

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::export::ExportFormat;

const ANNOTATION_DIR: &str =
    "Library/Containers/com.apple.iBooksX/Data/Documents/AEAnnotation";
const LIBRARY_DIR: &str = "Library/Containers/com.apple.iBooksX/Data/Documents/BKLibrary";

#[derive(Debug, Clone)]
pub struct Config {
    pub stores: StoreConfig,
    pub export: ExportConfig,
}

/// Where the Apple Books SQLite files live
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding `AEAnnotation*.sqlite`
    pub annotation_dir: PathBuf,
    /// Directory holding `BKLibrary*.sqlite`
    pub library_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub format: ExportFormat,
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map(PathBuf::from).unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        let home = home_dir();
        Config {
            stores: StoreConfig {
                annotation_dir: home.join(ANNOTATION_DIR),
                library_dir: home.join(LIBRARY_DIR),
            },
            export: ExportConfig {
                format: ExportFormat::Markdown,
            },
        }
    }
}

impl Config {
    /// Load configuration from `BOOKBITS_*` environment variables
    ///
    /// Each unset variable keeps its default. An unusable `BOOKBITS_FORMAT`
    /// is logged and only the format falls back.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let defaults = Config::default();

        let format = match lookup("BOOKBITS_FORMAT") {
            Some(value) => parse_format(&value).unwrap_or_else(|e| {
                tracing::warn!("Ignoring BOOKBITS_FORMAT: {}, using {}", e, defaults.export.format);
                defaults.export.format
            }),
            None => defaults.export.format,
        };

        Config {
            stores: StoreConfig {
                annotation_dir: lookup("BOOKBITS_ANNOTATION_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.stores.annotation_dir),
                library_dir: lookup("BOOKBITS_LIBRARY_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.stores.library_dir),
            },
            export: ExportConfig { format },
        }
    }
}

fn parse_format(value: &OsStr) -> Result<ExportFormat> {
    value
        .to_str()
        .ok_or_else(|| AppError::Config("BOOKBITS_FORMAT is not valid unicode".to_string()))?
        .parse::<ExportFormat>()
}

impl StoreConfig {
    /// Path of the annotation database
    pub fn annotation_db(&self) -> Result<PathBuf> {
        find_database(&self.annotation_dir, "AEAnnotation")
    }

    /// Path of the library database
    pub fn library_db(&self) -> Result<PathBuf> {
        find_database(&self.library_dir, "BKLibrary")
    }
}

/// Find the first `<prefix>*.sqlite` file in a directory, by file name
pub fn find_database(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        AppError::NotFound(format!("database directory {}: {}", dir.display(), e))
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(".sqlite"))
        })
        .collect();
    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        AppError::NotFound(format!(
            "no database matching {}*.sqlite in {}",
            prefix,
            dir.display()
        ))
    })
}
