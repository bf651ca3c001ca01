//! Loading of the classification configuration file.
//!
//! The configuration is a flat key-value document mapping lowercase file
//! extensions to destination folder names. JSON is the default format:
//!
//! ```json
//! { "txt": "Documents", "png": "Images", "mp3": "Music" }
//! ```
//!
//! Files with a `.toml` extension are read as TOML instead:
//!
//! ```toml
//! txt = "Documents"
//! png = "Images"
//! ```
//!
//! Beyond "parses as string-to-string data" no validation is performed.

use crate::file_category::ClassificationMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Errors that can occur while loading the classification configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// The file could not be read.
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid key-value document.
    #[error("Invalid configuration in {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },
}

/// On-disk shape of the configuration: a single flat table.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct ClassificationFile {
    folders: HashMap<String, String>,
}

/// Supported configuration syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Loads the classification map from `path`.
///
/// # Errors
///
/// Returns `ConfigError::ConfigNotFound` if the file does not exist,
/// `ConfigError::Io` if it cannot be read and `ConfigError::ConfigInvalid`
/// if it does not parse as a string-to-string mapping.
pub fn load_classification(path: &Path) -> Result<ClassificationMap, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_classification(&content, ConfigFormat::from_path(path)).map_err(
        |reason| ConfigError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        },
    )?;

    tracing::debug!(
        path = %path.display(),
        extensions = entries.len(),
        "loaded classification config"
    );

    Ok(ClassificationMap::new(entries))
}

/// Parses configuration text in the given format.
pub fn parse_classification(
    content: &str,
    format: ConfigFormat,
) -> Result<HashMap<String, String>, String> {
    let file: ClassificationFile = match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
    };
    Ok(file.folders)
}
