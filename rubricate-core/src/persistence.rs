//! File persistence: atomic writes for catalog snapshots and format-aware
//! loading for declarative catalog files.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::Path;

use crate::error::{ConfigError, RubricateError};

/// Atomically write JSON data to a file.
///
/// Serializes `data` to pretty-printed JSON, writes it to a `.tmp` sibling,
/// then renames over the target. Parent directories are created as needed.
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), RubricateError> {
    let json = serde_json::to_string_pretty(data)?;
    atomic_write(path, json.as_bytes())?;
    Ok(())
}

/// Atomically write raw bytes to a file.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load and deserialize JSON from a file.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, RubricateError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

/// Serialization formats accepted for declarative files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Toml,
}

impl DataFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(DataFormat::Json),
            "yaml" | "yml" => Ok(DataFormat::Yaml),
            "toml" => Ok(DataFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T, ConfigError> {
        let parsed = match self {
            DataFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DataFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DataFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::ParseError { message })
    }
}

/// Read `path` and deserialize it according to its extension.
pub fn load_structured<T: DeserializeOwned>(path: &Path) -> Result<T, RubricateError> {
    let format = DataFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let parsed = format.parse(&content).map_err(|e| match e {
        ConfigError::ParseError { message } => ConfigError::ParseError {
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })?;
    Ok(parsed)
}
