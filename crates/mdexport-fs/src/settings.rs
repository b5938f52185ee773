//! Settings file loading and saving
//!
//! The on-disk format follows the file extension, so a user can keep their
//! mdexport settings as TOML (the default), JSON or YAML.

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Serialization format of a settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    Json,
    Yaml,
}

impl SettingsFormat {
    /// Pick the format from `path`'s extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }
}

/// Read and decode the settings file at `path`.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = SettingsFormat::from_path(path)?;
    let content = io::read_text(path)?;
    format.parse(&content).map_err(|message| Error::SettingsParse {
        path: path.to_path_buf(),
        format: format.name(),
        message,
    })
}

/// Encode `value` and write it atomically to `path`, creating parent
/// directories.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let format = SettingsFormat::from_path(path)?;
    let content = format
        .render(value)
        .map_err(|message| Error::SettingsSerialize {
            path: path.to_path_buf(),
            format: format.name(),
            message,
        })?;
    io::write_atomic(path, content.as_bytes())
}
