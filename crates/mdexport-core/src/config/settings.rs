//! Persistent settings file
//!
//! Loaded and saved through [`mdexport_fs::settings`], so the format
//! follows the file extension (TOML by default).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::mapping::{ConverterChoice, ConverterKind, ConverterSettings, Mapping};
use crate::{Error, Result};

/// Default wall-clock limit for one converter invocation
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const CONFIG_DIR_NAME: &str = "mdexport";
const CONFIG_FILE_NAME: &str = "config.toml";

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// `[sync]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Converter used when none is given on the command line
    #[serde(default)]
    pub converter: ConverterKind,
    /// Converter timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            converter: ConverterKind::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// One `[[mappings]]` entry, stored as written (may start with `~`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub source: String,
    pub target: String,
}

/// The settings file: sync defaults, converter settings and mappings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub pandoc: ConverterSettings,
    #[serde(default)]
    pub typst: ConverterSettings,
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
}

impl ExportConfig {
    /// Platform settings location, e.g. `~/.config/mdexport/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(Error::NoHomeDirectory { what: "config" })?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let config = mdexport_fs::settings::load(path)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load the settings file, creating it with defaults if it is missing.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        tracing::info!(path = %path.display(), "Created default configuration");
        Ok(config)
    }

    /// Write the settings file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        mdexport_fs::settings::save(path, self)?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Add a mapping, replacing any existing mapping for the same source.
    ///
    /// Returns `true` if an existing mapping was replaced.
    pub fn add_mapping(&mut self, source: &str, target: &str) -> bool {
        let entry = MappingEntry {
            source: source.to_string(),
            target: target.to_string(),
        };
        match self
            .mappings
            .iter_mut()
            .find(|m| same_location(&m.source, source))
        {
            Some(existing) => {
                tracing::info!(source, target, "Updated mapping");
                *existing = entry;
                true
            }
            None => {
                tracing::info!(source, target, "Added mapping");
                self.mappings.push(entry);
                false
            }
        }
    }

    /// Remove the mapping for `source`. Returns `true` if one was removed.
    pub fn remove_mapping(&mut self, source: &str) -> bool {
        let before = self.mappings.len();
        self.mappings.retain(|m| !same_location(&m.source, source));
        let removed = self.mappings.len() != before;
        if removed {
            tracing::info!(source, "Removed mapping");
        } else {
            tracing::warn!(source, "No mapping to remove");
        }
        removed
    }

    pub fn settings(&self, kind: ConverterKind) -> &ConverterSettings {
        match kind {
            ConverterKind::Pandoc => &self.pandoc,
            ConverterKind::Typst => &self.typst,
        }
    }

    fn settings_mut(&mut self, kind: ConverterKind) -> &mut ConverterSettings {
        match kind {
            ConverterKind::Pandoc => &mut self.pandoc,
            ConverterKind::Typst => &mut self.typst,
        }
    }

    /// Update a converter's executable path and/or arguments.
    ///
    /// `None` leaves the corresponding value untouched. The update is
    /// validated before it is applied.
    pub fn set_converter(
        &mut self,
        kind: ConverterKind,
        path: Option<String>,
        args: Option<Vec<String>>,
    ) -> Result<()> {
        let mut updated = self.settings(kind).clone();
        if let Some(path) = path {
            updated.path = Some(path);
        }
        if let Some(args) = args {
            updated.args = args;
        }
        updated.validate(kind)?;
        tracing::info!(converter = %kind, path = ?updated.path, args = ?updated.args, "Updated converter settings");
        *self.settings_mut(kind) = updated;
        Ok(())
    }

    /// The converter choice for `kind` with its configured settings.
    pub fn converter_choice(&self, kind: ConverterKind) -> ConverterChoice {
        ConverterChoice::new(kind, self.settings(kind).clone())
    }

    /// Converter timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.sync.timeout_secs)
    }

    /// Resolve every stored mapping into engine input.
    ///
    /// `kind` overrides the configured default converter.
    pub fn resolve_mappings(&self, kind: Option<ConverterKind>) -> Result<Vec<Mapping>> {
        let kind = kind.unwrap_or(self.sync.converter);
        let choice = self.converter_choice(kind);
        choice.settings().validate(kind)?;

        self.mappings
            .iter()
            .map(|entry| {
                Ok(Mapping::new(
                    expand_home(&entry.source)?,
                    expand_home(&entry.target)?,
                    choice.clone(),
                ))
            })
            .collect()
    }
}

/// Expand a leading `~` against the user's home directory.
pub fn expand_home(raw: &str) -> Result<PathBuf> {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };
    let home = dirs::home_dir().ok_or(Error::NoHomeDirectory { what: "home" })?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

fn same_location(a: &str, b: &str) -> bool {
    a.trim_end_matches(['/', '\\']) == b.trim_end_matches(['/', '\\'])
}
