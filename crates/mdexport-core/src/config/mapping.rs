//! Mapping and converter choice types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which external renderer converts Markdown files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    #[default]
    Pandoc,
    Typst,
}

impl ConverterKind {
    /// Executable name looked up on `PATH` when no path is configured.
    pub fn default_executable(&self) -> &'static str {
        match self {
            Self::Pandoc => "pandoc",
            Self::Typst => "typst",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pandoc => "Pandoc",
            Self::Typst => "Typst",
        }
    }
}

impl FromStr for ConverterKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pandoc" => Ok(Self::Pandoc),
            "typst" => Ok(Self::Typst),
            _ => Err(Error::InvalidConverter {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_executable())
    }
}

/// Executable override and extra arguments for one converter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConverterSettings {
    /// Path to the executable; `None` means look up the default name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Extra arguments placed before the input/output arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl ConverterSettings {
    /// Reject customized values that are blank.
    pub fn validate(&self, kind: ConverterKind) -> Result<()> {
        if let Some(path) = &self.path
            && path.trim().is_empty()
        {
            return Err(Error::InvalidConverterSetting {
                converter: kind.to_string(),
                reason: "executable path is empty".into(),
            });
        }
        if self.args.iter().any(|arg| arg.is_empty()) {
            return Err(Error::InvalidConverterSetting {
                converter: kind.to_string(),
                reason: "arguments must not be empty strings".into(),
            });
        }
        Ok(())
    }
}

/// The converter selected for a mapping, with its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConverterChoice {
    Pandoc(ConverterSettings),
    Typst(ConverterSettings),
}

impl ConverterChoice {
    pub fn new(kind: ConverterKind, settings: ConverterSettings) -> Self {
        match kind {
            ConverterKind::Pandoc => Self::Pandoc(settings),
            ConverterKind::Typst => Self::Typst(settings),
        }
    }

    /// Pandoc with no overrides.
    pub fn pandoc() -> Self {
        Self::Pandoc(ConverterSettings::default())
    }

    /// Typst with no overrides.
    pub fn typst() -> Self {
        Self::Typst(ConverterSettings::default())
    }

    pub fn kind(&self) -> ConverterKind {
        match self {
            Self::Pandoc(_) => ConverterKind::Pandoc,
            Self::Typst(_) => ConverterKind::Typst,
        }
    }

    pub fn settings(&self) -> &ConverterSettings {
        match self {
            Self::Pandoc(settings) | Self::Typst(settings) => settings,
        }
    }

    /// The configured executable, or the converter's default name.
    pub fn executable(&self) -> &str {
        self.settings()
            .path
            .as_deref()
            .unwrap_or_else(|| self.kind().default_executable())
    }

    pub fn extra_args(&self) -> &[String] {
        &self.settings().args
    }
}

impl Default for ConverterChoice {
    fn default() -> Self {
        Self::pandoc()
    }
}

/// One source directory mirrored into one target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub source: PathBuf,
    pub target: PathBuf,
    pub converter: ConverterChoice,
}

impl Mapping {
    pub fn new(
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        converter: ConverterChoice,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            converter,
        }
    }
}
