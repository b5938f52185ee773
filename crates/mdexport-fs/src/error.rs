//! Error types for mdexport-fs

use std::path::PathBuf;

/// Result type for mdexport-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mdexport-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid {format}: {message}")]
    SettingsParse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Could not encode settings for {path} as {format}: {message}")]
    SettingsSerialize {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error(
        "Settings file {path} has unsupported extension '{extension}' (expected .toml, .json, .yaml or .yml)"
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Path {path} is not inside {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying I/O error kind, if this is an I/O failure.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
