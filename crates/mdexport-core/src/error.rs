//! Error types for mdexport-core

use std::path::PathBuf;

/// Result type for mdexport-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mdexport-core operations
///
/// Per-file failures during a sync never surface as `Error`; they are folded
/// into the mapping's `SyncOutcome`. `Error` covers problems that prevent a
/// mapping (or the whole configuration) from being processed at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mapping source directory does not exist
    #[error("Source directory not found: {path}")]
    SourceMissing { path: PathBuf },

    /// Mapping source exists but is not a directory
    #[error("Source is not a directory: {path}")]
    SourceNotDirectory { path: PathBuf },

    /// Mapping target is the source directory itself
    #[error("Output directory is the same as the source directory: {path}")]
    TargetIsSource { path: PathBuf },

    /// Unknown converter name
    #[error("Unknown converter '{name}' (expected 'pandoc' or 'typst')")]
    InvalidConverter { name: String },

    /// Configured executable path or argument is empty
    #[error("Invalid {converter} setting: {reason}")]
    InvalidConverterSetting { converter: String, reason: String },

    /// No home directory to expand `~` against, or no config directory
    #[error("Could not determine the {what} directory")]
    NoHomeDirectory { what: &'static str },

    /// Directory traversal failed
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// The user aborted the run
    #[error("Cancelled by user")]
    Cancelled,

    /// Filesystem error from mdexport-fs
    #[error(transparent)]
    Fs(#[from] mdexport_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error only invalidates a single mapping.
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            Self::SourceMissing { .. }
                | Self::SourceNotDirectory { .. }
                | Self::TargetIsSource { .. }
                | Self::Walk { .. }
        )
    }
}
