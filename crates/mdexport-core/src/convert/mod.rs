//! Converter adapter
//!
//! Markdown files are rendered by an external program. The engine only sees
//! the [`Converter`] capability, so tests can substitute doubles that
//! simulate success, failure or timeouts without spawning processes.

mod invocation;
mod process;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{ConverterChoice, ConverterKind};
use crate::sync::FailureKind;

pub use invocation::Invocation;
pub use process::ProcessConverter;
pub(crate) use process::is_staging_file;

/// Renders one Markdown file into one output document.
pub trait Converter {
    /// Render `markdown` into `output`.
    ///
    /// Succeeds only if the converter exits zero and a non-empty file exists
    /// at `output` afterwards. Parent directories of `output` are created as
    /// needed; no other file is touched.
    fn render(
        &self,
        markdown: &Path,
        output: &Path,
        choice: &ConverterChoice,
    ) -> Result<(), ConversionError>;
}

/// Why a single conversion failed
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{converter} executable not found: {executable}")]
    ExecutableNotFound {
        converter: ConverterKind,
        executable: String,
    },

    #[error("{converter} exited with code {code}: {}", summarize(.stderr))]
    NonZeroExit {
        converter: ConverterKind,
        code: i32,
        stderr: String,
    },

    #[error("{converter} exited successfully but produced no output at {}", .path.display())]
    NoOutputProduced {
        converter: ConverterKind,
        path: PathBuf,
        stderr: String,
    },

    #[error("{converter} timed out after {}s", .timeout.as_secs())]
    Timeout {
        converter: ConverterKind,
        timeout: Duration,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// The outcome category this error is reported under.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ExecutableNotFound { .. } => FailureKind::ExecutableNotFound,
            Self::NonZeroExit { code, .. } => FailureKind::NonZeroExit { code: *code },
            Self::NoOutputProduced { .. } => FailureKind::NoOutputProduced,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Io { .. } => FailureKind::Filesystem,
        }
    }

    /// Captured converter stderr, when there is any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } | Self::NoOutputProduced { stderr, .. } => {
                let trimmed = stderr.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}

/// First non-empty line of converter stderr, for one-line messages.
fn summarize(stderr: &str) -> &str {
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no diagnostic output")
}
