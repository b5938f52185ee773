//! File classification
//!
//! Decides from the file name alone whether a file is rendered or copied.

use mdexport_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Extension that marks a file as convertible Markdown (compared case-insensitively)
pub const MARKDOWN_EXTENSION: &str = "md";

/// Extension of rendered documents in the target tree
pub const RENDERED_EXTENSION: &str = "pdf";

/// How a source file is mirrored into the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Rendered through the converter
    Markdown,
    /// Copied unchanged
    Other,
}

/// Classify a file by its extension. No content inspection.
pub fn classify(path: &NormalizedPath) -> FileKind {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION) => FileKind::Markdown,
        _ => FileKind::Other,
    }
}

/// The target-relative path a source file is mirrored to.
pub fn target_path_for(relative: &NormalizedPath, kind: FileKind) -> NormalizedPath {
    match kind {
        FileKind::Markdown => relative.with_extension(RENDERED_EXTENSION),
        FileKind::Other => relative.clone(),
    }
}
