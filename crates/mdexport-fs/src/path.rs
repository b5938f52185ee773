//! Normalized path handling for cross-platform compatibility

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Used for ordering, display and serialization of tree-relative paths so
/// that plans and outcomes read the same on every host. File names that are
/// not valid UTF-8 are rendered lossily, so I/O always goes through the
/// native path the entry was discovered with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Compute the path of `path` relative to `root`.
    ///
    /// Fails if `path` does not live under `root`.
    pub fn relative_to(path: &Path, root: &Path) -> Result<Self> {
        let relative = path.strip_prefix(root).map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(Self {
            inner: segments.join("/"),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    ///
    /// Dotfiles such as `.gitignore` have no extension.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Replace the extension of the final component, or append one.
    pub fn with_extension(&self, extension: &str) -> Self {
        let stem_len = match self.extension() {
            Some(ext) => self.inner.len() - ext.len() - 1,
            None => self.inner.trim_end_matches('/').len(),
        };
        Self {
            inner: format!("{}.{}", &self.inner[..stem_len], extension),
        }
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<NormalizedPath> for String {
    fn from(p: NormalizedPath) -> Self {
        p.inner
    }
}
