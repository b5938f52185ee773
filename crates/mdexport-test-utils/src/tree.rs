//! [`TestTree`] builder for source/target mirroring scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a `source/` tree and a `target/` tree.
///
/// Only `source/` is created up front; `target/` appears once something is
/// written into it (or the code under test creates it).
///
/// # Example
///
/// ```rust,no_run
/// use mdexport_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_source("intro.md", "# Intro");
/// tree.write_target("old.pdf", "%PDF");
/// tree.assert_target_exists("old.pdf");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create a temporary directory with an empty `source/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn target(&self) -> PathBuf {
        self.root().join("target")
    }

    /// Write `content` to `relative` under the source tree.
    pub fn write_source(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.source(), relative, content)
    }

    /// Write `content` to `relative` under the target tree.
    pub fn write_target(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.target(), relative, content)
    }

    /// Read a file from the target tree.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_target(&self, relative: &str) -> String {
        let path = self.target().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()))
    }

    /// Every file under `source/`, as sorted forward-slash relative paths.
    pub fn source_files(&self) -> Vec<String> {
        list_files(&self.source())
    }

    /// Every file under `target/`, as sorted forward-slash relative paths.
    pub fn target_files(&self) -> Vec<String> {
        list_files(&self.target())
    }

    /// Assert that `relative` exists in the target tree.
    ///
    /// # Panics
    /// Panics with a descriptive message if the file does not exist.
    pub fn assert_target_exists(&self, relative: &str) {
        let path = self.target().join(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that `relative` does **not** exist in the target tree.
    ///
    /// # Panics
    /// Panics with a descriptive message if the file exists.
    pub fn assert_target_missing(&self, relative: &str) {
        let path = self.target().join(relative);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Recursively list regular files below `root`. Missing roots list as empty.
pub fn list_files(root: &Path) -> Vec<String> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                visit(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.push(parts.join("/"));
            }
        }
    }

    let mut files = Vec::new();
    visit(root, root, &mut files);
    files.sort();
    files
}
