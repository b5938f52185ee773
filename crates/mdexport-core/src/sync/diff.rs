//! Tree diff
//!
//! Walks the source and target trees of one mapping and computes the
//! ordered action list: copies and conversions for every source file, then
//! stale candidates for target files no source file maps to.
//!
//! Every action carries the native relative path it was discovered with.
//! Matching and all file I/O use those native paths, so file names that are
//! not valid UTF-8 still round-trip; [`NormalizedPath`] is only used for
//! ordering, display and serialization.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mdexport_fs::NormalizedPath;
use serde::Serialize;
use walkdir::WalkDir;

use crate::classify::{FileKind, RENDERED_EXTENSION, classify, target_path_for};
use crate::config::Mapping;
use crate::convert::is_staging_file;
use crate::{Error, Result};

/// A regular file discovered under a tree root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub relative_path: NormalizedPath,
    /// Path relative to the root, exactly as found on disk
    pub native_path: PathBuf,
    pub kind: FileKind,
}

/// One step required to bring the target in line with the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum Action {
    /// Copy a source file unchanged
    Copy {
        relative_path: NormalizedPath,
        #[serde(skip)]
        native_path: PathBuf,
    },
    /// Render a Markdown source file to `output_path` (target-relative)
    Convert {
        relative_path: NormalizedPath,
        output_path: NormalizedPath,
        #[serde(skip)]
        native_path: PathBuf,
        #[serde(skip)]
        native_output: PathBuf,
    },
    /// Target file with no corresponding source file
    StaleCandidate {
        relative_path: NormalizedPath,
        #[serde(skip)]
        native_path: PathBuf,
    },
}

impl Action {
    /// The relative path this action is about (source side for copy and
    /// convert, target side for stale candidates).
    pub fn relative_path(&self) -> &NormalizedPath {
        match self {
            Self::Copy { relative_path, .. }
            | Self::Convert { relative_path, .. }
            | Self::StaleCandidate { relative_path, .. } => relative_path,
        }
    }

    /// The target-relative path this action writes or removes.
    pub fn target_path(&self) -> &NormalizedPath {
        match self {
            Self::Convert { output_path, .. } => output_path,
            other => other.relative_path(),
        }
    }

    /// Native counterpart of [`Action::relative_path`].
    pub fn native_path(&self) -> &Path {
        match self {
            Self::Copy { native_path, .. }
            | Self::Convert { native_path, .. }
            | Self::StaleCandidate { native_path, .. } => native_path,
        }
    }

    /// Native counterpart of [`Action::target_path`].
    pub fn native_target_path(&self) -> &Path {
        match self {
            Self::Convert { native_output, .. } => native_output,
            other => other.native_path(),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleCandidate { .. })
    }
}

/// Compute the action list for `mapping`.
///
/// The source root must exist. A missing target yields no stale candidates.
/// A target that resolves to the source directory itself is rejected with
/// [`Error::TargetIsSource`].
/// Output is sorted by relative path within each group, so identical trees
/// always produce identical sequences.
pub fn diff(mapping: &Mapping) -> Result<Vec<Action>> {
    let source_root = resolve_root(&mapping.source);
    let target_root = resolve_root(&mapping.target);
    // Every source file would otherwise be a stale candidate of itself
    if source_root == target_root {
        return Err(Error::TargetIsSource {
            path: mapping.source.clone(),
        });
    }

    let sources = scan(&source_root, Some(&target_root))?;
    let mut actions = source_actions(&sources);

    let expected: HashSet<&Path> = actions.iter().map(Action::native_target_path).collect();
    let stale: Vec<Action> = if target_root.is_dir() {
        scan(&target_root, Some(&source_root))?
            .into_iter()
            .filter(|entry| !expected.contains(entry.native_path.as_path()))
            .filter(|entry| {
                let leftover = is_staging_file(&entry.native_path);
                if leftover {
                    tracing::warn!(
                        path = %entry.relative_path,
                        "Ignoring converter staging file left behind by an interrupted run"
                    );
                }
                !leftover
            })
            .map(|entry| Action::StaleCandidate {
                relative_path: entry.relative_path,
                native_path: entry.native_path,
            })
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        source = %mapping.source.display(),
        actions = actions.len(),
        stale = stale.len(),
        "Computed tree diff"
    );
    actions.extend(stale);
    Ok(actions)
}

/// Enumerate every regular file under `root`, sorted by relative path.
///
/// `exclude` is skipped entirely when it lies inside `root` (a target nested
/// in its own source, or the reverse). Unreadable entries below the root are
/// logged and skipped.
pub fn scan(root: &Path, exclude: Option<&Path>) -> Result<Vec<FileEntry>> {
    let exclude = exclude.filter(|dir| *dir != root && dir.starts_with(root));
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| exclude.is_none_or(|dir| e.path() != dir));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::Walk {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let relative_path = NormalizedPath::relative_to(entry.path(), root)?;
        let native_path = entry
            .path()
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .map_err(|_| mdexport_fs::Error::OutsideRoot {
                path: entry.path().to_path_buf(),
                root: root.to_path_buf(),
            })?;
        let kind = classify(&relative_path);
        entries.push(FileEntry {
            relative_path,
            native_path,
            kind,
        });
    }

    // Lossy names can compare equal; the native path keeps the order total
    entries.sort_by(|a, b| {
        a.relative_path
            .cmp(&b.relative_path)
            .then_with(|| a.native_path.cmp(&b.native_path))
    });
    Ok(entries)
}

/// Copy and convert actions for sorted source entries.
///
/// When two source files map to the same target path, a conversion beats a
/// copy and otherwise the first in order wins.
fn source_actions(sources: &[FileEntry]) -> Vec<Action> {
    let converted: HashSet<PathBuf> = sources
        .iter()
        .filter(|e| e.kind == FileKind::Markdown)
        .map(native_output_for)
        .collect();

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut actions = Vec::with_capacity(sources.len());
    for entry in sources {
        let native_output = native_output_for(entry);
        let shadowed = entry.kind == FileKind::Other && converted.contains(&native_output);
        if shadowed || claimed.contains(&native_output) {
            tracing::warn!(
                path = %entry.relative_path,
                target = %target_path_for(&entry.relative_path, entry.kind),
                "Skipping source file whose target is produced by another file"
            );
            continue;
        }
        claimed.insert(native_output.clone());

        actions.push(match entry.kind {
            FileKind::Markdown => Action::Convert {
                relative_path: entry.relative_path.clone(),
                output_path: target_path_for(&entry.relative_path, entry.kind),
                native_path: entry.native_path.clone(),
                native_output,
            },
            FileKind::Other => Action::Copy {
                relative_path: entry.relative_path.clone(),
                native_path: entry.native_path.clone(),
            },
        });
    }
    actions
}

/// Native target-relative path a source entry is mirrored to.
fn native_output_for(entry: &FileEntry) -> PathBuf {
    match entry.kind {
        FileKind::Markdown => entry.native_path.with_extension(RENDERED_EXTENSION),
        FileKind::Other => entry.native_path.clone(),
    }
}

/// Canonical form of `root` when it exists, so nested-root checks compare
/// like with like.
fn resolve_root(root: &Path) -> PathBuf {
    std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
}
