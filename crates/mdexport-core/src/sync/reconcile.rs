//! Stale-file reconciliation
//!
//! Each stale candidate is either resolved by an active sticky mode or by
//! asking a [`DecisionSource`]. Choosing [`Decision::DeleteAll`] or
//! [`Decision::SkipAll`] makes that choice sticky for the rest of the
//! mapping. A fresh [`Reconciler`] is used for every mapping, so sticky
//! modes never leak into the next one.

use std::path::Path;

use mdexport_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use super::events::{EventSink, SyncEvent};
use crate::Result;

/// Answer to a stale-file prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    Delete,
    Skip,
    DeleteAll,
    SkipAll,
}

impl Decision {
    /// All four choices, in prompt order.
    pub const ALL: [Decision; 4] = [
        Decision::Delete,
        Decision::Skip,
        Decision::DeleteAll,
        Decision::SkipAll,
    ];

    pub fn deletes(self) -> bool {
        matches!(self, Self::Delete | Self::DeleteAll)
    }

    pub fn is_sticky(self) -> bool {
        matches!(self, Self::DeleteAll | Self::SkipAll)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Delete => "Delete this file",
            Self::Skip => "Skip this file",
            Self::DeleteAll => "Delete all remaining stale files",
            Self::SkipAll => "Skip all remaining stale files",
        }
    }
}

/// Supplies decisions for stale files, typically by asking the user.
pub trait DecisionSource {
    /// Decide what happens to the stale file at `relative_path`.
    ///
    /// Returning [`crate::Error::Cancelled`] aborts the whole run.
    fn decide(&mut self, relative_path: &NormalizedPath) -> Result<Decision>;
}

impl<F> DecisionSource for F
where
    F: FnMut(&NormalizedPath) -> Result<Decision>,
{
    fn decide(&mut self, relative_path: &NormalizedPath) -> Result<Decision> {
        self(relative_path)
    }
}

/// Starting mode for a mapping's reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Ask for every candidate until a sticky choice is made
    #[default]
    Prompt,
    DeleteAll,
    SkipAll,
}

/// What happened to one stale candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "resolution")]
pub enum Resolution {
    Deleted,
    /// Left in place; `sticky` if no prompt was shown for it
    Skipped { sticky: bool },
    /// Deletion was chosen but failed
    Failed { message: String },
}

/// Per-mapping reconciliation state
#[derive(Debug, Default)]
pub struct Reconciler {
    sticky: Option<Decision>,
}

impl Reconciler {
    pub fn new(policy: StalePolicy) -> Self {
        let sticky = match policy {
            StalePolicy::Prompt => None,
            StalePolicy::DeleteAll => Some(Decision::DeleteAll),
            StalePolicy::SkipAll => Some(Decision::SkipAll),
        };
        Self { sticky }
    }

    /// The active sticky decision, if any
    pub fn sticky(&self) -> Option<Decision> {
        self.sticky
    }

    /// Resolve the stale candidate stored at `path`, reported to the user as
    /// `relative_path`.
    ///
    /// Prompts only while no sticky mode is active. Deletion failures are
    /// returned as [`Resolution::Failed`] and leave the sticky mode intact.
    /// Errors from the decision source are passed through unchanged.
    pub fn resolve(
        &mut self,
        path: &Path,
        relative_path: &NormalizedPath,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> Result<Resolution> {
        let (decision, prompted) = match self.sticky {
            Some(decision) => (decision, false),
            None => {
                sink.on_event(&SyncEvent::StaleFilePrompt {
                    relative_path: relative_path.clone(),
                });
                let decision = decisions.decide(relative_path)?;
                if decision.is_sticky() {
                    tracing::info!(?decision, "Applying decision to remaining stale files");
                    self.sticky = Some(decision);
                }
                (decision, true)
            }
        };

        let resolution = if decision.deletes() {
            match mdexport_fs::io::remove_file(path) {
                Ok(()) => Resolution::Deleted,
                Err(e) => {
                    tracing::error!(path = %relative_path, error = %e, "Failed to delete stale file");
                    Resolution::Failed {
                        message: e.to_string(),
                    }
                }
            }
        } else {
            Resolution::Skipped {
                sticky: !prompted,
            }
        };

        sink.on_event(&SyncEvent::StaleFileResolved {
            relative_path: relative_path.clone(),
            resolution: resolution.clone(),
        });
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::sync::NullSink;

    struct Always(Decision);

    impl DecisionSource for Always {
        fn decide(&mut self, _relative_path: &NormalizedPath) -> Result<Decision> {
            Ok(self.0)
        }
    }

    struct Refuse;

    impl DecisionSource for Refuse {
        fn decide(&mut self, _relative_path: &NormalizedPath) -> Result<Decision> {
            Err(Error::Cancelled)
        }
    }

    #[test]
    fn skip_leaves_file_and_stays_prompting() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("old.pdf"), "x").unwrap();
        let mut reconciler = Reconciler::new(StalePolicy::Prompt);

        let resolution = reconciler
            .resolve(
                &temp.path().join("old.pdf"),
                &NormalizedPath::new("old.pdf"),
                &mut Always(Decision::Skip),
                &mut NullSink,
            )
            .unwrap();

        assert_eq!(resolution, Resolution::Skipped { sticky: false });
        assert!(temp.path().join("old.pdf").exists());
        assert_eq!(reconciler.sticky(), None);
    }

    #[test]
    fn delete_all_becomes_sticky() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("old.pdf"), "x").unwrap();
        let mut reconciler = Reconciler::default();

        let resolution = reconciler
            .resolve(
                &temp.path().join("old.pdf"),
                &NormalizedPath::new("old.pdf"),
                &mut Always(Decision::DeleteAll),
                &mut NullSink,
            )
            .unwrap();

        assert_eq!(resolution, Resolution::Deleted);
        assert!(!temp.path().join("old.pdf").exists());
        assert_eq!(reconciler.sticky(), Some(Decision::DeleteAll));
    }

    #[test]
    fn sticky_policy_never_consults_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut reconciler = Reconciler::new(StalePolicy::SkipAll);

        let resolution = reconciler
            .resolve(
                &temp.path().join("gone.pdf"),
                &NormalizedPath::new("gone.pdf"),
                &mut Refuse,
                &mut NullSink,
            )
            .unwrap();

        assert_eq!(resolution, Resolution::Skipped { sticky: true });
    }

    #[test]
    fn cancellation_propagates() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut reconciler = Reconciler::default();
        let result = reconciler.resolve(
            &temp.path().join("a.pdf"),
            &NormalizedPath::new("a.pdf"),
            &mut Refuse,
            &mut NullSink,
        );
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn deletes_file_with_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(OsStr::from_bytes(b"old-caf\xe9.pdf"));
        std::fs::write(&path, "x").unwrap();
        let mut reconciler = Reconciler::new(StalePolicy::DeleteAll);

        let resolution = reconciler
            .resolve(
                &path,
                &NormalizedPath::new(&path),
                &mut Refuse,
                &mut NullSink,
            )
            .unwrap();

        assert_eq!(resolution, Resolution::Deleted);
        assert!(!path.exists());
    }

    #[test]
    fn decision_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Decision::DeleteAll).unwrap(),
            "\"delete-all\""
        );
    }
}
