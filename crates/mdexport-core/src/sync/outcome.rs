//! Per-mapping results

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use mdexport_fs::NormalizedPath;
use serde::Serialize;

use crate::config::Mapping;

/// Cause of a single failed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FailureKind {
    ExecutableNotFound,
    NonZeroExit { code: i32 },
    NoOutputProduced,
    Timeout,
    /// Copy, delete or directory creation failed
    Filesystem,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutableNotFound => write!(f, "executable not found"),
            Self::NonZeroExit { code } => write!(f, "exit code {code}"),
            Self::NoOutputProduced => write!(f, "no output produced"),
            Self::Timeout => write!(f, "timed out"),
            Self::Filesystem => write!(f, "filesystem error"),
        }
    }
}

/// One failed file, with the path relative to its mapping root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub relative_path: NormalizedPath,
    pub kind: FailureKind,
    pub message: String,
}

/// How a mapping's run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OutcomeStatus {
    /// Every action was attempted
    Completed,
    /// The user aborted; unattempted actions are counted as skipped
    Cancelled,
    /// The mapping could not be processed at all
    Aborted { reason: String },
}

/// Aggregate result of syncing one mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub source: PathBuf,
    pub target: PathBuf,
    pub copied: usize,
    pub converted: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<FileFailure>,
    pub status: OutcomeStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncOutcome {
    /// Empty outcome for `mapping`, started now.
    pub fn begin(mapping: &Mapping) -> Self {
        let now = Utc::now();
        Self {
            source: mapping.source.clone(),
            target: mapping.target.clone(),
            copied: 0,
            converted: 0,
            deleted: 0,
            skipped: 0,
            failed: 0,
            failures: Vec::new(),
            status: OutcomeStatus::Completed,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn record_failure(
        &mut self,
        relative_path: NormalizedPath,
        kind: FailureKind,
        message: impl Into<String>,
    ) {
        self.failed += 1;
        self.failures.push(FileFailure {
            relative_path,
            kind,
            message: message.into(),
        });
    }

    /// Count `remaining` unattempted actions as skipped and mark the run cancelled.
    pub fn cancel(&mut self, remaining: usize) {
        self.skipped += remaining;
        self.status = OutcomeStatus::Cancelled;
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.status = OutcomeStatus::Aborted {
            reason: reason.into(),
        };
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Whether anything went wrong: a failed file or an aborted mapping.
    pub fn has_errors(&self) -> bool {
        self.failed > 0 || matches!(self.status, OutcomeStatus::Aborted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OutcomeStatus::Cancelled
    }

    /// Total number of files that were acted on or accounted for.
    pub fn total(&self) -> usize {
        self.copied + self.converted + self.deleted + self.skipped + self.failed
    }
}
