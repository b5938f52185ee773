//! Progress events for the presentation layer

use std::path::PathBuf;

use mdexport_fs::NormalizedPath;

use super::outcome::SyncOutcome;
use super::reconcile::Resolution;

/// Whether a processed source file was copied or converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Copy,
    Convert,
}

/// Something that happened during a sync run
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    MappingStarted {
        source: PathBuf,
        target: PathBuf,
    },
    /// A copy or conversion finished; `outcome` carries the failure message
    FileProcessed {
        relative_path: NormalizedPath,
        target_path: NormalizedPath,
        kind: TransferKind,
        outcome: Result<(), String>,
    },
    /// A decision is about to be requested for a stale file
    StaleFilePrompt {
        relative_path: NormalizedPath,
    },
    StaleFileResolved {
        relative_path: NormalizedPath,
        resolution: Resolution,
    },
    MappingFinished {
        outcome: SyncOutcome,
    },
}

/// Receives events as the engine produces them.
pub trait EventSink {
    fn on_event(&mut self, event: &SyncEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &SyncEvent) {}
}

impl EventSink for Vec<SyncEvent> {
    fn on_event(&mut self, event: &SyncEvent) {
        self.push(event.clone());
    }
}
