//! Mirroring a source tree into a target tree
//!
//! - **diff**: walk both trees and compute the ordered action list
//! - **reconcile**: per-mapping stale-file decision state machine
//! - **engine**: execute actions per mapping and aggregate outcomes
//! - **events**: progress stream consumed by the presentation layer

mod diff;
mod engine;
mod events;
mod outcome;
mod reconcile;

pub use diff::{Action, FileEntry, diff, scan};
pub use engine::SyncEngine;
pub use events::{EventSink, NullSink, SyncEvent, TransferKind};
pub use outcome::{FailureKind, FileFailure, OutcomeStatus, SyncOutcome};
pub use reconcile::{Decision, DecisionSource, Reconciler, Resolution, StalePolicy};
