//! SyncEngine implementation
//!
//! The SyncEngine sequences one mapping at a time: diff the trees, copy and
//! convert every source file, then reconcile stale target files. Per-file
//! failures are folded into the mapping's [`SyncOutcome`]; only an unusable
//! source aborts a mapping, and nothing aborts the whole run except
//! cancellation.

use super::diff::{Action, diff};
use super::events::{EventSink, SyncEvent, TransferKind};
use super::outcome::{FailureKind, SyncOutcome};
use super::reconcile::{DecisionSource, Reconciler, Resolution, StalePolicy};
use crate::cancellation::CancellationToken;
use crate::config::Mapping;
use crate::convert::Converter;
use crate::{Error, Result};

/// Engine for mirroring mappings into their targets
pub struct SyncEngine {
    converter: Box<dyn Converter>,
    cancel: CancellationToken,
    stale_policy: StalePolicy,
}

impl SyncEngine {
    /// Create an engine that renders Markdown through `converter`.
    pub fn new(converter: Box<dyn Converter>) -> Self {
        Self {
            converter,
            cancel: CancellationToken::new(),
            stale_policy: StalePolicy::default(),
        }
    }

    /// Share `token` with the caller so it can stop the run.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Start every mapping's reconciliation in `policy` instead of prompting.
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Compute the action list for `mapping` without touching either tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceMissing`] or [`Error::SourceNotDirectory`] for
    /// an unusable source, [`Error::TargetIsSource`] when both roots are the
    /// same directory, or [`Error::Walk`] if the source cannot be read.
    pub fn plan(&self, mapping: &Mapping) -> Result<Vec<Action>> {
        validate_source(mapping)?;
        diff(mapping)
    }

    /// Sync every mapping in order, one at a time.
    ///
    /// Once the run is cancelled, remaining mappings still produce an
    /// outcome with all of their actions counted as skipped.
    pub fn run_all(
        &self,
        mappings: &[Mapping],
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> Vec<SyncOutcome> {
        mappings
            .iter()
            .map(|mapping| self.run(mapping, decisions, sink))
            .collect()
    }

    /// Sync a single mapping.
    pub fn run(
        &self,
        mapping: &Mapping,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> SyncOutcome {
        tracing::info!(
            source = %mapping.source.display(),
            target = %mapping.target.display(),
            converter = %mapping.converter.kind(),
            "Starting sync"
        );
        sink.on_event(&SyncEvent::MappingStarted {
            source: mapping.source.clone(),
            target: mapping.target.clone(),
        });

        let mut outcome = SyncOutcome::begin(mapping);
        self.execute(mapping, decisions, sink, &mut outcome);
        outcome.finish();

        tracing::info!(
            copied = outcome.copied,
            converted = outcome.converted,
            deleted = outcome.deleted,
            skipped = outcome.skipped,
            failed = outcome.failed,
            status = ?outcome.status,
            "Finished sync"
        );
        sink.on_event(&SyncEvent::MappingFinished {
            outcome: outcome.clone(),
        });
        outcome
    }

    fn execute(
        &self,
        mapping: &Mapping,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
        outcome: &mut SyncOutcome,
    ) {
        let actions = match self.plan(mapping) {
            Ok(actions) => actions,
            Err(e) if self.cancel.is_cancelled() => {
                tracing::debug!(error = %e, "Mapping not planned after cancellation");
                outcome.cancel(0);
                return;
            }
            Err(e) => {
                tracing::error!(source = %mapping.source.display(), error = %e, "Skipping mapping");
                outcome.abort(e.to_string());
                return;
            }
        };

        if self.cancel.is_cancelled() {
            outcome.cancel(actions.len());
            return;
        }

        if let Err(e) = mdexport_fs::io::ensure_dir(&mapping.target) {
            tracing::error!(target = %mapping.target.display(), error = %e, "Cannot create target");
            outcome.abort(e.to_string());
            return;
        }

        let (transfers, stale): (Vec<Action>, Vec<Action>) =
            actions.into_iter().partition(|a| !a.is_stale());

        for (index, action) in transfers.iter().enumerate() {
            if self.cancel.is_cancelled() {
                outcome.cancel(transfers.len() - index + stale.len());
                return;
            }
            self.transfer(mapping, action, sink, outcome);
        }

        let mut reconciler = Reconciler::new(self.stale_policy);
        for (index, action) in stale.iter().enumerate() {
            let remaining = stale.len() - index;
            if self.cancel.is_cancelled() {
                outcome.cancel(remaining);
                return;
            }

            let relative_path = action.relative_path();
            let path = mapping.target.join(action.native_path());
            match reconciler.resolve(&path, relative_path, decisions, sink) {
                Ok(Resolution::Deleted) => outcome.deleted += 1,
                Ok(Resolution::Skipped { .. }) => outcome.skipped += 1,
                Ok(Resolution::Failed { message }) => {
                    outcome.record_failure(relative_path.clone(), FailureKind::Filesystem, message);
                }
                Err(Error::Cancelled) => {
                    tracing::warn!("Sync cancelled by user");
                    self.cancel.cancel();
                    outcome.cancel(remaining);
                    return;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Stale-file decision failed");
                    outcome.skipped += remaining;
                    outcome.abort(format!("stale-file prompt failed: {e}"));
                    return;
                }
            }
        }
    }

    /// Run one copy or convert action and record its result.
    fn transfer(
        &self,
        mapping: &Mapping,
        action: &Action,
        sink: &mut dyn EventSink,
        outcome: &mut SyncOutcome,
    ) {
        let relative_path = action.relative_path();
        let source = mapping.source.join(action.native_path());
        let target_path = action.target_path();
        let destination = mapping.target.join(action.native_target_path());

        let (kind, result) = match action {
            Action::Copy { .. } => (
                TransferKind::Copy,
                mdexport_fs::io::copy_file(&source, &destination)
                    .map(|_| ())
                    .map_err(|e| (FailureKind::Filesystem, e.to_string())),
            ),
            Action::Convert { .. } => (
                TransferKind::Convert,
                self.converter
                    .render(&source, &destination, &mapping.converter)
                    .map_err(|e| {
                        if let Some(diagnostics) = e.diagnostics() {
                            tracing::debug!(path = %relative_path, "Converter output:\n{diagnostics}");
                        }
                        (e.kind(), e.to_string())
                    }),
            ),
            Action::StaleCandidate { .. } => return,
        };

        match &result {
            Ok(()) => {
                tracing::debug!(path = %relative_path, ?kind, "Processed file");
                match kind {
                    TransferKind::Copy => outcome.copied += 1,
                    TransferKind::Convert => outcome.converted += 1,
                }
            }
            Err((failure, message)) => {
                tracing::error!(path = %relative_path, error = %message, "Failed to process file");
                outcome.record_failure(relative_path.clone(), *failure, message.clone());
            }
        }

        sink.on_event(&SyncEvent::FileProcessed {
            relative_path: relative_path.clone(),
            target_path: target_path.clone(),
            kind,
            outcome: result.map_err(|(_, message)| message),
        });
    }
}

fn validate_source(mapping: &Mapping) -> Result<()> {
    if !mapping.source.exists() {
        return Err(Error::SourceMissing {
            path: mapping.source.clone(),
        });
    }
    if !mapping.source.is_dir() {
        return Err(Error::SourceNotDirectory {
            path: mapping.source.clone(),
        });
    }
    Ok(())
}

