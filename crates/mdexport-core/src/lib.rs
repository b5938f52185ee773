//! Mirror and conversion engine for mdexport
//!
//! Mirrors a source directory into a target directory, rendering every
//! Markdown file through an external converter and copying everything else
//! unchanged. Target files with no source counterpart are reconciled through
//! a [`DecisionSource`], typically an interactive prompt.
//!
//! # Architecture
//!
//! ```text
//!            mdexport-cli
//!                 |
//!           mdexport-core
//!   config -> sync (diff, engine, reconcile) -> convert
//!                 |
//!            mdexport-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use mdexport_core::{ConverterChoice, Decision, Mapping, NullSink, ProcessConverter, SyncEngine};
//!
//! # fn main() -> mdexport_core::Result<()> {
//! let engine = SyncEngine::new(Box::new(ProcessConverter::new(Duration::from_secs(300))?));
//! let mapping = Mapping::new("notes", "exports", ConverterChoice::pandoc());
//! let mut decisions = |_: &mdexport_fs::NormalizedPath| Ok::<_, mdexport_core::Error>(Decision::Skip);
//! let outcome = engine.run(&mapping, &mut decisions, &mut NullSink);
//! println!("converted {}", outcome.converted);
//! # Ok(())
//! # }
//! ```

pub mod cancellation;
pub mod classify;
pub mod config;
pub mod convert;
pub mod error;
pub mod sync;

pub use cancellation::CancellationToken;
pub use classify::{FileKind, classify};
pub use config::{ConverterChoice, ConverterKind, ConverterSettings, ExportConfig, Mapping};
pub use convert::{ConversionError, Converter, ProcessConverter};
pub use error::{Error, Result};
pub use sync::{
    Action, Decision, DecisionSource, EventSink, FailureKind, NullSink, OutcomeStatus, Resolution,
    StalePolicy, SyncEngine, SyncEvent, SyncOutcome,
};
