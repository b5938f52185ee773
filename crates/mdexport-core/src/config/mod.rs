//! Mapping model and persistent settings
//!
//! The engine consumes [`Mapping`] values; [`ExportConfig`] is the on-disk
//! settings file they are resolved from.
//!
//! # Example
//!
//! ```toml
//! [sync]
//! converter = "pandoc"
//! timeout_secs = 300
//!
//! [pandoc]
//! args = ["--pdf-engine=xelatex"]
//!
//! [[mappings]]
//! source = "~/notes"
//! target = "~/exports/notes"
//! ```

mod mapping;
mod settings;

pub use mapping::{ConverterChoice, ConverterKind, ConverterSettings, Mapping};
pub use settings::{DEFAULT_TIMEOUT_SECS, ExportConfig, MappingEntry, SyncSettings, expand_home};
