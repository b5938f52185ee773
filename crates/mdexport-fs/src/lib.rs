//! Filesystem primitives for mdexport
//!
//! Provides forward-slash path handling, atomic writes, file mirroring
//! helpers and settings-file loading in TOML, JSON or YAML.

pub mod error;
pub mod io;
pub mod path;
pub mod settings;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use settings::SettingsFormat;
