//! Command implementations

pub mod config;
pub mod sync;

pub use config::{config_path, run_add, run_list, run_path, run_remove, run_set_converter};
pub use sync::{SyncOptions, run_sync};
