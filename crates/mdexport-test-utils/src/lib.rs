//! Shared test utilities for the mdexport workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild the same temporary trees. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] with a source and a target directory
//! - [`scripts`]: shell scripts that stand in for a real converter

pub mod scripts;
pub mod tree;

pub use scripts::{FakeConverter, FakeBehavior};
pub use tree::TestTree;
