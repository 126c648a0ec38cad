//! boxbuild - reproducible machine-image builds on top of Packer
//!
//! This crate provides the library side of the `boxbuild` CLI: deriving
//! box identities and metadata from templates, assembling builder command
//! lines, and sequencing build and normalize runs.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for boxbuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock builder executor and template
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    error::BoxError, identity::BuildIdentity, metadata::FinalMetadata, run_context::RunContext,
    template::Template,
};

pub use util::context::GlobalContext;
