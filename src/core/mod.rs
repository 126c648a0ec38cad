//! Core data structures for boxbuild.
//!
//! - Templates and their variables
//! - Version and revision resolution
//! - Build identity and the final metadata record

pub mod error;
pub mod identity;
pub mod metadata;
pub mod revision;
pub mod run_context;
pub mod template;
pub mod variables;
pub mod version;

pub use error::BoxError;
pub use identity::BuildIdentity;
pub use metadata::{FinalMetadata, ProviderArtifact};
pub use revision::{GitProbe, Revision, RevisionProbe};
pub use run_context::RunContext;
pub use template::Template;
pub use variables::{VariableStore, Variables};
