//! High-level operations.
//!
//! This module contains the implementation of boxbuild commands.

pub mod box_build;
pub mod list;
pub mod normalize;
pub mod run_files;
pub mod session;

pub use box_build::{build, BuildOptions, BuildReport};
pub use list::list_templates;
pub use normalize::{normalize, NormalizeOptions, NormalizeReport};
pub use run_files::RunFiles;
pub use session::{Session, TemplateOutcome, TemplateState};
