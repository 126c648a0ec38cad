//! Everything that talks to the external image builder.
//!
//! - Command-line assembly for `build`, `validate` and `fix`
//! - The executor seam used to run those commands
//! - Post-build artifact discovery

pub mod artifacts;
pub mod command;
pub mod executor;
pub mod fix;

pub use command::{BuildFlags, BuilderCommand, CommandAssembler};
pub use executor::{ExecOutcome, Executor, SystemExecutor};
