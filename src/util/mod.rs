//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod hash;
pub mod interrupt;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use interrupt::Interrupt;
pub use shell::Shell;
