//! Ctrl-C handling.
//!
//! The first Ctrl-C only raises a flag: the builder child receives the
//! same signal and exits, the orchestrator sees the flag once the child
//! returns and unwinds, dropping its temp files on the way out. A second
//! Ctrl-C exits immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::error::{BoxError, INTERRUPTED_EXIT_CODE};

/// Shared interrupted flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Interrupt::default()
    }

    /// Install a process-wide SIGINT handler that raises this flag.
    pub fn install(&self) -> Result<()> {
        let flag = Arc::clone(&self.flag);
        ctrlc::set_handler(move || {
            if flag.swap(true, Ordering::SeqCst) {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
        .context("setting up signal handler")
    }

    /// Raise the flag.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with [`BoxError::Interrupted`] once the flag is raised.
    pub fn check(&self) -> Result<(), BoxError> {
        if self.is_set() {
            Err(BoxError::Interrupted)
        } else {
            Ok(())
        }
    }
}
