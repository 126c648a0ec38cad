//! Error types for template builds.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when no subprocess exit code is available.
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// Exit code for a run cut short by Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Error while preparing, building, or normalizing a template.
#[derive(Debug, Error)]
pub enum BoxError {
    #[error("template `{name}` not found: {} does not exist", path.display())]
    TemplateNotFound { name: String, path: PathBuf },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("`{command}` {}", describe_exit(*code))]
    Subprocess { command: String, code: Option<i32> },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("interrupted")]
    Interrupted,
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl BoxError {
    /// Build a parse error from anything displayable.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        BoxError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Build an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BoxError::Io {
            path: path.into(),
            source,
        }
    }

    /// The process exit code this error should produce.
    pub fn exit_code(&self) -> i32 {
        match self {
            BoxError::Subprocess {
                code: Some(code), ..
            } if *code != 0 => *code,
            BoxError::Interrupted => INTERRUPTED_EXIT_CODE,
            _ => FALLBACK_EXIT_CODE,
        }
    }
}

/// Pick the exit code for an error chain, looking for a [`BoxError`] inside it.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BoxError>())
        .map(BoxError::exit_code)
        .unwrap_or(FALLBACK_EXIT_CODE)
}

/// Whether an error chain was caused by Ctrl-C.
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<BoxError>(), Some(BoxError::Interrupted)))
}
