//! Running builder subprocesses.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::builder::command::BuilderCommand;
use crate::core::error::BoxError;
use crate::util::process::{find_executable, ProcessBuilder};

/// Result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a failed outcome into a [`BoxError::Subprocess`].
    pub fn check(self, process: &ProcessBuilder) -> Result<Self, BoxError> {
        if self.success() {
            Ok(self)
        } else {
            Err(BoxError::Subprocess {
                command: process.display_command(),
                code: self.code,
            })
        }
    }
}

/// Seam between the orchestrator and real processes.
pub trait Executor {
    /// Run with inherited stdio so the operator sees builder output live.
    fn run(&self, process: &ProcessBuilder) -> Result<ExecOutcome>;

    /// Run capturing stdout and stderr.
    fn capture(&self, process: &ProcessBuilder) -> Result<ExecOutcome>;
}

/// Executor that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, process: &ProcessBuilder) -> Result<ExecOutcome> {
        tracing::debug!("running `{}`", process.display_command());
        let status = process.status()?;
        Ok(ExecOutcome {
            code: status.code(),
            ..ExecOutcome::default()
        })
    }

    fn capture(&self, process: &ProcessBuilder) -> Result<ExecOutcome> {
        tracing::debug!("capturing `{}`", process.display_command());
        let output = process.exec()?;
        Ok(ExecOutcome {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Turn an assembled command into a process running in `cwd` with `env`.
pub fn to_process(command: &BuilderCommand, cwd: &Path, env: &[(String, String)]) -> ProcessBuilder {
    let mut process = ProcessBuilder::new(&command.program)
        .args(&command.args)
        .cwd(cwd);
    for (key, value) in env {
        process = process.env(key, value);
    }
    process
}

/// Resolve the builder program to an executable path.
///
/// Bare names are looked up on PATH; anything containing a path separator
/// must exist and is made absolute, since the builder runs inside the
/// template's directory.
pub fn locate_program(program: &str) -> Result<String> {
    if program.contains('/') || program.contains('\\') {
        let path = Path::new(program);
        if !path.is_file() {
            bail!("builder `{}` does not exist", program);
        }
        let absolute = std::fs::canonicalize(path)
            .with_context(|| format!("failed to resolve builder `{}`", program))?;
        return Ok(absolute.display().to_string());
    }

    match find_executable(program) {
        Some(path) => Ok(path.display().to_string()),
        None => bail!(
            "builder `{}` not found on PATH; install it or set `[builder] program` \
             in .boxbuild/config.toml",
            program
        ),
    }
}
