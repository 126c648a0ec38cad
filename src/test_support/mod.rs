//! Test utilities and mocks for boxbuild unit tests.
//!
//! Provides a mock [`Executor`] so orchestration can be tested without a
//! real image builder, plus fixtures for template trees and git repos.
//!
//! # Example
//!
//! ```rust,ignore
//! use boxbuild::test_support::{MockExecutor, MockProcessOutput, TemplateFixture};
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     let template = TemplateFixture::new("demo").write_to(tmp.path());
//!
//!     let mut exec = MockExecutor::new();
//!     exec.expect_prefix("packer build", MockProcessOutput::success(""));
//!     // Hand `&exec` to the orchestrator...
//! }
//! ```

pub mod fixtures;

use std::fmt;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::builder::executor::{ExecOutcome, Executor};
use crate::util::process::ProcessBuilder;

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success, None = killed by signal).
    pub status: Option<i32>,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output for a process killed by a signal.
    pub fn killed() -> Self {
        MockProcessOutput {
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn to_outcome(&self) -> ExecOutcome {
        ExecOutcome {
            code: self.status,
            stdout: self.stdout.clone().into_bytes(),
            stderr: self.stderr.clone().into_bytes(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Side effect run when an expectation matches, e.g. creating boxes.
pub type Effect = Arc<dyn Fn(&ProcessBuilder) + Send + Sync>;

/// Expectation for a command execution.
#[derive(Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
    /// Side effect to run before returning.
    pub effect: Option<Effect>,
}

impl fmt::Debug for CommandExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExpectation")
            .field("pattern", &self.pattern)
            .field("output", &self.output)
            .field("times", &self.times)
            .field("used", &self.used)
            .field("effect", &self.effect.is_some())
            .finish()
    }
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
            effect: None,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Run `effect` whenever this expectation matches.
    pub fn with_effect(mut self, effect: impl Fn(&ProcessBuilder) + Send + Sync + 'static) -> Self {
        self.effect = Some(Arc::new(effect));
        self
    }

    /// Check if this expectation can still be used.
    pub fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    processes: Vec<ProcessBuilder>,
}

/// Mock process executor for testing command execution.
///
/// Records every command it is asked to run and answers with the first
/// matching expectation.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
    default_output: Option<MockProcessOutput>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&mut self, expectation: CommandExpectation) -> &mut Self {
        self.state_mut().expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Get all commands that were called, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Get all processes that were run, in order.
    pub fn processes(&self) -> Vec<ProcessBuilder> {
        self.lock().processes.clone()
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        for (i, exp) in self.lock().expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    fn answer(&self, process: &ProcessBuilder) -> Result<ExecOutcome> {
        let full_cmd = process.display_command();

        let matched = {
            let mut state = self.lock();
            state.calls.push(full_cmd.clone());
            state.processes.push(process.clone());

            state
                .expectations
                .iter_mut()
                .find(|exp| exp.pattern.matches(&full_cmd) && exp.available())
                .map(|exp| {
                    exp.used += 1;
                    (exp.output.clone(), exp.effect.clone())
                })
        };

        if let Some((output, effect)) = matched {
            if let Some(effect) = effect {
                effect(process);
            }
            return Ok(output.to_outcome());
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.to_outcome());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

impl Executor for MockExecutor {
    fn run(&self, process: &ProcessBuilder) -> Result<ExecOutcome> {
        self.answer(process)
    }

    fn capture(&self, process: &ProcessBuilder) -> Result<ExecOutcome> {
        self.answer(process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_matches_in_order() {
        let mut exec = MockExecutor::new();
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::StartsWith("packer build".to_string()),
                MockProcessOutput::failure(2, "first"),
            )
            .times(1),
        );
        exec.expect_prefix("packer build", MockProcessOutput::success(""));

        let pb = ProcessBuilder::new("packer").args(["build", "a.json"]);
        assert_eq!(exec.run(&pb).unwrap().code, Some(2));
        assert_eq!(exec.run(&pb).unwrap().code, Some(0));
        assert_eq!(exec.calls().len(), 2);
        exec.verify().unwrap();
    }

    #[test]
    fn test_mock_executor_unexpected_command() {
        let exec = MockExecutor::new();
        let pb = ProcessBuilder::new("packer").arg("version");
        assert!(exec.capture(&pb).is_err());
    }

    #[test]
    fn test_effect_runs() {
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);

        let mut exec = MockExecutor::new();
        exec.expect_pattern(
            CommandExpectation::new(CommandPattern::Any, MockProcessOutput::success(""))
                .with_effect(move |_| *counter.lock().unwrap() += 1),
        );

        exec.run(&ProcessBuilder::new("packer")).unwrap();
        assert_eq!(*hits.lock().unwrap(), 1);
    }
}
