//! Shared state for one orchestrator run.

use std::fmt;
use std::time::Duration;

use crate::builder::command::CommandAssembler;
use crate::builder::executor::Executor;
use crate::core::error::exit_code_for;
use crate::core::revision::RevisionProbe;
use crate::core::run_context::RunContext;
use crate::core::template::Template;
use crate::util::context::{GlobalContext, CACHE_DIR_ENV};
use crate::util::{Interrupt, Shell};

/// Collaborators and run-wide settings threaded through every step.
pub struct Session<'a> {
    pub ctx: &'a GlobalContext,
    pub executor: &'a dyn Executor,
    pub probe: &'a dyn RevisionProbe,
    pub shell: &'a Shell,
    pub run: RunContext,
    pub assembler: CommandAssembler,
    pub interrupt: Interrupt,
}

impl<'a> Session<'a> {
    /// Environment every builder invocation receives.
    pub fn builder_env(&self) -> Vec<(String, String)> {
        vec![(
            CACHE_DIR_ENV.to_string(),
            self.ctx.cache_dir().display().to_string(),
        )]
    }
}

/// Where a template got to in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateState {
    Pending,
    Validating,
    Building,
    MetadataWritten,
    Done,
    Failed,
}

impl fmt::Display for TemplateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemplateState::Pending => "pending",
            TemplateState::Validating => "validating",
            TemplateState::Building => "building",
            TemplateState::MetadataWritten => "metadata written",
            TemplateState::Done => "done",
            TemplateState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks one template through its states.
#[derive(Debug)]
pub(crate) struct Progress<'t> {
    template: &'t Template,
    state: TemplateState,
}

impl<'t> Progress<'t> {
    pub(crate) fn new(template: &'t Template) -> Self {
        Progress {
            template,
            state: TemplateState::Pending,
        }
    }

    pub(crate) fn advance(&mut self, next: TemplateState) {
        tracing::debug!("[{}] {} -> {}", self.template, self.state, next);
        self.state = next;
    }

    pub(crate) fn state(&self) -> TemplateState {
        self.state
    }
}

/// Final result for one template.
#[derive(Debug)]
pub struct TemplateOutcome {
    pub template: Template,

    /// `Done` on success, `Failed` otherwise
    pub state: TemplateState,

    /// State the template was in when it failed
    pub failed_in: Option<TemplateState>,

    pub elapsed: Duration,

    pub error: Option<anyhow::Error>,
}

impl TemplateOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == TemplateState::Done
    }

    /// Exit code this template contributes to the run.
    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map(exit_code_for).unwrap_or(0)
    }
}

/// Exit code of the first failed template, or 0.
pub fn first_failure_code(outcomes: &[TemplateOutcome]) -> i32 {
    outcomes
        .iter()
        .find(|o| !o.succeeded())
        .map(TemplateOutcome::exit_code)
        .unwrap_or(0)
}
