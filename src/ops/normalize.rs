//! Implementation of `boxbuild normalize`.
//!
//! Each template is validated and then rewritten to the builder's canonical
//! form with `fix`. A template counts as modified when the file's sha256
//! changed.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::builder::executor::to_process;
use crate::builder::fix::fix_template;
use crate::core::error::is_interrupted;
use crate::core::identity::BuildIdentity;
use crate::core::template::Template;
use crate::ops::run_files::RunFiles;
use crate::ops::session::{first_failure_code, Progress, Session, TemplateOutcome, TemplateState};
use crate::util::shell::{format_duration, Status};

/// Environment variable that turns on builder debug logging.
pub const BUILDER_LOG_ENV: &str = "PACKER_LOG";

/// Options for the normalize command.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Export `PACKER_LOG=1` to the builder
    pub debug: bool,
}

/// Result of a normalize run.
#[derive(Debug)]
pub struct NormalizeReport {
    pub outcomes: Vec<TemplateOutcome>,

    /// Names of templates `fix` rewrote, sorted
    pub modified: Vec<String>,

    pub elapsed: Duration,
}

impl NormalizeReport {
    pub fn exit_code(&self) -> i32 {
        first_failure_code(&self.outcomes)
    }
}

/// Validate and fix every template in order.
pub fn normalize(
    session: &Session<'_>,
    templates: &[Template],
    opts: &NormalizeOptions,
) -> Result<NormalizeReport> {
    let started = Instant::now();
    let mut env = session.builder_env();
    if opts.debug {
        env.push((BUILDER_LOG_ENV.to_string(), "1".to_string()));
    }

    let mut outcomes = Vec::with_capacity(templates.len());
    let mut modified = Vec::new();

    for template in templates {
        session.interrupt.check()?;
        let template_started = Instant::now();
        let mut progress = Progress::new(template);

        match normalize_one(session, template, &env, &mut progress) {
            Ok(changed) => {
                progress.advance(TemplateState::Done);
                if changed {
                    session.shell.status(Status::Modified, template);
                    modified.push(template.name().to_string());
                } else {
                    session
                        .shell
                        .status(Status::Finished, format!("[{}] no changes", template));
                }
                outcomes.push(TemplateOutcome {
                    template: template.clone(),
                    state: TemplateState::Done,
                    failed_in: None,
                    elapsed: template_started.elapsed(),
                    error: None,
                });
            }
            Err(err) => {
                if is_interrupted(&err) {
                    return Err(err);
                }
                let failed_in = progress.state();
                progress.advance(TemplateState::Failed);
                session.shell.error(format!("[{}] {:#}", template, err));
                outcomes.push(TemplateOutcome {
                    template: template.clone(),
                    state: TemplateState::Failed,
                    failed_in: Some(failed_in),
                    elapsed: template_started.elapsed(),
                    error: Some(err),
                });
            }
        }
    }

    modified.sort();
    let report = NormalizeReport {
        outcomes,
        modified,
        elapsed: started.elapsed(),
    };
    summarize(session, &report);
    Ok(report)
}

fn normalize_one(
    session: &Session<'_>,
    template: &Template,
    env: &[(String, String)],
    progress: &mut Progress<'_>,
) -> Result<bool> {
    progress.advance(TemplateState::Validating);

    {
        let identity = BuildIdentity::compute(template, &session.run, session.probe)?;
        let files = RunFiles::create(&identity, &std::env::temp_dir())?;

        let command = session
            .assembler
            .validate_command(template, files.var_file_path());
        session
            .shell
            .status(Status::Validating, format!("[{}] `{}`", template, command));

        let process = to_process(&command, template.dir(), env);
        let outcome = session.executor.run(&process)?;
        session.interrupt.check()?;
        outcome.check(&process)?;
    }

    session.shell.status(Status::Fixing, template);
    let fixed = fix_template(session.executor, &session.assembler, template, env)?;
    session.interrupt.check()?;

    tracing::debug!("[{}] sha256 {} -> {}", template, fixed.before, fixed.after);
    Ok(fixed.modified())
}

fn summarize(session: &Session<'_>, report: &NormalizeReport) {
    let failed: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| !o.succeeded())
        .map(|o| o.template.name())
        .collect();

    if report.modified.is_empty() {
        session.shell.status(
            Status::Finished,
            format!("no templates modified in {}", format_duration(report.elapsed)),
        );
    } else {
        session.shell.status(
            Status::Finished,
            format!(
                "{} template(s) modified in {}: {}",
                report.modified.len(),
                format_duration(report.elapsed),
                report.modified.join(", ")
            ),
        );
    }

    if !failed.is_empty() {
        session.shell.error(format!(
            "{} of {} template(s) failed: {}",
            failed.len(),
            report.outcomes.len(),
            failed.join(", ")
        ));
    }
}
