//! Implementation of `boxbuild build`.
//!
//! Templates are built one at a time in name order. A failing template is
//! reported and skipped; the run carries on with the next one and exits
//! non-zero at the end. Ctrl-C stops the whole run.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::builder::artifacts;
use crate::builder::command::BuildFlags;
use crate::builder::executor::to_process;
use crate::core::error::is_interrupted;
use crate::core::identity::BuildIdentity;
use crate::core::metadata::{metadata_path, FinalMetadata};
use crate::core::template::Template;
use crate::ops::run_files::RunFiles;
use crate::ops::session::{first_failure_code, Progress, Session, TemplateOutcome, TemplateState};
use crate::util::fs::ensure_dir;
use crate::util::shell::{format_duration, Status};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Builder flags; `headless` is filled in from the context
    pub flags: BuildFlags,
}

/// Result of a build run.
#[derive(Debug)]
pub struct BuildReport {
    pub outcomes: Vec<TemplateOutcome>,

    /// Metadata of every template that built, in build order
    pub metadata: Vec<FinalMetadata>,

    pub elapsed: Duration,
}

impl BuildReport {
    /// Templates that failed.
    pub fn failed(&self) -> impl Iterator<Item = &TemplateOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Exit code of the first failure, or 0.
    pub fn exit_code(&self) -> i32 {
        first_failure_code(&self.outcomes)
    }
}

/// Build every template in order.
///
/// Returns `Err` only when the run is interrupted; per-template failures
/// are collected in the report.
pub fn build(
    session: &Session<'_>,
    templates: &[Template],
    opts: &BuildOptions,
) -> Result<BuildReport> {
    let started = Instant::now();
    let mut flags = opts.flags.clone();
    flags.headless = flags.headless || session.ctx.headless();

    let mut outcomes = Vec::with_capacity(templates.len());
    let mut metadata = Vec::new();

    for template in templates {
        session.interrupt.check()?;
        let template_started = Instant::now();
        let mut progress = Progress::new(template);

        match build_one(session, template, &flags, &mut progress) {
            Ok(md) => {
                progress.advance(TemplateState::Done);
                let elapsed = template_started.elapsed();
                session.shell.status(
                    Status::Finished,
                    format!(
                        "[{}] {} in {}",
                        template,
                        md.identity.box_basename,
                        format_duration(elapsed)
                    ),
                );
                metadata.push(md);
                outcomes.push(TemplateOutcome {
                    template: template.clone(),
                    state: TemplateState::Done,
                    failed_in: None,
                    elapsed,
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

    let report = BuildReport {
        outcomes,
        metadata,
        elapsed: started.elapsed(),
    };
    summarize(session, &report);
    Ok(report)
}

fn build_one(
    session: &Session<'_>,
    template: &Template,
    flags: &BuildFlags,
    progress: &mut Progress<'_>,
) -> Result<FinalMetadata> {
    progress.advance(TemplateState::Building);

    let builds_dir = session.ctx.builds_dir();
    let stage_dir = if flags.dry_run {
        std::env::temp_dir()
    } else {
        ensure_dir(&builds_dir)?;
        builds_dir.clone()
    };

    let identity = BuildIdentity::compute(template, &session.run, session.probe)?;
    let files = RunFiles::create(&identity, &stage_dir)?;

    let command = session
        .assembler
        .build_command(template, files.var_file_path(), flags);
    session
        .shell
        .status(Status::Building, format!("[{}] `{}`", template, command));

    let process = to_process(&command, template.dir(), &session.builder_env());
    let outcome = session.executor.run(&process)?;
    session.interrupt.check()?;
    outcome.check(&process)?;

    progress.advance(TemplateState::MetadataWritten);

    // Re-read everything: the build may have run for hours.
    let identity = BuildIdentity::compute(template, &session.run, session.probe)?;
    let providers = artifacts::scan(&builds_dir, &identity.box_basename)?;
    session.interrupt.check()?;
    if providers.is_empty() && !flags.dry_run {
        tracing::warn!(
            "[{}] no boxes matching {}.*.box in {}",
            template,
            identity.box_basename,
            builds_dir.display()
        );
    }
    let md = FinalMetadata::new(identity, providers);

    if flags.dry_run {
        session.shell.print(md.to_json_pretty());
        return Ok(md);
    }

    let dest = metadata_path(&builds_dir, &md.identity.box_basename);
    md.persist(files.into_metadata_stage(), &dest)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    session.shell.status(Status::Wrote, dest.display());

    Ok(md)
}

fn summarize(session: &Session<'_>, report: &BuildReport) {
    let built = report.outcomes.iter().filter(|o| o.succeeded()).count();
    let failed: Vec<_> = report.failed().map(|o| o.template.name()).collect();

    if failed.is_empty() {
        session.shell.status(
            Status::Finished,
            format!(
                "{} template(s) in {}",
                built,
                format_duration(report.elapsed)
            ),
        );
    } else {
        session.shell.error(format!(
            "{} of {} template(s) failed after {}: {}",
            failed.len(),
            report.outcomes.len(),
            format_duration(report.elapsed),
            failed.join(", ")
        ));
    }
}
