//! Builder command-line assembly.
//!
//! Flags are inserted right after the subcommand, one at a time, so a flag
//! added later ends up earlier on the command line. The builder resolves
//! repeated `-var`/`-var-file` assignments by position, which makes this
//! order part of the override semantics: the runtime var file is always
//! last and wins over the per-template overrides file.

use std::fmt;
use std::path::Path;

use crate::core::template::Template;

/// Wrapper program that turns a command into a no-op printout.
pub const DRY_RUN_WRAPPER: &str = "echo";

/// Options that shape a build command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFlags {
    /// Print the command instead of running it
    pub dry_run: bool,

    /// Pass `-debug`
    pub debug: bool,

    /// Pass `-on-error=ask`
    pub ask: bool,

    /// Restrict to these builders (`-only=`)
    pub only: Option<String>,

    /// Skip these builders (`-except=`)
    pub except: Option<String>,

    /// Mirror URL passed as `-var mirror=`
    pub mirror: Option<String>,

    /// Pass `-var headless=true`
    pub headless: bool,
}

/// A fully assembled builder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BuilderCommand {
    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl fmt::Display for BuilderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Builds command lines for one builder program.
#[derive(Debug, Clone)]
pub struct CommandAssembler {
    program: String,
}

impl CommandAssembler {
    pub fn new(program: impl Into<String>) -> Self {
        CommandAssembler {
            program: program.into(),
        }
    }

    /// `build` command for `template` with the runtime var file at `var_file`.
    pub fn build_command(
        &self,
        template: &Template,
        var_file: &Path,
        flags: &BuildFlags,
    ) -> BuilderCommand {
        let mut args = base_args("build", template, var_file);

        if template.has_overrides() {
            insert_flags(&mut args, [overrides_flag(template)]);
        }
        if let Some(ref only) = flags.only {
            insert_flags(&mut args, [format!("-only={}", only)]);
        }
        if let Some(ref except) = flags.except {
            insert_flags(&mut args, [format!("-except={}", except)]);
        }
        if let Some(ref mirror) = flags.mirror {
            insert_flags(&mut args, ["-var".to_string(), format!("mirror={}", mirror)]);
        }
        if flags.headless {
            insert_flags(&mut args, ["-var".to_string(), "headless=true".to_string()]);
        }
        if flags.debug {
            insert_flags(&mut args, ["-debug".to_string()]);
        }
        if flags.ask {
            insert_flags(&mut args, ["-on-error=ask".to_string()]);
        }

        if flags.dry_run {
            args.insert(0, self.program.clone());
            return BuilderCommand {
                program: DRY_RUN_WRAPPER.to_string(),
                args,
            };
        }

        BuilderCommand {
            program: self.program.clone(),
            args,
        }
    }

    /// `validate` command: only the var file and overrides file flags.
    pub fn validate_command(&self, template: &Template, var_file: &Path) -> BuilderCommand {
        let mut args = base_args("validate", template, var_file);

        if template.has_overrides() {
            insert_flags(&mut args, [overrides_flag(template)]);
        }

        BuilderCommand {
            program: self.program.clone(),
            args,
        }
    }

    /// `fix` command, which prints the canonical template on stdout.
    pub fn fix_command(&self, template: &Template) -> BuilderCommand {
        BuilderCommand {
            program: self.program.clone(),
            args: vec!["fix".to_string(), template.file_name()],
        }
    }
}

fn base_args(subcommand: &str, template: &Template, var_file: &Path) -> Vec<String> {
    vec![
        subcommand.to_string(),
        format!("-var-file={}", var_file.display()),
        template.file_name(),
    ]
}

fn overrides_flag(template: &Template) -> String {
    format!("-var-file={}", template.overrides_file_name())
}

/// Insert `flags` directly after the subcommand, keeping their relative order.
fn insert_flags<const N: usize>(args: &mut Vec<String>, flags: [String; N]) {
    for (offset, flag) in flags.into_iter().enumerate() {
        args.insert(1 + offset, flag);
    }
}
