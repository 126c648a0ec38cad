//! Template rewriting via the builder's `fix` subcommand.

use anyhow::{Context, Result};

use crate::builder::command::CommandAssembler;
use crate::builder::executor::{to_process, Executor};
use crate::core::template::Template;
use crate::util::fs::write_atomic;
use crate::util::hash::sha256_file;

/// How the builder's JSON encoder escapes `&` in `fix` output.
pub const ESCAPED_AMPERSAND: &str = "\\u0026";

/// Undo the builder's `&` escaping so shell snippets in templates keep
/// their literal `&`.
pub fn restore_ampersands(output: &str) -> String {
    output.replace(ESCAPED_AMPERSAND, "&")
}

/// Checksums of a template around a fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub before: String,
    pub after: String,
}

impl FixOutcome {
    /// Whether the fix changed the template's contents.
    pub fn modified(&self) -> bool {
        self.before != self.after
    }
}

/// Run `fix` on a template and write the canonical form back in place.
pub fn fix_template(
    executor: &dyn Executor,
    assembler: &CommandAssembler,
    template: &Template,
    env: &[(String, String)],
) -> Result<FixOutcome> {
    let path = template.path();
    let before = sha256_file(&path)?;

    let process = to_process(&assembler.fix_command(template), template.dir(), env);
    let outcome = executor.capture(&process)?.check(&process)?;

    let fixed = String::from_utf8(outcome.stdout)
        .with_context(|| format!("`{}` printed invalid UTF-8", process.display_command()))?;
    write_atomic(&path, &restore_ampersands(&fixed))?;

    let after = sha256_file(&path)?;
    Ok(FixOutcome { before, after })
}
