//! `boxbuild normalize` command

use anyhow::Result;

use crate::cli::NormalizeArgs;
use crate::commands::prepare;
use boxbuild::ops::normalize::{normalize, NormalizeOptions};
use boxbuild::util::{Interrupt, Shell};

pub fn execute(args: NormalizeArgs, shell: &Shell, interrupt: &Interrupt) -> Result<i32> {
    let prepared = prepare(&args.templates, true)?;
    let session = prepared.session(shell, interrupt, None);

    let report = normalize(
        &session,
        &prepared.templates,
        &NormalizeOptions { debug: args.debug },
    )?;
    Ok(report.exit_code())
}
