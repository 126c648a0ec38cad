//! `boxbuild build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::prepare;
use boxbuild::builder::BuildFlags;
use boxbuild::ops::box_build::{build, BuildOptions};
use boxbuild::util::{Interrupt, Shell};

pub fn execute(args: BuildArgs, shell: &Shell, interrupt: &Interrupt) -> Result<i32> {
    let prepared = prepare(&args.templates, !args.dry_run)?;
    let session = prepared.session(shell, interrupt, args.override_version);

    let opts = BuildOptions {
        flags: BuildFlags {
            dry_run: args.dry_run,
            debug: args.debug,
            ask: args.ask,
            only: args.only,
            except: args.except,
            mirror: args.mirror,
            headless: false,
        },
    };

    let report = build(&session, &prepared.templates, &opts)?;
    Ok(report.exit_code())
}
