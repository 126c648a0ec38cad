//! `boxbuild list` command

use anyhow::Result;

use crate::cli::ListArgs;
use boxbuild::ops::list_templates;
use boxbuild::util::{GlobalContext, Shell};

pub fn execute(args: ListArgs, shell: &Shell) -> Result<i32> {
    let ctx = GlobalContext::new()?;

    for template in list_templates(&ctx, &args.templates)? {
        shell.print(template.name());
    }

    Ok(0)
}
