//! Command implementations

pub mod build;
pub mod list;
pub mod normalize;

use anyhow::Result;

use boxbuild::builder::executor::locate_program;
use boxbuild::builder::{CommandAssembler, SystemExecutor};
use boxbuild::core::revision::GitProbe;
use boxbuild::core::run_context::RunContext;
use boxbuild::core::template::Template;
use boxbuild::ops::Session;
use boxbuild::util::{GlobalContext, Interrupt, Shell};

/// Everything a build or normalize run needs, resolved before the first template.
pub struct Prepared {
    pub ctx: GlobalContext,
    pub templates: Vec<Template>,
    pub assembler: CommandAssembler,
    pub probe: GitProbe,
}

/// Resolve the context, every template argument and the builder program.
///
/// With `locate` false the builder is used by name without a PATH lookup.
pub fn prepare(template_args: &[String], locate: bool) -> Result<Prepared> {
    let ctx = GlobalContext::new()?;
    let templates = Template::resolve_all(ctx.project_root(), template_args)?;

    let program = if locate {
        locate_program(ctx.builder_program())?
    } else {
        ctx.builder_program().to_string()
    };
    tracing::debug!("builder: {}", program);

    let probe = GitProbe::new(ctx.project_root());
    Ok(Prepared {
        ctx,
        templates,
        assembler: CommandAssembler::new(program),
        probe,
    })
}

impl Prepared {
    pub fn session<'a>(
        &'a self,
        shell: &'a Shell,
        interrupt: &Interrupt,
        override_version: Option<String>,
    ) -> Session<'a> {
        Session {
            ctx: &self.ctx,
            executor: &SystemExecutor,
            probe: &self.probe,
            shell,
            run: RunContext::start(override_version),
            assembler: self.assembler.clone(),
            interrupt: interrupt.clone(),
        }
    }
}
