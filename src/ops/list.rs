//! Implementation of `boxbuild list`.

use anyhow::Result;

use crate::core::template::{discover, Template};
use crate::util::config::PROJECT_CONFIG_DIR;
use crate::util::context::GlobalContext;

/// Templates under the project root, optionally filtered by name prefix.
///
/// The builds and cache directories and the project config directory are
/// never searched.
pub fn list_templates(ctx: &GlobalContext, filters: &[String]) -> Result<Vec<Template>> {
    let root = ctx.project_root();
    let skip = [
        ctx.builds_dir(),
        ctx.cache_dir(),
        root.join(PROJECT_CONFIG_DIR),
    ];
    let templates = discover(root, &skip, filters)?;
    tracing::debug!("found {} template(s) under {}", templates.len(), root.display());
    Ok(templates)
}
