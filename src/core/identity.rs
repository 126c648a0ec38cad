//! Box identity: the name, version and revision every artifact is stamped with.

use serde::{Deserialize, Serialize};

use crate::core::error::BoxError;
use crate::core::revision::{Revision, RevisionProbe};
use crate::core::run_context::RunContext;
use crate::core::template::Template;
use crate::core::variables::{VariableStore, Variables};
use crate::core::version;

/// Value recorded when the template declares no `template` variable.
pub const UNKNOWN: &str = "__unknown__";

/// Identity of one template build.
///
/// Serializes to the flat string map the builder receives as a var file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIdentity {
    pub name: String,
    pub version: String,
    pub build_timestamp: String,
    pub git_revision: String,
    pub box_basename: String,
    pub template: String,
}

impl BuildIdentity {
    /// Load the template's variables, probe the revision and compose the identity.
    ///
    /// Variables are read exactly once per call.
    pub fn compute(
        template: &Template,
        run: &RunContext,
        probe: &dyn RevisionProbe,
    ) -> Result<Self, BoxError> {
        let vars = VariableStore::load(template)?;
        let revision = probe.probe();
        if revision.is_unknown() {
            tracing::warn!(
                "[{}] git revision unavailable; box metadata will carry an empty revision",
                template
            );
        }
        Ok(Self::from_parts(template, &vars, run, &revision))
    }

    /// Compose an identity from already loaded inputs. Pure.
    pub fn from_parts(
        template: &Template,
        vars: &Variables,
        run: &RunContext,
        revision: &Revision,
    ) -> Self {
        let name = vars
            .get_str("name")
            .unwrap_or_else(|| template.base().to_string());
        let version = version::resolve(vars, run);
        let git_revision = revision.to_string();
        let box_basename = box_basename(&name, &version, &git_revision);

        BuildIdentity {
            name,
            version,
            build_timestamp: run.build_timestamp().to_string(),
            git_revision,
            box_basename,
            template: vars.get_str("template").unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }

    /// Render as the JSON var file handed to the builder.
    pub fn to_var_file(&self) -> String {
        // A struct of plain strings always serializes.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// `{name with '/' replaced by '__'}-{version}.git.{revision}`.
pub fn box_basename(name: &str, version: &str, git_revision: &str) -> String {
    format!(
        "{}-{}.git.{}",
        name.replace('/', "__"),
        version,
        git_revision
    )
}
