//! Box version resolution.
//!
//! The declared version's last dot-separated component is a placeholder:
//! it is always dropped and replaced by the run's build timestamp, so
//! `1.2.3` built at `20240101000000` becomes `1.2.20240101000000`. The
//! content of that component is never inspected.

use crate::core::run_context::RunContext;
use crate::core::variables::Variables;

/// Version used when a template declares none.
pub const UNKNOWN_VERSION: &str = "__unknown__.TIMESTAMP";

/// Compute the effective box version for a template.
///
/// An explicit override is returned verbatim.
pub fn resolve(vars: &Variables, run: &RunContext) -> String {
    if let Some(version) = run.override_version() {
        return version.to_string();
    }

    let declared = vars
        .get_str("version")
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
    stamp(&declared, run.build_timestamp())
}

/// Replace the last dot-separated component of `declared` with `timestamp`.
///
/// A version without any dot keeps nothing before the separator, matching
/// the placeholder convention: `7` becomes `.{timestamp}`.
pub fn stamp(declared: &str, timestamp: &str) -> String {
    let prefix = declared
        .rsplit_once('.')
        .map(|(head, _)| head)
        .unwrap_or("");
    format!("{}.{}", prefix, timestamp)
}
