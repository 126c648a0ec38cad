//! Run-wide build settings shared read-only by every template in a run.

use chrono::{DateTime, Utc};

/// Format of the build timestamp, e.g. `20240601120000`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Immutable settings fixed when a run starts.
///
/// The timestamp is taken once so every template built in the same run
/// carries the same version suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    build_timestamp: String,
    override_version: Option<String>,
}

impl RunContext {
    /// Start a run now.
    pub fn start(override_version: Option<String>) -> Self {
        Self::at(Utc::now(), override_version)
    }

    /// Start a run at a fixed instant.
    pub fn at(now: DateTime<Utc>, override_version: Option<String>) -> Self {
        Self::with_timestamp(now.format(TIMESTAMP_FORMAT).to_string(), override_version)
    }

    /// Start a run with an already formatted timestamp.
    pub fn with_timestamp(
        build_timestamp: impl Into<String>,
        override_version: Option<String>,
    ) -> Self {
        RunContext {
            build_timestamp: build_timestamp.into(),
            override_version: override_version.filter(|v| !v.is_empty()),
        }
    }

    /// The run's UTC build timestamp.
    pub fn build_timestamp(&self) -> &str {
        &self.build_timestamp
    }

    /// Version forced on every template in this run, if any.
    pub fn override_version(&self) -> Option<&str> {
        self.override_version.as_deref()
    }
}
