//! Final box metadata written after a successful build.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::core::error::BoxError;
use crate::core::identity::BuildIdentity;

/// Checksum algorithm recorded for every artifact.
pub const CHECKSUM_TYPE: &str = "sha256";

/// Suffix of persisted metadata files.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// One box produced by a build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderArtifact {
    /// Normalized provider, e.g. `virtualbox` or `vmware_desktop`
    pub name: String,

    /// Box file name, without directory
    pub file: String,

    pub checksum_type: String,

    /// Hex digest of the box contents
    pub checksum: String,
}

/// Identity plus the artifacts a build produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalMetadata {
    #[serde(flatten)]
    pub identity: BuildIdentity,

    pub providers: Vec<ProviderArtifact>,
}

impl FinalMetadata {
    pub fn new(identity: BuildIdentity, providers: Vec<ProviderArtifact>) -> Self {
        FinalMetadata {
            identity,
            providers,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json_pretty(&self) -> String {
        // Plain strings and vectors of plain strings always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write through `staged` and rename it onto `dest` in one step.
    ///
    /// `staged` must live on the same filesystem as `dest`.
    pub fn persist(&self, mut staged: NamedTempFile, dest: &Path) -> Result<(), BoxError> {
        let mut body = self.to_json_pretty();
        body.push('\n');

        staged
            .write_all(body.as_bytes())
            .and_then(|_| staged.flush())
            .map_err(|e| BoxError::io(staged.path(), e))?;
        staged
            .persist(dest)
            .map_err(|e| BoxError::io(dest, e.error))?;
        Ok(())
    }

    /// Read a persisted metadata file.
    pub fn load(path: &Path) -> Result<Self, BoxError> {
        let contents = std::fs::read_to_string(path).map_err(|e| BoxError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| BoxError::parse(path, e))
    }
}

/// `{builds_dir}/{box_basename}.metadata.json`.
pub fn metadata_path(builds_dir: &Path, box_basename: &str) -> PathBuf {
    builds_dir.join(format!("{}{}", box_basename, METADATA_SUFFIX))
}
