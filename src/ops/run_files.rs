//! Temp files scoped to one builder invocation.

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::core::error::BoxError;
use crate::core::identity::BuildIdentity;

/// The runtime var file and the metadata staging file for one template.
///
/// Both are deleted when dropped unless the staging file was persisted.
#[derive(Debug)]
pub struct RunFiles {
    var_file: NamedTempFile,
    metadata: NamedTempFile,
}

impl RunFiles {
    /// Write the identity var file to the system temp dir and open a
    /// metadata staging file in `stage_dir`.
    ///
    /// `stage_dir` must already exist and share a filesystem with the final
    /// metadata location so the staged file can be renamed into place.
    pub fn create(identity: &BuildIdentity, stage_dir: &Path) -> Result<Self, BoxError> {
        let prefix = format!("{}-", identity.box_basename.replace('/', "_"));

        let mut var_file = Builder::new()
            .prefix(&prefix)
            .suffix(".vars.json")
            .tempfile()
            .map_err(|e| BoxError::io(std::env::temp_dir(), e))?;
        var_file
            .write_all(identity.to_var_file().as_bytes())
            .and_then(|_| var_file.flush())
            .map_err(|e| BoxError::io(var_file.path(), e))?;

        let metadata = Builder::new()
            .prefix(&format!(".{}", prefix))
            .suffix(".metadata.json.tmp")
            .tempfile_in(stage_dir)
            .map_err(|e| BoxError::io(stage_dir, e))?;

        tracing::debug!(
            "var file {} / metadata stage {}",
            var_file.path().display(),
            metadata.path().display()
        );

        Ok(RunFiles { var_file, metadata })
    }

    /// Path of the runtime var file.
    pub fn var_file_path(&self) -> &Path {
        self.var_file.path()
    }

    /// Path of the metadata staging file.
    pub fn metadata_path(&self) -> &Path {
        self.metadata.path()
    }

    /// Release the staging file for persisting; the var file is removed.
    pub fn into_metadata_stage(self) -> NamedTempFile {
        self.metadata
    }
}
