//! Discovery and checksumming of produced boxes.
//!
//! Boxes are named `{box_basename}.{provider}.box`. Results come back in
//! the order the filesystem lists them, which differs between platforms;
//! callers that compare lists should sort them first.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::metadata::{ProviderArtifact, CHECKSUM_TYPE};
use crate::util::fs::{escape_glob, glob_unsorted};
use crate::util::hash::sha256_file;

/// Provider name every VMware flavour is reported as.
pub const VMWARE_PROVIDER: &str = "vmware_desktop";

/// Find `{output_dir}/{box_basename}.*.box` and checksum each match.
pub fn scan(output_dir: &Path, box_basename: &str) -> Result<Vec<ProviderArtifact>> {
    let pattern = format!(
        "{}/{}.*.box",
        escape_glob(&output_dir.to_string_lossy()),
        escape_glob(box_basename)
    );

    let mut artifacts = Vec::new();
    for path in glob_unsorted(&pattern)? {
        let Some(file) = path.file_name().map(|f| f.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(provider) = provider_token(&file) else {
            tracing::warn!("skipping box with unexpected name: {}", file);
            continue;
        };

        let checksum = sha256_file(&path)
            .with_context(|| format!("failed to checksum {}", path.display()))?;
        tracing::debug!("{} -> {} ({})", file, provider, checksum);

        artifacts.push(ProviderArtifact {
            name: normalize_provider(provider),
            file,
            checksum_type: CHECKSUM_TYPE.to_string(),
            checksum,
        });
    }

    Ok(artifacts)
}

/// Text between the last two dots before `.box`.
pub fn provider_token(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".box")?;
    let (_, provider) = stem.rsplit_once('.')?;
    Some(provider)
}

/// Map any VMware provider token to `vmware_desktop`; pass others through.
pub fn normalize_provider(token: &str) -> String {
    if token.to_ascii_lowercase().contains("vmware") {
        VMWARE_PROVIDER.to_string()
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};
    use std::fs;
    use tempfile::TempDir;

    const BASENAME: &str = "demo-2.0.20240601120000.git.deadbeef";

    fn digest(contents: &str) -> String {
        hex::encode(Sha256::digest(contents.as_bytes()))
    }

    #[test]
    fn test_provider_token() {
        assert_eq!(
            provider_token("demo-2.0.1.git.abc.virtualbox.box"),
            Some("virtualbox")
        );
        assert_eq!(provider_token("x.vmware.box"), Some("vmware"));
        assert_eq!(provider_token("x.box.tar"), None);
        assert_eq!(provider_token("nodots.box"), None);
    }

    #[test]
    fn test_normalize_provider() {
        assert_eq!(normalize_provider("vmware"), "vmware_desktop");
        assert_eq!(normalize_provider("VMware_Fusion"), "vmware_desktop");
        assert_eq!(normalize_provider("vmware_workstation"), "vmware_desktop");
        assert_eq!(normalize_provider("virtualbox"), "virtualbox");
        assert_eq!(normalize_provider("parallels"), "parallels");
        assert_eq!(normalize_provider("libvirt"), "libvirt");
    }

    #[test]
    fn test_scan_checksums_matching_boxes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(format!("{}.virtualbox.box", BASENAME)), "vbox").unwrap();
        fs::write(tmp.path().join(format!("{}.vmware.box", BASENAME)), "vmw").unwrap();
        fs::write(tmp.path().join(format!("{}.metadata.json", BASENAME)), "{}").unwrap();
        fs::write(tmp.path().join("other-1.0.git.x.virtualbox.box"), "other").unwrap();

        let mut artifacts = scan(tmp.path(), BASENAME).unwrap();
        artifacts.sort();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].name, "virtualbox");
        assert_eq!(artifacts[0].checksum, digest("vbox"));
        assert_eq!(artifacts[0].checksum_type, "sha256");
        assert_eq!(artifacts[1].name, "vmware_desktop");
        assert_eq!(artifacts[1].file, format!("{}.vmware.box", BASENAME));
        assert_eq!(artifacts[1].checksum, digest("vmw"));
    }

    #[test]
    fn test_scan_empty_or_missing_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(tmp.path(), BASENAME).unwrap().is_empty());
        assert!(scan(&tmp.path().join("absent"), BASENAME).unwrap().is_empty());
    }

    #[test]
    fn test_scan_dir_with_glob_characters() {
        let tmp = TempDir::new().unwrap();
        let builds = tmp.path().join("proj[1]").join("builds");
        fs::create_dir_all(&builds).unwrap();
        fs::write(builds.join(format!("{}.virtualbox.box", BASENAME)), "vbox").unwrap();

        let artifacts = scan(&builds, BASENAME).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "virtualbox");
        assert_eq!(artifacts[0].checksum, digest("vbox"));
    }
}
