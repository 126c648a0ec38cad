//! Filesystem utilities.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use tempfile::NamedTempFile;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write a string to a file through a sibling temp file and rename it into place.
///
/// Readers never observe a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    staged
        .write_all(contents.as_bytes())
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    staged
        .persist(path)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(())
}

/// Find files matching a glob pattern, in the order the filesystem yields them.
pub fn glob_unsorted(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for entry in glob(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    Ok(results)
}

/// Find files matching glob patterns relative to a base directory, sorted.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    let base = escape_glob(&base.to_string_lossy());
    for pattern in patterns {
        results.extend(glob_unsorted(&format!("{}/{}", base, pattern))?);
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Escape glob metacharacters so a literal file stem can be used in a pattern.
pub fn escape_glob(literal: &str) -> String {
    glob::Pattern::escape(literal)
}
