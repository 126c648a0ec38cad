//! Template location and discovery.
//!
//! A template is addressed by its path relative to the project root with
//! the `.json` extension dropped, e.g. `debian/debian-12-amd64`. The
//! builder always runs inside the template's directory and sees only the
//! bare file name.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::error::BoxError;
use crate::util::fs::glob_files;

/// Extension of template documents.
pub const TEMPLATE_EXT: &str = ".json";

/// Suffix of the optional per-template override-variables document.
pub const OVERRIDES_SUFFIX: &str = ".variables.json";

/// A named image-build definition on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Template {
    /// Path relative to the project root, without extension
    name: String,

    /// Directory containing the template document
    dir: PathBuf,

    /// File stem, e.g. `debian-12-amd64`
    base: String,
}

impl Template {
    /// Resolve a template argument against the project root.
    ///
    /// Fails with [`BoxError::TemplateNotFound`] when `{name}.json` is missing.
    pub fn resolve(root: &Path, arg: &str) -> Result<Self, BoxError> {
        let name = normalize_name(arg);
        let path = root.join(format!("{}{}", name, TEMPLATE_EXT));

        if !path.is_file() {
            return Err(BoxError::TemplateNotFound { name, path });
        }

        Ok(Self::from_document_path(name, &path))
    }

    /// Resolve every argument up front, then sort and deduplicate by name.
    ///
    /// Any missing template aborts before anything is built.
    pub fn resolve_all(root: &Path, args: &[String]) -> Result<Vec<Self>, BoxError> {
        let mut templates = args
            .iter()
            .map(|arg| Self::resolve(root, arg))
            .collect::<Result<Vec<_>, _>>()?;

        templates.sort();
        templates.dedup();
        Ok(templates)
    }

    fn from_document_path(name: String, path: &Path) -> Self {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let base = name.rsplit('/').next().unwrap_or(&name).to_string();

        Template { name, dir, base }
    }

    /// Name relative to the project root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File stem, used as the default box name.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Directory the builder runs in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Template document file name, e.g. `debian-12-amd64.json`.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.base, TEMPLATE_EXT)
    }

    /// Absolute path of the template document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }

    /// Override-variables file name, e.g. `debian-12-amd64.variables.json`.
    pub fn overrides_file_name(&self) -> String {
        format!("{}{}", self.base, OVERRIDES_SUFFIX)
    }

    /// Absolute path of the override-variables document.
    pub fn overrides_path(&self) -> PathBuf {
        self.dir.join(self.overrides_file_name())
    }

    /// Whether an override-variables document sits next to the template.
    pub fn has_overrides(&self) -> bool {
        self.overrides_path().is_file()
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

fn normalize_name(arg: &str) -> String {
    let arg = arg.trim_start_matches("./").replace('\\', "/");
    arg.strip_suffix(TEMPLATE_EXT)
        .map(str::to_string)
        .unwrap_or(arg)
}

/// Find every template under `root`, skipping override documents and the
/// given directories (builds output, builder cache).
///
/// With `filters`, only templates whose name starts with one of them are kept.
pub fn discover(root: &Path, skip_dirs: &[PathBuf], filters: &[String]) -> Result<Vec<Template>> {
    let mut templates = Vec::new();

    for path in glob_files(root, &[format!("**/*{}", TEMPLATE_EXT)])? {
        if skip_dirs.iter().any(|dir| path.starts_with(dir)) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if relative.ends_with(OVERRIDES_SUFFIX) || relative.starts_with('.') {
            continue;
        }

        let name = normalize_name(&relative);
        if !filters.is_empty()
            && !filters
                .iter()
                .any(|filter| name.starts_with(&normalize_name(filter)))
        {
            continue;
        }

        templates.push(Template::from_document_path(name, &path));
    }

    templates.sort();
    Ok(templates)
}
