//! Configuration file support for boxbuild.
//!
//! boxbuild reads two configuration file locations:
//! - Global: `~/.boxbuild/config.toml` - User-wide defaults
//! - Project: `.boxbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default image-building tool.
pub const DEFAULT_BUILDER_PROGRAM: &str = "packer";

/// Directory holding the project config, relative to the project root.
pub const PROJECT_CONFIG_DIR: &str = ".boxbuild";

/// boxbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Builder tool settings
    pub builder: BuilderConfig,

    /// Build output settings
    pub build: BuildConfig,
}

/// Settings for the external image builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Builder executable (name on PATH or absolute path)
    pub program: Option<String>,

    /// Cache directory exported as PACKER_CACHE_DIR
    pub cache_dir: Option<PathBuf>,
}

/// Build output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory boxes are written to and metadata is persisted in
    pub builds_dir: Option<PathBuf>,

    /// Force headless on or off instead of the platform default
    pub headless: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.builder.program.is_some() {
            self.builder.program = other.builder.program;
        }
        if other.builder.cache_dir.is_some() {
            self.builder.cache_dir = other.builder.cache_dir;
        }

        if other.build.builds_dir.is_some() {
            self.build.builds_dir = other.build.builds_dir;
        }
        if other.build.headless.is_some() {
            self.build.headless = other.build.headless;
        }
    }

    /// The builder program, falling back to `packer`.
    pub fn builder_program(&self) -> &str {
        self.builder
            .program
            .as_deref()
            .unwrap_or(DEFAULT_BUILDER_PROGRAM)
    }
}

/// Get the global boxbuild config directory (~/.boxbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".boxbuild"))
}

/// Get the project config path (.boxbuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_DIR).join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.boxbuild/config.toml)
/// 2. Global config (~/.boxbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.builder_program(), "packer");
        assert!(config.builder.cache_dir.is_none());
        assert!(config.build.builds_dir.is_none());
        assert!(config.build.headless.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[builder]
program = "/opt/packer/bin/packer"
cache_dir = "/var/cache/packer"

[build]
builds_dir = "out"
headless = false
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.builder_program(), "/opt/packer/bin/packer");
        assert_eq!(
            config.builder.cache_dir,
            Some(PathBuf::from("/var/cache/packer"))
        );
        assert_eq!(config.build.builds_dir, Some(PathBuf::from("out")));
        assert_eq!(config.build.headless, Some(false));
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.builder.program = Some("packer".to_string());
        base.build.builds_dir = Some(PathBuf::from("builds"));

        let mut override_cfg = Config::default();
        override_cfg.builder.program = Some("packer-1.9".to_string());

        base.merge(override_cfg);

        assert_eq!(base.builder_program(), "packer-1.9");
        assert_eq!(base.build.builds_dir, Some(PathBuf::from("builds")));
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            "[builder]\nprogram = \"packer-global\"\n\n[build]\nheadless = true\n",
        )
        .unwrap();
        std::fs::write(&project_path, "[builder]\nprogram = \"packer-project\"\n").unwrap();

        let config = load_config(Some(&global_path), &project_path);

        assert_eq!(config.builder_program(), "packer-project");
        assert_eq!(config.build.headless, Some(true));
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let project_path = tmp.path().join("config.toml");
        std::fs::write(&project_path, "[builder\nprogram = ").unwrap();

        let config = load_config(None, &project_path);
        assert_eq!(config.builder_program(), "packer");
    }
}
