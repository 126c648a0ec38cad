//! Global context for boxbuild operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_dir, load_config, project_config_path, Config};

/// Environment variable the builder reads its download cache location from.
pub const CACHE_DIR_ENV: &str = "PACKER_CACHE_DIR";

/// Environment variable overriding the builder program.
pub const PROGRAM_ENV: &str = "BOXBUILD_PACKER";

/// Global context shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Project root (the directory boxbuild was started in)
    project_root: PathBuf,

    /// Merged global + project configuration
    config: Config,

    /// PACKER_CACHE_DIR inherited from the environment
    env_cache_dir: Option<PathBuf>,

    /// BOXBUILD_PACKER inherited from the environment
    env_program: Option<String>,
}

impl GlobalContext {
    /// Create a context rooted at the current directory, reading config and environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let global_path = global_config_dir().map(|dir| dir.join("config.toml"));
        let config = load_config(global_path.as_deref(), &project_config_path(&cwd));

        Ok(GlobalContext {
            project_root: cwd,
            config,
            env_cache_dir: non_empty_env(CACHE_DIR_ENV).map(PathBuf::from),
            env_program: non_empty_env(PROGRAM_ENV),
        })
    }

    /// Create a context with an explicit root and config, ignoring the environment.
    pub fn with_config(project_root: impl Into<PathBuf>, config: Config) -> Self {
        GlobalContext {
            project_root: project_root.into(),
            config,
            env_cache_dir: None,
            env_program: None,
        }
    }

    /// Get the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Directory boxes and metadata files land in.
    pub fn builds_dir(&self) -> PathBuf {
        match &self.config.build.builds_dir {
            Some(dir) => self.project_root.join(dir),
            None => self.project_root.join("builds"),
        }
    }

    /// Cache directory handed to the builder.
    ///
    /// An inherited PACKER_CACHE_DIR wins over config.
    pub fn cache_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.env_cache_dir {
            return dir.clone();
        }
        match &self.config.builder.cache_dir {
            Some(dir) => self.project_root.join(dir),
            None => self.project_root.join("packer_cache"),
        }
    }

    /// The builder program as configured (not yet resolved on PATH).
    pub fn builder_program(&self) -> &str {
        self.env_program
            .as_deref()
            .unwrap_or_else(|| self.config.builder_program())
    }

    /// Whether builds should pass `-var headless=true`.
    pub fn headless(&self) -> bool {
        self.config
            .build
            .headless
            .unwrap_or_else(|| !is_desktop_platform())
    }
}

/// Platforms where the hypervisor GUI is normally wanted.
pub fn is_desktop_platform() -> bool {
    cfg!(any(target_os = "macos", windows))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
