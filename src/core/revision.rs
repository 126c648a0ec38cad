//! Working-tree revision probing.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{Repository, StatusOptions};

/// Suffix appended to the revision when the working tree has uncommitted changes.
pub const DIRTY_SUFFIX: &str = "_dirty";

/// Commit hash plus working-tree state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    /// Full commit hash, empty when it could not be determined
    pub hash: String,

    /// Whether the working tree has uncommitted changes
    pub dirty: bool,
}

impl Revision {
    /// A clean revision at `hash`.
    pub fn clean(hash: impl Into<String>) -> Self {
        Revision {
            hash: hash.into(),
            dirty: false,
        }
    }

    /// A dirty revision at `hash`.
    pub fn dirty(hash: impl Into<String>) -> Self {
        Revision {
            hash: hash.into(),
            dirty: true,
        }
    }

    /// Whether the commit hash is missing.
    pub fn is_unknown(&self) -> bool {
        self.hash.is_empty()
    }
}

impl fmt::Display for Revision {
    /// `{hash}`, or `{hash}_dirty` for a dirty tree. An unknown hash renders
    /// as an empty string and never carries the dirty marker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dirty && !self.is_unknown() {
            write!(f, "{}{}", self.hash, DIRTY_SUFFIX)
        } else {
            f.write_str(&self.hash)
        }
    }
}

/// Source of the current revision.
pub trait RevisionProbe {
    /// Query the current commit and working-tree state.
    ///
    /// Never fails: when the version-control query cannot be answered the
    /// hash comes back empty and the tree reports clean.
    fn probe(&self) -> Revision;
}

/// Probe backed by the git repository containing a directory.
#[derive(Debug, Clone)]
pub struct GitProbe {
    workdir: PathBuf,
}

impl GitProbe {
    /// Probe the repository that contains `workdir`.
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        GitProbe {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    fn head_hash(repo: &Repository) -> Result<String, git2::Error> {
        let commit = repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Clean iff there is nothing `git status --porcelain` would print:
    /// tracked changes and untracked files count, ignored files do not.
    fn has_changes(repo: &Repository) -> Result<bool, git2::Error> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(false);
        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }
}

impl RevisionProbe for GitProbe {
    fn probe(&self) -> Revision {
        let repo = match Repository::discover(&self.workdir) {
            Ok(repo) => repo,
            Err(e) => {
                tracing::debug!(
                    "no git repository at {}: {}",
                    self.workdir.display(),
                    e.message()
                );
                return Revision::default();
            }
        };

        let hash = Self::head_hash(&repo).unwrap_or_else(|e| {
            tracing::debug!("could not read HEAD: {}", e.message());
            String::new()
        });
        let dirty = Self::has_changes(&repo).unwrap_or_else(|e| {
            tracing::debug!("could not read working-tree status: {}", e.message());
            false
        });

        Revision { hash, dirty }
    }
}

/// Probe returning a fixed revision.
#[derive(Debug, Clone, Default)]
pub struct FixedRevision(pub Revision);

impl RevisionProbe for FixedRevision {
    fn probe(&self) -> Revision {
        self.0.clone()
    }
}
