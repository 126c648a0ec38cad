//! Test fixtures for template trees and git repositories.

use std::path::Path;

use git2::{Oid, Repository, Signature};
use serde_json::{json, Value};

use crate::core::template::Template;

/// Fixture for a template document and its optional overrides.
#[derive(Debug, Clone)]
pub struct TemplateFixture {
    /// Name relative to the root, without extension.
    pub name: String,
    /// Raw template document.
    pub document: String,
    /// Raw override-variables document, if any.
    pub overrides: Option<String>,
}

impl TemplateFixture {
    /// A template with an empty `variables` section and one null builder.
    pub fn new(name: impl Into<String>) -> Self {
        TemplateFixture {
            name: name.into(),
            document: template_document(json!({})),
            overrides: None,
        }
    }

    /// Replace the `variables` section.
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.document = template_document(variables);
        self
    }

    /// Replace the whole document with raw text.
    pub fn with_document(mut self, raw: impl Into<String>) -> Self {
        self.document = raw.into();
        self
    }

    /// Add a sibling override-variables document.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides.to_string());
        self
    }

    /// Write the fixture below `root` and resolve it.
    pub fn write_to(&self, root: &Path) -> Template {
        let path = root.join(format!("{}.json", self.name));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, &self.document).unwrap();

        if let Some(ref overrides) = self.overrides {
            let overrides_path = root.join(format!("{}.variables.json", self.name));
            std::fs::write(overrides_path, overrides).unwrap();
        }

        Template::resolve(root, &self.name).unwrap()
    }
}

/// A minimal template document with the given variables.
pub fn template_document(variables: Value) -> String {
    serde_json::to_string_pretty(&json!({
        "variables": variables,
        "builders": [{"type": "null", "communicator": "none"}],
    }))
    .unwrap()
}

/// Stage everything in the working tree and commit it.
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("boxbuild", "boxbuild@example.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}
