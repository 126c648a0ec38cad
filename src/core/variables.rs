//! Template variables and per-template overrides.

use std::path::Path;

use serde_json::{Map, Value};

use crate::core::error::BoxError;
use crate::core::template::Template;

/// Key of the variables section in a template document.
pub const VARIABLES_KEY: &str = "variables";

/// An ordered set of template variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(Map<String, Value>);

impl Variables {
    /// Create an empty set.
    pub fn new() -> Self {
        Variables(Map::new())
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Keys present in `overrides` replace the base value wholesale; nested
    /// objects are not merged.
    pub fn merged(mut self, overrides: Variables) -> Self {
        for (key, value) in overrides.0 {
            self.0.insert(key, value);
        }
        self
    }

    /// Read a variable as a string.
    ///
    /// Scalars are rendered the way the builder would see them; `null`,
    /// arrays and objects count as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for Variables {
    fn from(map: Map<String, Value>) -> Self {
        Variables(map)
    }
}

/// Reads a template's declared variables and merges its override document.
pub struct VariableStore;

impl VariableStore {
    /// Load the merged variables for a template.
    ///
    /// The template document must contain a `variables` object. A sibling
    /// `{template}.variables.json`, when present, must be a flat object and
    /// wins on key collisions.
    pub fn load(template: &Template) -> Result<Variables, BoxError> {
        let declared = Self::load_declared(&template.path())?;

        let overrides_path = template.overrides_path();
        if !overrides_path.is_file() {
            return Ok(declared);
        }

        let overrides = read_object(&overrides_path)?;
        tracing::debug!(
            "merging {} override variable(s) from {}",
            overrides.len(),
            overrides_path.display()
        );
        Ok(declared.merged(Variables(overrides)))
    }

    /// Load only the `variables` section of a template document.
    pub fn load_declared(path: &Path) -> Result<Variables, BoxError> {
        let mut document = read_object(path)?;
        match document.remove(VARIABLES_KEY) {
            Some(Value::Object(map)) => Ok(Variables(map)),
            Some(_) => Err(BoxError::parse(path, "`variables` must be an object")),
            None => Err(BoxError::parse(path, "missing `variables` section")),
        }
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>, BoxError> {
    let contents = std::fs::read_to_string(path).map_err(|e| BoxError::io(path, e))?;
    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BoxError::parse(path, "expected a JSON object")),
        Err(e) => Err(BoxError::parse(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TemplateFixture;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_merge_override_wins() {
        let base: Variables = json!({"name": "demo", "version": "1.0.0", "cpus": 1})
            .as_object()
            .unwrap()
            .clone()
            .into();
        let overrides: Variables = json!({"version": "2.0.0"}).as_object().unwrap().clone().into();

        let merged = base.merged(overrides);
        assert_eq!(merged.get_str("version").as_deref(), Some("2.0.0"));
        assert_eq!(merged.get_str("name").as_deref(), Some("demo"));
        assert_eq!(merged.get_str("cpus").as_deref(), Some("1"));
    }

    #[test]
    fn test_merge_is_shallow() {
        let base: Variables = json!({"disk": {"size": 10, "type": "ssd"}})
            .as_object()
            .unwrap()
            .clone()
            .into();
        let overrides: Variables = json!({"disk": {"size": 20}}).as_object().unwrap().clone().into();

        let merged = base.merged(overrides);
        assert_eq!(merged.0.get("disk"), Some(&json!({"size": 20})));
    }

    #[test]
    fn test_load_with_overrides() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateFixture::new("demo")
            .with_variables(json!({"name": "demo", "version": "1.0.0"}))
            .with_overrides(json!({"version": "9.9.9", "mirror": "http://m"}))
            .write_to(tmp.path());

        let vars = VariableStore::load(&template).unwrap();
        assert_eq!(vars.get_str("version").as_deref(), Some("9.9.9"));
        assert_eq!(vars.get_str("mirror").as_deref(), Some("http://m"));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn test_missing_variables_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, r#"{"builders": []}"#).unwrap();

        let err = VariableStore::load_declared(&path).unwrap_err();
        assert!(matches!(err, BoxError::Parse { .. }));
        assert!(err.to_string().contains("missing `variables` section"));
    }

    #[test]
    fn test_malformed_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            VariableStore::load_declared(&path),
            Err(BoxError::Parse { .. })
        ));
    }

    #[test]
    fn test_malformed_overrides() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateFixture::new("demo")
            .with_variables(json!({"name": "demo"}))
            .write_to(tmp.path());
        std::fs::write(template.overrides_path(), "[1, 2]").unwrap();

        assert!(matches!(
            VariableStore::load(&template),
            Err(BoxError::Parse { .. })
        ));
    }
}
