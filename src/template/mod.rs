//! Template documents and the resource/dependency stages of the pipeline.
//!
//! A [`TemplateDocument`] is the parsed YAML (or JSON) tree of one template
//! file. [`resources::select_resources`] keeps the resources heat-viz can
//! draw and [`extract::extract`] turns them into nodes and candidate edges.

pub mod extract;
pub mod resources;

use anyhow::{Context, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::HeatVizError;

/// A parsed template; read-only after loading.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    path: Option<PathBuf>,
    root: Value,
}

impl TemplateDocument {
    /// Load and parse a template file.
    ///
    /// # Errors
    ///
    /// - [`HeatVizError::InputNotFound`] if `path` does not exist
    /// - an I/O error if the file cannot be read
    /// - [`HeatVizError::TemplateParseError`] if it is neither YAML nor JSON
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HeatVizError::InputNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        debug!("Read {} bytes from {}", text.len(), path.display());

        let mut document = Self::parse(&path.display().to_string(), &text)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Parse template text. `name` is only used in error messages.
    ///
    /// JSON templates parse through the YAML parser unchanged.
    pub fn parse(name: &str, text: &str) -> Result<Self, HeatVizError> {
        let root: Value =
            serde_yaml::from_str(text).map_err(|e| HeatVizError::TemplateParseError {
                file: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path: None,
            root,
        })
    }

    /// The parsed tree.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// File name for titles, or `template` for parsed text.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "template".to_string(), |n| n.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.yaml");
        fs::write(&path, "heat_template_version: 2013-05-23\nresources: {}\n").unwrap();

        let document = TemplateDocument::load(&path).unwrap();
        assert_eq!(document.name(), "stack.yaml");
        assert!(document.root().get("resources").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = TemplateDocument::load(Path::new("/nonexistent/stack.yaml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeatVizError>(),
            Some(HeatVizError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_json() {
        let document = TemplateDocument::parse(
            "stack.json",
            r#"{"HeatTemplateFormatVersion": "2012-12-12", "Resources": {}}"#,
        )
        .unwrap();
        assert_eq!(document.name(), "template");
        assert!(document.root().get("Resources").is_some());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = TemplateDocument::parse("broken.yaml", "resources: [unclosed\n").unwrap_err();
        match err {
            HeatVizError::TemplateParseError {
                file,
                ..
            } => assert_eq!(file, "broken.yaml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
