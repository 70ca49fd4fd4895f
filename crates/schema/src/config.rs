//! Venv configuration record and document loading
//!
//! The host pipeline's configuration document is a JSON object in which
//! every plugin owns one namespace. This module reads the `python_venv`
//! namespace into a typed record, applies per-field defaults, and
//! validates it once. The generator never re-validates.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SchemaError;

/// The namespace key this plugin owns in the configuration document.
pub const NAMESPACE: &str = "python_venv";

/// Declarative description of the virtualenv to package
///
/// Every field except `name` carries a default; empty collections stand
/// in for absence, so readers never see a null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VenvConfig {
    /// Path of a pre-built venv to copy instead of creating one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_venv: Option<String>,

    /// Executable used to create a new venv
    #[serde(default = "default_cmd")]
    pub cmd: String,

    /// Extra flags for the venv creation command
    #[serde(default)]
    pub flags: Vec<String>,

    /// Directory name of the installed venv
    pub name: String,

    /// Install path prefix
    #[serde(default = "default_path")]
    pub path: String,

    /// Interpreter to request when creating a new venv
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Requirements files to install, relative to the source tree
    #[serde(default = "default_requirements")]
    pub requirements: Vec<String>,

    /// Extra flags for each pip install invocation
    #[serde(default)]
    pub pip_flags: Vec<String>,

    /// Strip debug information from compiled extension modules
    #[serde(default = "default_strip_binaries")]
    pub strip_binaries: bool,
}

fn default_cmd() -> String {
    "virtualenv".to_string()
}

fn default_path() -> String {
    "/usr/share/python".to_string()
}

fn default_requirements() -> Vec<String> {
    vec!["requirements.txt".to_string()]
}

fn default_strip_binaries() -> bool {
    true
}

impl VenvConfig {
    /// Create a config for `name` with every other field at its default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            source_venv: None,
            cmd: default_cmd(),
            flags: Vec::new(),
            name: name.into(),
            path: default_path(),
            python: None,
            requirements: default_requirements(),
            pip_flags: Vec::new(),
            strip_binaries: default_strip_binaries(),
        }
    }

    /// Validate the record once at the boundary
    ///
    /// `name` must be non-empty. `source_venv` may coexist with
    /// `cmd`/`flags`/`python`: copy semantics take precedence and the
    /// creation fields are ignored, not rejected.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::MissingName);
        }
        Ok(())
    }

    /// Extract and validate the venv namespace from a configuration document
    ///
    /// Sibling namespaces belonging to other plugins are ignored.
    pub fn from_document(document: &str) -> Result<Self, SchemaError> {
        let mut doc: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(document)?;
        let namespace = doc
            .remove(NAMESPACE)
            .ok_or(SchemaError::MissingNamespace(NAMESPACE))?;
        let config: Self = serde_json::from_value(namespace)?;
        config.validate()?;
        debug!("Loaded venv config for '{}'", config.name);
        Ok(config)
    }

    /// Load a configuration document from a file
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        info!("Reading {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_document(&content)
    }
}
