//! Error types for venvrpm-schema

use thiserror::Error;

/// Errors that can occur at the configuration boundary
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration document has no '{0}' namespace")]
    MissingNamespace(&'static str),

    #[error("Venv name must be a non-empty string")]
    MissingName,
}
