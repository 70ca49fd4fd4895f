//! venvrpm-schema: Configuration boundary for venvrpm
//!
//! This crate provides the typed venv configuration record with:
//! - Per-field defaults applied during deserialization
//! - Namespace extraction from the host pipeline's JSON configuration document
//! - One-time validation before the record reaches the generator

mod config;
mod error;

pub use config::{VenvConfig, NAMESPACE};
pub use error::SchemaError;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
