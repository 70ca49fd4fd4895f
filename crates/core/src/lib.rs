//! venvrpm-core: Spec model and generator for venvrpm
//!
//! This crate provides the package spec model mutated during generation,
//! the fixed step sequence that emits the venv packaging content, and
//! macro reference scanning over the emitted spec text.

mod generate;
mod macros;
mod spec;

pub use generate::{EXTENSION_DESCRIPTION, EXTENSION_NAME, EXTENSION_VERSION, generate};
pub use macros::{MacroScanError, is_host_macro, references};
pub use spec::{Blocks, PackageSpec};

// Re-export types from venvrpm-schema for convenience
pub use venvrpm_schema::{SchemaError, VenvConfig};
