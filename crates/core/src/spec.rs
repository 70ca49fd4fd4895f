//! Package spec model mutated during generation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::macros;
use crate::macros::MacroScanError;

/// The three ordered script sections this component appends to
///
/// The host reads lines back in declaration order, so the vectors are
/// append-only.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Blocks {
    /// Preparation section lines
    pub prep: Vec<String>,
    /// Installation section lines
    pub install: Vec<String>,
    /// File list section lines
    pub files: Vec<String>,
}

/// A package spec under construction
///
/// Owned by the host pipeline and passed through a chain of plugins, each
/// performing a bounded sequence of mutations. The maps are BTreeMaps so
/// the host serializer sees a deterministic order; last write for a key
/// wins.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PackageSpec {
    /// Macro definitions
    pub macros: BTreeMap<String, String>,
    /// Global overrides
    pub globals: BTreeMap<String, String>,
    /// Metadata tags; a later plugin may overwrite an earlier plugin's value
    pub tags: BTreeMap<String, String>,
    /// Ordered script sections
    pub blocks: Blocks,
}

impl PackageSpec {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a macro
    pub fn set_macro(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.insert(name.into(), value.into());
    }

    /// Set a global override
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.globals.insert(name.into(), value.into());
    }

    /// Set a metadata tag
    pub fn set_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    /// Macro names referenced in the spec but defined neither here nor by the host
    ///
    /// Scans every macro value, global value, and block line. An empty
    /// result means every reference resolves.
    pub fn undefined_references(&self) -> Result<Vec<String>, MacroScanError> {
        let mut undefined = Vec::new();
        let texts = self
            .macros
            .values()
            .chain(self.globals.values())
            .chain(self.blocks.prep.iter())
            .chain(self.blocks.install.iter())
            .chain(self.blocks.files.iter());

        for text in texts {
            for name in macros::references(text)? {
                if !self.macros.contains_key(&name)
                    && !macros::is_host_macro(&name)
                    && !undefined.contains(&name)
                {
                    undefined.push(name);
                }
            }
        }

        Ok(undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let spec = PackageSpec::new();
        assert!(spec.macros.is_empty());
        assert!(spec.globals.is_empty());
        assert!(spec.tags.is_empty());
        assert!(spec.blocks.prep.is_empty());
        assert!(spec.blocks.install.is_empty());
        assert!(spec.blocks.files.is_empty());
    }

    #[test]
    fn test_set_macro_last_write_wins() {
        let mut spec = PackageSpec::new();
        spec.set_macro("venv_cmd", "virtualenv");
        spec.set_macro("venv_cmd", "cp -r /tmp/prebuilt");
        assert_eq!(
            spec.macros.get("venv_cmd").map(String::as_str),
            Some("cp -r /tmp/prebuilt")
        );
    }

    #[test]
    fn test_set_tag_overwrites_other_plugins() {
        let mut spec = PackageSpec::new();
        spec.set_tag("AutoReq", "Yes");
        spec.set_tag("AutoReq", "No");
        assert_eq!(spec.tags.get("AutoReq").map(String::as_str), Some("No"));
    }

    #[test]
    fn test_blocks_preserve_append_order() {
        let mut spec = PackageSpec::new();
        spec.blocks.install.push("first".to_string());
        spec.blocks.install.push("second".to_string());
        assert_eq!(spec.blocks.install, vec!["first", "second"]);
    }

    #[test]
    fn test_undefined_references_reports_missing() {
        let mut spec = PackageSpec::new();
        spec.set_macro("venv_bin", "%{venv_dir}/bin");
        spec.blocks.install.push("%{venv_cmd} %{venv_dir}".to_string());

        let undefined = spec.undefined_references().unwrap();
        assert_eq!(undefined, vec!["venv_dir", "venv_cmd"]);
    }

    #[test]
    fn test_undefined_references_accepts_host_macros() {
        let mut spec = PackageSpec::new();
        spec.set_macro("venv_dir", "%{buildroot}/opt/app");
        spec.blocks.install.push("cd %{SOURCE0}".to_string());
        assert!(spec.undefined_references().unwrap().is_empty());
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut spec = PackageSpec::new();
        spec.set_macro("venv_name", "myapp");
        spec.set_global("__os_install_post", "%{nil}");
        spec.set_tag("AutoReq", "No");
        spec.blocks.prep.push("mkdir -p /tmp".to_string());

        let json = serde_json::to_string(&spec).unwrap();
        let parsed: PackageSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }
}
