//! Macro reference scanning for emitted spec text
//!
//! The text this component emits refers to values through `%{name}`
//! macros that the host packaging system expands later. This module
//! scans text for those references so tests and hosts can check that
//! every reference resolves to a defined macro.
//!
//! # Scanning Rules
//!
//! - `%{name}` is a reference to the macro `name`
//! - `%%` escapes a literal percent and starts no reference
//! - a `%` not followed by `{` passes through unchanged, so scriptlet
//!   text like `%(...)` shell expansions and sed patterns need no
//!   escaping
//!
//! # Example
//!
//! ```
//! use venvrpm_core::references;
//!
//! let refs = references("%{venv_cmd} %{venv_dir}").unwrap();
//! assert_eq!(refs, vec!["venv_cmd".to_string(), "venv_dir".to_string()]);
//! ```

use thiserror::Error;

/// Macros the host toolchain defines; emitted text may reference these
/// without this component defining them.
const HOST_MACROS: &[&str] = &[
    "buildroot",
    "SOURCE0",
    "nil",
    "__python3",
    "py3_shbang_opts",
    "__os_install_post",
];

/// Errors that can occur while scanning spec text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroScanError {
    #[error("unclosed macro reference at position {0}")]
    Unclosed(usize),
}

/// Check whether the host toolchain defines `name`
pub fn is_host_macro(name: &str) -> bool {
    HOST_MACROS.contains(&name)
}

/// Scan `input` for `%{name}` references, in order of appearance
///
/// # Errors
///
/// Returns an error if a reference opened with `%{` has no closing brace.
pub fn references(input: &str) -> Result<Vec<String>, MacroScanError> {
    let mut refs = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '%' {
            continue;
        }
        match chars.peek() {
            Some((_, '%')) => {
                // Escaped literal percent
                chars.next();
            }
            Some((_, '{')) => {
                chars.next();

                let mut name = String::new();
                let mut found_close = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        found_close = true;
                        break;
                    }
                    name.push(c);
                }

                if !found_close {
                    return Err(MacroScanError::Unclosed(pos));
                }
                refs.push(name);
            }
            _ => {}
        }
    }

    Ok(refs)
}
