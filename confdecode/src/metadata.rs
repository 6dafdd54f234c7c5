//! Decode metadata

use std::fmt;

/// What a decode pass did with the input keys
///
/// Paths are dotted (`server.tls.cert`), with `[i]` for sequence elements and
/// `[key]` for map values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Structure fields that received a value
    pub keys: Vec<String>,
    /// Input keys that matched no structure field
    pub unused: Vec<String>,
    /// Structure fields with no key in the input
    pub unset: Vec<String>,
}

impl Metadata {
    /// Check if every input key was assigned
    pub fn is_clean(&self) -> bool {
        self.unused.is_empty()
    }
}

/// Join a child segment onto a dotted path
pub(crate) fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

/// Append a sequence index or map key to a path
pub(crate) fn index_path(parent: &str, index: impl fmt::Display) -> String {
    format!("{parent}[{index}]")
}
