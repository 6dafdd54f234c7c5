//! Deprecated key translation
//!
//! Schemas that renamed a key keep accepting the old spelling by implementing
//! [`KeyTranslator`] and registering it on their [`TypeDescriptor`]. The
//! [`translate_keys`] hook then moves values from deprecated keys to their
//! canonical keys before the host assigns fields.
//!
//! This should only be used to keep old configuration files working. New
//! fields should be named with `#[serde(rename)]` instead.

use crate::error::Result;
use crate::types::{SourceKind, TypeDescriptor, TypeKind};
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// Mapping of lower-case deprecated key to canonical key
///
/// Deprecated keys must be stored lower-case; data keys are lower-cased before
/// lookup. Canonical keys are used exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMapping(HashMap<String, String>);

impl KeyMapping {
    /// Empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a deprecated key and the canonical key it moves to
    pub fn with(mut self, deprecated: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.0.insert(deprecated.into(), canonical.into());
        self
    }

    /// Canonical key for a lower-case deprecated key
    pub fn canonical(&self, deprecated: &str) -> Option<&str> {
        self.0.get(deprecated).map(String::as_str)
    }

    /// Number of deprecated keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(deprecated, canonical)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for KeyMapping {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Opt-in capability for key translation
///
/// Implement it on the type itself, or on `Box<T>` when the mapping should
/// only be reachable through a pointer. Register it on the descriptor with
/// [`TypeDescriptor::translate_keys`] or
/// [`TypeDescriptor::translate_keys_by_ref`].
///
/// The mapping is read from a `Default` instance, never from the value being
/// decoded, so it must not depend on instance state.
pub trait KeyTranslator {
    /// Lower-case deprecated key -> canonical key
    ///
    /// If the data holds a key matching a deprecated key (ignoring case), its
    /// value moves to the canonical key. If the canonical key is already
    /// present the deprecated key is left alone.
    fn decode_key_mapping(&self) -> KeyMapping;
}

/// Decode hook that moves deprecated keys to their canonical keys
///
/// Pointer destinations are skipped: the host calls the hook again with the
/// pointee. Values that are not maps, and destinations without a key mapping,
/// pass through unchanged. The map is mutated in place and returned. This
/// hook never fails.
pub fn translate_keys(_from: SourceKind, to: &TypeDescriptor, data: Value) -> Result<Value> {
    if to.kind() == TypeKind::Pointer {
        return Ok(data);
    }

    let mut target = match data {
        Value::Object(target) => target,
        other => return Ok(other),
    };

    let Some(capability) = to.translator() else {
        return Ok(Value::Object(target));
    };
    let rules = capability.key_mapping();

    let keys: Vec<String> = target.keys().cloned().collect();
    for key in keys {
        let Some(canonical) = rules.canonical(&key.to_lowercase()) else {
            continue;
        };

        // keep the value already under the canonical key
        if target.contains_key(canonical) {
            trace!(key = %key, canonical, ty = to.name(), "canonical key present, skipping");
            continue;
        }

        if let Some(value) = target.remove(&key) {
            trace!(key = %key, canonical, ty = to.name(), "translated deprecated key");
            target.insert(canonical.to_string(), value);
        }
    }

    Ok(Value::Object(target))
}
