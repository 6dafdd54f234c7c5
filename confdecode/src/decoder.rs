//! Hook-driven structure population
//!
//! The decoder walks the source value alongside the destination
//! [`TypeDescriptor`], runs the hook chain on every node, renames structure
//! keys to the declared field names, and finally hands the normalized tree to
//! `serde` for assignment.

use crate::error::{DecodeError, Result};
use crate::metadata::{index_path, join_path, Metadata};
use confdecode_hooks::{ChainError, DecodeHook, Describe, HookChain, TypeDescriptor, TypeKind};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Decoder options
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Hooks applied to every node, in order
    pub hooks: HookChain,
    /// Fail when input keys match no structure field
    pub error_unused: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::with_default_hooks()
    }
}

impl DecoderConfig {
    /// Config with no hooks registered
    pub fn new() -> Self {
        Self {
            hooks: HookChain::new(),
            error_unused: false,
        }
    }

    /// Config with nested block normalization followed by key translation
    pub fn with_default_hooks() -> Self {
        Self {
            hooks: HookChain::with_defaults(),
            error_unused: false,
        }
    }

    /// Register another hook after the existing ones
    pub fn hook<H: DecodeHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Set whether leftover keys fail the decode
    pub fn error_unused(mut self, error_unused: bool) -> Self {
        self.error_unused = error_unused;
        self
    }
}

/// A decoded value with the metadata of the pass that produced it
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// The populated destination
    pub value: T,
    /// Keys used, unused and unset during the pass
    pub metadata: Metadata,
}

/// Populates typed structures from untyped data
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder from a config
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decoder options
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode `input` into `T`
    pub fn decode<T>(&self, input: Value) -> Result<Decoded<T>>
    where
        T: Describe + DeserializeOwned,
    {
        let (normalized, metadata) = self.normalize(&T::describe(), input)?;
        let value = serde_json::from_value(normalized)?;
        Ok(Decoded { value, metadata })
    }

    /// Run the hooks over `input` without assigning it
    ///
    /// Returns the tree `serde` would receive, with structure keys renamed to
    /// their declared field names and unused keys removed.
    pub fn normalize(&self, to: &TypeDescriptor, input: Value) -> Result<(Value, Metadata)> {
        let mut walk = Walk {
            hooks: &self.config.hooks,
            metadata: Metadata::default(),
        };
        let normalized = walk.node("", to, input)?;
        let metadata = walk.metadata;

        if !metadata.unused.is_empty() {
            debug!(unused = ?metadata.unused, ty = to.name(), "input has unused keys");
            if self.config.error_unused {
                return Err(DecodeError::UnusedKeys {
                    keys: metadata.unused,
                });
            }
        }

        Ok((normalized, metadata))
    }
}

struct Walk<'a> {
    hooks: &'a HookChain,
    metadata: Metadata,
}

impl Walk<'_> {
    fn node(&mut self, path: &str, to: &TypeDescriptor, data: Value) -> Result<Value> {
        let data = self
            .hooks
            .apply(to, data)
            .map_err(|ChainError { hook, source }| DecodeError::Hook {
                path: path.to_string(),
                hook,
                source,
            })?;

        match (to.kind(), data) {
            (_, Value::Null) => Ok(Value::Null),
            // hooks run again on the pointee
            (TypeKind::Pointer, data) => match to.elem() {
                Some(elem) => self.node(path, &elem, data),
                None => Ok(data),
            },
            (TypeKind::Struct, Value::Object(map)) => {
                self.structure(path, to, map).map(Value::Object)
            }
            (TypeKind::Sequence | TypeKind::Array(_), Value::Array(items)) => {
                let Some(elem) = to.elem() else {
                    return Ok(Value::Array(items));
                };
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.node(&index_path(path, i), &elem, item))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            (TypeKind::Map, Value::Object(map)) => {
                let Some(elem) = to.elem() else {
                    return Ok(Value::Object(map));
                };
                let mut out = Map::new();
                for (key, value) in map {
                    let value = self.node(&index_path(path, &key), &elem, value)?;
                    out.insert(key, value);
                }
                Ok(Value::Object(out))
            }
            // shape mismatches are left for serde to report
            (_, data) => Ok(data),
        }
    }

    fn structure(
        &mut self,
        path: &str,
        to: &TypeDescriptor,
        mut map: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let mut out = Map::new();

        for field in to.fields() {
            let name = field.name();
            let field_path = join_path(path, name);

            let Some(value) = take_field(&mut map, name) else {
                self.metadata.unset.push(field_path);
                continue;
            };
            self.metadata.keys.push(field_path.clone());

            let descriptor = field.descriptor();
            let value = self.node(&field_path, &descriptor, value)?;
            if value.is_null() && !matches!(descriptor.kind(), TypeKind::Pointer | TypeKind::Any) {
                // absent block, leave the field at its default
                trace!(field = %field_path, "dropping null value");
                continue;
            }
            out.insert(name.to_string(), value);
        }

        self.metadata
            .unused
            .extend(map.keys().map(|key| join_path(path, key)));

        Ok(out)
    }
}

/// Remove the value for a field, matching its name exactly first and then
/// ignoring ASCII case
fn take_field(map: &mut Map<String, Value>, name: &str) -> Option<Value> {
    if let Some(value) = map.remove(name) {
        return Some(value);
    }

    let key = map.keys().find(|key| key.eq_ignore_ascii_case(name))?.clone();
    map.remove(&key)
}
