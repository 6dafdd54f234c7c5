//! Hook trait and ordered hook chains
//!
//! A host decoder calls every registered hook, in registration order, for
//! each node it visits. Plain functions with the right signature are hooks:
//!
//! ```rust
//! use confdecode_hooks::{HookChain, normalize_nested_blocks, translate_keys};
//!
//! let chain = HookChain::new()
//!     .with(normalize_nested_blocks)
//!     .with(translate_keys);
//! assert_eq!(chain.len(), 2);
//! ```

use crate::error::{ChainError, HookError};
use crate::nested::normalize_nested_blocks;
use crate::translate::translate_keys;
use crate::types::{SourceKind, TypeDescriptor};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A transformation applied to a source node before assignment
pub trait DecodeHook: Send + Sync {
    /// Transform `data` on its way into a value described by `to`
    ///
    /// Hooks own the value for the duration of the call and hand it back,
    /// changed or not.
    fn apply(&self, from: SourceKind, to: &TypeDescriptor, data: Value) -> Result<Value, HookError>;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> DecodeHook for F
where
    F: Fn(SourceKind, &TypeDescriptor, Value) -> Result<Value, HookError> + Send + Sync,
{
    fn apply(&self, from: SourceKind, to: &TypeDescriptor, data: Value) -> Result<Value, HookError> {
        self(from, to, data)
    }
}

/// Hooks applied one after the other
///
/// Each hook sees the output of the previous one, with the source kind
/// recomputed from that output. The first error stops the chain.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn DecodeHook>>,
}

impl HookChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with [`normalize_nested_blocks`] followed by [`translate_keys`]
    pub fn with_defaults() -> Self {
        Self::new()
            .with(normalize_nested_blocks)
            .with(translate_keys)
    }

    /// Append a hook
    pub fn push<H: DecodeHook + 'static>(&mut self, hook: H) {
        self.hooks.push(Arc::new(hook));
    }

    /// Append a hook, builder style
    pub fn with<H: DecodeHook + 'static>(mut self, hook: H) -> Self {
        self.push(hook);
        self
    }

    /// Number of registered hooks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if no hook is registered
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Names of the registered hooks, in order
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Run every hook in registration order
    pub fn apply(&self, to: &TypeDescriptor, data: Value) -> Result<Value, ChainError> {
        let mut data = data;
        for hook in &self.hooks {
            let from = SourceKind::of(&data);
            trace!(hook = hook.name(), ?from, to = to.name(), "applying decode hook");
            data = hook.apply(from, to, data).map_err(|source| ChainError {
                hook: hook.name().to_string(),
                source,
            })?;
        }
        Ok(data)
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{KeyMapping, KeyTranslator};
    use serde_json::json;

    #[derive(Default)]
    struct Block;

    impl KeyTranslator for Block {
        fn decode_key_mapping(&self) -> KeyMapping {
            KeyMapping::from([("listen_port", "port")])
        }
    }

    fn block() -> TypeDescriptor {
        TypeDescriptor::structure("Block")
            .field::<u16>("port")
            .translate_keys::<Block>()
    }

    struct Reject;

    impl DecodeHook for Reject {
        fn apply(&self, _: SourceKind, _: &TypeDescriptor, _: Value) -> Result<Value, HookError> {
            Err(HookError::custom("rejected"))
        }

        fn name(&self) -> &str {
            "reject"
        }
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = HookChain::new();
        assert!(chain.is_empty());
        let out = chain.apply(&block(), json!({"a": 1})).unwrap();
        assert_eq!(out, json!({"a": 1}));
    }

    #[test]
    fn test_default_chain_order() {
        let chain = HookChain::with_defaults();
        let names = chain.names();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("normalize_nested_blocks"));
        assert!(names[1].ends_with("translate_keys"));
    }

    #[test]
    fn test_default_chain_unwraps_then_translates() {
        let out = HookChain::with_defaults()
            .apply(&block(), json!([{"Listen_Port": 8080}]))
            .unwrap();
        assert_eq!(out, json!({"port": 8080}));
    }

    #[test]
    fn test_order_does_not_matter_for_disjoint_shapes() {
        let reversed = HookChain::new()
            .with(translate_keys)
            .with(normalize_nested_blocks);
        let forward = HookChain::with_defaults();

        let data = json!({"listen_port": 1, "host": "h"});
        assert_eq!(
            reversed.apply(&block(), data.clone()).unwrap(),
            forward.apply(&block(), data).unwrap()
        );
    }

    #[test]
    fn test_closure_hook() {
        let chain = HookChain::new().with(|_: SourceKind, _: &TypeDescriptor, data: Value| {
            Ok::<_, HookError>(match data {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other,
            })
        });
        let out = chain.apply(&block(), json!("  padded ")).unwrap();
        assert_eq!(out, json!("padded"));
    }

    #[test]
    fn test_first_error_stops_chain() {
        let chain = HookChain::new().with(Reject).with(translate_keys);
        let err = chain.apply(&block(), json!({})).unwrap_err();
        assert_eq!(err.hook, "reject");
        assert!(matches!(err.source, HookError::Custom(_)));
        assert_eq!(format!("{chain:?}"), format!("{:?}", chain.names()));
    }

    #[test]
    fn test_error_names_failing_hook() {
        let err = HookChain::with_defaults()
            .apply(&block(), json!([{"port": 1}, {"port": 2}]))
            .unwrap_err();
        assert!(err.hook.ends_with("normalize_nested_blocks"));
        assert!(matches!(
            err.source,
            HookError::MultipleNestedBlocks { count: 2, .. }
        ));
    }
}
