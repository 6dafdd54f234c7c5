//! Nested block normalization
//!
//! Block-oriented formats such as HCL allow a block key to repeat, so a parser
//! has to store every nested block as a list of maps:
//!
//! ```text
//! server { port = 80 }   =>   {"server": [{"port": 80}]}
//! ```
//!
//! The same file written as JSON would produce `{"server": {"port": 80}}`.
//! [`normalize_nested_blocks`] removes that difference when the destination
//! is a single structure.
//!
//! `serde_json::Value` has no typed "list of maps" shape, so any array whose
//! elements are all objects is treated as a list of blocks. A plain JSON
//! `[{...}]` decoded into a non-sequence destination is collapsed too.

use crate::error::{HookError, Result};
use crate::types::{SourceKind, TypeDescriptor};
use serde_json::Value;
use tracing::debug;

/// Decode hook that unwraps a single-element sequence of maps
///
/// Destinations that want a sequence get the value unchanged. Otherwise an
/// array made only of objects collapses: no element gives `null`, one element
/// gives that object, and more than one is an error carrying the original
/// value. Untyped destinations collapse like structures.
///
/// The sequence check looks through pointer layers, so `Option<Vec<T>>` keeps
/// its list where a pointer-first check would collapse it.
pub fn normalize_nested_blocks(from: SourceKind, to: &TypeDescriptor, data: Value) -> Result<Value> {
    if from == SourceKind::Sequence && to.wants_sequence() {
        return Ok(data);
    }

    let mut blocks = match data {
        Value::Array(items) if items.iter().all(Value::is_object) => items,
        other => return Ok(other),
    };

    match blocks.len() {
        0 => {
            debug!(ty = to.name(), "empty nested block, treating as absent");
            Ok(Value::Null)
        }
        1 => {
            debug!(ty = to.name(), "collapsing single nested block");
            Ok(blocks.pop().unwrap_or_default())
        }
        count => Err(HookError::MultipleNestedBlocks {
            count,
            data: Value::Array(blocks),
        }),
    }
}
