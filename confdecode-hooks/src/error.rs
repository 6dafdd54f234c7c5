//! Error types for decode hooks

use serde_json::Value;
use thiserror::Error;

/// Errors a decode hook can hand back to the host decoder
#[derive(Debug, Error)]
pub enum HookError {
    /// A sequence of maps with more than one element was found where the
    /// destination expects a single structure.
    #[error("nested block with more than one element is not supported: {data}")]
    MultipleNestedBlocks {
        /// Number of maps in the offending sequence
        count: usize,
        /// The value as it was received by the hook
        data: Value,
    },
    /// Failure reported by a user-supplied hook.
    #[error("{0}")]
    Custom(String),
}

impl HookError {
    /// Build a [`HookError::Custom`] from any displayable message
    pub fn custom(msg: impl std::fmt::Display) -> Self {
        HookError::Custom(msg.to_string())
    }

    /// The original data carried by the error, if any
    pub fn data(&self) -> Option<&Value> {
        match self {
            HookError::MultipleNestedBlocks { data, .. } => Some(data),
            HookError::Custom(_) => None,
        }
    }
}

/// A hook in a [`crate::HookChain`] failed
#[derive(Debug, Error)]
#[error("decode hook {hook} failed: {source}")]
pub struct ChainError {
    /// Name of the failing hook
    pub hook: String,
    /// Error returned by the hook
    pub source: HookError,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, HookError>;
