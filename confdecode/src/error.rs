//! Error types for the host decoder

use confdecode_hooks::HookError;
use thiserror::Error;

/// Errors that can occur while decoding configuration data
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A decode hook rejected a node
    #[error("error decoding '{path}': {source}")]
    Hook {
        /// Dotted path of the node being decoded (empty for the root)
        path: String,
        /// Name of the hook that failed
        hook: String,
        /// Error returned by the hook
        #[source]
        source: HookError,
    },

    /// Keys were left over after every field was assigned
    #[error(
        "has invalid keys: {}.\n\
         \n\
         Suggested fixes:\n\
         1. Check key spelling against the schema\n\
         2. Disable the check with DecoderConfig::error_unused(false)",
        .keys.join(", ")
    )]
    UnusedKeys {
        /// Dotted paths of the unused keys
        keys: Vec<String>,
    },

    /// The normalized data could not be assigned into the destination type
    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl DecodeError {
    /// Path of the failing node, when the error is tied to one
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::Hook { path, .. } => Some(path),
            DecodeError::UnusedKeys { .. } | DecodeError::Deserialize(_) => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DecodeError>;
