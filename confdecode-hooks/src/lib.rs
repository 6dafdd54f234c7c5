//! confdecode hooks - Decode-time transformations for configuration data
//!
//! Configuration parsed from JSON, HCL and similar formats arrives as loosely
//! typed maps. The hooks in this crate reshape that data before a host decoder
//! assigns it into typed structures, so schemas can evolve without breaking
//! old files:
//!
//! - [`translate_keys`] moves deprecated keys to their canonical names
//! - [`normalize_nested_blocks`] unwraps single-element lists of blocks
//!
//! Hooks see the source value together with a [`TypeDescriptor`] of the
//! destination. Types opt into key translation through [`KeyTranslator`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod hook;
pub mod nested;
pub mod translate;
pub mod types;

// Re-export commonly used types
pub use error::{ChainError, HookError, Result};
pub use hook::{DecodeHook, HookChain};
pub use nested::normalize_nested_blocks;
pub use translate::{translate_keys, KeyMapping, KeyTranslator};
pub use types::{
    Describe, FieldDescriptor, SourceKind, TranslatorCapability, TranslatorForm, TypeDescriptor,
    TypeKind,
};
