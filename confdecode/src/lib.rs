//! confdecode - Hook-driven configuration decoding
//!
//! This crate populates typed configuration structures from untyped data,
//! running decode hooks on every node first:
//!
//! - Hook registration and ordering ([`DecoderConfig`])
//! - ASCII case-insensitive field matching against a [`TypeDescriptor`]
//! - Decode metadata (used, unused and unset keys)
//! - Final assignment through `serde`
//!
//! ```rust
//! use confdecode::{decode, Describe, KeyMapping, KeyTranslator, TypeDescriptor};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Server {
//!     #[serde(rename = "Port")]
//!     port: u16,
//! }
//!
//! impl KeyTranslator for Server {
//!     fn decode_key_mapping(&self) -> KeyMapping {
//!         KeyMapping::from([("listen_port", "Port")])
//!     }
//! }
//!
//! impl Describe for Server {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure("Server")
//!             .field::<u16>("Port")
//!             .translate_keys::<Server>()
//!     }
//! }
//!
//! let server: Server = decode(json!([{"Listen_Port": 8080}])).unwrap();
//! assert_eq!(server.port, 8080);
//! ```
//!
//! The default hooks treat any array made only of objects as a list of blocks.
//! A plain JSON `[{...}]` decoded into a structure, map or untyped field is
//! unwrapped when it has one element and rejected when it has more. Declare
//! the field as a `Vec` to keep the list.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod decoder;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use confdecode_hooks::{
    normalize_nested_blocks, translate_keys, DecodeHook, Describe, HookChain, HookError,
    KeyMapping, KeyTranslator, SourceKind, TypeDescriptor, TypeKind,
};
pub use decoder::{Decoded, Decoder, DecoderConfig};
pub use error::{DecodeError, Result};
pub use metadata::Metadata;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode `input` into `T` with the default hooks
pub fn decode<T>(input: Value) -> Result<T>
where
    T: Describe + DeserializeOwned,
{
    decode_with_metadata(input).map(|decoded| decoded.value)
}

/// Decode `input` into `T` with the default hooks, keeping the metadata
pub fn decode_with_metadata<T>(input: Value) -> Result<Decoded<T>>
where
    T: Describe + DeserializeOwned,
{
    Decoder::default().decode(input)
}
