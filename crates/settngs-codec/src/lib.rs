//! Settings document codecs for settngs
//!
//! Decodes stored settings into a nested [`Document`] (group → option →
//! value) and encodes it back, plus the atomic file I/O used to persist it.
//!
//! # Example
//!
//! ```
//! use settngs_codec::{Codec, JsonCodec};
//!
//! let doc = JsonCodec.decode(br#"{"example": {"hello": "world"}}"#).unwrap();
//! assert_eq!(doc["example"]["hello"], "world");
//!
//! let bytes = JsonCodec.encode(&doc).unwrap();
//! assert_eq!(JsonCodec.decode(&bytes).unwrap(), doc);
//! ```

pub mod error;
pub mod format;
pub mod io;

pub use error::{Error, Result};
pub use format::{Codec, DATETIME_KEY, Format, JsonCodec, TomlCodec};

/// A decoded settings document: group names at the top level, option names
/// at the second level. Key order is preserved.
pub type Document = serde_json::Map<String, serde_json::Value>;
