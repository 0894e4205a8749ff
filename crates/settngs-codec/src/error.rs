//! Error types for settngs-codec

use crate::format::Format;
use std::path::PathBuf;

/// Result type for settngs-codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding, encoding or storing documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored bytes are not a valid document in the given format
    #[error("Failed to decode {format} settings: {message}")]
    Decode { format: Format, message: String },

    /// The stored bytes decoded, but the top level is not a mapping
    #[error("Settings document must be a mapping at the top level, found {found}")]
    NotADocument { found: &'static str },

    #[error("Failed to encode {format} settings: {message}")]
    Encode { format: Format, message: String },

    #[error("Unsupported settings format: {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the stored document could not be understood
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::NotADocument { .. })
    }
}
