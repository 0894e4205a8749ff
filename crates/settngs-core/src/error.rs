//! Error types for settngs-core

/// Result type for settngs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Declaration error from settngs-schema
    #[error(transparent)]
    Schema(#[from] settngs_schema::Error),

    /// Encoding, decoding or file error from settngs-codec
    #[error(transparent)]
    Codec(#[from] settngs_codec::Error),
}

impl Error {
    /// True when stored bytes could not be decoded into a document.
    ///
    /// Hosts usually recover from this by falling back to defaults.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Codec(e) if e.is_decode())
    }
}
