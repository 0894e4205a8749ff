//! Error types for settngs-cli

/// Result type for command-line operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing arguments or loading settings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad command-line arguments, or a help request
    #[error(transparent)]
    Argument(#[from] clap::Error),

    /// Error from settngs-core
    #[error(transparent)]
    Core(#[from] settngs_core::Error),
}

impl From<settngs_schema::Error> for Error {
    fn from(err: settngs_schema::Error) -> Self {
        Self::Core(err.into())
    }
}

impl From<settngs_codec::Error> for Error {
    fn from(err: settngs_codec::Error) -> Self {
        Self::Core(err.into())
    }
}
