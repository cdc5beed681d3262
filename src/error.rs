//! Error types for mtree

use thiserror::Error;

/// Result type alias for mtree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a caller-supplied digest function
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in mtree operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot build a merkle tree from an empty item sequence")]
    EmptyInput,

    #[error("digest function '{name}' failed: {source}")]
    DigestFunction {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Root mismatch: expected {expected}, computed {actual}")]
    RootMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a failure raised inside a digest function
    pub fn digest_function(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::DigestFunction {
            name: name.into(),
            source: source.into(),
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidDigest(err.to_string())
    }
}
