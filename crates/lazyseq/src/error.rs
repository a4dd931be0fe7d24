//! Error types for the lazyseq crate.

use thiserror::Error;

/// Errors raised by the fallible terminal operations.
///
/// Everything else in the crate is infallible for well-typed input. Panics
/// raised by user callbacks are never caught or wrapped.
#[derive(Debug, Error)]
pub enum SeqError {
    /// A key produced for `to_object` is neither string- nor number-like.
    #[error("object keys must be strings or numbers, got {kind}")]
    InvalidKey { kind: &'static str },

    /// An element could not be converted into a JSON value.
    #[error("failed to serialize element: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for lazyseq operations.
pub type Result<T> = std::result::Result<T, SeqError>;
