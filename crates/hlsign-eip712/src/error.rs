//! Error types for hlsign-eip712.

use thiserror::Error;

/// Typed-data encoding errors.
///
/// All of these indicate a malformed request on the caller's side; none are
/// retryable and all must abort the enclosing signing call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Eip712Error {
    #[error("Unknown struct type: {0}")]
    UnknownType(String),

    #[error("Type {type_name} declares {expected} fields but {got} values were supplied")]
    ArityMismatch {
        type_name: String,
        expected: usize,
        got: usize,
    },

    #[error("Value for field '{field}' does not match declared type {type_name}")]
    ValueMismatch { field: String, type_name: String },

    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),
}

/// Result type alias for typed-data operations.
pub type Result<T> = std::result::Result<T, Eip712Error>;
