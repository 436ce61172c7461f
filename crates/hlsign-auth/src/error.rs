//! Error types for hlsign-auth.

use thiserror::Error;

use crate::keys::KeyError;

/// Authentication errors.
///
/// Signing runs before any network I/O, so every failure here aborts the
/// enclosing request without side effects. None of these are retryable:
/// they indicate either a malformed payload or an internal integrity bug.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] hlsign_crypto::CryptoError),

    #[error("Typed data error: {0}")]
    Eip712(#[from] hlsign_eip712::Eip712Error),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Action serialization failed: {0}")]
    Serialization(String),

    #[error("Malformed action: {0}")]
    MalformedAction(String),

    #[error("Unsupported value kind for action field '{0}'")]
    UnsupportedValue(String),
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
