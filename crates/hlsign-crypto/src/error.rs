//! Error types for hlsign-crypto.

use thiserror::Error;

/// Cryptographic error types.
///
/// Every variant here is an integrity failure, not a recoverable runtime
/// condition: callers must abort the enclosing signing request rather than
/// retry, because retrying a deterministic computation cannot change its
/// outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("Inversion of zero field element")]
    NonInvertible,

    #[error("Invalid point encoding: {0}")]
    InvalidPoint(String),

    #[error("Recovery id search exhausted without matching the signer key")]
    RecoveryIdNotFound,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to decode hex: {0}")]
    HexDecode(String),
}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        CryptoError::HexDecode(e.to_string())
    }
}

/// Result type alias for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
