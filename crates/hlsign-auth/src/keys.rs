//! Signing key loading.
//!
//! Keys are loaded once at startup from an environment variable or a file
//! (0600 permissions recommended) and held for the process lifetime; there
//! is no runtime rotation. Raw hex passes through `Zeroizing` buffers and
//! key material is never logged.

use std::path::PathBuf;

use hlsign_crypto::{Address, SecretKey};
use thiserror::Error;
use zeroize::Zeroizing;

/// Source of the signing private key.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Read from an environment variable (development).
    EnvVar { var_name: String },
    /// Read from a file (production).
    File { path: PathBuf },
}

/// Key management errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: Address, actual: Address },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Holds the signing key for the process lifetime.
pub struct KeyManager {
    secret: SecretKey,
}

impl KeyManager {
    /// Load the key from the given source.
    ///
    /// # Errors
    /// Fails when the source is unreadable, the hex is malformed, the
    /// scalar is out of range, or the derived address does not match
    /// `expected_address` (when provided).
    pub fn load(source: KeySource, expected_address: Option<Address>) -> Result<Self, KeyError> {
        let raw_hex: Zeroizing<String> = match source {
            KeySource::EnvVar { ref var_name } => Zeroizing::new(
                std::env::var(var_name).map_err(|_| KeyError::EnvVarNotFound(var_name.clone()))?,
            ),
            KeySource::File { ref path } => Zeroizing::new(std::fs::read_to_string(path)?),
        };
        Self::from_hex(&raw_hex, expected_address)
    }

    /// Build directly from a hex string (tests, embedded configuration).
    pub fn from_hex(hex_key: &str, expected_address: Option<Address>) -> Result<Self, KeyError> {
        let secret =
            SecretKey::from_hex(hex_key).map_err(|e| KeyError::InvalidKey(e.to_string()))?;

        if let Some(expected) = expected_address {
            if secret.address() != expected {
                return Err(KeyError::AddressMismatch {
                    expected,
                    actual: secret.address(),
                });
            }
        }

        tracing::debug!(address = %secret.address(), "signing key loaded");
        Ok(Self { secret })
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn address(&self) -> Address {
        self.secret.address()
    }
}
