//! Ethereum-style 20-byte addresses.

use std::fmt;
use std::str::FromStr;

use crate::ecdsa::PublicKey;
use crate::error::{CryptoError, Result};
use crate::keccak::keccak256;

/// A 20-byte account address: the trailing 20 bytes of
/// keccak256(x || y) over the uncompressed public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let digest = keccak256(&public_key.uncompressed_bytes());
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest.as_bytes()[12..]);
        Address(out)
    }

    /// Lowercase hex without the 0x prefix, as embedded in action hashes.
    pub fn to_hex_no_prefix(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    /// Strict parse: exactly 42 characters, 0x-prefixed hex. Malformed
    /// addresses are rejected here, before any cryptographic work begins.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 42 {
            return Err(CryptoError::InvalidAddress(format!(
                "expected 42 characters, got {}",
                s.len()
            )));
        }
        let Some(hex_part) = s.strip_prefix("0x") else {
            return Err(CryptoError::InvalidAddress("missing 0x prefix".into()));
        };
        let raw = hex::decode(hex_part)
            .map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&raw);
        Ok(Address(out))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}
