//! Cryptographic primitives for Hyperliquid-style request signing.
//!
//! This crate provides the low-level building blocks the authentication
//! layer is assembled from:
//! - `keccak`: Keccak-256 (the legacy 0x01-padded variant used by Ethereum
//!   tooling, not SHA3-256)
//! - `field` / `scalar`: secp256k1 base-field and group-order arithmetic on
//!   4x64-bit limbs
//! - `curve`: Jacobian point arithmetic, decompression and wNAF scalar
//!   multiplication
//! - `ecdsa`: recoverable signing with RFC 6979 nonces, low-s
//!   canonicalization and recovery-id search
//! - `address`: Ethereum-style 20-byte addresses
//!
//! All operations are synchronous pure functions of their inputs; nothing in
//! this crate holds shared mutable state.

pub mod address;
pub mod curve;
pub mod ecdsa;
pub mod error;
pub mod field;
pub mod keccak;
pub(crate) mod limb;
pub mod rfc6979;
pub mod scalar;

pub use address::Address;
pub use curve::CurvePoint;
pub use ecdsa::{PublicKey, RecoverableSignature, SecretKey};
pub use error::{CryptoError, Result};
pub use field::FieldElement;
pub use keccak::{keccak256, Digest, Keccak256};
pub use scalar::Scalar;
