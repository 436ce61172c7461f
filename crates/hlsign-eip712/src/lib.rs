//! EIP-712 typed-structured-data hashing.
//!
//! Produces the 32-byte hash-to-sign from a domain descriptor, a primary
//! type, a registry of struct type descriptors and the message field values:
//!
//! ```text
//! keccak256(0x19 || 0x01 || hashStruct(EIP712Domain) || hashStruct(primaryType))
//! ```
//!
//! Type descriptors declare field order; values are supplied positionally in
//! that declared order. The registry is read-only once populated, so the
//! encoder is safe to call concurrently from any thread.

pub mod encoder;
pub mod error;
pub mod types;

pub use encoder::{encode_type, hash_struct, signing_hash, type_hash};
pub use error::{Eip712Error, Result};
pub use types::{Eip712Domain, FieldDescriptor, TypeRegistry, TypedValue};
