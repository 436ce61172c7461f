//! Phantom agent envelope for exchange actions.
//!
//! Trading actions are not EIP-712 encoded field by field; instead their
//! connection id (see `action_hash`) is wrapped in a synthetic
//! `Agent { source, connectionId }` struct under a fixed domain. The
//! `source` field distinguishes mainnet ("a") from testnet ("b").

use hlsign_crypto::Digest;
use hlsign_eip712::{signing_hash, Eip712Domain, FieldDescriptor, TypeRegistry, TypedValue};
use once_cell::sync::Lazy;

use crate::error::Result;

pub const AGENT_DOMAIN_NAME: &str = "Exchange";
pub const AGENT_DOMAIN_VERSION: &str = "1";
pub const AGENT_CHAIN_ID: u64 = 1337;

pub const SOURCE_MAINNET: &str = "a";
pub const SOURCE_TESTNET: &str = "b";

/// The one process-wide type registry. Populated once, read-only after,
/// so the signing path needs no synchronization.
static AGENT_TYPES: Lazy<TypeRegistry> = Lazy::new(|| {
    let mut registry = TypeRegistry::new();
    registry.register(
        "Agent",
        vec![
            FieldDescriptor::new("source", "string"),
            FieldDescriptor::new("connectionId", "bytes32"),
        ],
    );
    registry
});

/// The phantom message signed on behalf of an exchange action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhantomAgent {
    pub source: String,
    pub connection_id: Digest,
}

impl PhantomAgent {
    pub fn new(connection_id: Digest, is_mainnet: bool) -> Self {
        Self {
            source: if is_mainnet {
                SOURCE_MAINNET.to_string()
            } else {
                SOURCE_TESTNET.to_string()
            },
            connection_id,
        }
    }

    /// The 32-byte hash-to-sign for this agent message.
    pub fn signing_hash(&self) -> Result<Digest> {
        let domain = Eip712Domain::new(AGENT_DOMAIN_NAME, AGENT_DOMAIN_VERSION, AGENT_CHAIN_ID);
        let message = vec![
            TypedValue::String(self.source.clone()),
            TypedValue::Bytes32(*self.connection_id.as_bytes()),
        ];
        Ok(signing_hash(&domain, &AGENT_TYPES, "Agent", &message)?)
    }
}
