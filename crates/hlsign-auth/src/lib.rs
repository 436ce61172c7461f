//! Request authentication for Hyperliquid-style exchanges.
//!
//! Before an authenticated request leaves the client, its action payload is
//! canonically packed, wrapped in the EIP-712 envelope matching its
//! category, Keccak-256 hashed and signed with a recoverable secp256k1
//! signature:
//!
//! - *Exchange actions* (trading, cancels) are msgpack-packed together with
//!   nonce, optional vault address and optional expiry into a "connection
//!   id" digest, which is signed through the phantom `Agent` struct under
//!   the fixed Exchange domain.
//! - *User actions* (transfers, withdrawals; recognizable by their
//!   `signatureChainId` field) are signed directly: the EIP-712 struct is
//!   derived at runtime from the action's own key/value pairs under the
//!   HyperliquidSignTransaction domain.
//!
//! The resulting `{r, s, v}` object is merged into the outgoing request
//! body along with the nonce. Everything here is synchronous and free of
//! shared mutable state; per-address nonce uniqueness remains the
//! transport's responsibility.

pub mod action_hash;
pub mod agent;
pub mod error;
pub mod keys;
pub mod nonce;
pub mod provider;
pub mod wire;

pub use action_hash::action_hash;
pub use agent::PhantomAgent;
pub use error::{AuthError, Result};
pub use keys::{KeyError, KeyManager, KeySource};
pub use nonce::{Clock, NonceManager, SystemClock};
pub use provider::{AuthenticationProvider, Environment, RequestSignature};
pub use wire::{Action, BuilderInfo, CancelWire, OrderTypeWire, OrderWire};
