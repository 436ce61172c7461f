//! The authentication orchestrator.
//!
//! Decides per action whether it is a *user action* (carries an explicit
//! `signatureChainId`, e.g. transfers and withdrawals) or an *exchange
//! action* (trading actions wrapped in the phantom Agent struct), builds
//! the matching EIP-712 envelope and signs it. This is the only surface
//! the transport layer talks to.

use hlsign_crypto::ecdsa::{self, RecoverableSignature};
use hlsign_crypto::{Address, Digest};
use hlsign_eip712::{signing_hash, Eip712Domain, FieldDescriptor, TypeRegistry, TypedValue};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::action_hash::action_hash;
use crate::agent::PhantomAgent;
use crate::error::{AuthError, Result};
use crate::keys::KeyManager;
use crate::nonce::{NonceManager, SystemClock};

/// Domain name for user actions; the chain id comes from the action itself.
pub const USER_DOMAIN_NAME: &str = "HyperliquidSignTransaction";
pub const USER_DOMAIN_VERSION: &str = "1";

/// Prefix of the runtime-derived user action struct types.
const USER_TYPE_PREFIX: &str = "HyperliquidTransaction:";

/// Target exchange environment. This is the only environment-sensitive
/// branch in the signing path: it selects the agent `source` and the wallet
/// chain id callers embed in user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Mainnet,
    Testnet,
}

impl Environment {
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Environment::Mainnet)
    }

    /// Agent `source` field: "a" on mainnet, "b" on testnet.
    pub fn agent_source(&self) -> &'static str {
        match self {
            Environment::Mainnet => crate::agent::SOURCE_MAINNET,
            Environment::Testnet => crate::agent::SOURCE_TESTNET,
        }
    }

    /// Wallet chain id for user actions: Arbitrum One on mainnet, Arbitrum
    /// Sepolia on testnet.
    pub fn default_signature_chain_id(&self) -> &'static str {
        match self {
            Environment::Mainnet => "0xa4b1",
            Environment::Testnet => "0x66eee",
        }
    }
}

/// The signature object merged into the outgoing request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequestSignature {
    /// 0x-prefixed 64-hex-char r.
    pub r: String,
    /// 0x-prefixed 64-hex-char s.
    pub s: String,
    /// 27 or 28.
    pub v: u8,
}

impl From<&RecoverableSignature> for RequestSignature {
    fn from(sig: &RecoverableSignature) -> Self {
        Self {
            r: format!("0x{}", hex::encode(sig.r_bytes())),
            s: format!("0x{}", hex::encode(sig.s_bytes())),
            v: sig.v(),
        }
    }
}

/// Signs authenticated requests for one key and environment.
pub struct AuthenticationProvider {
    keys: KeyManager,
    environment: Environment,
    nonces: NonceManager<SystemClock>,
}

impl AuthenticationProvider {
    pub fn new(keys: KeyManager, environment: Environment) -> Self {
        Self {
            keys,
            environment,
            nonces: NonceManager::with_system_clock(),
        }
    }

    pub fn address(&self) -> Address {
        self.keys.address()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Sign one action.
    ///
    /// For user actions the nonce, vault and expiry parameters are unused:
    /// those fields live inside the action payload itself. For exchange
    /// actions they enter the connection-id hash.
    ///
    /// # Errors
    /// Any failure (malformed action, unsupported field kind, bad vault
    /// address, recovery-id exhaustion) aborts the request before network
    /// I/O; nothing here is retryable.
    pub fn authenticate(
        &self,
        action: &Map<String, Value>,
        nonce: u64,
        vault_address: Option<&Address>,
        expires_after: Option<u64>,
    ) -> Result<RequestSignature> {
        let hash = if action.contains_key("signatureChainId") {
            tracing::debug!(branch = "user", "signing action");
            user_action_signing_hash(action)?
        } else {
            tracing::debug!(branch = "exchange", "signing action");
            let connection_id = action_hash(action, nonce, vault_address, expires_after)?;
            PhantomAgent::new(connection_id, self.environment.is_mainnet()).signing_hash()?
        };

        // The signature is sensitive; do not log it.
        let signature = ecdsa::sign(&hash, self.keys.secret_key())?;
        Ok(RequestSignature::from(&signature))
    }

    /// Authenticate a full request body in place: reads `action`,
    /// `vaultAddress` and `expiresAfter`, then injects `nonce` and
    /// `signature`.
    ///
    /// The nonce is taken from the action's own `time` or `nonce` field
    /// when present (user actions carry it in-band), otherwise drawn from
    /// the monotonic nonce manager.
    pub fn sign_body(&self, body: &mut Value) -> Result<()> {
        let (nonce, signature) = {
            let obj = body
                .as_object()
                .ok_or_else(|| AuthError::MalformedAction("request body must be an object".into()))?;
            let action = obj
                .get("action")
                .and_then(Value::as_object)
                .ok_or_else(|| AuthError::MalformedAction("missing action object".into()))?;

            let nonce = action
                .get("time")
                .and_then(Value::as_u64)
                .or_else(|| action.get("nonce").and_then(Value::as_u64))
                .unwrap_or_else(|| self.nonces.next());

            let vault_address = match obj.get("vaultAddress").and_then(Value::as_str) {
                Some(raw) => Some(raw.parse::<Address>().map_err(AuthError::Crypto)?),
                None => None,
            };
            let expires_after = obj.get("expiresAfter").and_then(Value::as_u64);

            (
                nonce,
                self.authenticate(action, nonce, vault_address.as_ref(), expires_after)?,
            )
        };

        let Value::Object(map) = body else {
            return Err(AuthError::MalformedAction("request body must be an object".into()));
        };
        map.insert("nonce".into(), nonce.into());
        map.insert(
            "signature".into(),
            serde_json::to_value(&signature).map_err(|e| AuthError::Serialization(e.to_string()))?,
        );
        Ok(())
    }
}

/// Hash-to-sign for a user action: the EIP-712 struct type is derived at
/// runtime from the action's own key/value pairs (in map order, excluding
/// `type` and `signatureChainId`), under the transaction domain with the
/// chain id parsed from the action.
pub(crate) fn user_action_signing_hash(action: &Map<String, Value>) -> Result<Digest> {
    let chain_hex = action
        .get("signatureChainId")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MalformedAction("signatureChainId must be a hex string".into()))?;
    let chain_id = u64::from_str_radix(chain_hex.trim_start_matches("0x"), 16)
        .map_err(|e| AuthError::MalformedAction(format!("bad signatureChainId: {e}")))?;

    let action_name = action
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MalformedAction("missing action type".into()))?;
    // The wire name "withdraw3" signs as plain "withdraw".
    let action_name = if action_name == "withdraw3" {
        "withdraw"
    } else {
        action_name
    };
    let primary_type = format!("{USER_TYPE_PREFIX}{}", capitalize(action_name));

    let mut descriptors = Vec::with_capacity(action.len());
    let mut values = Vec::with_capacity(action.len());
    for (key, value) in action {
        if key == "type" || key == "signatureChainId" {
            continue;
        }
        let (type_name, typed) = typed_field(key, value)?;
        descriptors.push(FieldDescriptor::new(key.clone(), type_name));
        values.push(typed);
    }

    let mut registry = TypeRegistry::new();
    registry.register(primary_type.clone(), descriptors);

    let domain = Eip712Domain::new(USER_DOMAIN_NAME, USER_DOMAIN_VERSION, chain_id);
    Ok(signing_hash(&domain, &registry, &primary_type, &values)?)
}

/// Map one action field to its ABI type and typed value. Address-like keys
/// are typed `address`; everything else follows the value's scalar kind.
/// Unsupported kinds fail loudly instead of being coerced.
fn typed_field(key: &str, value: &Value) -> Result<(&'static str, TypedValue)> {
    if key == "user" || key == "builder" {
        let addr = value
            .as_str()
            .ok_or_else(|| AuthError::UnsupportedValue(key.to_string()))?
            .parse::<Address>()?;
        return Ok(("address", TypedValue::Address(addr)));
    }
    match value {
        Value::String(s) => Ok(("string", TypedValue::String(s.clone()))),
        Value::Bool(b) => Ok(("bool", TypedValue::Bool(*b))),
        Value::Number(n) => n
            .as_u64()
            .map(|v| ("uint64", TypedValue::Uint64(v)))
            .ok_or_else(|| AuthError::UnsupportedValue(key.to_string())),
        _ => Err(AuthError::UnsupportedValue(key.to_string())),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
