//! RFC 6979 deterministic nonce derivation (HMAC-SHA-256 DRBG).
//!
//! The exchange protocol only requires a valid signature, but deterministic
//! nonces make signing reproducible and keep the nonce channel free of RNG
//! failure modes. The construction follows RFC 6979 section 3.2 with the
//! message input already reduced modulo the group order (bits2octets).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// Candidate nonce stream for one (secret, message) pair.
///
/// Candidates outside [1, n) are rejected by the caller, which then simply
/// pulls the next one; the generator state advances per RFC 6979's retry
/// rule either way.
pub(crate) struct NonceGenerator {
    k: [u8; 32],
    v: [u8; 32],
}

impl NonceGenerator {
    /// `secret` is the private scalar, `hash_reduced` the message hash
    /// already reduced modulo n, both big-endian.
    pub(crate) fn new(secret: &[u8; 32], hash_reduced: &[u8; 32]) -> Self {
        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];
        k = hmac(&k, &[&v, &[0x00], secret, hash_reduced]);
        v = hmac(&k, &[&v]);
        k = hmac(&k, &[&v, &[0x01], secret, hash_reduced]);
        v = hmac(&k, &[&v]);
        Self { k, v }
    }

    /// Produce the next candidate nonce bytes.
    pub(crate) fn next_candidate(&mut self) -> [u8; 32] {
        self.v = hmac(&self.k, &[&self.v]);
        let candidate = self.v;
        // Advance the state per the retry rule so a rejected candidate is
        // never reused.
        self.k = hmac(&self.k, &[&self.v, &[0x00]]);
        self.v = hmac(&self.k, &[&self.v]);
        candidate
    }
}
