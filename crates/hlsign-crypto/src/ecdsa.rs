//! Recoverable ECDSA over secp256k1.
//!
//! Signing produces (r, s, v) where s is canonicalized to the lower half of
//! the group order and v is found by searching recovery ids 0..=3 for the
//! one that actually reconstructs the signer's public key. The exchange wire
//! convention reports v as 27 + id.

use zeroize::Zeroizing;

use crate::address::Address;
use crate::curve::CurvePoint;
use crate::error::{CryptoError, Result};
use crate::field::FieldElement;
use crate::keccak::Digest;
use crate::limb;
use crate::rfc6979::NonceGenerator;
use crate::scalar::Scalar;

/// A secp256k1 private key with its derived public key.
///
/// The public half is derived once at construction so the recovery-id search
/// has a fixed comparison target. Hex input passes through `Zeroizing`
/// buffers; never log key material.
pub struct SecretKey {
    scalar: Scalar,
    public: PublicKey,
}

impl SecretKey {
    /// Build from 32 raw big-endian bytes.
    ///
    /// # Errors
    /// The value must be in [1, n).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSecretKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )))?;
        let scalar = Scalar::from_be_bytes(&bytes)
            .ok_or_else(|| CryptoError::InvalidSecretKey("value exceeds group order".into()))?;
        if scalar.is_zero() {
            return Err(CryptoError::InvalidSecretKey("zero key".into()));
        }
        let point = CurvePoint::generator().mul(&scalar);
        let public = PublicKey::from_point(&point)?;
        Ok(Self { scalar, public })
    }

    /// Parse a hex key, tolerating a 0x prefix and surrounding whitespace.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim().trim_start_matches("0x");
        let raw = Zeroizing::new(hex::decode(trimmed)?);
        Self::from_bytes(&raw)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn address(&self) -> Address {
        self.public.address()
    }

    fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.scalar.to_be_bytes())
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never appear in logs.
        write!(f, "SecretKey({})", self.address())
    }
}

/// An affine secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PublicKey {
    x: FieldElement,
    y: FieldElement,
}

impl PublicKey {
    pub fn from_point(point: &CurvePoint) -> Result<Self> {
        let (x, y) = point.to_affine()?;
        Ok(Self { x, y })
    }

    pub fn point(&self) -> CurvePoint {
        CurvePoint::from_affine(self.x, self.y)
    }

    /// The uncompressed encoding x || y, without the 0x04 tag byte.
    pub fn uncompressed_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.x.to_be_bytes());
        out[32..].copy_from_slice(&self.y.to_be_bytes());
        out
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }
}

/// An ECDSA signature carrying its recovery id.
///
/// Invariant: s is always in the lower half of the order (s <= n/2) and
/// v is 27 or 28 for signatures produced by `sign`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RecoverableSignature {
    r: Scalar,
    s: Scalar,
    v: u8,
}

impl RecoverableSignature {
    pub fn new(r: Scalar, s: Scalar, v: u8) -> Self {
        Self { r, s, v }
    }

    pub fn r_bytes(&self) -> [u8; 32] {
        self.r.to_be_bytes()
    }

    pub fn s_bytes(&self) -> [u8; 32] {
        self.s.to_be_bytes()
    }

    pub fn v(&self) -> u8 {
        self.v
    }

    pub fn is_low_s(&self) -> bool {
        !self.s.is_high()
    }
}

/// Sign a 32-byte message hash.
///
/// Nonces come from the RFC 6979 stream; candidates producing r = 0 or
/// s = 0 are skipped. The raw s is canonicalized to low-s form before the
/// recovery-id search runs, so the reported v always matches the final
/// (r, s) pair.
///
/// # Errors
/// `CryptoError::RecoveryIdNotFound` if no id in 0..=3 reconstructs the
/// signer key. That cannot happen for a correctly computed signature, so it
/// aborts the call instead of emitting an unverifiable signature.
pub fn sign(msg_hash: &Digest, key: &SecretKey) -> Result<RecoverableSignature> {
    let e = Scalar::from_be_bytes_reduced(msg_hash.as_bytes());
    let mut nonces = NonceGenerator::new(&key.secret_bytes(), &e.to_be_bytes());

    loop {
        let candidate = nonces.next_candidate();
        let Some(k) = Scalar::from_be_bytes(&candidate) else {
            continue;
        };
        if k.is_zero() {
            continue;
        }

        let (r_x, _) = CurvePoint::generator().mul(&k).to_affine()?;
        let r = Scalar::from_be_bytes_reduced(&r_x.to_be_bytes());
        if r.is_zero() {
            continue;
        }

        let s = k.invert()?.mul(&e.add(&r.mul(&key.scalar)));
        if s.is_zero() {
            continue;
        }
        let s = if s.is_high() { s.negate() } else { s };

        let v = find_recovery_id(&e, &r, &s, &key.public)?;
        return Ok(RecoverableSignature { r, s, v });
    }
}

/// Recover the public key from a signature and message hash.
///
/// # Errors
/// Fails when v is outside 27..=30 or the encoded candidate point does not
/// exist.
pub fn recover(msg_hash: &Digest, sig: &RecoverableSignature) -> Result<PublicKey> {
    if !(27..=30).contains(&sig.v) {
        return Err(CryptoError::RecoveryIdNotFound);
    }
    let e = Scalar::from_be_bytes_reduced(msg_hash.as_bytes());
    let point = recover_candidate(&e, &sig.r, &sig.s, sig.v - 27)?;
    PublicKey::from_point(&point)
}

/// Try recovery ids 0..=3 against the known public key; the first match is
/// the signature's v (reported as 27 + id).
fn find_recovery_id(e: &Scalar, r: &Scalar, s: &Scalar, expected: &PublicKey) -> Result<u8> {
    let expected_point = expected.point();
    for rec_id in 0u8..4 {
        if let Ok(q) = recover_candidate(e, r, s, rec_id) {
            if q == expected_point {
                return Ok(27 + rec_id);
            }
        }
    }
    Err(CryptoError::RecoveryIdNotFound)
}

/// Reconstruct the candidate public key for one recovery id:
/// Q = r^-1 * (s*R - e*G), with R decompressed from x = r + (id/2)*n and
/// parity id & 1.
fn recover_candidate(e: &Scalar, r: &Scalar, s: &Scalar, rec_id: u8) -> Result<CurvePoint> {
    let mut x_limbs = *r.limbs();
    if rec_id >= 2 {
        let (sum, carry) = limb::add_with_carry(&x_limbs, &Scalar::ORDER);
        if carry {
            return Err(CryptoError::InvalidPoint(
                "candidate x exceeds the field prime".into(),
            ));
        }
        x_limbs = sum;
    }

    // decompress rejects x >= p
    let r_point = CurvePoint::decompress(&limb::to_be_bytes(&x_limbs), rec_id & 1 == 1)?;
    if !r_point.has_order_n() {
        return Err(CryptoError::InvalidPoint(
            "candidate point is not in the prime-order subgroup".into(),
        ));
    }

    let r_inv = r.invert()?;
    let u1 = e.negate().mul(&r_inv);
    let u2 = s.mul(&r_inv);
    let q = CurvePoint::linear_combination(&u1, &CurvePoint::generator(), &u2, &r_point);
    if q.is_infinity() {
        return Err(CryptoError::InvalidPoint(
            "recovered the point at infinity".into(),
        ));
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keccak::keccak256;
    use sha2::{Digest as _, Sha256};

    // Well-known development key (hardhat account #0); never use in
    // production.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_secret_key_address() {
        let key = SecretKey::from_hex(TEST_KEY).unwrap();
        assert_eq!(
            key.address().to_string(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_secret_key_rejects_invalid() {
        assert!(SecretKey::from_bytes(&[0u8; 32]).is_err());
        assert!(SecretKey::from_bytes(&[1u8; 16]).is_err());
        // n itself is out of range
        let n_bytes =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        assert!(SecretKey::from_bytes(&n_bytes).is_err());
        assert!(SecretKey::from_hex("0xzz").is_err());
    }

    #[test]
    fn test_rfc6979_reference_signature() {
        // secp256k1 / SHA-256("sample"), low-s normalized
        let key = SecretKey::from_hex(
            "c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721",
        )
        .unwrap();
        let h1: [u8; 32] = Sha256::digest(b"sample").into();
        let sig = sign(&Digest::from_bytes(h1), &key).unwrap();
        assert_eq!(
            hex::encode(sig.r_bytes()),
            "432310e32cb80eb6503a26ce83cc165c783b870845fb8aad6d970889fcd7a6c8"
        );
        assert_eq!(
            hex::encode(sig.s_bytes()),
            "530128b6b81c548874a6305d93ed071ca6e05074d85863d4056ce89b02bfab69"
        );
        assert_eq!(sig.v(), 27);
    }

    #[test]
    fn test_matches_reference_sdk_signature() {
        // The exact hash-to-sign and signature the reference SDK produces
        // for a known phantom-agent payload.
        let key = SecretKey::from_hex(TEST_KEY).unwrap();
        let msg = Digest::from_bytes(
            hex::decode("7a4448d5a2b26a982eb79a0930f02065c9dc7128c53a1ad908475b61e0ab2874")
                .unwrap()
                .try_into()
                .unwrap(),
        );
        let sig = sign(&msg, &key).unwrap();
        assert_eq!(
            hex::encode(sig.r_bytes()),
            "a9e728f2faea4febc0b6eb9c3dbbac04b375eb3869f051030d205318425faebc"
        );
        assert_eq!(
            hex::encode(sig.s_bytes()),
            "7b21be7030bb979352b71494708b99d789266f0d0e1242a21e74905b683e4698"
        );
        assert_eq!(sig.v(), 27);
    }

    #[test]
    fn test_sign_recover_roundtrip() {
        for (key_byte, msg) in [(0x11u8, b"m1".as_slice()), (0x5A, b"m2"), (0xE3, b"m3")] {
            let key = SecretKey::from_bytes(&[key_byte; 32]).unwrap();
            let hash = keccak256(msg);
            let sig = sign(&hash, &key).unwrap();
            let recovered = recover(&hash, &sig).unwrap();
            assert_eq!(&recovered, key.public_key());
        }
    }

    #[test]
    fn test_low_s_invariant() {
        for i in 1u8..32 {
            let key = SecretKey::from_bytes(&[i; 32]).unwrap();
            let sig = sign(&keccak256(&[i]), &key).unwrap();
            assert!(sig.is_low_s(), "signature s must stay below n/2");
            assert!(sig.v() == 27 || sig.v() == 28);
        }
    }

    #[test]
    fn test_high_s_transform_recovers_same_key() {
        let key = SecretKey::from_bytes(&[0x33; 32]).unwrap();
        let hash = keccak256(b"malleability");
        let sig = sign(&hash, &key).unwrap();

        // Synthesize the malleable twin: s' = n - s with flipped parity.
        let r = Scalar::from_be_bytes(&sig.r_bytes()).unwrap();
        let high_s = Scalar::from_be_bytes(&sig.s_bytes()).unwrap().negate();
        assert!(high_s.is_high());
        let flipped_v = if sig.v() == 27 { 28 } else { 27 };
        let twin = RecoverableSignature::new(r, high_s, flipped_v);

        // Normalizing the twin reproduces the original signature, and both
        // recover to the same key.
        let renorm = RecoverableSignature::new(
            r,
            high_s.negate(),
            if twin.v() == 27 { 28 } else { 27 },
        );
        assert_eq!(renorm, sig);
        assert_eq!(
            recover(&hash, &twin).unwrap(),
            recover(&hash, &sig).unwrap()
        );
    }

    #[test]
    fn test_recover_rejects_bad_v() {
        let key = SecretKey::from_bytes(&[0x44; 32]).unwrap();
        let hash = keccak256(b"bad v");
        let sig = sign(&hash, &key).unwrap();
        let bad = RecoverableSignature::new(
            Scalar::from_be_bytes(&sig.r_bytes()).unwrap(),
            Scalar::from_be_bytes(&sig.s_bytes()).unwrap(),
            31,
        );
        assert!(recover(&hash, &bad).is_err());
    }

    #[test]
    fn test_wrong_parity_recovers_different_key() {
        let key = SecretKey::from_bytes(&[0x55; 32]).unwrap();
        let hash = keccak256(b"parity");
        let sig = sign(&hash, &key).unwrap();
        let flipped = RecoverableSignature::new(
            Scalar::from_be_bytes(&sig.r_bytes()).unwrap(),
            Scalar::from_be_bytes(&sig.s_bytes()).unwrap(),
            if sig.v() == 27 { 28 } else { 27 },
        );
        if let Ok(other) = recover(&hash, &flipped) {
            assert_ne!(&other, key.public_key());
        }
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = SecretKey::from_bytes(&[0x66; 32]).unwrap();
        let hash = keccak256(b"determinism");
        assert_eq!(sign(&hash, &key).unwrap(), sign(&hash, &key).unwrap());
    }
}
