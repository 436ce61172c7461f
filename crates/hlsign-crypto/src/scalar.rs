//! secp256k1 scalar arithmetic modulo the group order n.
//!
//! Same fast-reduction machinery as the base field; the fold constant
//! c = 2^256 - n is 129 bits wide instead of 33, so the fold takes one more
//! round to converge.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{CryptoError, Result};
use crate::limb::{self, Limbs};

/// n, the order of the secp256k1 group.
const N: Limbs = [
    0xBFD25E8CD0364141,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// c = 2^256 - n.
const C: [u64; 3] = [0x402DA1732FC9BEBF, 0x4551231950B75FC4, 0x1];

/// n - 2, the inversion exponent.
const N_MINUS_2: Limbs = [
    0xBFD25E8CD036413F,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// n / 2 (floor). Signatures with s above this are malleable and must be
/// canonicalized.
const HALF_N: Limbs = [
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
];

/// A scalar in [0, n).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Scalar(Limbs);

impl Scalar {
    pub const ZERO: Self = Scalar(limb::ZERO);
    pub const ONE: Self = Scalar(limb::ONE);

    /// The order itself as raw limbs, for order-of-point checks.
    pub(crate) const ORDER: Limbs = N;

    /// Parse a canonical big-endian encoding, rejecting values >= n.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = limb::from_be_bytes(bytes);
        if limb::cmp(&limbs, &N) == Ordering::Less {
            Some(Scalar(limbs))
        } else {
            None
        }
    }

    /// Parse a big-endian encoding, reducing modulo n. Message hashes enter
    /// the signature equation through this path.
    pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Scalar(limb::reduce(&limb::from_be_bytes(bytes), &N, &C))
    }

    pub fn from_u64(v: u64) -> Self {
        Scalar([v, 0, 0, 0])
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        limb::to_be_bytes(&self.0)
    }

    pub(crate) fn limbs(&self) -> &Limbs {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        limb::is_zero(&self.0)
    }

    /// Whether this scalar lies in the upper half of the order (s > n/2).
    pub fn is_high(&self) -> bool {
        limb::cmp(&self.0, &HALF_N) == Ordering::Greater
    }

    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = limb::add_with_carry(&self.0, &other.0);
        if carry || limb::cmp(&sum, &N) != Ordering::Less {
            Scalar(limb::sub_with_borrow(&sum, &N).0)
        } else {
            Scalar(sum)
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        let wide = limb::mul_wide(&self.0, &other.0);
        Scalar(limb::reduce_wide(&wide, &N, &C))
    }

    pub fn negate(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            Scalar(limb::sub_with_borrow(&N, &self.0).0)
        }
    }

    /// Multiplicative inverse via n-2 exponentiation, 4-bit windowed.
    ///
    /// # Errors
    /// `CryptoError::NonInvertible` on zero; reaching that in a signing path
    /// is a bug, not a user error.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(CryptoError::NonInvertible);
        }

        let mut table = [Self::ONE; 16];
        table[1] = *self;
        for i in 2..16 {
            table[i] = table[i - 1].mul(self);
        }

        let mut acc = Self::ONE;
        let mut started = false;
        for limb_idx in (0..4).rev() {
            for nibble_idx in (0..16).rev() {
                let digit = ((N_MINUS_2[limb_idx] >> (nibble_idx * 4)) & 0xF) as usize;
                if started {
                    for _ in 0..4 {
                        acc = acc.mul(&acc);
                    }
                    if digit != 0 {
                        acc = acc.mul(&table[digit]);
                    }
                } else if digit != 0 {
                    acc = table[digit];
                    started = true;
                }
            }
        }
        Ok(acc)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps_order() {
        // (n - 1) + 2 == 1
        let n_minus_1 = Scalar::ZERO.add(&Scalar::ONE.negate());
        assert_eq!(n_minus_1.add(&Scalar::from_u64(2)), Scalar::ONE);
    }

    #[test]
    fn test_mul_and_invert() {
        for v in [1u64, 2, 7, 1_000_003, u64::MAX] {
            let a = Scalar::from_u64(v);
            assert_eq!(a.mul(&a.invert().unwrap()), Scalar::ONE);
        }
    }

    #[test]
    fn test_invert_zero_fails() {
        assert_eq!(Scalar::ZERO.invert(), Err(CryptoError::NonInvertible));
    }

    #[test]
    fn test_negate_sums_to_zero() {
        let a = Scalar::from_u64(999);
        assert_eq!(a.add(&a.negate()), Scalar::ZERO);
    }

    #[test]
    fn test_is_high_boundary() {
        // n/2 itself is not high; n/2 + 1 is.
        let half = Scalar(HALF_N);
        assert!(!half.is_high());
        assert!(half.add(&Scalar::ONE).is_high());
        assert!(!Scalar::ZERO.is_high());
        // -1 = n - 1 is high
        assert!(Scalar::ONE.negate().is_high());
    }

    #[test]
    fn test_from_be_bytes_rejects_order() {
        let n_bytes = limb::to_be_bytes(&N);
        assert!(Scalar::from_be_bytes(&n_bytes).is_none());
        // but the reducing parser wraps it to zero
        assert_eq!(Scalar::from_be_bytes_reduced(&n_bytes), Scalar::ZERO);
    }

    #[test]
    fn test_reduced_parse_of_all_ones() {
        let bytes = [0xFF; 32];
        let reduced = Scalar::from_be_bytes_reduced(&bytes);
        // 2^256 - 1 mod n == (2^256 - n) - 1 == c - 1
        let expected = Scalar([0x402DA1732FC9BEBE, 0x4551231950B75FC4, 0x1, 0]);
        assert_eq!(reduced, expected);
    }

    #[test]
    fn test_low_s_transform_identity() {
        // s + (n - s) == 0 for any s
        let s = Scalar::from_be_bytes_reduced(&[0xAB; 32]);
        assert_eq!(s.add(&s.negate()), Scalar::ZERO);
    }
}
