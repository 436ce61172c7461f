//! secp256k1 base-field arithmetic.
//!
//! Elements live in [0, p) for p = 2^256 - 2^32 - 977. Every stored value is
//! already reduced and every operation returns a reduced result, so the rest
//! of the crate never has to reason about partially reduced limbs.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{CryptoError, Result};
use crate::limb::{self, Limbs};

/// p = 2^256 - 2^32 - 977.
const P: Limbs = [
    0xFFFFFFFEFFFFFC2F,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// c = 2^256 - p = 2^32 + 977. The small fold constant that makes the fast
/// reduction work.
const C: [u64; 3] = [0x1000003D1, 0, 0];

/// p - 2, the inversion exponent (Fermat).
const P_MINUS_2: Limbs = [
    0xFFFFFFFEFFFFFC2D,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// (p + 1) / 4, the square-root exponent. Valid because p = 3 (mod 4).
const SQRT_EXP: Limbs = [
    0xFFFFFFFFBFFFFF0C,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0x3FFFFFFFFFFFFFFF,
];

/// An element of the secp256k1 base field.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FieldElement(Limbs);

impl FieldElement {
    pub const ZERO: Self = FieldElement(limb::ZERO);
    pub const ONE: Self = FieldElement(limb::ONE);

    /// Curve constant b = 7.
    pub const B: Self = FieldElement([7, 0, 0, 0]);

    pub(crate) const fn from_limbs_unchecked(limbs: Limbs) -> Self {
        FieldElement(limbs)
    }

    /// Parse a canonical big-endian encoding. Returns `None` for values
    /// >= p; decompression candidates outside the field must be rejected,
    /// not wrapped.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = limb::from_be_bytes(bytes);
        if limb::cmp(&limbs, &P) == Ordering::Less {
            Some(FieldElement(limbs))
        } else {
            None
        }
    }

    pub fn from_u64(v: u64) -> Self {
        FieldElement([v, 0, 0, 0])
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        limb::to_be_bytes(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        limb::is_zero(&self.0)
    }

    pub fn is_odd(&self) -> bool {
        limb::is_odd(&self.0)
    }

    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = limb::add_with_carry(&self.0, &other.0);
        if carry || limb::cmp(&sum, &P) != Ordering::Less {
            FieldElement(limb::sub_with_borrow(&sum, &P).0)
        } else {
            FieldElement(sum)
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = limb::sub_with_borrow(&self.0, &other.0);
        if borrow {
            FieldElement(limb::add_with_carry(&diff, &P).0)
        } else {
            FieldElement(diff)
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        let wide = limb::mul_wide(&self.0, &other.0);
        FieldElement(limb::reduce_wide(&wide, &P, &C))
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// 2a, cheaper than a full multiply.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// 3a.
    pub fn triple(&self) -> Self {
        self.double().add(self)
    }

    pub fn negate(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            FieldElement(limb::sub_with_borrow(&P, &self.0).0)
        }
    }

    /// Exponentiation by a 256-bit exponent, 4-bit windowed.
    pub fn pow(&self, exp: &Limbs) -> Self {
        let mut table = [Self::ONE; 16];
        table[1] = *self;
        for i in 2..16 {
            table[i] = table[i - 1].mul(self);
        }

        let mut acc = Self::ONE;
        let mut started = false;
        for limb_idx in (0..4).rev() {
            for nibble_idx in (0..16).rev() {
                let digit = ((exp[limb_idx] >> (nibble_idx * 4)) & 0xF) as usize;
                if started {
                    for _ in 0..4 {
                        acc = acc.square();
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
        acc
    }

    /// Multiplicative inverse via Fermat's little theorem.
    ///
    /// # Errors
    /// Inverting zero is a fatal internal error; production code paths must
    /// never reach it, so it surfaces as `CryptoError::NonInvertible` rather
    /// than silently returning zero.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(CryptoError::NonInvertible);
        }
        Ok(self.pow(&P_MINUS_2))
    }

    /// Modular square root, `None` when the element is not a quadratic
    /// residue. The candidate root is always checked by squaring back.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow(&SQRT_EXP);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_be_bytes()))
    }
}
