//! Goldilocks prime field. p = 2^64 - 2^32 + 1
//!
//! Arithmetic works on lazily reduced values: a [`GoldilocksField`] holds any
//! 64-bit integer and only represents its residue mod p. Operations accept
//! such inputs and return values that are again only guaranteed `< 2^64`.
//! [`CanonicalGoldilocks`] is the normalised form (`< p`) and is what gets
//! compared, hashed and serialized.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_bigint::BigUint;
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::FIELD_ELEMENT_SIZE;
use crate::errors::{DecodeError, Result};

/// The Goldilocks modulus.
pub const ORDER: u64 = 0xFFFF_FFFF_0000_0001;

// 2^64 mod p
const EPSILON: u64 = 0xFFFF_FFFF;

const TWO_ADICITY: u32 = 32;

// Generator of the multiplicative subgroup of order 2^32.
const POWER_OF_TWO_GENERATOR: GoldilocksField = GoldilocksField(7277203076849721926);

/// Goldilocks field element, possibly not fully reduced.
///
/// Equality and hashing go through the canonical value, so two raw
/// representatives of the same residue compare equal.
#[derive(Copy, Clone, Default, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct GoldilocksField(pub(crate) u64);

/// Goldilocks field element guaranteed to lie in `[0, p)`.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CanonicalGoldilocks(u64);

impl CanonicalGoldilocks {
    /// Returns `None` if `value >= p`.
    #[inline]
    pub const fn new(value: u64) -> Option<Self> {
        if value < ORDER {
            Some(CanonicalGoldilocks(value))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Back to the arithmetic type.
    #[inline]
    pub const fn to_raw(self) -> GoldilocksField {
        GoldilocksField(self.0)
    }

    #[inline]
    pub fn to_le_bytes(self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.0.to_le_bytes()
    }

    /// Parse 8 little-endian bytes, rejecting values `>= p`.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; FIELD_ELEMENT_SIZE] =
            bytes.try_into().map_err(|_| DecodeError::InvalidLength {
                expected: FIELD_ELEMENT_SIZE,
                actual: bytes.len(),
            })?;
        Self::new(u64::from_le_bytes(arr)).ok_or(DecodeError::NonCanonicalFieldElement)
    }
}

impl TryFrom<u64> for CanonicalGoldilocks {
    type Error = DecodeError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value).ok_or(DecodeError::NonCanonicalFieldElement)
    }
}

impl From<CanonicalGoldilocks> for u64 {
    fn from(value: CanonicalGoldilocks) -> u64 {
        value.0
    }
}

impl From<CanonicalGoldilocks> for GoldilocksField {
    fn from(value: CanonicalGoldilocks) -> Self {
        value.to_raw()
    }
}

impl Display for CanonicalGoldilocks {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl GoldilocksField {
    pub const ZERO: Self = GoldilocksField(0);
    pub const ONE: Self = GoldilocksField(1);
    pub const TWO: Self = GoldilocksField(2);
    pub const NEG_ONE: Self = GoldilocksField(ORDER - 1);

    /// Wrap a value already known to be `< p`.
    #[inline]
    pub const fn from_canonical_u64(value: u64) -> Self {
        debug_assert!(value < ORDER);
        GoldilocksField(value)
    }

    /// Wrap any 64-bit value; it represents `value mod p`.
    #[inline]
    pub const fn from_noncanonical_u64(value: u64) -> Self {
        GoldilocksField(value)
    }

    /// Negative inputs map to `p - |value|`.
    #[inline]
    pub fn from_i64(value: i64) -> Self {
        if value < 0 {
            -GoldilocksField(value.unsigned_abs())
        } else {
            GoldilocksField(value as u64)
        }
    }

    #[inline]
    pub const fn to_canonical_u64(self) -> u64 {
        let x = self.0;
        if x >= ORDER {
            x - ORDER
        } else {
            x
        }
    }

    #[inline]
    pub const fn to_canonical(self) -> CanonicalGoldilocks {
        CanonicalGoldilocks(self.to_canonical_u64())
    }

    /// The stored 64-bit word, which may exceed `p`.
    #[inline]
    pub const fn to_noncanonical_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.to_canonical_u64() == 0
    }

    #[inline]
    pub const fn is_one(self) -> bool {
        self.to_canonical_u64() == 1
    }

    #[inline]
    pub fn double(self) -> Self {
        self + self
    }

    #[inline]
    pub fn square(self) -> Self {
        self * self
    }

    /// Returns `self + x * y`.
    #[inline]
    pub fn mul_acc(self, x: Self, y: Self) -> Self {
        // u64 + u64 * u64 cannot overflow u128.
        reduce_128(self.0 as u128 + (x.0 as u128) * (y.0 as u128))
    }

    /// Computes `self^(2^n)`.
    pub fn exp_power_of_2(self, n: usize) -> Self {
        let mut z = self;
        for _ in 0..n {
            z = z.square();
        }
        z
    }

    pub fn exp_u64(self, exponent: u64) -> Self {
        let mut current = self;
        let mut product = Self::ONE;
        let mut e = exponent;
        while e > 0 {
            if e & 1 == 1 {
                product *= current;
            }
            current = current.square();
            e >>= 1;
        }
        product
    }

    /// Exponentiation by a public exponent of arbitrary size. Variable time.
    pub fn exp_biguint(self, exponent: &BigUint) -> Self {
        let mut product = Self::ONE;
        for limb in exponent.to_u64_digits().iter().rev() {
            for i in (0..64).rev() {
                product = product.square();
                if (limb >> i) & 1 == 1 {
                    product *= self;
                }
            }
        }
        product
    }

    /// Inverse via the addition chain for `p - 2`; zero maps to zero.
    pub fn inverse_or_zero(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }

        let t2 = self.square() * self;
        let t3 = t2.square() * self;
        let t6 = t3.exp_power_of_2(3) * t3;
        let t12 = t6.exp_power_of_2(6) * t6;
        let t24 = t12.exp_power_of_2(12) * t12;
        let t30 = t24.exp_power_of_2(6) * t6;
        let t31 = t30.square() * self;
        let t63 = t31.exp_power_of_2(32) * t31;

        t63.square() * self
    }

    #[inline]
    pub fn try_inverse(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.inverse_or_zero())
        }
    }

    /// Panics on zero.
    pub fn inverse(self) -> Self {
        match self.try_inverse() {
            Some(inv) => inv,
            None => panic!("inverse of zero in the Goldilocks field"),
        }
    }

    /// Euler's criterion. Zero counts as a residue.
    pub fn is_quadratic_residue(self) -> bool {
        if self.is_zero() {
            return true;
        }
        self.exp_u64((ORDER - 1) >> 1).is_one()
    }

    /// Tonelli-Shanks square root, `None` for non-residues.
    pub fn sqrt(self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::ZERO);
        }
        if !self.is_quadratic_residue() {
            return None;
        }

        let x0 = GoldilocksField(self.to_canonical_u64());
        let t = (ORDER - 1) >> TWO_ADICITY;
        let mut z = POWER_OF_TWO_GENERATOR;
        let mut w = x0.exp_u64((t - 1) / 2);
        let mut x = x0 * w;
        let mut b = x * w;
        let mut v = TWO_ADICITY as usize;

        while !b.is_one() {
            let mut k = 0usize;
            let mut b2k = b;
            while !b2k.is_one() {
                b2k = b2k.square();
                k += 1;
            }

            w = z.exp_power_of_2(v - k - 1);
            z = w.square();
            b *= z;
            x *= w;
            v = k;
        }

        Some(x)
    }

    /// `[1, self, self^2, ...]` with `count` entries.
    pub fn powers(self, count: usize) -> Vec<Self> {
        let mut out = Vec::with_capacity(count);
        let mut cur = Self::ONE;
        for _ in 0..count {
            out.push(cur);
            cur *= self;
        }
        out
    }

    /// Canonical little-endian encoding.
    #[inline]
    pub fn to_le_bytes(self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.to_canonical_u64().to_le_bytes()
    }

    pub fn from_canonical_le_bytes(bytes: &[u8]) -> Result<Self> {
        CanonicalGoldilocks::from_le_bytes(bytes).map(CanonicalGoldilocks::to_raw)
    }
}

/// Reduce a 128-bit value mod p.
#[inline]
pub(crate) fn reduce_128(x: u128) -> GoldilocksField {
    let x_lo = x as u64;
    let x_hi = (x >> 64) as u64;
    let x_hi_hi = x_hi >> 32;
    let x_hi_lo = x_hi & EPSILON;

    let (mut t0, borrow) = x_lo.overflowing_sub(x_hi_hi);
    if borrow {
        t0 = t0.wrapping_sub(EPSILON);
    }
    let t1 = x_hi_lo * EPSILON;

    let (sum, over) = t0.overflowing_add(t1);
    GoldilocksField(sum.wrapping_add(EPSILON * over as u64))
}

/// Reduce a value known to fit in 96 bits.
#[inline]
pub(crate) fn reduce_96(x: u128) -> GoldilocksField {
    debug_assert!(x >> 96 == 0);
    let x_lo = x as u64;
    let t1 = ((x >> 64) as u64) * EPSILON;
    let (res, carry) = x_lo.overflowing_add(t1);
    GoldilocksField(res.wrapping_add(EPSILON * carry as u64))
}

impl From<u64> for GoldilocksField {
    fn from(value: u64) -> Self {
        GoldilocksField::from_noncanonical_u64(value)
    }
}

impl From<GoldilocksField> for u64 {
    fn from(value: GoldilocksField) -> u64 {
        value.to_canonical_u64()
    }
}

impl PartialEq for GoldilocksField {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_canonical_u64() == other.to_canonical_u64()
    }
}

impl Eq for GoldilocksField {}

impl Hash for GoldilocksField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_canonical_u64().hash(state);
    }
}

impl Add for GoldilocksField {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (sum, over) = self.0.overflowing_add(rhs.0);
        let (mut sum, over) = sum.overflowing_add(EPSILON * over as u64);
        if over {
            // cannot overflow again
            sum += EPSILON;
        }
        GoldilocksField(sum)
    }
}

impl AddAssign for GoldilocksField {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for GoldilocksField {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (diff, borrow) = self.0.overflowing_sub(rhs.0);
        let (mut diff, borrow) = diff.overflowing_sub(EPSILON * borrow as u64);
        if borrow {
            diff -= EPSILON;
        }
        GoldilocksField(diff)
    }
}

impl SubAssign for GoldilocksField {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for GoldilocksField {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        reduce_128((self.0 as u128) * (rhs.0 as u128))
    }
}

impl MulAssign for GoldilocksField {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for GoldilocksField {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        // -0 comes out as the raw word p, which still represents zero.
        GoldilocksField(ORDER - self.to_canonical_u64())
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Div for GoldilocksField {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl DivAssign for GoldilocksField {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for GoldilocksField {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for GoldilocksField {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl Display for GoldilocksField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_canonical_u64(), f)
    }
}

impl Debug for GoldilocksField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GoldilocksField({})", self.to_canonical_u64())
    }
}

impl Distribution<GoldilocksField> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GoldilocksField {
        loop {
            let x: u64 = rng.random();
            if x < ORDER {
                return GoldilocksField(x);
            }
        }
    }
}
