//! Scalar field of the curve: integers modulo the prime group order
//! n = 1067993516717146951041484916571792702745057740581727230159139685185762082554198619328292418486241
//!
//! Elements are kept in normal (non-Montgomery) form as five little-endian
//! 64-bit limbs, always fully reduced below n. Montgomery multiplication is
//! only used inside [`Mul`], after moving the left operand into the
//! Montgomery domain with a multiplication by `R2 = 2^640 mod n`.

use core::fmt::{self, Debug, Display, Formatter};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_bigint::BigUint;
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::SCALAR_SIZE;
use crate::errors::{DecodeError, Result};
use crate::fp5::Fp5;

/// Scalar field element, `0 <= value < n`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u64; 5]", into = "[u64; 5]")]
pub struct ScalarField {
    limbs: [u64; 5],
}

// Group order n.
const MODULUS: [u64; 5] = [
    0xE80FD996948BFFE1,
    0xE8885C39D724A09C,
    0x7FFFFFE6CFB80639,
    0x7FFFFFF100000016,
    0x7FFFFFFD80000007,
];

// n - 2, the Fermat exponent.
const MODULUS_MINUS_TWO: [u64; 5] = [
    0xE80FD996948BFFDF,
    0xE8885C39D724A09C,
    0x7FFFFFE6CFB80639,
    0x7FFFFFF100000016,
    0x7FFFFFFD80000007,
];

impl ScalarField {
    pub const ZERO: Self = ScalarField {
        limbs: [0, 0, 0, 0, 0],
    };

    pub const ONE: Self = ScalarField {
        limbs: [1, 0, 0, 0, 0],
    };

    pub const TWO: Self = ScalarField {
        limbs: [2, 0, 0, 0, 0],
    };

    /// n - 1
    pub const NEG_ONE: Self = ScalarField {
        limbs: [
            0xE80FD996948BFFE0,
            0xE8885C39D724A09C,
            0x7FFFFFE6CFB80639,
            0x7FFFFFF100000016,
            0x7FFFFFFD80000007,
        ],
    };

    /// -1/n mod 2^64
    pub const N0I: u64 = 0xD78BEF72057B7BDF;

    /// 2^640 mod n
    pub const R2: Self = ScalarField {
        limbs: [
            0xA01001DCE33DC739,
            0x6C3228D33F62ACCF,
            0xD1D796CC91CF8525,
            0xAADFFF5D1574C1D8,
            0x4ACA13B28CA251F5,
        ],
    };

    /// 2^632 mod n
    pub const T632: Self = ScalarField {
        limbs: [
            0x2B0266F317CA91B3,
            0xEC1D26528E984773,
            0x8651D7865E12DB94,
            0xDA2ADFF5941574D0,
            0x53CACA12110CA256,
        ],
    };

    /// The group order n.
    pub fn order() -> BigUint {
        limbs_to_biguint(&MODULUS)
    }

    #[inline]
    pub const fn from_canonical_u64(val: u64) -> Self {
        ScalarField {
            limbs: [val, 0, 0, 0, 0],
        }
    }

    /// Wraps limbs that are already below n.
    pub const fn from_canonical_limbs(limbs: [u64; 5]) -> Option<Self> {
        if is_canonical(limbs) {
            Some(ScalarField { limbs })
        } else {
            None
        }
    }

    /// Reduces any 320-bit value modulo n, in constant time.
    pub fn from_noncanonical_limbs(limbs: [u64; 5]) -> Self {
        // ONE * v / 2^320, then R2 * that / 2^320 = v mod n.
        let t = monty_mul(Self::ONE.limbs, limbs);
        ScalarField {
            limbs: monty_mul(Self::R2.limbs, t),
        }
    }

    #[inline]
    pub const fn to_canonical_limbs(&self) -> [u64; 5] {
        self.limbs
    }

    /// Reduces an arbitrary-size integer modulo n.
    pub fn from_non_canonical_biguint(val: &BigUint) -> Self {
        let reduced = val % Self::order();
        let mut limbs = [0u64; 5];
        for (limb, digit) in limbs.iter_mut().zip(reduced.iter_u64_digits()) {
            *limb = digit;
        }
        ScalarField { limbs }
    }

    pub fn to_biguint(&self) -> BigUint {
        limbs_to_biguint(&self.limbs)
    }

    /// Interprets the five canonical limbs of `x` as a 320-bit integer and
    /// reduces it modulo n.
    pub fn from_fp5(x: Fp5) -> Self {
        Self::from_noncanonical_limbs(x.to_canonical_u64_array())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs == [0, 0, 0, 0, 0]
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    /// Returns `a0` when `c == 0` and `a1` when `c == u64::MAX`.
    ///
    /// `c` must be one of those two masks.
    #[inline]
    pub fn select(c: u64, a0: &Self, a1: &Self) -> Self {
        ScalarField {
            limbs: select(c, a0.limbs, a1.limbs),
        }
    }

    /// Montgomery product `self * rhs / 2^320 mod n`.
    #[inline]
    pub fn monty_mul(&self, rhs: &Self) -> Self {
        ScalarField {
            limbs: monty_mul(self.limbs, rhs.limbs),
        }
    }

    #[inline]
    pub fn double(&self) -> Self {
        *self + *self
    }

    #[inline]
    pub fn square(&self) -> Self {
        *self * *self
    }

    pub fn exp_power_of_2(&self, power_log: usize) -> Self {
        let mut res = *self;
        for _ in 0..power_log {
            res = res.square();
        }
        res
    }

    pub fn exp_u64(&self, power: u64) -> Self {
        let mut current = *self;
        let mut product = Self::ONE;
        for j in 0..(64 - power.leading_zeros()) {
            if (power >> j) & 1 != 0 {
                product *= current;
            }
            current = current.square();
        }
        product
    }

    /// Variable-time exponentiation by a public exponent.
    pub fn exp_biguint(&self, power: &BigUint) -> Self {
        self.exp_limbs(power.iter_u64_digits())
    }

    fn exp_limbs<I>(&self, digits: I) -> Self
    where
        I: DoubleEndedIterator<Item = u64>,
    {
        let mut result = Self::ONE;
        for digit in digits.rev() {
            result = result.exp_power_of_2(64) * self.exp_u64(digit);
        }
        result
    }

    /// Inverse via Fermat's little theorem. Zero maps to zero.
    pub fn inverse_or_zero(&self) -> Self {
        self.exp_limbs(MODULUS_MINUS_TWO.into_iter())
    }

    pub fn try_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.inverse_or_zero())
        }
    }

    /// Multiplicative inverse.
    ///
    /// # Panics
    /// Panics if `self` is zero.
    pub fn inverse(&self) -> Self {
        self.try_inverse()
            .unwrap_or_else(|| panic!("inverse of zero in the scalar field"))
    }

    /// 40-byte little-endian encoding.
    pub fn to_le_bytes(&self) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        for (chunk, limb) in out.chunks_exact_mut(8).zip(self.limbs.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    /// Decodes a 40-byte little-endian value, rejecting values `>= n`.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        let limbs = read_limbs(bytes)?;
        Self::from_canonical_limbs(limbs).ok_or(DecodeError::NonCanonicalScalar)
    }

    /// Decodes a 40-byte little-endian value, reducing it modulo n.
    pub fn from_le_bytes_reduced(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_noncanonical_limbs(read_limbs(bytes)?))
    }

    /// Splits the scalar into 80 little-endian nibbles.
    pub fn split_to_4bit_limbs(&self) -> [u8; 80] {
        let mut result = [0u8; 80];
        for (i, limb) in self.limbs.iter().enumerate() {
            for j in 0..16 {
                result[i * 16 + j] = ((limb >> (j * 4)) & 0xF) as u8;
            }
        }
        result
    }

    /// Recodes the scalar into signed digits of `w` bits.
    ///
    /// Digits are in `[-2^(w-1), 2^(w-1)]`. When `w * ss.len() >= 320` the
    /// digits encode the full scalar and the last one is nonnegative.
    ///
    /// # Panics
    /// Panics if `w` is not in `[2, 10]`.
    pub fn recode_signed(&self, ss: &mut [i32], w: u32) {
        recode_signed_from_limbs(&self.limbs, ss, w);
    }

    /// Cryptographically secure uniform sampling from the thread-local CSPRNG.
    pub fn sample() -> Self {
        rand::rng().random()
    }
}

/// Signed-window recoding of an arbitrary little-endian limb sequence.
///
/// # Panics
/// Panics if `w` is not in `[2, 10]`.
pub fn recode_signed_from_limbs(limbs: &[u64], ss: &mut [i32], w: u32) {
    assert!(
        (2..=10).contains(&w),
        "recoding window must be between 2 and 10 bits, got {w}"
    );
    let mut acc: u64 = 0;
    let mut acc_len: u32 = 0;
    let mut j = 0;
    let mw: u32 = (1 << w) - 1;
    let hw: u32 = 1 << (w - 1);
    let mut cc: u32 = 0;
    for digit in ss.iter_mut() {
        let mut bb: u32;
        if acc_len < w {
            if j < limbs.len() {
                let nl = limbs[j];
                j += 1;
                bb = ((acc | (nl << acc_len)) as u32) & mw;
                acc = nl >> (w - acc_len);
            } else {
                bb = (acc as u32) & mw;
                acc = 0;
            }
            acc_len += 64 - w;
        } else {
            bb = (acc as u32) & mw;
            acc_len -= w;
            acc >>= w;
        }

        // Digits above 2^(w-1) become negative and carry into the next window.
        bb = bb.wrapping_add(cc);
        cc = hw.wrapping_sub(bb) >> 31;
        *digit = (bb as i32) - ((cc << w) as i32);
    }
}

fn limbs_to_biguint(limbs: &[u64; 5]) -> BigUint {
    let mut bytes = [0u8; 40];
    for (chunk, limb) in bytes.chunks_exact_mut(8).zip(limbs.iter()) {
        chunk.copy_from_slice(&limb.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

fn read_limbs(bytes: &[u8]) -> Result<[u64; 5]> {
    if bytes.len() != SCALAR_SIZE {
        return Err(DecodeError::InvalidLength {
            expected: SCALAR_SIZE,
            actual: bytes.len(),
        });
    }
    let mut limbs = [0u64; 5];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(buf);
    }
    Ok(limbs)
}

/// Limb-wise addition, final carry dropped.
#[inline]
const fn add_inner(a: [u64; 5], b: [u64; 5]) -> [u64; 5] {
    let mut r = [0u64; 5];
    let mut c = 0u64;
    let mut i = 0;
    while i < 5 {
        let z = (a[i] as u128) + (b[i] as u128) + (c as u128);
        r[i] = z as u64;
        c = (z >> 64) as u64;
        i += 1;
    }
    r
}

/// Limb-wise subtraction. The second value is the final borrow as a mask
/// (`u64::MAX` on borrow, `0` otherwise).
#[inline]
const fn sub_inner(a: [u64; 5], b: [u64; 5]) -> ([u64; 5], u64) {
    let mut r = [0u64; 5];
    let mut c = 0u64;
    let mut i = 0;
    while i < 5 {
        let z = (a[i] as u128)
            .wrapping_sub(b[i] as u128)
            .wrapping_sub(c as u128);
        r[i] = z as u64;
        c = ((z >> 64) as u64) & 1;
        i += 1;
    }
    (r, c.wrapping_neg())
}

#[inline]
const fn select(c: u64, a0: [u64; 5], a1: [u64; 5]) -> [u64; 5] {
    let mut r = [0u64; 5];
    let mut i = 0;
    while i < 5 {
        r[i] = a0[i] ^ (c & (a0[i] ^ a1[i]));
        i += 1;
    }
    r
}

#[inline]
const fn is_canonical(limbs: [u64; 5]) -> bool {
    let (_, c) = sub_inner(limbs, MODULUS);
    c != 0
}

/// Interleaved Montgomery multiplication, `a * b / 2^320 mod n`.
///
/// `a` must be below n; `b` may be any 320-bit value.
fn monty_mul(a: [u64; 5], b: [u64; 5]) -> [u64; 5] {
    debug_assert!(is_canonical(a));
    let mut r = [0u64; 5];
    for &m in b.iter() {
        // r <- (r + a*m + f*n) / 2^64, with f chosen so the division is exact.
        let f = a[0]
            .wrapping_mul(m)
            .wrapping_add(r[0])
            .wrapping_mul(ScalarField::N0I);
        let mut cc1 = 0u64;
        let mut cc2 = 0u64;
        for j in 0..5 {
            let z = (a[j] as u128) * (m as u128) + (r[j] as u128) + (cc1 as u128);
            cc1 = (z >> 64) as u64;
            let z = (f as u128) * (MODULUS[j] as u128) + ((z as u64) as u128) + (cc2 as u128);
            cc2 = (z >> 64) as u64;
            if j > 0 {
                r[j - 1] = z as u64;
            }
        }
        r[4] = cc1.wrapping_add(cc2);
    }
    // r < 2n here, one conditional subtraction finishes the reduction.
    let (r2, c) = sub_inner(r, MODULUS);
    select(c, r2, r)
}

impl Add for ScalarField {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let r0 = add_inner(self.limbs, rhs.limbs);
        let (r1, c) = sub_inner(r0, MODULUS);
        ScalarField {
            limbs: select(c, r1, r0),
        }
    }
}

impl AddAssign for ScalarField {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for ScalarField {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (r0, c) = sub_inner(self.limbs, rhs.limbs);
        let r1 = add_inner(r0, MODULUS);
        ScalarField {
            limbs: select(c, r0, r1),
        }
    }
}

impl SubAssign for ScalarField {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for ScalarField {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl Mul for ScalarField {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let t = monty_mul(self.limbs, Self::R2.limbs);
        ScalarField {
            limbs: monty_mul(t, rhs.limbs),
        }
    }
}

impl MulAssign for ScalarField {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for ScalarField {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl DivAssign for ScalarField {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for ScalarField {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for ScalarField {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl From<u64> for ScalarField {
    fn from(val: u64) -> Self {
        Self::from_canonical_u64(val)
    }
}

impl TryFrom<[u64; 5]> for ScalarField {
    type Error = DecodeError;

    fn try_from(limbs: [u64; 5]) -> Result<Self> {
        Self::from_canonical_limbs(limbs).ok_or(DecodeError::NonCanonicalScalar)
    }
}

impl From<ScalarField> for [u64; 5] {
    fn from(s: ScalarField) -> Self {
        s.limbs
    }
}

impl Distribution<ScalarField> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScalarField {
        // n is just below 2^319, so rejection succeeds about half the time.
        loop {
            let mut limbs: [u64; 5] = rng.random();
            limbs[4] >>= 1;
            if let Some(s) = ScalarField::from_canonical_limbs(limbs) {
                return s;
            }
        }
    }
}

impl Display for ScalarField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let l = &self.limbs;
        write!(
            f,
            "0x{:016x}{:016x}{:016x}{:016x}{:016x}",
            l[4], l[3], l[2], l[1], l[0]
        )
    }
}

impl Debug for ScalarField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ScalarField({})", self)
    }
}
