//! Quintic extension GF(p^5) = GF(p)[x]/(x^5 - 3) of the Goldilocks field.
//!
//! Inversion, the Legendre symbol and square roots all use the Frobenius
//! orbit of an element to collapse the computation to a single base-field
//! operation instead of a full-size exponentiation.

use core::fmt::{self, Debug, Display, Formatter};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ENCODED_POINT_SIZE, FIELD_ELEMENT_SIZE};
use crate::errors::{DecodeError, Result};
use crate::goldilocks::{CanonicalGoldilocks, GoldilocksField};

/// Extension degree.
const D: usize = 5;

// x^5 = W
const W: GoldilocksField = GoldilocksField::from_canonical_u64(3);

// W^((p-1)/5), the fifth root of unity driving the Frobenius map.
const DTH_ROOT: GoldilocksField = GoldilocksField::from_canonical_u64(1041288259238279555);

/// Element `c0 + c1*x + c2*x^2 + c3*x^3 + c4*x^4`.
///
/// Coefficients may be lazily reduced; equality compares canonical values.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fp5(pub [GoldilocksField; 5]);

impl Fp5 {
    pub const ZERO: Self = Fp5::from_u64_array([0, 0, 0, 0, 0]);
    pub const ONE: Self = Fp5::from_u64_array([1, 0, 0, 0, 0]);
    pub const TWO: Self = Fp5::from_u64_array([2, 0, 0, 0, 0]);

    /// Build from raw 64-bit coefficients (values `>= p` are accepted).
    #[inline]
    pub const fn from_u64_array(c: [u64; 5]) -> Self {
        Fp5([
            GoldilocksField::from_noncanonical_u64(c[0]),
            GoldilocksField::from_noncanonical_u64(c[1]),
            GoldilocksField::from_noncanonical_u64(c[2]),
            GoldilocksField::from_noncanonical_u64(c[3]),
            GoldilocksField::from_noncanonical_u64(c[4]),
        ])
    }

    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        Fp5::from_u64_array([value, 0, 0, 0, 0])
    }

    /// Embed a base-field element.
    #[inline]
    pub const fn from_base(value: GoldilocksField) -> Self {
        Fp5([
            value,
            GoldilocksField::ZERO,
            GoldilocksField::ZERO,
            GoldilocksField::ZERO,
            GoldilocksField::ZERO,
        ])
    }

    #[inline]
    pub const fn from_base_array(c: [GoldilocksField; 5]) -> Self {
        Fp5(c)
    }

    #[inline]
    pub const fn to_base_array(self) -> [GoldilocksField; 5] {
        self.0
    }

    pub fn to_canonical_array(self) -> [CanonicalGoldilocks; 5] {
        self.0.map(GoldilocksField::to_canonical)
    }

    pub fn to_canonical_u64_array(self) -> [u64; 5] {
        self.0.map(GoldilocksField::to_canonical_u64)
    }

    pub fn neg_one() -> Self {
        Fp5::from_base(GoldilocksField::NEG_ONE)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| c.is_zero())
    }

    #[inline]
    pub fn double(self) -> Self {
        self + self
    }

    #[inline]
    pub fn triple(self) -> Self {
        self.scalar_mul(GoldilocksField::from_canonical_u64(3))
    }

    /// Multiply every coefficient by a base-field element.
    #[inline]
    pub fn scalar_mul(self, s: GoldilocksField) -> Self {
        Fp5(self.0.map(|c| c * s))
    }

    /// Dedicated squaring, reusing doubled cross terms.
    pub fn square(self) -> Self {
        let [a0, a1, a2, a3, a4] = self.0;
        let double_w = W.double();
        let a0_double = a0.double();
        let a1_double = a1.double();

        let c0 = a0.square() + double_w * (a1 * a4 + a2 * a3);
        let c1 = a0_double * a1 + double_w * a2 * a4 + W * a3.square();
        let c2 = a0_double * a2 + a1.square() + double_w * a4 * a3;
        let c3 = a0_double * a3 + a1_double * a2 + W * a4.square();
        let c4 = a0_double * a4 + a1_double * a3 + a2.square();

        Fp5([c0, c1, c2, c3, c4])
    }

    /// Computes `self^(2^power)`.
    pub fn exp_power_of_2(self, power: usize) -> Self {
        let mut res = self;
        for _ in 0..power {
            res = res.square();
        }
        res
    }

    #[inline]
    pub fn frobenius(self) -> Self {
        self.repeated_frobenius(1)
    }

    /// Applies the Frobenius map `count` times. Since the map has order 5,
    /// only `count % 5` matters.
    pub fn repeated_frobenius(self, count: usize) -> Self {
        let count = count % D;
        if count == 0 {
            return self;
        }

        let z0 = DTH_ROOT.exp_u64(count as u64);
        let mut res = self.0;
        for (c, z) in res.iter_mut().zip(z0.powers(D)) {
            *c *= z;
        }
        Fp5(res)
    }

    /// Norm-based inverse; zero maps to zero.
    pub fn inverse_or_zero(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }

        let d = self.frobenius();
        let e = d * d.frobenius();
        let f = e * e.repeated_frobenius(2);

        // self * f lands in the base field; only its constant term is needed.
        let [a0, a1, a2, a3, a4] = self.0;
        let [f0, f1, f2, f3, f4] = f.0;
        let g = a0 * f0 + W * (a1 * f4 + a2 * f3 + a3 * f2 + a4 * f1);

        f.scalar_mul(g.inverse_or_zero())
    }

    #[inline]
    pub fn try_inverse(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.inverse_or_zero())
        }
    }

    /// Legendre symbol as a base-field element: 0, 1 or p - 1.
    pub fn legendre(self) -> GoldilocksField {
        let frob1 = self.frobenius();
        let frob2 = frob1.frobenius();

        let frob1_times_frob2 = frob1 * frob2;
        let frob2_frob1_times_frob2 = frob1_times_frob2.repeated_frobenius(2);

        let xr = (self * frob1_times_frob2 * frob2_frob1_times_frob2).0[0];

        // xr^((p-1)/2) with (p-1)/2 = 2^63 - 2^31
        let xr_31 = xr.exp_power_of_2(31);
        let xr_63 = xr_31.exp_power_of_2(32);
        xr_63 * xr_31.inverse_or_zero()
    }

    /// A square root, if one exists. The sign is not normalised.
    pub fn sqrt(self) -> Option<Self> {
        let v = self.exp_power_of_2(31);
        let d = self * v.exp_power_of_2(32) * v.inverse_or_zero();
        let e = (d * d.repeated_frobenius(2)).frobenius();
        let f = e.square();

        let [x0, x1, x2, x3, x4] = self.0;
        let [f0, f1, f2, f3, f4] = f.0;
        let g = x0 * f0 + W * (x1 * f4 + x2 * f3 + x3 * f2 + x4 * f1);

        let s = g.sqrt()?;
        Some(Fp5::from_base(s) * e.inverse_or_zero())
    }

    /// The square root whose [`Fp5::sgn0`] is `false`.
    pub fn canonical_sqrt(self) -> Option<Self> {
        let root = self.sqrt()?;
        if root.sgn0() {
            Some(-root)
        } else {
            Some(root)
        }
    }

    /// Sign used to pick canonical square roots.
    ///
    /// Coefficients are scanned from `c0` upward and a coefficient counts
    /// only while every earlier one is zero. `c0` is always examined, so the
    /// result is `true` exactly when `c0` is even (zero included).
    pub fn sgn0(self) -> bool {
        let mut sign = false;
        let mut zero = true;
        for limb in self.to_canonical_u64_array() {
            let sign_i = limb & 1 == 0;
            let zero_i = limb == 0;
            sign = sign || (zero && sign_i);
            zero = zero && zero_i;
        }
        sign
    }

    /// Canonical little-endian encoding: five 8-byte limbs.
    pub fn to_le_bytes(self) -> [u8; ENCODED_POINT_SIZE] {
        let mut out = [0u8; ENCODED_POINT_SIZE];
        for (chunk, c) in out.chunks_exact_mut(FIELD_ELEMENT_SIZE).zip(self.0) {
            chunk.copy_from_slice(&c.to_le_bytes());
        }
        out
    }

    /// Each limb big-endian, limbs still in ascending order.
    pub fn to_be_bytes(self) -> [u8; ENCODED_POINT_SIZE] {
        let mut out = [0u8; ENCODED_POINT_SIZE];
        for (chunk, c) in out.chunks_exact_mut(FIELD_ELEMENT_SIZE).zip(self.0) {
            chunk.copy_from_slice(&c.to_canonical_u64().to_be_bytes());
        }
        out
    }

    /// Parse 40 little-endian bytes, rejecting limbs `>= p`.
    pub fn from_canonical_le_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_limb_bytes(bytes, CanonicalGoldilocks::from_le_bytes)
    }

    pub fn from_canonical_be_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_limb_bytes(bytes, |chunk| {
            let mut le = [0u8; FIELD_ELEMENT_SIZE];
            le.copy_from_slice(chunk);
            le.reverse();
            CanonicalGoldilocks::from_le_bytes(&le)
        })
    }

    fn from_limb_bytes(
        bytes: &[u8],
        parse: impl Fn(&[u8]) -> Result<CanonicalGoldilocks>,
    ) -> Result<Self> {
        if bytes.len() != ENCODED_POINT_SIZE {
            return Err(DecodeError::InvalidLength {
                expected: ENCODED_POINT_SIZE,
                actual: bytes.len(),
            });
        }
        let mut limbs = [GoldilocksField::ZERO; 5];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(FIELD_ELEMENT_SIZE)) {
            *limb = parse(chunk)?.to_raw();
        }
        Ok(Fp5(limbs))
    }
}

impl From<GoldilocksField> for Fp5 {
    fn from(value: GoldilocksField) -> Self {
        Fp5::from_base(value)
    }
}

impl From<[u64; 5]> for Fp5 {
    fn from(value: [u64; 5]) -> Self {
        Fp5::from_u64_array(value)
    }
}

impl Add for Fp5 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Fp5(out)
    }
}

impl AddAssign for Fp5 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fp5 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o -= r;
        }
        Fp5(out)
    }
}

impl SubAssign for Fp5 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fp5 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Fp5(self.0.map(|c| -c))
    }
}

impl Mul for Fp5 {
    type Output = Self;

    /// Schoolbook product reduced with x^5 = W.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let [a0, a1, a2, a3, a4] = self.0;
        let [b0, b1, b2, b3, b4] = rhs.0;

        let c0 = a0 * b0 + W * (a1 * b4 + a2 * b3 + a3 * b2 + a4 * b1);
        let c1 = a0 * b1 + a1 * b0 + W * (a2 * b4 + a3 * b3 + a4 * b2);
        let c2 = a0 * b2 + a1 * b1 + a2 * b0 + W * (a3 * b4 + a4 * b3);
        let c3 = a0 * b3 + a1 * b2 + a2 * b1 + a3 * b0 + W * a4 * b4;
        let c4 = a0 * b4 + a1 * b3 + a2 * b2 + a3 * b1 + a4 * b0;

        Fp5([c0, c1, c2, c3, c4])
    }
}

impl MulAssign for Fp5 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<GoldilocksField> for Fp5 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: GoldilocksField) -> Self {
        self.scalar_mul(rhs)
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Div for Fp5 {
    type Output = Self;

    /// Panics if `rhs` is zero.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        match rhs.try_inverse() {
            Some(inv) => self * inv,
            None => panic!("division by zero in Fp5"),
        }
    }
}

impl DivAssign for Fp5 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for Fp5 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for Fp5 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl Display for Fp5 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = self.to_canonical_u64_array();
        write!(f, "[{}, {}, {}, {}, {}]", c[0], c[1], c[2], c[3], c[4])
    }
}

impl Debug for Fp5 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Fp5({})", self)
    }
}

impl Distribution<Fp5> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Fp5 {
        Fp5([
            rng.random(),
            rng.random(),
            rng.random(),
            rng.random(),
            rng.random(),
        ])
    }
}
