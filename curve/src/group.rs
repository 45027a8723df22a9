use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::scalarfield::ScalarField;

/// Scalars that expose their canonical value as little-endian 64-bit limbs.
pub trait ScalarBits {
    fn to_u64_limbs(&self) -> [u64; 5];
}

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 5] {
        self.to_canonical_limbs()
    }
}

/// Common interface of the curve representations.
///
/// The provided multiplications are plain double-and-add and run in
/// variable time; representations with a faster or constant-time routine
/// override them.
pub trait Group:
    Sized + Copy + Add<Output = Self> + AddAssign + Sub<Output = Self> + SubAssign + Neg<Output = Self>
{
    type Scalar: ScalarBits;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn generator() -> Self;
    fn double(&self) -> Self;
    fn negate(&self) -> Self;

    /// Left-to-right double-and-add over the five scalar limbs.
    fn scalar_mul(&self, scalar: &Self::Scalar) -> Self {
        scalar
            .to_u64_limbs()
            .iter()
            .rev()
            .fold(Self::identity(), |acc, &limb| self.double_and_add(acc, limb, 64))
    }

    fn mul_generator(scalar: &Self::Scalar) -> Self {
        Self::generator().scalar_mul(scalar)
    }

    fn mul_u64(&self, n: u64) -> Self {
        self.double_and_add(Self::identity(), n, u64::BITS - n.leading_zeros())
    }

    /// Shifts `acc` left by the low `bits` bits of `word`, top bit first,
    /// adding `self` for every set bit.
    #[doc(hidden)]
    fn double_and_add(&self, acc: Self, word: u64, bits: u32) -> Self {
        (0..bits).rev().fold(acc, |acc, i| {
            let acc = acc.double();
            if (word >> i) & 1 == 1 {
                acc + *self
            } else {
                acc
            }
        })
    }
}
