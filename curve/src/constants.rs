//! Compile-time parameters shared by the field, scalar and point modules.

/// Window width (in bits) used by signed-digit scalar multiplication.
pub const WINDOW: usize = 5;

/// Number of points in a multiplication window: `P, 2P, ..., 16P`.
pub const WIN_SIZE: usize = 1 << (WINDOW - 1);

/// Number of signed digits produced when recoding a full scalar with `WINDOW`.
pub(crate) const NUM_DIGITS: usize = (319 + WINDOW) / WINDOW;

/// Window width (in bits) of the Weierstrass tables used for dual-scalar multiplication.
pub const MULADD_WINDOW_BITS: u32 = 4;

/// Size of a serialized Goldilocks element in bytes.
pub const FIELD_ELEMENT_SIZE: usize = 8;

/// Size of a serialized group element in bytes.
///
/// A group element travels as its single `Fp5` encoding `w`, five canonical
/// 64-bit limbs in little-endian order.
pub const ENCODED_POINT_SIZE: usize = 5 * FIELD_ELEMENT_SIZE;

/// Size of a serialized scalar in bytes (five little-endian 64-bit limbs).
pub const SCALAR_SIZE: usize = 40;

/// Size of a Schnorr signature `s || e` built on top of this crate.
pub const SIGNATURE_SIZE: usize = 2 * SCALAR_SIZE;
