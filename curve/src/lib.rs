//! The ecGFp5 elliptic curve over the degree-5 extension of the Goldilocks field.
//!
//! This crate provides the Goldilocks base field and its quintic extension
//! GF(p^5) = GF(p)[z]/(z^5 - 3), the prime-order scalar field, and the curve
//! group in three representations: fractional (x, z, u, t) points with
//! complete formulas and canonical 40-byte encodings, short Weierstrass
//! affine points, and Jacobian accumulators for double-scalar multiplication.
//! The curve parameters and generators are fixed as constants on the point
//! types.

pub mod constants;
mod affine;
mod errors;
mod fp5;
mod generator_table;
mod goldilocks;
mod group;
mod jacobian;
mod msm;
mod point;
mod random;
mod scalarfield;
mod weierstrass;

pub use affine::{batch_to_affine, lookup, lookup_vartime, make_window_affine, AffinePoint};
pub use errors::{DecodeError, Result};
pub use fp5::Fp5;
pub use generator_table::{generator_weierstrass_window, generator_window};
pub use goldilocks::{CanonicalGoldilocks, GoldilocksField};
pub use group::{Group, ScalarBits};
pub use jacobian::JacobianPoint;
pub use msm::{mul_add2, mul_add2_with_gen};
pub use point::CurvePoint;
pub use random::RandomField;
pub use scalarfield::{recode_signed_from_limbs, ScalarField};
pub use weierstrass::WeierstrassPoint;
