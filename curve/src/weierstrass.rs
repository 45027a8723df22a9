//! Short Weierstrass model of ecGFp5: Y^2 = X^3 + A*X + B over GF(p^5),
//! with X = x + a/3, A = b - a^2/3, B = 2*a^3/27 - a*b/3.
//!
//! This is the representation used when verifying inside a circuit, where the
//! affine (X, Y) form with an explicit infinity flag is easier to constrain.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::ENCODED_POINT_SIZE;
use crate::errors::{DecodeError, Result};
use crate::fp5::Fp5;
use crate::group::Group;
use crate::jacobian::JacobianPoint;
use crate::point::{decode_roots, CurvePoint};
use crate::scalarfield::ScalarField;

// a/3
const A_THIRD: Fp5 = Fp5::from_u64_array([6148914689804861441, 0, 0, 0, 0]);

/// Affine point on the short Weierstrass model, or the point at infinity.
///
/// Serializes as the shared canonical encoding, so only decodable points
/// deserialize.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Fp5", into = "Fp5")]
pub struct WeierstrassPoint {
    pub x: Fp5,
    pub y: Fp5,
    pub is_infinity: bool,
}

impl WeierstrassPoint {
    /// The `A` coefficient, b - a^2/3.
    pub const A_WEIERSTRASS: Fp5 = Fp5::from_u64_array([6148914689804861439, 263, 0, 0, 0]);

    /// The point at infinity.
    pub const NEUTRAL: Self = WeierstrassPoint {
        x: Fp5::ZERO,
        y: Fp5::ZERO,
        is_infinity: true,
    };

    /// Image of `CurvePoint::GENERATOR`.
    pub const GENERATOR: Self = WeierstrassPoint {
        x: Fp5::from_u64_array([
            11712523173042564207,
            14090224426659529053,
            13197813503519687414,
            16280770174934269299,
            15998333998318935536,
        ]),
        y: Fp5::from_u64_array([
            14639054205878357578,
            17426078571020221072,
            2548978194165003307,
            8663895577921260088,
            9793640284382595140,
        ]),
        is_infinity: false,
    };

    pub fn new(x: Fp5, y: Fp5) -> Self {
        WeierstrassPoint {
            x,
            y,
            is_infinity: false,
        }
    }

    /// The `B` coefficient, 2*a^3/27 - a*b/3.
    fn curve_b() -> Fp5 {
        A_THIRD.square() * A_THIRD.double() - A_THIRD * CurvePoint::B
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Check if a point is on the curve: Y^2 = X^3 + A*X + B.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity {
            return true;
        }
        let rhs = (self.x.square() + Self::A_WEIERSTRASS) * self.x + Self::curve_b();
        self.y.square() == rhs
    }

    /// Same canonical encoding as `CurvePoint::encode`: w = Y / (a/3 - X).
    pub fn encode(&self) -> Fp5 {
        self.y * (A_THIRD - self.x).inverse_or_zero()
    }

    /// Decodes `w` directly into the Weierstrass model.
    ///
    /// Returns the point at infinity and `false` if `w` is not a valid encoding.
    pub fn decode(w: Fp5) -> (Self, bool) {
        let (x1, x2, c) = decode_roots(w);
        // The square root, as opposed to `CurvePoint::decode`.
        let x = if x1.legendre().is_one() { x1 } else { x2 };
        let y = -(w * x);

        if c {
            (Self::new(x + A_THIRD, y), true)
        } else if w.is_zero() {
            (Self::NEUTRAL, true)
        } else {
            debug!("Weierstrass decoding rejected: discriminant is not a square");
            (Self::NEUTRAL, false)
        }
    }

    pub fn try_decode(w: Fp5) -> Result<Self> {
        match Self::decode(w) {
            (p, true) => Ok(p),
            (_, false) => Err(DecodeError::InvalidEncoding),
        }
    }

    pub fn to_bytes(&self) -> [u8; ENCODED_POINT_SIZE] {
        self.encode().to_le_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::try_decode(Fp5::from_canonical_le_bytes(bytes)?)
    }

    /// Maps a fractional-coordinate point to this model.
    pub fn from_curve_point(p: &CurvePoint) -> Self {
        // Every encoding produced by `encode` decodes.
        Self::decode(p.encode()).0
    }

    /// Point doubling: 2*P.
    pub fn double(&self) -> Self {
        if self.is_infinity || self.y.is_zero() {
            return Self::NEUTRAL;
        }

        // λ = (3x^2 + A) / (2y)
        let lambda = (self.x.square().triple() + Self::A_WEIERSTRASS) / self.y.double();

        let x_r = lambda.square() - self.x.double();
        let y_r = lambda * (self.x - x_r) - self.y;
        Self::new(x_r, y_r)
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        if self.is_infinity {
            return *self;
        }
        Self::new(self.x, -self.y)
    }

    /// Lifts to Jacobian coordinates.
    pub fn to_jacobian(&self) -> JacobianPoint {
        JacobianPoint::from_affine(self)
    }

    /// Builds the full window [O, P, 2P, ..., (2^bits - 1)P].
    ///
    /// # Panics
    /// Panics if `window_bits < 2`.
    pub fn precompute_window(&self, window_bits: u32) -> Vec<WeierstrassPoint> {
        assert!(
            window_bits >= 2,
            "Weierstrass window must be at least 2 bits, got {window_bits}"
        );
        let size = 1usize << window_bits;
        let mut multiples = Vec::with_capacity(size);
        multiples.push(Self::NEUTRAL);
        multiples.push(*self);
        multiples.push(self.double());
        for i in 3..size {
            let next = *self + multiples[i - 1];
            multiples.push(next);
        }
        multiples
    }
}

impl Default for WeierstrassPoint {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl PartialEq for WeierstrassPoint {
    fn eq(&self, other: &Self) -> bool {
        if self.is_infinity || other.is_infinity {
            return self.is_infinity == other.is_infinity;
        }
        self.x == other.x && self.y == other.y
    }
}

impl Eq for WeierstrassPoint {}

impl TryFrom<Fp5> for WeierstrassPoint {
    type Error = DecodeError;

    fn try_from(w: Fp5) -> Result<Self> {
        Self::try_decode(w)
    }
}

impl From<WeierstrassPoint> for Fp5 {
    fn from(p: WeierstrassPoint) -> Self {
        p.encode()
    }
}

impl Group for WeierstrassPoint {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::NEUTRAL
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity
    }

    #[inline]
    fn generator() -> Self {
        Self::GENERATOR
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }
}

impl Add for WeierstrassPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity {
            return other;
        }
        if other.is_infinity {
            return self;
        }

        if self.x == other.x {
            if self.y == other.y {
                return self.double();
            }
            return Self::NEUTRAL;
        }

        // λ = (y2 - y1) / (x2 - x1)
        let lambda = (other.y - self.y) / (other.x - self.x);

        let x_r = lambda.square() - self.x - other.x;
        let y_r = lambda * (self.x - x_r) - self.y;
        Self::new(x_r, y_r)
    }
}

impl AddAssign for WeierstrassPoint {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for WeierstrassPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for WeierstrassPoint {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for WeierstrassPoint {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}
