//! Jacobian coordinates for the Weierstrass model.

use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};
use crate::fp5::Fp5;
use crate::weierstrass::WeierstrassPoint;

/// Weierstrass point in Jacobian coordinates: (X, Y, Z) stands for the affine
/// point (X/Z^2, Y/Z^3). Any point with Z = 0 is the point at infinity.
///
/// Used as the accumulator of the double-scalar loop, where it avoids one
/// field inversion per doubling and per addition. Serializes as the
/// canonical encoding of its affine image.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Fp5", into = "Fp5")]
pub struct JacobianPoint {
    pub x: Fp5,
    pub y: Fp5,
    pub z: Fp5,
}

impl JacobianPoint {
    pub const NEUTRAL: Self = JacobianPoint {
        x: Fp5::ONE,
        y: Fp5::ONE,
        z: Fp5::ZERO,
    };

    pub fn from_affine(p: &WeierstrassPoint) -> Self {
        if p.is_infinity {
            return Self::NEUTRAL;
        }
        JacobianPoint {
            x: p.x,
            y: p.y,
            z: Fp5::ONE,
        }
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// "dbl-2007-bl" doubling for short Weierstrass curves with arbitrary A.
    ///
    /// The point at infinity and points with Y = 0 come out with Z = 0.
    pub fn double_jacobian(&self) -> Self {
        let xx = self.x.square();
        let yy = self.y.square();
        let yyyy = yy.square();
        let zz = self.z.square();

        let s = ((self.x + yy).square() - xx - yyyy).double();
        let m = xx.triple() + WeierstrassPoint::A_WEIERSTRASS * zz.square();
        let t = m.square() - s.double();

        let y3 = m * (s - t) - yyyy.double().double().double();
        let z3 = (self.y + self.z).square() - yy - zz;

        JacobianPoint { x: t, y: y3, z: z3 }
    }

    /// "madd-2007-bl" mixed addition of an affine point.
    ///
    /// When both inputs share the same affine X the formula degenerates; that
    /// case falls back to doubling for equal points and to infinity for
    /// opposite ones.
    pub fn add_mixed(&self, other: &WeierstrassPoint) -> Self {
        if other.is_infinity {
            return *self;
        }
        if self.is_infinity() {
            return Self::from_affine(other);
        }

        let z1z1 = self.z.square();
        let u2 = other.x * z1z1;
        let s2 = other.y * self.z * z1z1;
        let h = u2 - self.x;
        let r = (s2 - self.y).double();

        if h.is_zero() {
            if r.is_zero() {
                return self.double_jacobian();
            }
            return Self::NEUTRAL;
        }

        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let v = self.x * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (self.y * j).double();
        let z3 = (self.z + h).square() - z1z1 - hh;

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Converts back to affine coordinates with one inversion.
    pub fn to_affine(&self) -> WeierstrassPoint {
        if self.is_infinity() {
            return WeierstrassPoint::NEUTRAL;
        }
        let z_inv = self.z.inverse_or_zero();
        let z_inv2 = z_inv.square();
        WeierstrassPoint::new(self.x * z_inv2, self.y * z_inv2 * z_inv)
    }
}

impl Default for JacobianPoint {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<WeierstrassPoint> for JacobianPoint {
    fn from(p: WeierstrassPoint) -> Self {
        Self::from_affine(&p)
    }
}

impl From<JacobianPoint> for WeierstrassPoint {
    fn from(p: JacobianPoint) -> Self {
        p.to_affine()
    }
}

impl PartialEq for JacobianPoint {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => true,
            (false, false) => {
                let z1z1 = self.z.square();
                let z2z2 = other.z.square();
                self.x * z2z2 == other.x * z1z1
                    && self.y * z2z2 * other.z == other.y * z1z1 * self.z
            }
            _ => false,
        }
    }
}

impl Eq for JacobianPoint {}

impl TryFrom<Fp5> for JacobianPoint {
    type Error = DecodeError;

    fn try_from(w: Fp5) -> Result<Self> {
        WeierstrassPoint::try_decode(w).map(|p| p.to_jacobian())
    }
}

impl From<JacobianPoint> for Fp5 {
    fn from(p: JacobianPoint) -> Self {
        p.to_affine().encode()
    }
}
