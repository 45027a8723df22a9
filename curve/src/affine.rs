//! Affine (x, u) points and the per-point multiplication windows built from them.

use core::ops::Neg;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::WIN_SIZE;
use crate::errors::{DecodeError, Result};
use crate::fp5::Fp5;
use crate::point::CurvePoint;

/// Curve point in affine (x, u) coordinates.
///
/// Only used as a table entry for the double-and-add loop; the neutral
/// element is (0, 0). Serde goes through the point encoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Fp5", into = "Fp5")]
pub struct AffinePoint {
    pub(crate) x: Fp5,
    pub(crate) u: Fp5,
}

impl AffinePoint {
    pub const NEUTRAL: Self = AffinePoint {
        x: Fp5::ZERO,
        u: Fp5::ZERO,
    };

    pub const fn new(x: Fp5, u: Fp5) -> Self {
        AffinePoint { x, u }
    }

    #[inline]
    pub fn x(&self) -> Fp5 {
        self.x
    }

    #[inline]
    pub fn u(&self) -> Fp5 {
        self.u
    }

    #[inline]
    pub fn to_point(&self) -> CurvePoint {
        CurvePoint::new(self.x, Fp5::ONE, self.u, Fp5::ONE)
    }
}

impl Neg for AffinePoint {
    type Output = Self;

    fn neg(self) -> Self {
        AffinePoint {
            x: self.x,
            u: -self.u,
        }
    }
}

impl TryFrom<Fp5> for AffinePoint {
    type Error = DecodeError;

    fn try_from(w: Fp5) -> Result<Self> {
        CurvePoint::try_decode(w).map(|p| p.to_affine())
    }
}

impl From<AffinePoint> for Fp5 {
    fn from(p: AffinePoint) -> Self {
        p.to_point().encode()
    }
}

/// Converts points to affine coordinates with a single field inversion.
///
/// Montgomery's trick: the product of all z and t values is inverted once,
/// then each inverse is peeled off with the partial products. Costs one
/// inversion plus 3*(n-1) multiplications.
pub fn batch_to_affine(src: &[CurvePoint]) -> Vec<AffinePoint> {
    let n = src.len();
    trace!(count = n, "batch affine conversion");
    match n {
        0 => return Vec::new(),
        1 => return vec![src[0].to_affine()],
        _ => {}
    }

    // Partial products are parked in the x and u slots of the output.
    let mut res = vec![AffinePoint::NEUTRAL; n];
    let mut m = src[0].z * src[0].t;
    for (p, out) in src.iter().zip(res.iter_mut()).skip(1) {
        out.x = m;
        m *= p.z;
        out.u = m;
        m *= p.t;
    }

    m = m.inverse_or_zero();

    for (p, out) in src.iter().zip(res.iter_mut()).skip(1).rev() {
        out.u = p.u * out.u * m;
        m *= p.t;
        out.x = p.x * out.x * m;
        m *= p.z;
    }
    res[0].u = src[0].u * src[0].z * m;
    m *= src[0].t;
    res[0].x = src[0].x * m;

    res
}

/// Builds the window [P, 2P, ..., WIN_SIZE*P] in affine coordinates.
///
/// Even multiples come from a doubling and odd ones from an addition, so
/// every entry reuses an earlier one.
pub fn make_window_affine(p: &CurvePoint) -> Vec<AffinePoint> {
    let mut tmp = [*p; WIN_SIZE];
    for i in 1..WIN_SIZE {
        // tmp[i] holds (i + 1)*P.
        tmp[i] = if i & 1 == 0 {
            tmp[i - 1] + *p
        } else {
            tmp[i >> 1].double()
        };
    }
    trace!(size = WIN_SIZE, "built affine window");
    batch_to_affine(&tmp)
}

/// Constant-time window lookup.
///
/// `win[i]` must hold `(i + 1)*P`. Returns `k*P` for `k` in `[-len, len]`,
/// and the neutral element for `k == 0`. Every entry is read regardless of `k`.
pub fn lookup(win: &[AffinePoint], k: i32) -> AffinePoint {
    // sign is all-ones when k < 0
    let sign = (k >> 31) as u32;
    let ka = ((k as u32) ^ sign).wrapping_sub(sign);
    let km1 = ka.wrapping_sub(1);

    let mut x = [0u64; 5];
    let mut u = [0u64; 5];
    for (i, entry) in win.iter().enumerate() {
        let m = km1.wrapping_sub(i as u32);
        // all-ones exactly when m == 0
        let c = (((m | m.wrapping_neg()) >> 31) as u64).wrapping_sub(1);
        let ex = entry.x.to_canonical_u64_array();
        let eu = entry.u.to_canonical_u64_array();
        for j in 0..5 {
            x[j] ^= c & (x[j] ^ ex[j]);
            u[j] ^= c & (u[j] ^ eu[j]);
        }
    }

    // Negate u when k < 0.
    let c = (sign as u64) | ((sign as u64) << 32);
    let nu = (-Fp5::from_u64_array(u)).to_canonical_u64_array();
    for j in 0..5 {
        u[j] ^= c & (u[j] ^ nu[j]);
    }

    AffinePoint {
        x: Fp5::from_u64_array(x),
        u: Fp5::from_u64_array(u),
    }
}

/// Variable-time window lookup, for public digits only.
pub fn lookup_vartime(win: &[AffinePoint], k: i32) -> AffinePoint {
    match k {
        0 => AffinePoint::NEUTRAL,
        k if k > 0 => win[(k - 1) as usize],
        k => -win[(-k - 1) as usize],
    }
}
