//! ecGFp5: y^2 = x*(x^2 + a*x + b) over GF(p^5), a = 2, b = 263*z.
//!
//! The group has prime order n (no cofactor). Points are kept in fractional
//! (x, u) coordinates with u = x/y, stored as x = X/Z and u = U/T. The neutral
//! element is the unique point of order two N = (0, 0), with u = 0; the group
//! law P + Q + N is what the complete formulas below compute.
//!
//! A group element is represented on the wire by the single `Fp5` value
//! w = 1/u, which is canonical: decoding rejects anything that is not the
//! encoding of a point.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::affine::{lookup, lookup_vartime, make_window_affine, AffinePoint};
use crate::constants::{ENCODED_POINT_SIZE, NUM_DIGITS, WINDOW};
use crate::errors::{DecodeError, Result};
use crate::fp5::Fp5;
use crate::generator_table::generator_window;
use crate::goldilocks::GoldilocksField;
use crate::group::Group;
use crate::scalarfield::ScalarField;

// 1/2 in the Goldilocks field.
const HALF: GoldilocksField = GoldilocksField::from_canonical_u64(0x7FFF_FFFF_8000_0001);

/// Curve point in fractional (x, z, u, t) coordinates.
///
/// Serializes as its canonical encoding; deserialization goes through
/// `try_decode`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Fp5", into = "Fp5")]
pub struct CurvePoint {
    pub(crate) x: Fp5,
    pub(crate) z: Fp5,
    pub(crate) u: Fp5,
    pub(crate) t: Fp5,
}

impl CurvePoint {
    /// Curve coefficient a = 2.
    pub const A: Fp5 = Fp5::from_u64_array([2, 0, 0, 0, 0]);

    /// Curve coefficient b = 263*z.
    pub const B: Fp5 = Fp5::from_u64_array([0, 263, 0, 0, 0]);
    pub const B_MUL2: Fp5 = Fp5::from_u64_array([0, 2 * 263, 0, 0, 0]);
    pub const B_MUL4: Fp5 = Fp5::from_u64_array([0, 4 * 263, 0, 0, 0]);
    pub const B_MUL16: Fp5 = Fp5::from_u64_array([0, 16 * 263, 0, 0, 0]);

    /// The neutral element N = (0, 0).
    pub const NEUTRAL: Self = CurvePoint {
        x: Fp5::ZERO,
        z: Fp5::ONE,
        u: Fp5::ZERO,
        t: Fp5::ONE,
    };

    /// Conventional generator, the point encoded by w = 4.
    pub const GENERATOR: Self = CurvePoint {
        x: Fp5::from_u64_array([
            12883135586176881569,
            4356519642755055268,
            5248930565894896907,
            2165973894480315022,
            2448410071095648785,
        ]),
        z: Fp5::ONE,
        u: Fp5::ONE,
        t: Fp5::from_u64_array([4, 0, 0, 0, 0]),
    };

    /// Builds a point from raw fractional coordinates. No curve check is made.
    pub const fn new(x: Fp5, z: Fp5, u: Fp5, t: Fp5) -> Self {
        CurvePoint { x, z, u, t }
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.u.is_zero()
    }

    /// Canonical encoding w = t/u (zero for the neutral element).
    pub fn encode(&self) -> Fp5 {
        self.t * self.u.inverse_or_zero()
    }

    /// Returns true if `w` is the encoding of some group element.
    pub fn validate(w: Fp5) -> bool {
        let e = w.square() - Self::A;
        let delta = e.square() - Self::B_MUL4;
        w.is_zero() || delta.legendre().is_one()
    }

    /// Decodes `w`, returning the neutral element and `false` on failure.
    pub fn decode(w: Fp5) -> (Self, bool) {
        // With w = y/x the curve equation becomes x^2 - (w^2 - a)*x + b = 0.
        // Of the two solutions exactly one is a square; keep the other one.
        let (x1, x2, c) = decode_roots(w);
        let x = if x1.legendre().is_one() { x2 } else { x1 };

        let (x, u, t) = if c {
            (x, Fp5::ONE, w)
        } else {
            (Fp5::ZERO, Fp5::ZERO, Fp5::ONE)
        };

        // w = 0 has a non-square discriminant but is the neutral element.
        if c || w.is_zero() {
            (
                CurvePoint {
                    x,
                    z: Fp5::ONE,
                    u,
                    t,
                },
                true,
            )
        } else {
            debug!("point decoding rejected: discriminant is not a square");
            (Self::NEUTRAL, false)
        }
    }

    pub fn try_decode(w: Fp5) -> Result<Self> {
        match Self::decode(w) {
            (p, true) => Ok(p),
            (_, false) => Err(DecodeError::InvalidEncoding),
        }
    }

    /// 40-byte wire form of the encoding.
    pub fn to_bytes(&self) -> [u8; ENCODED_POINT_SIZE] {
        self.encode().to_le_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::try_decode(Fp5::from_canonical_le_bytes(bytes)?)
    }

    /// Point doubling. Cost: 4M + 5S.
    pub fn double(&self) -> Self {
        let CurvePoint { x, z, u, t } = *self;

        let t1 = z * t;
        let t2 = t1 * t;
        let x1 = t2.square();
        let z1 = t1 * u;
        let t3 = u.square();
        let w1 = t2 - t3 * (x + z).double();
        let t4 = z1.square();

        let x_new = t4 * Self::B_MUL4;
        let z_new = w1.square();
        let u_new = (w1 + z1).square() - (t4 + z_new);
        let t_new = x1.double() - (t4.double().double() + z_new);

        CurvePoint {
            x: x_new,
            z: z_new,
            u: u_new,
            t: t_new,
        }
    }

    /// Computes 2^n * self. Cost: n*(2M + 5S) + 2M + 1S.
    pub fn mdouble(&self, n: u32) -> Self {
        match n {
            0 => return *self,
            1 => return self.double(),
            _ => {}
        }

        let CurvePoint {
            x: x0,
            z: z0,
            u: u0,
            t: t0,
        } = *self;

        // First doubling, leaving the result in (x, w, z) form.
        let t1 = z0 * t0;
        let t2 = t1 * t0;
        let x1 = t2.square();
        let z1 = t1 * u0;
        let t3 = u0.square();
        let w1 = t2 - (x0 + z0).double() * t3;
        let t4 = w1.square();
        let t5 = z1.square();
        let mut x = t5.square() * Self::B_MUL16;
        let mut w = x1.double() - (t5.double().double() + t4);
        let mut z = (w1 + z1).square() - (t4 + t5);

        let b4_minus_4 = Self::B_MUL4 - Fp5::from_u64(4);
        for _ in 2..n {
            let t1 = z.square();
            let t2 = t1.square();
            let t3 = w.square();
            let t4 = t3.square();
            let t5 = (w + z).square() - (t1 + t3);
            z = t5 * ((x + t1).double() - t3);
            x = t2 * t4 * Self::B_MUL16;
            w = -(t4 + t2 * b4_minus_4);
        }

        // Last doubling, back to fractional coordinates.
        let t1 = w.square();
        let t2 = z.square();
        let t3 = (w + z).square() - (t1 + t2);
        let w1 = t1 - (x + t2).double();

        let z_new = w1.square();
        CurvePoint {
            x: t3.square() * Self::B,
            z: z_new,
            u: t3 * w1,
            t: t1.double() * (t1 - t2.double()) - z_new,
        }
    }

    /// Adds an affine point. Cost: 8M.
    pub fn add_affine(&self, rhs: &AffinePoint) -> Self {
        let CurvePoint {
            x: x1,
            z: z1,
            u: u1,
            t: tt1,
        } = *self;
        let (x2, u2) = (rhs.x, rhs.u);

        let t1 = x1 * x2;
        let t2 = z1;
        let t3 = u1 * u2;
        let t4 = tt1;
        let t5 = x1 + x2 * z1;
        let t6 = u1 + u2 * tt1;
        add_tail(t1, t2, t3, t4, t5, t6)
    }

    pub fn sub_affine(&self, rhs: &AffinePoint) -> Self {
        self.add_affine(&-*rhs)
    }

    /// Converts to affine (x, u) coordinates.
    pub fn to_affine(&self) -> AffinePoint {
        let m = (self.z * self.t).inverse_or_zero();
        AffinePoint {
            x: self.x * self.t * m,
            u: self.u * self.z * m,
        }
    }

    /// Multiplies the point by a scalar with signed 5-bit windows.
    ///
    /// All digits but the top one go through the constant-time lookup.
    pub fn mul_scalar(&self, s: &ScalarField) -> Self {
        let win = make_window_affine(self);
        mul_with_window(&win, s)
    }

    /// Multiplies the conventional generator using the precomputed window.
    pub fn mul_generator(s: &ScalarField) -> Self {
        mul_with_window(generator_window(), s)
    }
}

fn mul_with_window(win: &[AffinePoint], s: &ScalarField) -> CurvePoint {
    let mut digits = [0i32; NUM_DIGITS];
    s.recode_signed(&mut digits, WINDOW as u32);

    let mut p = lookup_vartime(win, digits[NUM_DIGITS - 1]).to_point();
    for &digit in digits[..NUM_DIGITS - 1].iter().rev() {
        p = p.mdouble(WINDOW as u32);
        p = p.add_affine(&lookup(win, digit));
    }
    p
}

// Shared tail of the generic and affine addition formulas.
#[inline]
fn add_tail(t1: Fp5, t2: Fp5, t3: Fp5, t4: Fp5, t5: Fp5, t6: Fp5) -> CurvePoint {
    let t7 = t1 + t2 * CurvePoint::B;
    let t8 = t4 * t7;
    let t9 = t3 * (t5 * CurvePoint::B_MUL2 + t7.double());
    let t10 = (t4 + t3.double()) * (t5 + t7);

    CurvePoint {
        x: (t10 - t8) * CurvePoint::B,
        z: t8 - t9,
        u: t6 * (t2 * CurvePoint::B - t1),
        t: t8 + t9,
    }
}

/// Solves x^2 - (w^2 - a)*x + b = 0.
///
/// Returns both candidate roots and whether the discriminant is a square.
/// When it is not, both roots are `(w^2 - a)/2` and must not be used.
pub(crate) fn decode_roots(w: Fp5) -> (Fp5, Fp5, bool) {
    let e = w.square() - CurvePoint::A;
    let delta = e.square() - CurvePoint::B_MUL4;
    let (r, c) = match delta.canonical_sqrt() {
        Some(r) => (r, true),
        None => (Fp5::ZERO, false),
    };
    let x1 = (e + r) * HALF;
    let x2 = (e - r) * HALF;
    (x1, x2, c)
}

impl Default for CurvePoint {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl PartialEq for CurvePoint {
    fn eq(&self, other: &Self) -> bool {
        self.u * other.t == other.u * self.t
    }
}

impl Eq for CurvePoint {}

impl TryFrom<Fp5> for CurvePoint {
    type Error = DecodeError;

    fn try_from(w: Fp5) -> Result<Self> {
        Self::try_decode(w)
    }
}

impl From<CurvePoint> for Fp5 {
    fn from(p: CurvePoint) -> Self {
        p.encode()
    }
}

impl Group for CurvePoint {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::NEUTRAL
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_neutral()
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
        -*self
    }

    #[inline]
    fn scalar_mul(&self, scalar: &ScalarField) -> Self {
        self.mul_scalar(scalar)
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        CurvePoint::mul_generator(scalar)
    }
}

/// Complete addition. Cost: 10M.
impl Add for CurvePoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let CurvePoint {
            x: x1,
            z: z1,
            u: u1,
            t: tt1,
        } = self;
        let CurvePoint {
            x: x2,
            z: z2,
            u: u2,
            t: tt2,
        } = rhs;

        let t1 = x1 * x2;
        let t2 = z1 * z2;
        let t3 = u1 * u2;
        let t4 = tt1 * tt2;
        let t5 = (x1 + z1) * (x2 + z2) - (t1 + t2);
        let t6 = (u1 + tt1) * (u2 + tt2) - (t3 + t4);
        add_tail(t1, t2, t3, t4, t5, t6)
    }
}

impl AddAssign for CurvePoint {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Add<AffinePoint> for CurvePoint {
    type Output = Self;

    fn add(self, rhs: AffinePoint) -> Self {
        self.add_affine(&rhs)
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for CurvePoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl SubAssign for CurvePoint {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for CurvePoint {
    type Output = Self;

    fn neg(self) -> Self {
        CurvePoint {
            u: -self.u,
            ..self
        }
    }
}

impl Mul<ScalarField> for CurvePoint {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        CurvePoint::mul_scalar(&self, &scalar)
    }
}

impl Mul<&ScalarField> for CurvePoint {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        CurvePoint::mul_scalar(&self, scalar)
    }
}

impl Mul<CurvePoint> for ScalarField {
    type Output = CurvePoint;

    fn mul(self, point: CurvePoint) -> CurvePoint {
        point.mul_scalar(&self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::affine::batch_to_affine;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Encodings w0..w7: w0 = neutral, w1 = P1, w2 = P2, w3 = P1 + P2,
    /// w4 = 2*P1, w5 = 2*P2, w6 = 2*P1 + P2, w7 = P1 + 2*P2.
    pub(crate) fn test_vectors() -> [Fp5; 8] {
        [
            Fp5::ZERO,
            Fp5::from_u64_array([
                12539254003028696409,
                15524144070600887654,
                15092036948424041984,
                11398871370327264211,
                10958391180505708567,
            ]),
            Fp5::from_u64_array([
                11001943240060308920,
                17075173755187928434,
                3940989555384655766,
                15017795574860011099,
                5548543797011402287,
            ]),
            Fp5::from_u64_array([
                246872606398642312,
                4900963247917836450,
                7327006728177203977,
                13945036888436667069,
                3062018119121328861,
            ]),
            Fp5::from_u64_array([
                8058035104653144162,
                16041715455419993830,
                7448530016070824199,
                11253639182222911208,
                6228757819849640866,
            ]),
            Fp5::from_u64_array([
                10523134687509281194,
                11148711503117769087,
                9056499921957594891,
                13016664454465495026,
                16494247923890248266,
            ]),
            Fp5::from_u64_array([
                12173306542237620,
                6587231965341539782,
                17027985748515888117,
                17194831817613584995,
                10056734072351459010,
            ]),
            Fp5::from_u64_array([
                9420857400785992333,
                4695934009314206363,
                14471922162341187302,
                13395190104221781928,
                16359223219913018041,
            ]),
        ]
    }

    fn decode_all() -> [CurvePoint; 8] {
        let mut out = [CurvePoint::NEUTRAL; 8];
        for (p, w) in out.iter_mut().zip(test_vectors()) {
            let (q, ok) = CurvePoint::decode(w);
            assert!(ok);
            *p = q;
        }
        out
    }

    #[test]
    fn test_encode_vector() {
        let p = CurvePoint::new(
            Fp5::from_u64_array([
                8219099146870311261,
                1751466925979295147,
                7427996218561204331,
                5499363376829590386,
                17146362437196146248,
            ]),
            Fp5::from_u64_array([
                9697849239028047855,
                5846309906783017685,
                10545493423738651463,
                2054382452661947581,
                7470471124463677860,
            ]),
            Fp5::from_u64_array([
                2901139745109740356,
                15850005224840060392,
                3464972059371886732,
                15264046134718393739,
                9208307769190416697,
            ]),
            Fp5::from_u64_array([
                4691886900801030369,
                14793814721360336872,
                14452533794393275351,
                3652664841353278369,
                4894903405053011144,
            ]),
        );
        assert_eq!(
            p.encode(),
            Fp5::from_u64_array([
                11698180777452980608,
                17225201015770513568,
                2048901991804183462,
                12372738397545947475,
                13773458998102781339,
            ])
        );
    }

    #[test]
    fn test_generator_decodes_from_four() {
        let (g, ok) = CurvePoint::decode(Fp5::from_u64(4));
        assert!(ok);
        assert_eq!(g, CurvePoint::GENERATOR);
        assert_eq!(CurvePoint::GENERATOR.encode(), Fp5::from_u64(4));
    }

    #[test]
    fn test_neutral() {
        let (p0, ok) = CurvePoint::decode(Fp5::ZERO);
        assert!(ok);
        assert!(p0.is_neutral());
        assert_eq!(CurvePoint::NEUTRAL.encode(), Fp5::ZERO);
        assert!(CurvePoint::NEUTRAL.double().is_neutral());
        assert_eq!(
            CurvePoint::NEUTRAL + CurvePoint::GENERATOR,
            CurvePoint::GENERATOR
        );
    }

    #[test]
    fn test_bad_encodings() {
        let bad = [
            [
                13557832913345268708,
                15669280705791538619,
                8534654657267986396,
                12533218303838131749,
                5058070698878426028,
            ],
            [
                135036726621282077,
                17283229938160287622,
                13113167081889323961,
                1653240450380825271,
                520025869628727862,
            ],
            [
                6727960962624180771,
                17240764188796091916,
                3954717247028503753,
                1002781561619501488,
                4295357288570643789,
            ],
            [
                4578929270179684956,
                3866930513245945042,
                7662265318638150701,
                9503686272550423634,
                12241691520798116285,
            ],
            [
                16890297404904119082,
                6169724643582733633,
                9725973298012340311,
                5977049210035183790,
                11379332130141664883,
            ],
            [
                13777379982711219130,
                14715168412651470168,
                17942199593791635585,
                6188824164976547520,
                15461469634034461986,
            ],
        ];
        for limbs in bad {
            let w = Fp5::from_u64_array(limbs);
            assert!(!CurvePoint::validate(w));
            let (p, ok) = CurvePoint::decode(w);
            assert!(!ok);
            assert!(p.is_neutral());
            assert_eq!(
                CurvePoint::try_decode(w),
                Err(DecodeError::InvalidEncoding)
            );
        }
    }

    #[test]
    fn test_basic_ops() {
        let w = test_vectors();
        for v in w {
            assert!(CurvePoint::validate(v));
        }
        let [p0, p1, p2, p3, p4, p5, p6, p7] = decode_all();

        assert!(p0.is_neutral());
        for p in [p1, p2, p3, p4, p5, p6, p7] {
            assert!(!p.is_neutral());
        }
        assert_eq!(p0, p0);
        assert_eq!(p1, p1);
        assert_ne!(p0, p1);
        assert_ne!(p1, p2);

        for (p, v) in decode_all().iter().zip(w) {
            assert_eq!(p.encode(), v);
        }

        assert_eq!((p1 + p2).encode(), w[3]);
        assert_eq!((p1 + p1).encode(), w[4]);
        assert_eq!(p2.double().encode(), w[5]);
        assert_eq!((p1.double() + p2).encode(), w[6]);
        assert_eq!((p1 + p2 + p2).encode(), w[7]);
        assert_eq!(p3, p1 + p2);
        assert_eq!(p4, p1.double());

        assert_eq!(p0.double().encode(), Fp5::ZERO);
        assert_eq!((p0 + p0).encode(), Fp5::ZERO);
        assert_eq!((p0 + p1).encode(), w[1]);
        assert_eq!((p1 + p0).encode(), w[1]);
    }

    #[test]
    fn test_mdouble() {
        let [_, p1, ..] = decode_all();
        for n in 0..10 {
            let q1 = p1.mdouble(n);
            let mut q2 = p1;
            for _ in 0..n {
                q2 = q2.double();
            }
            assert_eq!(q1, q2, "mdouble({n})");
        }
    }

    #[test]
    fn test_add_affine() {
        let [_, p1, p2, ..] = decode_all();
        let p2_affine = AffinePoint {
            x: p2.x * p2.z.inverse_or_zero(),
            u: p2.u * p2.t.inverse_or_zero(),
        };
        assert_eq!(p1.add_affine(&p2_affine), p1 + p2);
        assert_eq!(p1.add_affine(&p2.to_affine()), p1 + p2);
        assert_eq!(p1.sub_affine(&p2.to_affine()), p1 - p2);
        assert_eq!(p1 + p2.to_affine(), p1 + p2);
    }

    #[test]
    fn test_neg_and_sub() {
        let [_, p1, p2, ..] = decode_all();
        assert!((p1 + (-p1)).is_neutral());
        assert!((p1 - p1).is_neutral());
        assert_eq!(p1 + p2 - p2, p1);
        let mut q = p1;
        q += p2;
        q -= p1;
        assert_eq!(q, p2);
    }

    #[test]
    fn test_scalar_mul_vector() {
        let p1 = CurvePoint::new(
            Fp5::from_u64_array([
                16818074783491816710,
                5830279414330569119,
                3449083115922675783,
                1268145320872323641,
                12614816166275380125,
            ]),
            Fp5::ONE,
            Fp5::ONE,
            Fp5::from_u64_array([
                7534507442095725921,
                16658460051907528927,
                12417574136563175256,
                2750788641759288856,
                620002843272906439,
            ]),
        );
        let s = ScalarField::from_canonical_limbs([
            996458928865875995,
            7368213710557165165,
            8553572641065079816,
            15282443801767955752,
            251150557732720826,
        ])
        .unwrap();
        let expected = CurvePoint::new(
            Fp5::from_u64_array([
                16885333682092300432,
                5595343485914691669,
                13188593663496831978,
                10414629856394645794,
                5668658507670629815,
            ]),
            Fp5::ONE,
            Fp5::ONE,
            Fp5::from_u64_array([
                9486104512504676657,
                14312981644741144668,
                5159846406177847664,
                15978863787033795628,
                3249948839313771192,
            ]),
        );
        assert_eq!(p1.mul_scalar(&s), expected);
        assert_eq!(p1 * s, expected);
    }

    #[test]
    fn test_scalar_mul_small() {
        let g = CurvePoint::GENERATOR;
        assert!(g.mul_scalar(&ScalarField::ZERO).is_neutral());
        assert_eq!(g.mul_scalar(&ScalarField::ONE), g);
        assert_eq!(g.mul_scalar(&ScalarField::TWO), g.double());
        assert_eq!(g.mul_scalar(&ScalarField::from(5)), g + g + g + g + g);
        assert_eq!(g.mul_scalar(&ScalarField::NEG_ONE), -g);
        assert_eq!(g.mul_scalar(&ScalarField::from(37)), g.mul_u64(37));
    }

    #[test]
    fn test_scalar_mul_homomorphism() {
        let mut rng = StdRng::seed_from_u64(42);
        let g = CurvePoint::GENERATOR;
        for _ in 0..4 {
            let k1: ScalarField = rng.random();
            let k2: ScalarField = rng.random();
            assert_eq!(g.mul_scalar(&(k1 + k2)), g.mul_scalar(&k1) + g.mul_scalar(&k2));
            assert_eq!(g.mul_scalar(&(k1 * k2)), g.mul_scalar(&k1).mul_scalar(&k2));
        }
    }

    #[test]
    fn test_mul_generator_matches_mul() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..4 {
            let k: ScalarField = rng.random();
            assert_eq!(
                CurvePoint::mul_generator(&k),
                CurvePoint::GENERATOR.mul_scalar(&k)
            );
        }
        assert!(CurvePoint::mul_generator(&ScalarField::ZERO).is_neutral());
    }

    #[test]
    fn test_mul_matches_double_and_add() {
        let mut rng = StdRng::seed_from_u64(17);
        let [_, p1, ..] = decode_all();
        let k: ScalarField = rng.random();
        let mut naive = CurvePoint::NEUTRAL;
        let mut acc = p1;
        for limb in k.to_canonical_limbs() {
            for i in 0..64 {
                if (limb >> i) & 1 == 1 {
                    naive += acc;
                }
                acc = acc.double();
            }
        }
        assert_eq!(p1.mul_scalar(&k), naive);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..8 {
            let k: ScalarField = rng.random();
            let p = CurvePoint::mul_generator(&k);
            let (q, ok) = CurvePoint::decode(p.encode());
            assert!(ok);
            assert_eq!(q, p);

            let bytes = p.to_bytes();
            assert_eq!(CurvePoint::from_bytes(&bytes), Ok(p));
        }
    }

    #[test]
    fn test_from_bytes_errors() {
        assert_eq!(
            CurvePoint::from_bytes(&[0u8; 12]),
            Err(DecodeError::InvalidLength {
                expected: 40,
                actual: 12
            })
        );
        let mut bytes = [0u8; 40];
        bytes[..8].copy_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(
            CurvePoint::from_bytes(&bytes),
            Err(DecodeError::NonCanonicalFieldElement)
        );
    }

    #[test]
    fn test_to_affine_matches_batch() {
        let [_, p1, p2, p3, ..] = decode_all();
        let pts = [p1.double(), p2 + p3, p1 + p2 + p3];
        let batch = batch_to_affine(&pts);
        for (p, a) in pts.iter().zip(batch.iter()) {
            assert_eq!(p.to_affine(), *a);
            assert_eq!(a.to_point(), *p);
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let p = CurvePoint::GENERATOR.double();
        let bytes = bincode::serialize(&p).unwrap();
        assert_eq!(bytes.len(), ENCODED_POINT_SIZE);
        assert_eq!(bincode::serialize(&p.encode()).unwrap(), bytes);
        let q: CurvePoint = bincode::deserialize(&bytes).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn test_serde_rejects_invalid_points() {
        let bad = Fp5::from_u64_array([
            13557832913345268708,
            15669280705791538619,
            8534654657267986396,
            12533218303838131749,
            5058070698878426028,
        ]);
        let bytes = bincode::serialize(&bad).unwrap();
        assert!(bincode::deserialize::<CurvePoint>(&bytes).is_err());
        assert_eq!(CurvePoint::try_from(bad), Err(DecodeError::InvalidEncoding));

        // All-zero coordinates cannot be smuggled in: zero bytes are w = 0.
        let p: CurvePoint = bincode::deserialize(&[0u8; ENCODED_POINT_SIZE]).unwrap();
        assert!(p.is_neutral());
        assert_ne!(p, CurvePoint::GENERATOR);
    }
}
