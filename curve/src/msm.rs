//! Simultaneous double-scalar multiplication on the Weierstrass model.
//!
//! Both routines compute `s_a*A + s_b*B` with one shared chain of doublings
//! (Straus' trick over 4-bit windows). Scalars are walked nibble by nibble
//! from the most significant end and each nibble indexes a full table
//! [O, P, ..., 15P] directly. Lookups are variable-time: the scalars of a
//! signature check are public.

use tracing::trace;

use crate::constants::MULADD_WINDOW_BITS;
use crate::generator_table::generator_weierstrass_window;
use crate::jacobian::JacobianPoint;
use crate::scalarfield::ScalarField;
use crate::weierstrass::WeierstrassPoint;

/// Computes `s_a*a + s_b*b` with an affine accumulator.
pub fn mul_add2(
    a: &WeierstrassPoint,
    b: &WeierstrassPoint,
    s_a: &ScalarField,
    s_b: &ScalarField,
) -> WeierstrassPoint {
    let a_table = a.precompute_window(MULADD_WINDOW_BITS);
    let b_table = b.precompute_window(MULADD_WINDOW_BITS);
    trace!(size = a_table.len(), "built dual-scalar windows");

    let a_nibbles = s_a.split_to_4bit_limbs();
    let b_nibbles = s_b.split_to_4bit_limbs();
    let mut result = WeierstrassPoint::NEUTRAL;

    for (&na, &nb) in a_nibbles.iter().zip(b_nibbles.iter()).rev() {
        for _ in 0..MULADD_WINDOW_BITS {
            result = result.double();
        }
        result += a_table[na as usize];
        result += b_table[nb as usize];
    }

    result
}

/// Computes `s_a*G + s_b*b`, where `G` is the conventional generator.
///
/// Same result as `mul_add2(&WeierstrassPoint::GENERATOR, b, s_a, s_b)`, but
/// the generator window is shared process-wide and the accumulator stays in
/// Jacobian coordinates until the end.
pub fn mul_add2_with_gen(
    b: &WeierstrassPoint,
    s_a: &ScalarField,
    s_b: &ScalarField,
) -> WeierstrassPoint {
    let g_table = generator_weierstrass_window();
    let b_table = b.precompute_window(MULADD_WINDOW_BITS);

    let a_nibbles = s_a.split_to_4bit_limbs();
    let b_nibbles = s_b.split_to_4bit_limbs();
    let mut result = JacobianPoint::NEUTRAL;

    for (&na, &nb) in a_nibbles.iter().zip(b_nibbles.iter()).rev() {
        for _ in 0..MULADD_WINDOW_BITS {
            result = result.double_jacobian();
        }
        result = result.add_mixed(&g_table[na as usize]);
        result = result.add_mixed(&b_table[nb as usize]);
    }

    result.to_affine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::point::CurvePoint;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_point(rng: &mut StdRng) -> (CurvePoint, WeierstrassPoint) {
        let k: ScalarField = rng.random();
        let p = CurvePoint::mul_generator(&k);
        (p, WeierstrassPoint::from_curve_point(&p))
    }

    #[test]
    fn test_mul_add2_matches_separate_muls() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..3 {
            let (pa, wa) = random_point(&mut rng);
            let (pb, wb) = random_point(&mut rng);
            let s_a: ScalarField = rng.random();
            let s_b: ScalarField = rng.random();

            let expected = pa * s_a + pb * s_b;
            let got = mul_add2(&wa, &wb, &s_a, &s_b);
            assert!(got.is_on_curve());
            assert_eq!(got.encode(), expected.encode());
        }
    }

    #[test]
    fn test_mul_add2_small_scalars() {
        let g = WeierstrassPoint::GENERATOR;
        let h = g.double();
        let got = mul_add2(&g, &h, &ScalarField::from(3u64), &ScalarField::from(5u64));
        assert_eq!(got, g.mul_u64(13));

        let zero = ScalarField::ZERO;
        assert!(mul_add2(&g, &h, &zero, &zero).is_infinity());
        assert_eq!(mul_add2(&g, &h, &ScalarField::ONE, &zero), g);
        assert!(mul_add2(&g, &g, &ScalarField::ONE, &ScalarField::NEG_ONE).is_infinity());
    }

    #[test]
    fn test_mul_add2_with_neutral_inputs() {
        let mut rng = StdRng::seed_from_u64(5);
        let (_, wb) = random_point(&mut rng);
        let s: ScalarField = rng.random();
        let n = WeierstrassPoint::NEUTRAL;
        assert_eq!(mul_add2(&n, &wb, &s, &ScalarField::ONE), wb);
        assert_eq!(mul_add2_with_gen(&n, &ScalarField::ONE, &s), WeierstrassPoint::GENERATOR);
    }

    #[test]
    fn test_mul_add2_with_gen_matches_affine() {
        let mut rng = StdRng::seed_from_u64(34);
        for _ in 0..3 {
            let (_, wb) = random_point(&mut rng);
            let s_a: ScalarField = rng.random();
            let s_b: ScalarField = rng.random();
            assert_eq!(
                mul_add2_with_gen(&wb, &s_a, &s_b),
                mul_add2(&WeierstrassPoint::GENERATOR, &wb, &s_a, &s_b)
            );
        }
    }

    #[test]
    fn test_signature_style_check() {
        // s = k + e*x gives s*G - e*(x*G) = k*G.
        let mut rng = StdRng::seed_from_u64(55);
        let x: ScalarField = rng.random();
        let k: ScalarField = rng.random();
        let e: ScalarField = rng.random();
        let s = k + e * x;

        let public = WeierstrassPoint::from_curve_point(&CurvePoint::mul_generator(&x));
        let r = mul_add2_with_gen(&public, &s, &-e);
        assert_eq!(r.encode(), CurvePoint::mul_generator(&k).encode());
    }
}
