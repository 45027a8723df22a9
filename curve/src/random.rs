use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::fp5::Fp5;
use crate::goldilocks::GoldilocksField;
use crate::scalarfield::ScalarField;

/// Helper trait for sampling random field elements.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomField for GoldilocksField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }
}

impl RandomField for Fp5 {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_are_canonical() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..64 {
            let g = GoldilocksField::random(&mut rng);
            assert_eq!(g.to_noncanonical_u64(), g.to_canonical_u64());

            let s = ScalarField::random(&mut rng);
            assert_eq!(ScalarField::from_canonical_limbs(s.to_canonical_limbs()), Some(s));
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let a = Fp5::random(&mut StdRng::seed_from_u64(99));
        let b = Fp5::random(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
        assert_ne!(a, Fp5::random(&mut StdRng::seed_from_u64(100)));
    }
}
