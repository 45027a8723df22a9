//! Process-wide windows for the conventional generator, built on first use.

use std::sync::OnceLock;
use tracing::debug;

use crate::affine::{make_window_affine, AffinePoint};
use crate::constants::MULADD_WINDOW_BITS;
use crate::point::CurvePoint;
use crate::weierstrass::WeierstrassPoint;

static GENERATOR_WINDOW: OnceLock<Vec<AffinePoint>> = OnceLock::new();
static GENERATOR_WEIERSTRASS_WINDOW: OnceLock<Vec<WeierstrassPoint>> = OnceLock::new();

/// Affine window [G, 2G, ..., 16G] used by `CurvePoint::mul_generator`.
pub fn generator_window() -> &'static [AffinePoint] {
    GENERATOR_WINDOW.get_or_init(|| {
        debug!("initializing generator window");
        make_window_affine(&CurvePoint::GENERATOR)
    })
}

/// Weierstrass window [O, G, 2G, ..., 15G] used by `mul_add2_with_gen`.
pub fn generator_weierstrass_window() -> &'static [WeierstrassPoint] {
    GENERATOR_WEIERSTRASS_WINDOW.get_or_init(|| {
        debug!("initializing Weierstrass generator window");
        WeierstrassPoint::GENERATOR.precompute_window(MULADD_WINDOW_BITS)
    })
}
