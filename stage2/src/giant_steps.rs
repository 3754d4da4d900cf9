//! Giant-step point generation: `s_2` points spaced `P` apart, starting
//! `m_1 * P` out along the curve, built with exactly one batched
//! inversion regardless of `s_2`'s size.
use ecm_bigint::Modulus;
use ecm_curve::{roots_g, Curve, Point};
use tracing::instrument;

use crate::outcome::RoundOutcome;

/// `g^{m_1 P}, g^{(m_1 + 1) P}, ..., g^{(m_1 + s_2 - 1) P}`, via
/// [`roots_g`]'s `rootsG` progression.
#[instrument(skip(curve, g, modulus))]
pub fn build_giant_steps(curve: &Curve, g: &Point, p: u64, m1: u64, s2: usize, modulus: &Modulus) -> RoundOutcome<Vec<Point>> {
    match roots_g(g, p, m1, s2, curve, modulus) {
        Ok(points) => RoundOutcome::Value(points),
        Err(factor) => RoundOutcome::Factor(factor.0),
    }
}
