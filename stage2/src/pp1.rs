//! The `P+1` continuation's stage-2 path: identical in shape to the
//! elliptic-curve path in [`crate::poly_build`]/[`crate::giant_steps`],
//! but built on [`ecm_curve::pp1::QuadExt`] instead of
//! [`ecm_curve::weierstrass::Curve`]. `P+1` never needs a separate
//! x-coordinate-extraction-then-batch-invert step: `QuadExt::trace`
//! already returns the point's trace directly as an
//! [`ecm_bigint::InvertOutcome`], since the extension-field element's `a`
//! coordinate *is* what gets inverted.
use ecm_bigint::{InvertOutcome, Modulus, Residue};
use ecm_curve::pp1::{ExtElement, QuadExt};
use ecm_poly::{poly_from_sets_v, ReciprocalPoly};
use tracing::instrument;

use crate::outcome::RoundOutcome;
use crate::sets::prime_factorization;

/// Builds `F` from a single extension-field point (`g^2`) and the prime
/// factorization of `baby_steps.len()`, via [`poly_from_sets_v`] — the
/// same construction [`crate::poly_build::build_f`] uses for the
/// elliptic-curve path, adapted to `P+1`'s direct trace extraction.
#[instrument(skip(ext, g, baby_steps, modulus))]
pub fn build_f(ext: &QuadExt, g: &ExtElement, baby_steps: &[i64], modulus: &Modulus) -> RoundOutcome<ReciprocalPoly> {
    let base_point = ext.pow_norm1(g, 2, modulus);
    let base_trace: Residue = match ext.trace(&base_point, modulus) {
        InvertOutcome::Invertible(trace) => trace,
        InvertOutcome::FactorFound(f) => return RoundOutcome::Factor(f),
    };

    let mut cardinalities = prime_factorization(baby_steps.len());
    if cardinalities.is_empty() {
        cardinalities.push(1);
    }

    RoundOutcome::Value(poly_from_sets_v(&base_trace, &cardinalities, modulus))
}

/// `g^{m_1 P}, g^{(m_1+1)P}, ..., g^{(m_1+s_2-1)P}`, as extension-field
/// elements (not yet reduced to traces — each giant step's evaluation
/// still needs its own trace taken per round, same as the elliptic-curve
/// path needs its own x-coordinate per round).
#[instrument(skip(ext, g, modulus))]
pub fn build_giant_steps(ext: &QuadExt, g: &ExtElement, p: u64, m1: u64, s2: usize, modulus: &Modulus) -> Vec<ExtElement> {
    let step = ext.pow_norm1(g, p, modulus);
    let mut current = ext.pow_norm1(g, m1 * p, modulus);
    let mut points = Vec::with_capacity(s2);
    for i in 0..s2 {
        points.push(current.clone());
        if i + 1 < s2 {
            current = ext.mul(&current, &step, modulus);
        }
    }
    points
}

/// Reduces a batch of giant-step elements to their traces, short-circuiting
/// on the first one that surfaces a factor.
pub fn traces_of(ext: &QuadExt, points: &[ExtElement], modulus: &Modulus) -> RoundOutcome<Vec<Residue>> {
    let mut traces = Vec::with_capacity(points.len());
    for point in points {
        match ext.trace(point, modulus) {
            InvertOutcome::Invertible(trace) => traces.push(trace),
            InvertOutcome::FactorFound(f) => return RoundOutcome::Factor(f),
        }
    }
    RoundOutcome::Value(traces)
}
