//! Builds the stage-2 polynomial `F` once, from the baby-step set, for
//! reuse across every giant-step round.
//!
//! `F`'s roots are the traces `g^{2k} + g^{-2k}` for `k` in the baby-step
//! set — the factor of two matches the reference's convention that the
//! baby steps step by `2P`, not `P`, so that a giant step of `P` always
//! lands strictly between two consecutive baby-step multiples.
//!
//! Rather than computing all `s_1` baby-step points directly and folding
//! them into a flat product tree ([`poly_from_traces`]), `F` is built via
//! [`poly_from_sets_v`]: the baby-step count `s_1` is factored into its
//! prime cardinalities, and `F` is folded up from a single curve point
//! (`g^2`, giving the base trace the whole Chebyshev `V_k` sequence is
//! generated from) using only `V_k` recurrences — no further curve
//! arithmetic needed no matter how large `s_1` gets. See the design
//! ledger for the precise sense in which the resulting root set stands in
//! for `S_1` rather than reproducing [`crate::sets::half_coprime_residues`]
//! exactly.
use ecm_bigint::{InvertOutcome, Modulus, Residue};
use ecm_curve::{Curve, Point, PointOutcome};
use ecm_poly::{poly_from_sets_v, ReciprocalPoly};
use num_bigint::BigUint;
use tracing::instrument;

use crate::outcome::RoundOutcome;
use crate::sets::prime_factorization;

/// Builds `F` from the baby-step count alone: one curve point (`g^2`) is
/// computed and reduced to its trace, and that trace seeds
/// [`poly_from_sets_v`] with the prime factorization of `baby_steps.len()`
/// as the cardinality list.
///
/// `g^2` landing on the point at infinity maps to the residue `0` for its
/// x-coordinate, which [`Modulus::invert`] then reports as a non-invertible
/// element — exactly the same signal as any other denominator sharing a
/// factor with `N`, so a point at infinity surfaces a factor instead of
/// panicking on a missing coordinate.
#[instrument(skip(curve, g, baby_steps, modulus))]
pub fn build_f(curve: &Curve, g: &Point, baby_steps: &[i64], modulus: &Modulus) -> RoundOutcome<ReciprocalPoly> {
    let base_point = match curve.scalar_mul(g, &BigUint::from(2u32), modulus) {
        PointOutcome::Point(pt) => pt,
        PointOutcome::FactorFound(f) => return RoundOutcome::Factor(f),
    };
    let x = match base_point {
        Point::Affine { x, .. } => x,
        Point::Infinity => modulus.set_ui(0),
    };
    let inv = match modulus.invert(&x) {
        InvertOutcome::Invertible(inv) => inv,
        InvertOutcome::FactorFound(f) => return RoundOutcome::Factor(f),
    };
    let base_trace: Residue = modulus.add(&x, &inv);

    let mut cardinalities = prime_factorization(baby_steps.len());
    if cardinalities.is_empty() {
        cardinalities.push(1);
    }

    RoundOutcome::Value(poly_from_sets_v(&base_trace, &cardinalities, modulus))
}
