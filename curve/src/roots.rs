//! Step generators built on [`crate::jacobian`]: every point in a returned
//! batch is produced with pure ring arithmetic (no division at all), and
//! the whole batch is converted to affine with exactly one combined
//! inversion. This is the `addWnm` role from the reference — building the
//! arithmetic progression of stage-2 evaluation points — generalized to any
//! batch of independent Jacobian computations, not just a fixed step.
use ecm_bigint::{FactorFound, Modulus};
use num_bigint::BigUint;

use crate::jacobian::{batch_to_affine, JacobianPoint};
use crate::weierstrass::{Curve, Point};

/// `base, base+step, base+2*step, ..., base+(count-1)*step`. Every
/// intermediate addition is a division-free Jacobian add; the single
/// inversion needed to read off affine coordinates happens once, at the end,
/// over the whole progression.
pub fn arithmetic_progression(
    base: &Point,
    step: &Point,
    count: usize,
    curve: &Curve,
    modulus: &Modulus,
) -> Result<Vec<Point>, FactorFound> {
    let step_jac = JacobianPoint::from_affine(step, modulus);
    let mut current = JacobianPoint::from_affine(base, modulus);
    let mut jac = Vec::with_capacity(count);
    for i in 0..count {
        jac.push(current.clone());
        if i + 1 < count {
            current = current.add(&step_jac, curve, modulus);
        }
    }
    batch_to_affine(&jac, modulus)
}

/// `base, 2*base, 3*base, ..., count*base`.
pub fn multiples(
    base: &Point,
    count: usize,
    curve: &Curve,
    modulus: &Modulus,
) -> Result<Vec<Point>, FactorFound> {
    arithmetic_progression(base, base, count, curve, modulus)
}

/// The flat `S_1` root set `g^2, g^4, ..., g^{2*cardinality}` — the degree-1
/// Dickson-polynomial case (`Dickson_1(j) = j`), i.e. the `rootsF` role from
/// the reference: a one-scalar-multiplication-then-additions progression
/// rather than `cardinality` independent scalar multiplications. Stage 2
/// folds `S_1`'s cardinality structure directly from a single point (see
/// `ecm_poly::poly_from_sets_v`) rather than materializing this whole list,
/// but it stays available as the flat alternative that folding is checked
/// against.
pub fn roots_f(g: &Point, cardinality: usize, curve: &Curve, modulus: &Modulus) -> Result<Vec<Point>, FactorFound> {
    let base_scalar = BigUint::from(2u32);
    let step = match curve.scalar_mul(g, &base_scalar, modulus) {
        crate::weierstrass::PointOutcome::Point(pt) => pt,
        crate::weierstrass::PointOutcome::FactorFound(f) => return Err(f),
    };
    arithmetic_progression(&step, &step, cardinality, curve, modulus)
}

/// The `S_2` giant-step root set `g^{m_1 P}, g^{(m_1+1)P}, ..., g^{(m_1 +
/// s_2 - 1)P}` — the `rootsG` role from the reference. Two scalar
/// multiplications (the step `g^P` and the starting point `g^{m_1 P}`)
/// followed by one division-free progression and a single combined
/// inversion, regardless of `s_2`.
pub fn roots_g(g: &Point, p: u64, m1: u64, s2: usize, curve: &Curve, modulus: &Modulus) -> Result<Vec<Point>, FactorFound> {
    let step_scalar = BigUint::from(p);
    let step = match curve.scalar_mul(g, &step_scalar, modulus) {
        crate::weierstrass::PointOutcome::Point(pt) => pt,
        crate::weierstrass::PointOutcome::FactorFound(f) => return Err(f),
    };

    let base_scalar = BigUint::from(m1) * &step_scalar;
    let base = match curve.scalar_mul(g, &base_scalar, modulus) {
        crate::weierstrass::PointOutcome::Point(pt) => pt,
        crate::weierstrass::PointOutcome::FactorFound(f) => return Err(f),
    };

    arithmetic_progression(&base, &step, s2, curve, modulus)
}

/// Scalar-multiplies every `(point, scalar)` pair independently (each its
/// own division-free double-and-add chain in Jacobian coordinates), then
/// normalizes the entire batch with one combined inversion — the batched
/// form of [`crate::weierstrass::Curve::scalar_mul`].
pub fn batch_scalar_mul(
    pairs: &[(Point, BigUint)],
    curve: &Curve,
    modulus: &Modulus,
) -> Result<Vec<Point>, FactorFound> {
    let results: Vec<JacobianPoint> = pairs
        .iter()
        .map(|(p, e)| jacobian_scalar_mul(p, e, curve, modulus))
        .collect();
    batch_to_affine(&results, modulus)
}

fn jacobian_scalar_mul(p: &Point, e: &BigUint, curve: &Curve, modulus: &Modulus) -> JacobianPoint {
    let mut result = JacobianPoint::infinity(modulus);
    let mut base = JacobianPoint::from_affine(p, modulus);
    let bits = e.bits();
    for i in 0..bits {
        if e.bit(i) {
            result = result.add(&base, curve, modulus);
        }
        if i + 1 < bits {
            base = base.double(curve, modulus);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn small_curve() -> (Curve, Modulus) {
        let modulus = Modulus::init(BigUint::from(1_000_003u32)).unwrap();
        let curve = Curve::new(modulus.set_ui(2), modulus.set_ui(3));
        (curve, modulus)
    }

    fn find_point(curve: &Curve, modulus: &Modulus) -> Point {
        for x in 1u64..200 {
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
    fn multiples_matches_repeated_affine_addition() {
        let (curve, modulus) = small_curve();
        let p = find_point(&curve, &modulus);
        let batch = multiples(&p, 5, &curve, &modulus).unwrap();

        let mut expected = Vec::new();
        let mut acc = p.clone();
        expected.push(acc.clone());
        for _ in 1..5 {
            acc = match curve.add(&acc, &p, &modulus) {
                crate::weierstrass::PointOutcome::Point(pt) => pt,
                crate::weierstrass::PointOutcome::FactorFound(_) => panic!("prime modulus"),
            };
            expected.push(acc.clone());
        }
        for (got, want) in batch.iter().zip(expected.iter()) {
            match (got, want) {
                (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
                    assert_eq!(modulus.get_integer(x1), modulus.get_integer(x2));
                    assert_eq!(modulus.get_integer(y1), modulus.get_integer(y2));
                }
                _ => panic!("expected finite points throughout"),
            }
        }
    }

    #[test]
    fn roots_f_matches_individual_scalar_multiplication() {
        let (curve, modulus) = small_curve();
        let p = find_point(&curve, &modulus);
        let batch = roots_f(&p, 4, &curve, &modulus).unwrap();
        assert_eq!(batch.len(), 4);
        for (k, point) in batch.iter().enumerate() {
            let scalar = BigUint::from(2u32 * (k as u32 + 1));
            let expected = match curve.scalar_mul(&p, &scalar, &modulus) {
                crate::weierstrass::PointOutcome::Point(pt) => pt,
                crate::weierstrass::PointOutcome::FactorFound(_) => panic!("prime modulus"),
            };
            match (point, &expected) {
                (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
                    assert_eq!(modulus.get_integer(x1), modulus.get_integer(x2));
                    assert_eq!(modulus.get_integer(y1), modulus.get_integer(y2));
                }
                (Point::Infinity, Point::Infinity) => {}
                _ => panic!("mismatched point kinds at k={k}"),
            }
        }
    }

    #[test]
    fn roots_g_matches_individual_scalar_multiplication() {
        let (curve, modulus) = small_curve();
        let g = find_point(&curve, &modulus);
        let p = 7u64;
        let m1 = 2u64;
        let s2 = 4usize;
        let batch = roots_g(&g, p, m1, s2, &curve, &modulus).unwrap();
        assert_eq!(batch.len(), s2);
        for (i, point) in batch.iter().enumerate() {
            let scalar = BigUint::from((m1 + i as u64) * p);
            let expected = match curve.scalar_mul(&g, &scalar, &modulus) {
                crate::weierstrass::PointOutcome::Point(pt) => pt,
                crate::weierstrass::PointOutcome::FactorFound(_) => panic!("prime modulus"),
            };
            match (point, &expected) {
                (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
                    assert_eq!(modulus.get_integer(x1), modulus.get_integer(x2));
                    assert_eq!(modulus.get_integer(y1), modulus.get_integer(y2));
                }
                (Point::Infinity, Point::Infinity) => {}
                _ => panic!("mismatched point kinds at i={i}"),
            }
        }
    }

    #[test]
    fn batch_scalar_mul_matches_individual_scalar_mul() {
        let (curve, modulus) = small_curve();
        let p = find_point(&curve, &modulus);
        let pairs = vec![(p.clone(), BigUint::from(7u32)), (p.clone(), BigUint::from(13u32))];
        let batch = batch_scalar_mul(&pairs, &curve, &modulus).unwrap();
        for ((point, scalar), got) in pairs.iter().zip(batch.iter()) {
            let want = match curve.scalar_mul(point, scalar, &modulus) {
                crate::weierstrass::PointOutcome::Point(pt) => pt,
                crate::weierstrass::PointOutcome::FactorFound(_) => panic!("prime modulus"),
            };
            match (got, &want) {
                (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
                    assert_eq!(modulus.get_integer(x1), modulus.get_integer(x2));
                    assert_eq!(modulus.get_integer(y1), modulus.get_integer(y2));
                }
                (Point::Infinity, Point::Infinity) => {}
                _ => panic!("mismatched point kinds"),
            }
        }
    }
}
