//! Jacobian-coordinate point arithmetic that never divides, so a whole
//! batch of stage-2 step points can be generated with zero inversions and
//! converted back to affine with exactly one — Montgomery's trick applied
//! at the curve layer instead of the scalar layer.
//!
//! `(X, Y, Z)` represents the affine point `(X/Z^2, Y/Z^3)`; `Z = 0` is the
//! point at infinity. Formulas are the standard inversion-free doubling and
//! addition laws for general short Weierstrass curves (EFD `dbl-2007-bl`,
//! `add-2007-bl`).
use ecm_bigint::{batch_invert, FactorFound, Modulus, Residue};

use crate::weierstrass::{Curve, Point};

#[derive(Clone)]
pub struct JacobianPoint {
    pub x: Residue,
    pub y: Residue,
    pub z: Residue,
}

impl JacobianPoint {
    pub fn infinity(modulus: &Modulus) -> Self {
        JacobianPoint {
            x: modulus.set_ui(1),
            y: modulus.set_ui(1),
            z: modulus.set_ui(0),
        }
    }

    pub fn from_affine(p: &Point, modulus: &Modulus) -> Self {
        match p {
            Point::Infinity => Self::infinity(modulus),
            Point::Affine { x, y } => JacobianPoint {
                x: x.clone(),
                y: y.clone(),
                z: modulus.set_ui(1),
            },
        }
    }

    pub fn is_infinity(&self, modulus: &Modulus) -> bool {
        modulus.is_zero(&self.z)
    }

    pub fn double(&self, curve: &Curve, modulus: &Modulus) -> JacobianPoint {
        if self.is_infinity(modulus) || modulus.is_zero(&self.y) {
            return JacobianPoint::infinity(modulus);
        }
        let m = modulus;
        let xx = m.sqr(&self.x);
        let yy = m.sqr(&self.y);
        let yyyy = m.sqr(&yy);
        let zz = m.sqr(&self.z);

        let x1_plus_yy = m.add(&self.x, &yy);
        let s = {
            let t = m.sub(&m.sqr(&x1_plus_yy), &m.add(&xx, &yyyy));
            m.add(&t, &t)
        };
        let m_coef = {
            let three_xx = m.add(&m.add(&xx, &xx), &xx);
            let zz2 = m.sqr(&zz);
            m.add(&three_xx, &m.mul(&curve.a, &zz2))
        };
        let t = m.sub(&m.sqr(&m_coef), &m.add(&s, &s));
        let x3 = t.clone();
        let eight_yyyy = {
            let d = m.add(&yyyy, &yyyy);
            let d = m.add(&d, &d);
            m.add(&d, &d)
        };
        let y3 = m.sub(&m.mul(&m_coef, &m.sub(&s, &t)), &eight_yyyy);
        let y1_plus_z1 = m.add(&self.y, &self.z);
        let z3 = m.sub(&m.sub(&m.sqr(&y1_plus_z1), &yy), &zz);

        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    pub fn add(&self, other: &JacobianPoint, curve: &Curve, modulus: &Modulus) -> JacobianPoint {
        let m = modulus;
        if self.is_infinity(m) {
            return other.clone();
        }
        if other.is_infinity(m) {
            return self.clone();
        }
        let z1z1 = m.sqr(&self.z);
        let z2z2 = m.sqr(&other.z);
        let u1 = m.mul(&self.x, &z2z2);
        let u2 = m.mul(&other.x, &z1z1);
        let s1 = m.mul(&m.mul(&self.y, &other.z), &z2z2);
        let s2 = m.mul(&m.mul(&other.y, &self.z), &z1z1);

        if m.get_integer(&u1) == m.get_integer(&u2) {
            if m.get_integer(&s1) == m.get_integer(&s2) {
                return self.double(curve, m);
            }
            return JacobianPoint::infinity(m);
        }

        let h = m.sub(&u2, &u1);
        let i = {
            let two_h = m.add(&h, &h);
            m.sqr(&two_h)
        };
        let j = m.mul(&h, &i);
        let r = {
            let d = m.sub(&s2, &s1);
            m.add(&d, &d)
        };
        let v = m.mul(&u1, &i);
        let x3 = m.sub(&m.sub(&m.sqr(&r), &j), &m.add(&v, &v));
        let two_s1_j = {
            let t = m.mul(&s1, &j);
            m.add(&t, &t)
        };
        let y3 = m.sub(&m.mul(&r, &m.sub(&v, &x3)), &two_s1_j);
        let z_sum_sq = m.sqr(&m.add(&self.z, &other.z));
        let z3 = m.mul(&m.sub(&m.sub(&z_sum_sq, &z1z1), &z2z2), &h);

        JacobianPoint { x: x3, y: y3, z: z3 }
    }
}

/// Converts a batch of Jacobian points to affine with exactly one combined
/// inversion, via [`ecm_bigint::batch_invert`] over the (non-infinite)
/// `Z` coordinates.
pub fn batch_to_affine(
    points: &[JacobianPoint],
    modulus: &Modulus,
) -> Result<Vec<Point>, FactorFound> {
    let mut finite_z: Vec<Residue> = points
        .iter()
        .filter(|p| !p.is_infinity(modulus))
        .map(|p| p.z.clone())
        .collect();
    batch_invert(modulus, &mut finite_z)?;

    let mut finite_iter = finite_z.into_iter();
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        if p.is_infinity(modulus) {
            out.push(Point::Infinity);
            continue;
        }
        let inv_z = finite_iter.next().expect("one inverse per finite point");
        let inv_z2 = modulus.sqr(&inv_z);
        let inv_z3 = modulus.mul(&inv_z2, &inv_z);
        out.push(Point::Affine {
            x: modulus.mul(&p.x, &inv_z2),
            y: modulus.mul(&p.y, &inv_z3),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn small_curve() -> (Curve, Modulus) {
        let modulus = Modulus::init(BigUint::from(1_000_003u32)).unwrap(); // prime
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
            // Trial small square roots; good enough for a deterministic test fixture.
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
    fn jacobian_double_matches_affine_double() {
        let (curve, modulus) = small_curve();
        let p_affine = find_point(&curve, &modulus);
        let p_jac = JacobianPoint::from_affine(&p_affine, &modulus);
        let doubled_jac = p_jac.double(&curve, &modulus);
        let doubled_affine = match curve.double(&p_affine, &modulus) {
            crate::weierstrass::PointOutcome::Point(pt) => pt,
            crate::weierstrass::PointOutcome::FactorFound(_) => panic!("prime modulus"),
        };
        let converted = batch_to_affine(&[doubled_jac], &modulus).unwrap();
        match (&converted[0], &doubled_affine) {
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
                assert_eq!(modulus.get_integer(x1), modulus.get_integer(x2));
                assert_eq!(modulus.get_integer(y1), modulus.get_integer(y2));
            }
            _ => panic!("expected both results to be finite points"),
        }
    }

    #[test]
    fn batch_to_affine_handles_mixed_infinity() {
        let (curve, modulus) = small_curve();
        let p_affine = find_point(&curve, &modulus);
        let p_jac = JacobianPoint::from_affine(&p_affine, &modulus);
        let inf = JacobianPoint::infinity(&modulus);
        let batch = vec![p_jac.clone(), inf, p_jac.double(&curve, &modulus)];
        let affine = batch_to_affine(&batch, &modulus).unwrap();
        assert!(matches!(affine[1], Point::Infinity));
        assert!(matches!(affine[0], Point::Affine { .. }));
        assert!(matches!(affine[2], Point::Affine { .. }));
    }
}
