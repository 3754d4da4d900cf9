//! Affine short-Weierstrass point arithmetic: `y^2 = x^3 + a*x + b mod N`.
//!
//! Every operation that needs a division (point addition, doubling, scalar
//! multiplication) goes through [`ecm_bigint::Modulus::invert`], so a
//! non-invertible denominator — `gcd(denominator, N) != 1` — *is* how ECM
//! discovers a factor of `N`, surfaced here as [`PointOutcome::FactorFound`]
//! rather than threaded through as an error.
use ecm_bigint::{InvertOutcome, Modulus, Residue};
use num_bigint::BigUint;

/// A point in affine coordinates, or the point at infinity (the group
/// identity).
#[derive(Clone)]
pub enum Point {
    Infinity,
    Affine { x: Residue, y: Residue },
}

/// `y^2 = x^3 + a*x + b`.
#[derive(Clone)]
pub struct Curve {
    pub a: Residue,
    pub b: Residue,
}

/// The result of a curve operation: either the resulting point, or a
/// nontrivial factor of `N` surfaced by a failed inversion.
pub enum PointOutcome {
    Point(Point),
    FactorFound(BigUint),
}

impl Curve {
    pub fn new(a: Residue, b: Residue) -> Self {
        Curve { a, b }
    }

    pub fn double(&self, p: &Point, modulus: &Modulus) -> PointOutcome {
        let (x1, y1) = match p {
            Point::Infinity => return PointOutcome::Point(Point::Infinity),
            Point::Affine { x, y } => (x, y),
        };
        if modulus.is_zero(y1) {
            return PointOutcome::Point(Point::Infinity);
        }
        let two_y1 = modulus.add(y1, y1);
        let inv_two_y1 = match modulus.invert(&two_y1) {
            InvertOutcome::Invertible(inv) => inv,
            InvertOutcome::FactorFound(f) => return PointOutcome::FactorFound(f),
        };
        let three_x1_sq = {
            let x1_sq = modulus.sqr(x1);
            modulus.add(&modulus.add(&x1_sq, &x1_sq), &x1_sq)
        };
        let numerator = modulus.add(&three_x1_sq, &self.a);
        let slope = modulus.mul(&numerator, &inv_two_y1);
        let x3 = modulus.sub(&modulus.sub(&modulus.sqr(&slope), x1), x1);
        let y3 = modulus.sub(&modulus.mul(&slope, &modulus.sub(x1, &x3)), y1);
        PointOutcome::Point(Point::Affine { x: x3, y: y3 })
    }

    pub fn add(&self, p1: &Point, p2: &Point, modulus: &Modulus) -> PointOutcome {
        let (x1, y1) = match p1 {
            Point::Infinity => return PointOutcome::Point(p2.clone()),
            Point::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match p2 {
            Point::Infinity => return PointOutcome::Point(p1.clone()),
            Point::Affine { x, y } => (x, y),
        };
        if modulus.get_integer(x1) == modulus.get_integer(x2) {
            if modulus.get_integer(y1) == modulus.get_integer(y2) {
                return self.double(p1, modulus);
            }
            // x1 == x2, y1 == -y2: the sum is the point at infinity.
            return PointOutcome::Point(Point::Infinity);
        }
        let dx = modulus.sub(x2, x1);
        let inv_dx = match modulus.invert(&dx) {
            InvertOutcome::Invertible(inv) => inv,
            InvertOutcome::FactorFound(f) => return PointOutcome::FactorFound(f),
        };
        let dy = modulus.sub(y2, y1);
        let slope = modulus.mul(&dy, &inv_dx);
        let x3 = modulus.sub(&modulus.sub(&modulus.sqr(&slope), x1), x2);
        let y3 = modulus.sub(&modulus.mul(&slope, &modulus.sub(x1, &x3)), y1);
        PointOutcome::Point(Point::Affine { x: x3, y: y3 })
    }

    /// Double-and-add scalar multiplication, `e * p`, short-circuiting as
    /// soon as any step surfaces a factor.
    pub fn scalar_mul(&self, p: &Point, e: &BigUint, modulus: &Modulus) -> PointOutcome {
        let mut result = Point::Infinity;
        let mut base = p.clone();
        let bits = e.bits();
        for i in 0..bits {
            if e.bit(i) {
                result = match self.add(&result, &base, modulus) {
                    PointOutcome::Point(pt) => pt,
                    factor @ PointOutcome::FactorFound(_) => return factor,
                };
            }
            if i + 1 < bits {
                base = match self.double(&base, modulus) {
                    PointOutcome::Point(pt) => pt,
                    factor @ PointOutcome::FactorFound(_) => return factor,
                };
            }
        }
        PointOutcome::Point(result)
    }
}
