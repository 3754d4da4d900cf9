//! Reciprocal Laurent polynomials `F(x) = f_0 + sum_{i=1}^{d} f_i(x^i + x^-i)`.
//!
//! A degree-`d` reciprocal polynomial is stored as its `d + 1` coefficients
//! `[f_0, f_1, ..., f_d]`; the `x^-i` half is never materialized. Stage 2
//! builds one such `F` from the points in the factored set `S_1` and
//! evaluates it (via [`crate::chebyshev`] or an NTT convolution) at every
//! point of `S_2` in one pass, which is the entire reason this basis exists
//! instead of a plain dense polynomial.
use ecm_bigint::{Modulus, Residue};

use crate::error::PolyError;

/// A reciprocal Laurent polynomial, represented by `coeffs[i] = f_i`.
#[derive(Clone)]
pub struct ReciprocalPoly {
    coeffs: Vec<Residue>,
}

impl ReciprocalPoly {
    pub fn from_coeffs(coeffs: Vec<Residue>) -> Result<Self, PolyError> {
        if coeffs.is_empty() {
            return Err(PolyError::EmptyPolynomial);
        }
        Ok(ReciprocalPoly { coeffs })
    }

    pub fn constant(one: Residue) -> Self {
        ReciprocalPoly { coeffs: vec![one] }
    }

    /// Degree `d`: the polynomial has `d + 1` coefficients.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeffs(&self) -> &[Residue] {
        &self.coeffs
    }

    pub fn into_coeffs(self) -> Vec<Residue> {
        self.coeffs
    }

    /// The degree-1 reciprocal factor `(x + 1/x) - s`, the building block
    /// [`crate::chebyshev::poly_from_roots`] folds into a product.
    pub fn linear_factor(neg_s: Residue, modulus: &Modulus) -> Self {
        ReciprocalPoly {
            coeffs: vec![neg_s, modulus.set_ui(1)],
        }
    }

    /// Multiplies two reciprocal polynomials, producing one of degree
    /// `self.degree() + other.degree()`.
    ///
    /// Uses the identity `(x^i + x^-i)(x^j + x^-j) = (x^{i+j} + x^{-(i+j)})
    /// + (x^{|i-j|} + x^{-|i-j|})`, doubling into the constant slot when
    /// `i == j` (that cross term collapses to `2`, not `1 + 1` at distinct
    /// positions). This is the direct `O(d_1 d_2)` convolution; callers
    /// folding a large set factor by doubling should prefer
    /// [`ReciprocalPoly::list_scale_v2`] instead, and callers multiplying
    /// large dense coefficient vectors should route through
    /// `ecm_stage2::convolution::ntt_convolve`.
    pub fn mul(&self, other: &Self, modulus: &Modulus) -> Self {
        let m = self.degree();
        let n = other.degree();
        let mut out: Vec<Residue> = (0..=m + n).map(|_| modulus.set_ui(0)).collect();

        out[0] = modulus.add(&out[0], &modulus.mul(&self.coeffs[0], &other.coeffs[0]));
        for j in 1..=n {
            out[j] = modulus.add(&out[j], &modulus.mul(&self.coeffs[0], &other.coeffs[j]));
        }
        for i in 1..=m {
            out[i] = modulus.add(&out[i], &modulus.mul(&self.coeffs[i], &other.coeffs[0]));
        }
        for i in 1..=m {
            for j in 1..=n {
                let term = modulus.mul(&self.coeffs[i], &other.coeffs[j]);
                let s = i + j;
                out[s] = modulus.add(&out[s], &term);
                if i == j {
                    let doubled = modulus.add(&term, &term);
                    out[0] = modulus.add(&out[0], &doubled);
                } else {
                    let d = i.abs_diff(j);
                    out[d] = modulus.add(&out[d], &term);
                }
            }
        }
        ReciprocalPoly { coeffs: out }
    }

    /// `self.mul(self, modulus)`, named separately because squaring is the
    /// hot path for doubling a product tree's leaves.
    pub fn sqr(&self, modulus: &Modulus) -> Self {
        self.mul(self, modulus)
    }

    /// Evaluates `F` at a point given only its trace `s = g + 1/g`, via the
    /// Chebyshev `V_k` recurrence (`x^k + x^-k = V_k(s)`), never touching
    /// `g` itself.
    pub fn evaluate_at_trace(&self, s: &Residue, modulus: &Modulus) -> Residue {
        crate::chebyshev::evaluate_reciprocal(&self.coeffs, s, modulus)
    }

    /// `R(x) = F(gamma*x) * F(x/gamma)`, given only `Q = gamma + 1/gamma`.
    ///
    /// Doubles the degree (`d` to `2d`) without ever materializing `gamma`:
    /// expanding both factors in the `V_k` basis and collecting like terms
    /// leaves every product `f_i f_j` landing on exactly one or two of
    /// `r[0], r[|i-j|], r[i+j]` via the Chebyshev product-to-sum identity
    /// `V_i(gamma) V_j(1/gamma)`-style pairing. [`crate::poly_from_sets_V`]
    /// calls this once per cardinality-2 set factor; a prime cardinality `q`
    /// factor folds `(q-1)/2` scaled copies of it instead of a single one.
    pub fn list_scale_v2(&self, q: &Residue, modulus: &Modulus) -> Self {
        let n = self.degree();
        let v = crate::chebyshev::chebyshev_v_sequence(2 * n as u64, q, modulus);
        let mut r: Vec<Residue> = (0..=2 * n).map(|_| modulus.set_ui(0)).collect();

        for i in 0..=n {
            for j in i..=n {
                let term = modulus.mul(&self.coeffs[i], &self.coeffs[j]);
                if i == 0 && j == 0 {
                    r[0] = modulus.add(&r[0], &term);
                } else if i == j {
                    r[0] = modulus.add(&r[0], &modulus.mul(&term, &v[2 * i]));
                    r[2 * i] = modulus.add(&r[2 * i], &term);
                } else if i == 0 {
                    r[j] = modulus.add(&r[j], &modulus.mul(&term, &v[j]));
                } else {
                    r[j - i] = modulus.add(&r[j - i], &modulus.mul(&term, &v[j + i]));
                    r[j + i] = modulus.add(&r[j + i], &modulus.mul(&term, &v[j - i]));
                }
            }
        }

        ReciprocalPoly { coeffs: r }
    }
}
