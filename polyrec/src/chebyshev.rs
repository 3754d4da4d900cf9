//! Chebyshev-recurrence helpers: generating `x^k + x^-k` from a trace
//! `s = x + 1/x` without ever computing `x` itself, which is what lets
//! stage 2 build and evaluate `F` using only the *sums* `g_i + 1/g_i` of its
//! generator points.
use ecm_bigint::{Modulus, Residue};

use crate::reciprocal::ReciprocalPoly;

/// `V_k(s)` where `V_0 = 2`, `V_1 = s`, `V_{k+1} = s*V_k - V_{k-1}`; this is
/// exactly `x^k + x^-k` when `s = x + 1/x`.
pub fn chebyshev_v(k: u64, s: &Residue, modulus: &Modulus) -> Residue {
    if k == 0 {
        return modulus.set_ui(2);
    }
    if k == 1 {
        return s.clone();
    }
    let mut v_prev = modulus.set_ui(2); // V_0
    let mut v_curr = s.clone(); // V_1
    for _ in 2..=k {
        let next = modulus.sub(&modulus.mul(s, &v_curr), &v_prev);
        v_prev = v_curr;
        v_curr = next;
    }
    v_curr
}

/// `[V_0(s), V_1(s), ..., V_max_k(s)]`, built with the same recurrence as
/// [`chebyshev_v`] but in one pass instead of `O(max_k)` restarts.
pub fn chebyshev_v_sequence(max_k: u64, s: &Residue, modulus: &Modulus) -> Vec<Residue> {
    let mut seq = Vec::with_capacity(max_k as usize + 1);
    seq.push(modulus.set_ui(2));
    if max_k == 0 {
        return seq;
    }
    seq.push(s.clone());
    for k in 2..=max_k {
        let next = modulus.sub(&modulus.mul(s, &seq[(k - 1) as usize]), &seq[(k - 2) as usize]);
        seq.push(next);
    }
    seq
}

/// `F(s) = f_0 + sum_{i=1}^{d} f_i * V_i(s)`.
pub fn evaluate_reciprocal(coeffs: &[Residue], s: &Residue, modulus: &Modulus) -> Residue {
    let d = coeffs.len() - 1;
    let v = chebyshev_v_sequence(d as u64, s, modulus);
    let mut acc = coeffs[0].clone();
    for i in 1..=d {
        acc = modulus.add(&acc, &modulus.mul(&coeffs[i], &v[i]));
    }
    acc
}

/// Builds the reciprocal polynomial `F(x) = prod_i ((x + 1/x) - s_i)` whose
/// roots are the points with trace `s_i`, via a balanced product tree
/// (`O(n log^2 n)` coefficient multiplications instead of `O(n^2)` for the
/// naive incremental product).
pub fn poly_from_traces(traces: &[Residue], modulus: &Modulus) -> ReciprocalPoly {
    assert!(!traces.is_empty(), "poly_from_traces requires at least one point");
    build_tree(traces, modulus)
}

fn build_tree(traces: &[Residue], modulus: &Modulus) -> ReciprocalPoly {
    if traces.len() == 1 {
        let neg_s = modulus.neg(&traces[0]);
        return ReciprocalPoly::linear_factor(neg_s, modulus);
    }
    let mid = traces.len() / 2;
    let left = build_tree(&traces[..mid], modulus);
    let right = build_tree(&traces[mid..], modulus);
    left.mul(&right, modulus)
}

/// Builds `F` from a factored cardinality list instead of a flat trace
/// array, folding set factors in order of increasing cardinality.
///
/// `base_trace` is the trace of the smallest step unit (`g^2` for the
/// elliptic-curve path); `cardinalities` is the set's cardinality
/// factorization, smallest first (e.g. `[2, 2, 3]` for a 12-element set).
/// The degree of the returned polynomial is the product of `cardinalities`.
///
/// The first (smallest) factor seeds `F` directly as `prod_{k=1}^{q}
/// ((x+1/x) - V_k(base_trace))`. Every later factor folds onto the
/// polynomial built so far at the step size accumulated up to that point:
/// a cardinality-2 factor doubles the degree via
/// [`ReciprocalPoly::list_scale_v2`]; a prime cardinality `q` factor
/// multiplies in `(q - 1) / 2` scaled copies of the *pre-fold* polynomial
/// (the `r = 0` shift is the pre-fold polynomial itself, left untouched).
pub fn poly_from_sets_v(base_trace: &Residue, cardinalities: &[usize], modulus: &Modulus) -> ReciprocalPoly {
    assert!(!cardinalities.is_empty(), "poly_from_sets_v requires at least one cardinality");

    let mut cards = cardinalities.to_vec();
    cards.sort_unstable();

    let q0 = cards[0] as u64;
    let v0 = chebyshev_v_sequence(q0, base_trace, modulus);
    let seed_traces: Vec<Residue> = (1..=q0 as usize).map(|k| v0[k].clone()).collect();
    let mut f = poly_from_traces(&seed_traces, modulus);
    let mut m = q0;

    for &q in &cards[1..] {
        let q_level = chebyshev_v(m, base_trace, modulus);
        if q == 2 {
            f = f.list_scale_v2(&q_level, modulus);
        } else {
            let half = (q - 1) / 2;
            let before = f.clone();
            let mut acc = before.clone();
            for r in 1..=half as u64 {
                let qr = chebyshev_v(r, &q_level, modulus);
                let scaled = before.list_scale_v2(&qr, modulus);
                acc = acc.mul(&scaled, modulus);
            }
            f = acc;
        }
        m *= q as u64;
    }

    f
}
