//! Dense polynomial convolution over the CRT basis from `ecm-ntt`: the
//! "evaluate the whole batch of giant steps via one NTT convolution" path
//! that the direct per-point Chebyshev evaluation in
//! [`crate::poly_build`] is the simpler alternative to.
//!
//! This is a genuine zero-padded linear convolution, not the reference's
//! chirp-transform construction of the evaluation points themselves — it
//! multiplies two already-built dense coefficient vectors under a single
//! CRT basis wide enough that no modular reduction during the transform
//! loses information, then reconstructs and centers the result.
use num_bigint::BigUint;
use num_integer::Integer as _;

use ecm_bigint::{Modulus, Residue};
use ecm_ntt::{Mpzspm, Planner};
use ecm_poly::ReciprocalPoly;

use crate::error::Stage2Error;

/// The linear convolution of `a` and `b`, each coefficients taken as
/// nonnegative integers less than `modulus`, reduced mod `modulus` at the
/// end. The result has `a.len() + b.len() - 1` coefficients.
pub fn ntt_convolve(a: &[BigUint], b: &[BigUint], modulus: &BigUint) -> Result<Vec<BigUint>, Stage2Error> {
    if a.is_empty() || b.is_empty() {
        return Err(Stage2Error::EmptyEvaluationSet);
    }
    let out_len = a.len() + b.len() - 1;
    let transform_len = out_len.next_power_of_two() as u64;

    // Every output coefficient is a sum of at most min(a.len(), b.len())
    // products of values < modulus; the CRT basis must be wide enough to
    // recover that sum exactly before any reduction mod `modulus`.
    let max_terms = a.len().min(b.len()) as u64;
    let term_count_bits = 64 - max_terms.max(1).leading_zeros() as u64;
    let min_modulus_bits = 2 * modulus.bits() + term_count_bits + 2;

    let basis = Mpzspm::build(transform_len, min_modulus_bits)?;
    let planner = Planner::new();

    // Every CRT prime's forward/pointwise/inverse pass is independent of
    // every other prime's, so this is exactly the disjoint-subslice shape
    // `parallel_map` is for.
    let per_prime_results: Vec<Vec<u64>> = crate::concurrency::parallel_map(basis.primes(), |spm| -> Result<Vec<u64>, Stage2Error> {
        let mut fa = pad_residues(a, spm.p, transform_len as usize);
        let mut fb = pad_residues(b, spm.p, transform_len as usize);
        planner.forward(&mut fa, spm)?;
        planner.forward(&mut fb, spm)?;
        for i in 0..fa.len() {
            fa[i] = ((fa[i] as u128 * fb[i] as u128) % spm.p as u128) as u64;
        }
        planner.inverse(&mut fa, spm)?;
        let inv_len = spm.inv_len(transform_len);
        for v in fa.iter_mut() {
            *v = ((*v as u128 * inv_len as u128) % spm.p as u128) as u64;
        }
        Ok(fa)
    })
    .into_iter()
    .collect::<Result<Vec<_>, Stage2Error>>()?;

    let mut result = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let residues: Vec<u64> = per_prime_results.iter().map(|r| r[i]).collect();
        let reconstructed = basis.to_integer(&residues);
        let centered = basis.normalise(reconstructed);
        let reduced = centered.mod_floor(&num_bigint::BigInt::from(modulus.clone()));
        let (_, mag) = reduced.into_parts();
        result.push(mag);
    }
    Ok(result)
}

/// Evaluates `f` at every trace in `points` in one pass instead of one
/// Chebyshev evaluation per point: expands `f` into an ordinary (monomial)
/// polynomial `D(s)` in the trace variable, reduces it modulo the monic
/// product `M(s) = prod_l (s - points[l])` (built via [`ntt_convolve`] so
/// the pairwise merges in its product tree get the same CRT-basis
/// treatment as any other wide multiplication here), then reads each
/// `f(points[l])` straight off the remainder `R` (degree `< points.len()`)
/// via Horner — since `M` vanishes at every `points[l]`, `R(points[l]) ==
/// D(points[l]) == f(points[l])`. Pays for the product tree and one
/// division once, rather than `O(deg(f))` work per evaluation point; a
/// real win whenever `f`'s degree is large next to `points.len()`, which is
/// the usual stage-2 shape (`s_1 >> s_2`).
pub fn batch_evaluate(f: &ReciprocalPoly, points: &[Residue], modulus: &Modulus) -> Result<Vec<Residue>, Stage2Error> {
    if points.is_empty() {
        return Err(Stage2Error::EmptyEvaluationSet);
    }
    let dense = monomial_coeffs(f, modulus);
    let divisor = monic_product_tree(points, modulus)?;
    let remainder = poly_rem_monic(&dense, &divisor, modulus);
    Ok(points.iter().map(|s| horner_eval(&remainder, s, modulus)).collect())
}

/// `f`, expressed as an ordinary polynomial `D(s) = f_0 + sum_{i=1}^{d}
/// f_i * V_i(s)` in the trace variable `s` instead of the Chebyshev `V_k`
/// basis: the same `V_k = s*V_{k-1} - V_{k-2}` recurrence
/// [`ecm_poly::chebyshev_v_sequence`] runs at a fixed `s`, carried here
/// symbolically on coefficient vectors instead.
fn monomial_coeffs(f: &ReciprocalPoly, modulus: &Modulus) -> Vec<Residue> {
    let coeffs = f.coeffs();
    let d = f.degree();
    let mut acc = vec![modulus.set_ui(0); d + 1];
    acc[0] = coeffs[0].clone();

    if d == 0 {
        return acc;
    }
    let mut v_prev = vec![modulus.set_ui(2)]; // V_0 = 2
    let mut v_curr = vec![modulus.set_ui(0), modulus.set_ui(1)]; // V_1 = s
    add_scaled(&mut acc, &v_curr, &coeffs[1], modulus);

    for k in 2..=d {
        let mut next = vec![modulus.set_ui(0); k + 1];
        for (i, c) in v_curr.iter().enumerate() {
            next[i + 1] = modulus.add(&next[i + 1], c);
        }
        for (i, c) in v_prev.iter().enumerate() {
            next[i] = modulus.sub(&next[i], c);
        }
        add_scaled(&mut acc, &next, &coeffs[k], modulus);
        v_prev = v_curr;
        v_curr = next;
    }
    acc
}

fn add_scaled(acc: &mut [Residue], poly: &[Residue], scale: &Residue, modulus: &Modulus) {
    for (a, p) in acc.iter_mut().zip(poly) {
        *a = modulus.add(a, &modulus.mul(p, scale));
    }
}

/// `prod_l (s - roots[l])`, monic, via a balanced merge so the pairwise
/// multiplications stay wide rather than incrementally growing one factor
/// at a time.
fn monic_product_tree(roots: &[Residue], modulus: &Modulus) -> Result<Vec<Residue>, Stage2Error> {
    if roots.len() == 1 {
        return Ok(vec![modulus.neg(&roots[0]), modulus.set_ui(1)]);
    }
    let mid = roots.len() / 2;
    let left = monic_product_tree(&roots[..mid], modulus)?;
    let right = monic_product_tree(&roots[mid..], modulus)?;
    poly_mul_via_ntt(&left, &right, modulus)
}

fn poly_mul_via_ntt(a: &[Residue], b: &[Residue], modulus: &Modulus) -> Result<Vec<Residue>, Stage2Error> {
    let a_int: Vec<BigUint> = a.iter().map(|c| modulus.get_integer(c)).collect();
    let b_int: Vec<BigUint> = b.iter().map(|c| modulus.get_integer(c)).collect();
    let product = ntt_convolve(&a_int, &b_int, modulus.n())?;
    Ok(product.iter().map(|v| modulus.residue_from_integer(v)).collect())
}

/// `dividend mod divisor`, via schoolbook long division. `divisor` is
/// always monic here ([`monic_product_tree`]'s only output), so the usual
/// division-by-leading-coefficient step is just a subtraction — no modular
/// inverse, and so no factor-surfacing path, is needed.
fn poly_rem_monic(dividend: &[Residue], divisor: &[Residue], modulus: &Modulus) -> Vec<Residue> {
    let mut remainder = dividend.to_vec();
    let divisor_degree = divisor.len() - 1;
    while remainder.len() > divisor_degree {
        let top = remainder.len() - 1;
        let coeff = remainder[top].clone();
        if !modulus.is_zero(&coeff) {
            let shift = top - divisor_degree;
            for (i, d) in divisor.iter().enumerate() {
                let idx = shift + i;
                remainder[idx] = modulus.sub(&remainder[idx], &modulus.mul(&coeff, d));
            }
        }
        remainder.pop();
    }
    remainder
}

fn horner_eval(coeffs: &[Residue], s: &Residue, modulus: &Modulus) -> Residue {
    let mut acc = coeffs[coeffs.len() - 1].clone();
    for c in coeffs[..coeffs.len() - 1].iter().rev() {
        acc = modulus.add(&modulus.mul(&acc, s), c);
    }
    acc
}

fn pad_residues(values: &[BigUint], p: u64, len: usize) -> Vec<u64> {
    let mut out = vec![0u64; len];
    for (i, v) in values.iter().enumerate() {
        out[i] = (v % BigUint::from(p)).iter_u64_digits().next().unwrap_or(0);
    }
    out
}
