//! Length factorization, pass ordering, and transform execution.
//!
//! The reference planner (`ntt_init_list`, `ntt_find_factors` in `ntt.c`)
//! walks a static table of supported codelet sizes, factors the requested
//! length over it, and prefers a coprime (prime-factor) split over a
//! Cooley–Tukey split with twiddles whenever one exists — a PFA pass needs
//! no twiddle multiplies at all, so it is strictly cheaper. [`Plan::build`]
//! makes the same choice and records it as a tree so repeated transforms of
//! the same length skip the factorization search.
use std::collections::HashMap;
use std::sync::Mutex;

use ecm_sp::sp_pow;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

use crate::codelet::Codelet;
use crate::error::NttError;
use crate::spm::SpModulus;

/// Sizes the codelet table knows how to build a direct DFT for. Mirrors the
/// reference's compiled-in codelet roster (`ntt2` .. `ntt16`, `ntt35`,
/// `ntt40`) without needing one hand-written kernel per entry.
pub const DIRECT_SIZES: &[usize] = &[2, 3, 4, 5, 7, 8, 9, 15, 16, 20, 24, 32, 35, 40];

fn largest_direct_divisor(len: usize) -> Option<usize> {
    DIRECT_SIZES
        .iter()
        .copied()
        .filter(|&s| s > 1 && len % s == 0)
        .max()
}

/// A recursive factorization of a transform length into direct codelets,
/// combined either by the prime-factor algorithm (no twiddles) or by
/// mixed-radix Cooley–Tukey (twiddles between stages).
#[derive(Clone, Debug)]
pub enum Plan {
    Direct(usize),
    Pfa(usize, Box<Plan>, usize, Box<Plan>),
    Twiddle(usize, Box<Plan>, usize, Box<Plan>),
}

impl Plan {
    pub fn len(&self) -> usize {
        match self {
            Plan::Direct(n) => *n,
            Plan::Pfa(n1, _, n2, _) | Plan::Twiddle(n1, _, n2, _) => n1 * n2,
        }
    }

    pub fn build(len: usize) -> Result<Plan, NttError> {
        if len == 1 {
            return Ok(Plan::Direct(1));
        }
        if DIRECT_SIZES.contains(&len) {
            return Ok(Plan::Direct(len));
        }
        // Prefer a coprime split (PFA, twiddle-free) when one exists.
        for &n1 in DIRECT_SIZES {
            if n1 == 1 || len % n1 != 0 {
                continue;
            }
            let n2 = len / n1;
            if n2 > 1 && gcd(n1 as u64, n2 as u64) == 1 {
                let p2 = Plan::build(n2)?;
                return Ok(Plan::Pfa(n1, Box::new(Plan::Direct(n1)), n2, Box::new(p2)));
            }
        }
        // Otherwise split off the largest codelet size that divides len and
        // recurse on the remainder via Cooley-Tukey.
        if let Some(n1) = largest_direct_divisor(len) {
            let n2 = len / n1;
            if n2 == 1 {
                return Ok(Plan::Direct(n1));
            }
            let p2 = Plan::build(n2)?;
            return Ok(Plan::Twiddle(n1, Box::new(Plan::Direct(n1)), n2, Box::new(p2)));
        }
        Err(NttError::UnsupportedLength(len as u64))
    }
}

/// Symmetric CRT reconstruction: returns the unique `x mod (na*nb)` with
/// `x ≡ a (mod na)` and `x ≡ b (mod nb)`, given the precomputed inverses
/// `nb_inv_mod_na = nb^-1 mod na` and `na_inv_mod_nb = na^-1 mod nb`.
/// Invariant under swapping `(a, na, nb_inv_mod_na)` with
/// `(b, nb, na_inv_mod_nb)`, which is what lets both factors of a PFA pair
/// address the same physical slot independently.
pub fn crt_index(
    a: usize,
    na: usize,
    nb_inv_mod_na: u64,
    b: usize,
    nb: usize,
    na_inv_mod_nb: u64,
    n: usize,
) -> usize {
    let n = n as u128;
    let term1 = (a as u128 * nb as u128 % n) * nb_inv_mod_na as u128 % n;
    let term2 = (b as u128 * na as u128 % n) * na_inv_mod_nb as u128 % n;
    ((term1 + term2) % n) as usize
}

/// Caches a [`Codelet`] per `(size, p)` and a [`Plan`] per `(len, p)`, so
/// repeated transforms of the same length against the same CRT prime only
/// pay the factorization/table-build cost once.
#[derive(Default)]
pub struct Planner {
    codelets: Mutex<HashMap<(usize, u64), Codelet>>,
    plans: Mutex<HashMap<(usize, u64), Plan>>,
}

impl Planner {
    pub fn new() -> Self {
        Planner {
            codelets: Mutex::new(HashMap::new()),
            plans: Mutex::new(HashMap::new()),
        }
    }

    fn codelet(&self, size: usize, spm: &SpModulus) -> Codelet {
        let mut cache = self.codelets.lock().expect("codelet cache poisoned");
        cache
            .entry((size, spm.p))
            .or_insert_with(|| Codelet::init(size, spm))
            .clone()
    }

    fn plan(&self, len: usize, spm: &SpModulus) -> Result<Plan, NttError> {
        let mut cache = self.plans.lock().expect("plan cache poisoned");
        if let Some(p) = cache.get(&(len, spm.p)) {
            return Ok(p.clone());
        }
        let plan = Plan::build(len)?;
        cache.insert((len, spm.p), plan.clone());
        Ok(plan)
    }

    /// Forward transform of `x` (length must equal `x.len()`), in place.
    pub fn forward(&self, x: &mut [u64], spm: &SpModulus) -> Result<(), NttError> {
        let plan = self.plan(x.len(), spm)?;
        self.execute(&plan, x, spm, false);
        Ok(())
    }

    /// Inverse transform, left unscaled by `1/len`; the caller applies
    /// [`SpModulus::inv_len`] once after combining CRT primes.
    pub fn inverse(&self, x: &mut [u64], spm: &SpModulus) -> Result<(), NttError> {
        let plan = self.plan(x.len(), spm)?;
        self.execute(&plan, x, spm, true);
        Ok(())
    }

    fn execute(&self, plan: &Plan, x: &mut [u64], spm: &SpModulus, inverse: bool) {
        match plan {
            Plan::Direct(size) => {
                let codelet = self.codelet(*size, spm);
                if inverse {
                    codelet.run_inverse(x, spm);
                } else {
                    codelet.run(x, spm);
                }
            }
            Plan::Pfa(n1, _, n2, _) => {
                let c1 = self.codelet(*n1, spm);
                let c2 = self.codelet(*n2, spm);
                // Both factors address the shared array via the same
                // symmetric `crt_index`, so either order is correct. `n2`
                // may itself be a smooth composite that `Plan::build`
                // recursed into when searching for a valid factorization,
                // but a direct codelet of any size is a correct (if
                // quadratic) DFT, so executing it as one flat `Codelet`
                // rather than recursing through `sub2` trades asymptotic
                // cost for simplicity here.
                if inverse {
                    run_pfa_inverse(&c1, *n1, &c2, *n2, x, spm);
                } else {
                    c1.pfa_run(x, *n2, spm);
                    c2.pfa_run(x, *n1, spm);
                }
            }
            Plan::Twiddle(n1, sub1, n2, sub2) => {
                mixed_radix(self, *n1, sub1, *n2, sub2, x, spm, inverse);
            }
        }
    }
}

fn run_pfa_inverse(c1: &Codelet, n1: usize, c2: &Codelet, n2: usize, x: &mut [u64], spm: &SpModulus) {
    pfa_run_inverse(c1, x, n2, spm);
    pfa_run_inverse(c2, x, n1, spm);
}

fn pfa_run_inverse(codelet: &Codelet, x: &mut [u64], cofactor: usize, spm: &SpModulus) {
    let n_c = codelet.size;
    let n = n_c * cofactor;
    if cofactor == 1 {
        codelet.run_inverse(x, spm);
        return;
    }
    let nc_u64 = n_c as u64;
    let co_u64 = cofactor as u64;
    let nb_inv_mod_na = ecm_sp::sp_inv(co_u64 % nc_u64, nc_u64).expect("coprime by construction");
    let na_inv_mod_nb = ecm_sp::sp_inv(nc_u64 % co_u64, co_u64).expect("coprime by construction");
    let mut scratch = vec![0u64; n_c];
    for g in 0..cofactor {
        for i in 0..n_c {
            scratch[i] = x[crt_index(i, n_c, nb_inv_mod_na, g, cofactor, na_inv_mod_nb, n)];
        }
        codelet.run_inverse(&mut scratch, spm);
        for i in 0..n_c {
            x[crt_index(i, n_c, nb_inv_mod_na, g, cofactor, na_inv_mod_nb, n)] = scratch[i];
        }
    }
}

/// Recursive Cooley–Tukey: `x` viewed as an `n1 x n2` row-major matrix,
/// transform rows (length `n2`), multiply by `w_n^{row*col}`, transform
/// columns (length `n1`), then un-transpose into the canonical
/// `k1 + n1*k2` output order.
#[allow(clippy::too_many_arguments)]
fn mixed_radix(
    planner: &Planner,
    n1: usize,
    sub1: &Plan,
    n2: usize,
    sub2: &Plan,
    x: &mut [u64],
    spm: &SpModulus,
    inverse: bool,
) {
    let n = n1 * n2;
    debug_assert_eq!(x.len(), n);

    for row in 0..n1 {
        let slice = &mut x[row * n2..row * n2 + n2];
        planner.execute(sub2, slice, spm, inverse);
    }

    let w = if inverse {
        spm.root_of_unity_inv(n as u64)
    } else {
        spm.root_of_unity(n as u64)
    };
    for row in 0..n1 {
        for col in 0..n2 {
            if row == 0 || col == 0 {
                continue;
            }
            let e = ((row * col) % n) as u64;
            let t = sp_pow(w, e, spm.p);
            let t_inv = spm.reciprocal_of(t);
            let idx = row * n2 + col;
            x[idx] = ecm_sp::sp_ntt_mul(x[idx], t, t_inv, spm.p);
        }
    }

    let mut scratch = vec![0u64; n1];
    for col in 0..n2 {
        for (row, slot) in scratch.iter_mut().enumerate() {
            *slot = x[row * n2 + col];
        }
        planner.execute(sub1, &mut scratch, spm, inverse);
        for (row, &v) in scratch.iter().enumerate() {
            x[row * n2 + col] = v;
        }
    }

    let mut out = vec![0u64; n];
    for row in 0..n1 {
        for col in 0..n2 {
            out[row + n1 * col] = x[row * n2 + col];
        }
    }
    x.copy_from_slice(&out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecm_sp::primes::{distinct_prime_factors, find_primitive_root};

    fn spm_for(p: u64, max_ntt_size: u64) -> SpModulus {
        let factors = distinct_prime_factors(p - 1);
        let g = find_primitive_root(p, &factors).unwrap();
        SpModulus::new(p, g, max_ntt_size).unwrap()
    }

    fn naive_dft(x: &[u64], w: u64, p: u64) -> Vec<u64> {
        let n = x.len();
        (0..n)
            .map(|k| {
                (0..n).fold(0u64, |acc, j| {
                    (acc + x[j] * sp_pow(w, (k * j % n) as u64, p) % p) % p
                })
            })
            .collect()
    }

    #[test]
    fn plan_prefers_pfa_for_coprime_length() {
        let plan = Plan::build(15).unwrap();
        assert!(matches!(plan, Plan::Pfa(..)));
    }

    #[test]
    fn plan_falls_back_to_twiddle_for_power_of_two_beyond_direct_table() {
        // 64 = 32 * 2, both in DIRECT_SIZES but not coprime -> Cooley-Tukey.
        let plan = Plan::build(64).unwrap();
        assert!(matches!(plan, Plan::Twiddle(..)));
    }

    #[test]
    fn forward_transform_of_composite_length_matches_naive_dft() {
        let p = 241u64; // p - 1 = 240 = 16 * 15
        let spm = spm_for(p, 240);
        let planner = Planner::new();
        let mut x: Vec<u64> = (1..=16).collect();
        let original = x.clone();
        planner.forward(&mut x, &spm).unwrap();
        let w = spm.root_of_unity(16);
        assert_eq!(x, naive_dft(&original, w, p));
    }

    #[test]
    fn forward_then_inverse_recovers_input() {
        let p = 241u64;
        let spm = spm_for(p, 240);
        let planner = Planner::new();
        let original: Vec<u64> = (0..16).map(|i| (i * 7 + 3) % p).collect();
        let mut x = original.clone();
        planner.forward(&mut x, &spm).unwrap();
        planner.inverse(&mut x, &spm).unwrap();
        let inv_len = spm.inv_len(16);
        for v in x.iter_mut() {
            *v = *v * inv_len % p;
        }
        assert_eq!(x, original);
    }

    #[test]
    fn pfa_length_forward_then_inverse_recovers_input() {
        let p = 31u64; // p - 1 = 30, supports length 15 = 3*5
        let spm = spm_for(p, 30);
        let planner = Planner::new();
        let original: Vec<u64> = (0..15).map(|i| (i * 3 + 1) % p).collect();
        let mut x = original.clone();
        planner.forward(&mut x, &spm).unwrap();
        planner.inverse(&mut x, &spm).unwrap();
        let inv_len = spm.inv_len(15);
        for v in x.iter_mut() {
            *v = *v * inv_len % p;
        }
        assert_eq!(x, original);
    }

    #[test]
    fn unsupported_length_reports_error() {
        // 11 is prime and not in DIRECT_SIZES, has no coprime direct split.
        assert!(matches!(Plan::build(11), Err(NttError::UnsupportedLength(11))));
    }
}
