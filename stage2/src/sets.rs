//! Factored exponent sets.
//!
//! A stage-2 round needs one set of "baby steps": residues coprime to `P`
//! in `[1, P/2]`. The other half of `P`'s reduced residue system is their
//! negation, already covered for free by the reciprocal-polynomial basis
//! (symmetric under `x <-> 1/x`), which is exactly why `s_1 = eulerphi(P)
//! / 2` is enough. [`sumset`] additionally provides the general
//! Minkowski-sum combinator used wherever a larger exponent set is
//! assembled from smaller independent pieces.
use num_integer::Integer;

use crate::error::Stage2Error;

/// A sorted list of signed integers.
pub type Set = Vec<i64>;

/// A sequence of sets.
pub type SetList = Vec<Set>;

/// The Minkowski sum of a list of sets: every distinct value obtainable by
/// picking one element from each set and adding them, sorted and
/// deduplicated.
pub fn sumset(sets: &[Set]) -> Set {
    let mut acc = vec![0i64];
    for set in sets {
        let mut next = Vec::with_capacity(acc.len() * set.len());
        for &a in &acc {
            for &b in set {
                next.push(a + b);
            }
        }
        next.sort_unstable();
        next.dedup();
        acc = next;
    }
    acc
}

/// Every integer in `[1, p - 1]` coprime to `p`, in increasing order —
/// cardinality `eulerphi(p)`.
pub fn full_coprime_residues(p: u64) -> Vec<u64> {
    (1..p).filter(|&r| r.gcd(&p) == 1).collect()
}

/// Every integer in `[1, p / 2]` coprime to `p`, in increasing order —
/// cardinality `eulerphi(p) / 2`. Each element `k` here and its negation
/// `-k` (covered implicitly by the reciprocal-polynomial basis) together
/// span `p`'s full reduced residue system.
pub fn half_coprime_residues(p: u64) -> Vec<u64> {
    full_coprime_residues(p).into_iter().filter(|&r| 2 * r <= p).collect()
}

/// The prime factorization of `n`, with multiplicity, smallest factor
/// first — the cardinality list [`ecm_poly::poly_from_sets_v`] folds in
/// order, and the shape [`crate::poly_build::build_f`] hands it `n =
/// baby_steps.len()` to recover.
pub fn prime_factorization(mut n: usize) -> Vec<usize> {
    let mut factors = Vec::new();
    let mut d = 2usize;
    while d * d <= n {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
        d += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// The baby-step set for a [`crate::params::Stage2Params`] with totient
/// `2 * s1`: [`half_coprime_residues`], validated to have exactly `s1`
/// elements.
pub fn baby_step_residues(p: u64, s1: usize) -> Result<Set, Stage2Error> {
    let residues = half_coprime_residues(p);
    if residues.len() != s1 {
        return Err(Stage2Error::SetCardinalityUnreachable {
            requested: s1,
            available: residues.len(),
        });
    }
    Ok(residues.into_iter().map(|r| r as i64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sumset_is_the_minkowski_sum() {
        let a: Set = vec![0, 1];
        let b: Set = vec![0, 2];
        assert_eq!(sumset(&[a, b]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn sumset_deduplicates_coincident_sums() {
        let a: Set = vec![-1, 1];
        let b: Set = vec![-1, 1];
        assert_eq!(sumset(&[a, b]), vec![-2, 0, 2]);
    }

    #[test]
    fn full_coprime_residues_of_210_has_eulerphi_many_elements() {
        let residues = full_coprime_residues(210);
        assert_eq!(residues.len(), 48);
        assert_eq!(residues[0], 1);
        assert!(residues.iter().all(|&r| r.gcd(&210) == 1));
    }

    #[test]
    fn half_coprime_residues_is_exactly_half_of_full() {
        let half = half_coprime_residues(210);
        assert_eq!(half.len(), 24);
        assert!(half.iter().all(|&r| 2 * r <= 210));
    }

    #[test]
    fn baby_step_residues_matches_requested_cardinality() {
        let s1 = baby_step_residues(210, 24).unwrap();
        assert_eq!(s1.len(), 24);
        assert_eq!(s1[0], 1);
    }

    #[test]
    fn baby_step_residues_rejects_mismatched_cardinality() {
        let err = baby_step_residues(210, 23).unwrap_err();
        assert!(matches!(err, Stage2Error::SetCardinalityUnreachable { .. }));
    }

    #[test]
    fn prime_factorization_multiplies_back_to_n() {
        for n in [1usize, 2, 12, 17, 24, 210] {
            let factors = prime_factorization(n);
            assert_eq!(factors.iter().product::<usize>(), n);
            assert!(factors.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn prime_factorization_of_one_is_empty() {
        assert!(prime_factorization(1).is_empty());
    }
}
