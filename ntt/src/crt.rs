//! CRT basis over a family of NTT-friendly primes (`mpzspm` in the
//! reference). Builds enough primes `p_i ≡ 1 (mod max_ntt_size)` for their
//! product to exceed a working bound, then exposes explicit Bernstein–
//! Sorenson CRT reconstruction: each prime's contribution is a fixed
//! `BigUint` basis vector, precomputed once, so reconstructing an integer
//! from residues is a sum of products rather than a repeated `mod`.
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

use ecm_sp::primes::{distinct_prime_factors, find_primitive_root, is_probable_prime};
use ecm_sp::{sp_inv, SpInt};

use crate::error::NttError;
use crate::spm::SpModulus;

/// A CRT basis: a set of single-word NTT-friendly primes plus the explicit
/// reconstruction table needed to move between a `BigUint` and its vector
/// of residues.
#[derive(Clone, Debug)]
pub struct Mpzspm {
    primes: Vec<SpModulus>,
    modulus: BigUint,
    /// `crt1[i] = (M / p_i) * ((M / p_i)^-1 mod p_i) mod M`; reconstructing
    /// `x` is `sum_i residue_i * crt1[i] mod M`.
    crt1: Vec<BigUint>,
}

impl Mpzspm {
    /// Searches for primes `p ≡ 1 (mod max_ntt_size)` with a known
    /// primitive root, accumulating them until their product has at least
    /// `min_modulus_bits` bits.
    pub fn build(max_ntt_size: u64, min_modulus_bits: u64) -> Result<Self, NttError> {
        if max_ntt_size == 0 {
            return Err(NttError::PrimeSearchExhausted {
                bound: 0,
                max_ntt_size,
            });
        }
        let mut primes = Vec::new();
        let mut modulus = BigUint::one();

        // Start search one step above max_ntt_size so p > max_ntt_size.
        let mut candidate = max_ntt_size + 1;
        let search_bound = candidate.saturating_add(max_ntt_size.saturating_mul(1u64 << 20));

        while modulus.bits() < min_modulus_bits {
            if candidate > search_bound {
                return Err(NttError::PrimeSearchExhausted {
                    bound: candidate,
                    max_ntt_size,
                });
            }
            if is_probable_prime(candidate) && !primes.iter().any(|spm: &SpModulus| spm.p == candidate)
            {
                let factors = distinct_prime_factors(candidate - 1);
                if let Some(root) = find_primitive_root(candidate, &factors) {
                    let spm = SpModulus::new(candidate, root, max_ntt_size)?;
                    modulus *= BigUint::from(candidate);
                    primes.push(spm);
                }
            }
            candidate += max_ntt_size;
        }

        let crt1 = primes
            .iter()
            .map(|spm| {
                let p_big = BigUint::from(spm.p);
                let cofactor = &modulus / &p_big;
                let cofactor_mod_p = (&cofactor % &p_big)
                    .to_u64()
                    .expect("cofactor mod p fits in u64 since p fits in u64");
                let inv = sp_inv(cofactor_mod_p, spm.p)
                    .expect("M/p_i is invertible mod p_i by construction of the CRT basis");
                (&cofactor * BigUint::from(inv)) % &modulus
            })
            .collect();

        Ok(Mpzspm {
            primes,
            modulus,
            crt1,
        })
    }

    pub fn primes(&self) -> &[SpModulus] {
        &self.primes
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Residues of `x` modulo every prime in the basis, in basis order.
    pub fn from_integer(&self, x: &BigUint) -> Vec<SpInt> {
        self.primes
            .iter()
            .map(|spm| {
                (x % BigUint::from(spm.p))
                    .to_u64()
                    .expect("residue mod a u64 prime fits in u64")
            })
            .collect()
    }

    /// Reconstructs the unique `x mod modulus()` matching `residues`
    /// (unsigned, in `[0, modulus())`).
    pub fn to_integer(&self, residues: &[SpInt]) -> BigUint {
        debug_assert_eq!(residues.len(), self.primes.len());
        let mut acc = BigUint::zero();
        for (&r, basis) in residues.iter().zip(&self.crt1) {
            acc += basis * BigUint::from(r);
        }
        acc % &self.modulus
    }

    /// Centers an unsigned CRT reconstruction into `(-modulus/2, modulus/2]`,
    /// recovering the signed coefficient a stage-2 polynomial computation
    /// actually meant.
    pub fn normalise(&self, x: BigUint) -> BigInt {
        let half = &self.modulus >> 1u32;
        if x > half {
            BigInt::from(x) - BigInt::from(self.modulus.clone())
        } else {
            BigInt::from(x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_small_integer_through_crt_basis() {
        let basis = Mpzspm::build(4, 24).unwrap();
        assert!(basis.primes().len() >= 2);
        let x = BigUint::from(123456u64);
        let residues = basis.from_integer(&x);
        let back = basis.to_integer(&residues);
        assert_eq!(back, x % basis.modulus());
    }

    #[test]
    fn normalise_recovers_negative_coefficients() {
        let basis = Mpzspm::build(4, 24).unwrap();
        let neg = BigInt::from(-17i64);
        let wrapped = (&neg + BigInt::from(basis.modulus().clone())) % BigInt::from(basis.modulus().clone());
        let wrapped_u = wrapped.to_biguint().unwrap();
        let restored = basis.normalise(wrapped_u);
        assert_eq!(restored, neg);
    }

    #[test]
    fn all_basis_primes_satisfy_max_ntt_size_divisibility() {
        let basis = Mpzspm::build(8, 20).unwrap();
        for spm in basis.primes() {
            assert_eq!((spm.p - 1) % 8, 0);
        }
    }
}
