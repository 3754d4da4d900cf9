//! Helpers for finding NTT-friendly primes and primitive roots, used by the
//! CRT basis builder (`ecm-ntt`) when it needs primes `p ≡ 1 (mod max_ntt_size)`.
use crate::sp_int::{sp_pow, SpInt};

pub fn is_probable_prime(n: SpInt) -> bool {
    if n < 2 {
        return false;
    }
    for small in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31] {
        if n == small {
            return true;
        }
        if n % small == 0 {
            return false;
        }
    }
    miller_rabin(n)
}

fn miller_rabin(n: SpInt) -> bool {
    let mut d = n - 1;
    let mut r = 0u32;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }
    'witness: for &a in &[2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        if a >= n {
            continue;
        }
        let mut x = sp_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 0..r.saturating_sub(1) {
            x = crate::sp_int::sp_mul(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Finds a primitive root modulo the prime `p`, given `p`'s factored `p - 1`
/// as a list of distinct prime factors.
pub fn find_primitive_root(p: SpInt, order_factors: &[SpInt]) -> Option<SpInt> {
    let order = p - 1;
    'candidate: for g in 2..p {
        for &q in order_factors {
            if sp_pow(g, order / q, p) == 1 {
                continue 'candidate;
            }
        }
        return Some(g);
    }
    None
}

/// Trial-divides `n` into its distinct prime factors. `n` here is always
/// `p - 1` for a word-sized NTT prime `p`, so trial division up to `sqrt(n)`
/// is cheap relative to the NTT itself.
pub fn distinct_prime_factors(mut n: SpInt) -> Vec<SpInt> {
    let mut factors = Vec::new();
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            factors.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}
