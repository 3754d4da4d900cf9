//! Vector (multi-lane) small-prime arithmetic.
//!
//! Each lane carries exactly the scalar contract from [`crate::sp_int`]: no
//! lane observes another lane's value. This crate ships the portable
//! lane-wise fallback; a platform build that enables `target_feature =
//! "avx2"`/`"neon"` can swap the method bodies for real vector instructions
//! without changing the type or its call sites — the planner selects
//! between them purely via [`Backend`], never via `cfg` scattered through
//! codelet code.
use crate::sp_int::{sp_add, sp_ntt_mul, sp_sub, SpInt};

/// The capability a [`crate::reduction::ReductionMode`] is paired with at
/// NTT-context construction. The planner picks `Simd` only when the
/// requested lane width evenly divides the codelet's natural access
/// pattern; otherwise it falls back to `Scalar`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    Scalar,
    /// Two 64-bit lanes processed together.
    Simd2,
    /// Four 32-bit-range lanes processed together (values still stored as
    /// `u64` for uniformity with the scalar path; only the prime's bit
    /// width is constrained to 32 bits for this backend to be legal).
    Simd4,
}

/// Two lanes of small-prime residues, operated on together.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Simd2(pub [SpInt; 2]);

impl Simd2 {
    pub fn splat(p: SpInt) -> Self {
        Simd2([p, p])
    }

    pub fn add(self, other: Simd2, p: SpInt) -> Simd2 {
        Simd2([
            sp_add(self.0[0], other.0[0], p),
            sp_add(self.0[1], other.0[1], p),
        ])
    }

    pub fn sub(self, other: Simd2, p: SpInt) -> Simd2 {
        Simd2([
            sp_sub(self.0[0], other.0[0], p),
            sp_sub(self.0[1], other.0[1], p),
        ])
    }

    pub fn ntt_mul(self, w: Simd2, w_inv: Simd2, p: SpInt) -> Simd2 {
        Simd2([
            sp_ntt_mul(self.0[0], w.0[0], w_inv.0[0], p),
            sp_ntt_mul(self.0[1], w.0[1], w_inv.0[1], p),
        ])
    }
}

/// Four lanes, for primes narrow enough that a 32-bit-range SIMD backend
/// applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Simd4(pub [SpInt; 4]);

impl Simd4 {
    pub fn add(self, other: Simd4, p: SpInt) -> Simd4 {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = sp_add(self.0[i], other.0[i], p);
        }
        Simd4(out)
    }

    pub fn sub(self, other: Simd4, p: SpInt) -> Simd4 {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = sp_sub(self.0[i], other.0[i], p);
        }
        Simd4(out)
    }

    pub fn ntt_mul(self, w: Simd4, w_inv: Simd4, p: SpInt) -> Simd4 {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = sp_ntt_mul(self.0[i], w.0[i], w_inv.0[i], p);
        }
        Simd4(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simd2_matches_scalar() {
        let p = 0xFFFF_FFFF_0000_0001u64;
        let a = Simd2([10, 20]);
        let b = Simd2([5, p - 1]);
        let sum = a.add(b, p);
        assert_eq!(sum.0[0], sp_add(10, 5, p));
        assert_eq!(sum.0[1], sp_add(20, p - 1, p));
    }

    #[test]
    fn simd4_matches_scalar() {
        let p = 97u64;
        let a = Simd4([1, 2, 3, 4]);
        let b = Simd4([90, 91, 92, 93]);
        let sum = a.add(b, p);
        for i in 0..4 {
            assert_eq!(sum.0[i], sp_add(a.0[i], b.0[i], p));
        }
    }
}
