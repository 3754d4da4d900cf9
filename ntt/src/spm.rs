use ecm_sp::{sp_inv, sp_pow, sp_reciprocal, SpInt};

use crate::error::NttError;

/// An immutable small-prime NTT modulus: `p`, a primitive root of `p - 1`,
/// and everything derived from them that a transform of length up to
/// `max_ntt_size` will need repeatedly. Allocated once by the CRT basis
/// builder ([`crate::crt::Mpzspm`]) and shared read-only thereafter.
#[derive(Clone, Debug)]
pub struct SpModulus {
    pub p: SpInt,
    pub primitive_root: SpInt,
    pub primitive_root_inv: SpInt,
    /// The largest power-of-two-times-small-primes length this prime
    /// supports a transform of (divides `p - 1`).
    pub max_ntt_size: u64,
    /// `max_ntt_size`-th root of unity mod `p`.
    root_of_max_order: SpInt,
    root_of_max_order_inv: SpInt,
}

impl SpModulus {
    pub fn new(p: SpInt, primitive_root: SpInt, max_ntt_size: u64) -> Result<Self, NttError> {
        if (p - 1) % max_ntt_size != 0 {
            return Err(NttError::PrimeSearchExhausted {
                bound: p,
                max_ntt_size,
            });
        }
        let primitive_root_inv = sp_inv(primitive_root, p)
            .expect("primitive root is invertible mod p by construction");
        let root_of_max_order = sp_pow(primitive_root, (p - 1) / max_ntt_size, p);
        let root_of_max_order_inv = sp_inv(root_of_max_order, p)
            .expect("a root of unity is invertible mod p");
        Ok(SpModulus {
            p,
            primitive_root,
            primitive_root_inv,
            max_ntt_size,
            root_of_max_order,
            root_of_max_order_inv,
        })
    }

    /// A primitive `len`-th root of unity mod `p`. `len` must divide
    /// `max_ntt_size`.
    pub fn root_of_unity(&self, len: u64) -> SpInt {
        debug_assert_eq!(self.max_ntt_size % len, 0);
        sp_pow(self.root_of_max_order, self.max_ntt_size / len, self.p)
    }

    pub fn root_of_unity_inv(&self, len: u64) -> SpInt {
        debug_assert_eq!(self.max_ntt_size % len, 0);
        sp_pow(self.root_of_max_order_inv, self.max_ntt_size / len, self.p)
    }

    /// `len^-1 mod p`, used to scale an inverse transform's output.
    pub fn inv_len(&self, len: u64) -> SpInt {
        sp_inv(len % self.p, self.p).expect("transform length is coprime to p by construction")
    }

    /// Precomputes the generalized inverse for multiplying by `w` under
    /// this prime (see `ecm_sp::sp_reciprocal`).
    pub fn reciprocal_of(&self, w: SpInt) -> SpInt {
        sp_reciprocal(w % self.p, self.p)
    }
}
