//! Size-specific DFT codelets.
//!
//! The reference implementation hand-unrolls one source file per
//! transform size (`ntt3.c`, `ntt5.c`, `ntt7.c`, ...), each a compile-time
//! specialized direct DFT. Here a single [`Codelet`] value *is* the
//! size-specific kernel: it is built once per `(size, prime)` pair by
//! [`Codelet::init`], which plays the role the reference gives to each
//! codelet's own `nttdata_init_t` — computing the `size × size` table of
//! `w^{ij}` powers used by every subsequent `run`/`pfa_run` call over that
//! prime. Supported sizes are deliberately small (the planner only ever
//! asks for bases that keep this table tiny): 2, 3, 4, 5, 7, 8, 9, 15, 16,
//! and any other size the planner's factorization names.
use ecm_sp::simd::{Backend, Simd2, Simd4};
use ecm_sp::{sp_add, sp_inv, sp_ntt_mul, sp_pow, SpInt};

use crate::planner::crt_index;
use crate::spm::SpModulus;

/// A direct DFT kernel of a fixed small size over one [`SpModulus`].
#[derive(Clone, Debug)]
pub struct Codelet {
    pub size: usize,
    /// `twiddles[k * size + n] = w^{k*n mod size}`, `w` a primitive
    /// `size`-th root of unity mod `p`.
    twiddles: Vec<SpInt>,
    twiddles_inv: Vec<SpInt>,
    /// Same table built from `w^-1`, used by [`Self::run_inverse`].
    twiddles_conj: Vec<SpInt>,
    twiddles_conj_inv: Vec<SpInt>,
    p: SpInt,
    /// Picked once at construction from `size` and `p`'s bit width, never
    /// from a `cfg`: `Simd4` needs a 4-way-divisible output count and a
    /// prime narrow enough for the 32-bit-range lane contract, `Simd2`
    /// only needs an even output count.
    backend: Backend,
}

impl Codelet {
    /// `init(p, primroot, order)` in the spec's terms: `spm` already carries
    /// `p` and the primitive root, so `Codelet::init` only needs the
    /// requested `size`.
    pub fn init(size: usize, spm: &SpModulus) -> Self {
        assert!(size >= 1);
        let w = if size == 1 { 1 } else { spm.root_of_unity(size as u64) };
        let w_inv = if size == 1 { 1 } else { spm.root_of_unity_inv(size as u64) };
        let mut twiddles = vec![0u64; size * size];
        let mut twiddles_inv = vec![0u64; size * size];
        let mut twiddles_conj = vec![0u64; size * size];
        let mut twiddles_conj_inv = vec![0u64; size * size];
        for k in 0..size {
            for n in 0..size {
                let e = ((k * n) % size) as u64;
                let t = sp_pow(w, e, spm.p);
                let idx = k * size + n;
                twiddles[idx] = t;
                twiddles_inv[idx] = spm.reciprocal_of(t);
                let tc = sp_pow(w_inv, e, spm.p);
                twiddles_conj[idx] = tc;
                twiddles_conj_inv[idx] = spm.reciprocal_of(tc);
            }
        }
        let backend = if size % 4 == 0 && spm.p < (1u64 << 32) {
            Backend::Simd4
        } else if size % 2 == 0 {
            Backend::Simd2
        } else {
            Backend::Scalar
        };

        Codelet {
            size,
            twiddles,
            twiddles_inv,
            twiddles_conj,
            twiddles_conj_inv,
            p: spm.p,
            backend,
        }
    }

    fn run_with_tables(&self, x: &mut [SpInt], table: &[SpInt], table_inv: &[SpInt]) {
        match self.backend {
            Backend::Simd4 => self.run_with_tables_simd4(x, table, table_inv),
            Backend::Simd2 => self.run_with_tables_simd2(x, table, table_inv),
            Backend::Scalar => self.run_with_tables_scalar(x, table, table_inv),
        }
    }

    fn run_with_tables_scalar(&self, x: &mut [SpInt], table: &[SpInt], table_inv: &[SpInt]) {
        let mut out = vec![0u64; self.size];
        for k in 0..self.size {
            let mut acc = 0u64;
            for n in 0..self.size {
                let idx = k * self.size + n;
                acc = sp_add(acc, sp_ntt_mul(x[n], table[idx], table_inv[idx], self.p), self.p);
            }
            out[k] = acc;
        }
        x.copy_from_slice(&out);
    }

    /// Same accumulation as [`Self::run_with_tables_scalar`], two output
    /// indices `k`, `k+1` at a time: each lane carries one `k`'s twiddle
    /// row, independent of the other, so the lane-wise contract
    /// [`ecm_sp::simd`] documents holds exactly.
    fn run_with_tables_simd2(&self, x: &mut [SpInt], table: &[SpInt], table_inv: &[SpInt]) {
        let mut out = vec![0u64; self.size];
        let mut k = 0;
        while k < self.size {
            let mut acc = Simd2([0, 0]);
            for n in 0..self.size {
                let idx0 = k * self.size + n;
                let idx1 = (k + 1) * self.size + n;
                let xv = Simd2([x[n], x[n]]);
                let w = Simd2([table[idx0], table[idx1]]);
                let w_inv = Simd2([table_inv[idx0], table_inv[idx1]]);
                acc = acc.add(xv.ntt_mul(w, w_inv, self.p), self.p);
            }
            out[k] = acc.0[0];
            out[k + 1] = acc.0[1];
            k += 2;
        }
        x.copy_from_slice(&out);
    }

    /// Four output indices at a time; only selected when `size % 4 == 0`
    /// and `p` fits the 32-bit-range lane contract `Simd4` documents.
    fn run_with_tables_simd4(&self, x: &mut [SpInt], table: &[SpInt], table_inv: &[SpInt]) {
        let mut out = vec![0u64; self.size];
        let mut k = 0;
        while k < self.size {
            let mut acc = Simd4([0, 0, 0, 0]);
            for n in 0..self.size {
                let mut xv = [0u64; 4];
                let mut w = [0u64; 4];
                let mut w_inv = [0u64; 4];
                for lane in 0..4 {
                    let idx = (k + lane) * self.size + n;
                    xv[lane] = x[n];
                    w[lane] = table[idx];
                    w_inv[lane] = table_inv[idx];
                }
                acc = acc.add(Simd4(xv).ntt_mul(Simd4(w), Simd4(w_inv), self.p), self.p);
            }
            for lane in 0..4 {
                out[k + lane] = acc.0[lane];
            }
            k += 4;
        }
        x.copy_from_slice(&out);
    }

    /// Direct transform of one vector of length `size`, in place.
    pub fn run(&self, x: &mut [SpInt], spm: &SpModulus) {
        debug_assert_eq!(x.len(), self.size);
        debug_assert_eq!(spm.p, self.p);
        if self.size == 1 {
            return;
        }
        self.run_with_tables(x, &self.twiddles, &self.twiddles_inv);
    }

    /// Inverse of [`Self::run`], using `w^-1` in place of `w`. Results are
    /// left scaled by `size`; the caller divides by `size mod p` once after
    /// combining all CRT primes rather than after every small transform.
    pub fn run_inverse(&self, x: &mut [SpInt], spm: &SpModulus) {
        debug_assert_eq!(x.len(), self.size);
        debug_assert_eq!(spm.p, self.p);
        if self.size == 1 {
            return;
        }
        self.run_with_tables(x, &self.twiddles_conj, &self.twiddles_conj_inv);
    }

    /// One axis of a Good–Thomas prime-factor transform: `x` has the full
    /// enclosing length `size * cofactor`, addressed throughout by the
    /// symmetric CRT index function [`crate::planner::crt_index`] rather
    /// than by a fixed stride — this is what lets a single call handle its
    /// whole axis (all `cofactor` independent length-`size` transforms)
    /// without any twiddle multiplication, and without needing the *other*
    /// factor's codelet to run first.
    pub fn pfa_run(&self, x: &mut [SpInt], cofactor: usize, spm: &SpModulus) {
        let n_c = self.size;
        let n = n_c * cofactor;
        debug_assert_eq!(x.len(), n);
        if cofactor == 1 {
            self.run(x, spm);
            return;
        }
        let nc_u64 = n_c as u64;
        let co_u64 = cofactor as u64;
        let nb_inv_mod_na =
            sp_inv(co_u64 % nc_u64, nc_u64).expect("pfa_run requires gcd(size, cofactor) == 1");
        let na_inv_mod_nb =
            sp_inv(nc_u64 % co_u64, co_u64).expect("pfa_run requires gcd(size, cofactor) == 1");

        let mut scratch = vec![0u64; n_c];
        for g in 0..cofactor {
            for i in 0..n_c {
                scratch[i] = x[crt_index(i, n_c, nb_inv_mod_na, g, cofactor, na_inv_mod_nb, n)];
            }
            self.run(&mut scratch, spm);
            for i in 0..n_c {
                x[crt_index(i, n_c, nb_inv_mod_na, g, cofactor, na_inv_mod_nb, n)] = scratch[i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecm_sp::primes::{distinct_prime_factors, find_primitive_root};

    fn spm_for(p: SpInt, max_ntt_size: u64) -> SpModulus {
        let factors = distinct_prime_factors(p - 1);
        let g = find_primitive_root(p, &factors).unwrap();
        SpModulus::new(p, g, max_ntt_size).unwrap()
    }

    #[test]
    fn direct_transform_matches_naive_dft() {
        let p = 97u64;
        let spm = spm_for(p, 32);
        let codelet = Codelet::init(4, &spm);
        let mut x = vec![1u64, 2, 3, 4];
        let original = x.clone();
        codelet.run(&mut x, &spm);

        let w = spm.root_of_unity(4);
        let mut expected = vec![0u64; 4];
        for (k, slot) in expected.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (n, &v) in original.iter().enumerate() {
                acc = sp_add(acc, v * sp_pow(w, (k * n) as u64, p) % p, p);
            }
            *slot = acc;
        }
        assert_eq!(x, expected);
    }

    #[test]
    fn simd2_backend_matches_naive_dft() {
        let p = 97u64;
        let spm = spm_for(p, 32);
        let codelet = Codelet::init(6, &spm);
        assert_eq!(codelet.backend, Backend::Simd2);
        let mut x: Vec<u64> = (1..=6).collect();
        let original = x.clone();
        codelet.run(&mut x, &spm);

        let w = spm.root_of_unity(6);
        let mut expected = vec![0u64; 6];
        for (k, slot) in expected.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (n, &v) in original.iter().enumerate() {
                acc = sp_add(acc, v * sp_pow(w, (k * n) as u64, p) % p, p);
            }
            *slot = acc;
        }
        assert_eq!(x, expected);
    }

    #[test]
    fn simd4_backend_matches_naive_dft() {
        let p = 97u64;
        let spm = spm_for(p, 32);
        let codelet = Codelet::init(8, &spm);
        assert_eq!(codelet.backend, Backend::Simd4);
        let mut x: Vec<u64> = (1..=8).collect();
        let original = x.clone();
        codelet.run(&mut x, &spm);

        let w = spm.root_of_unity(8);
        let mut expected = vec![0u64; 8];
        for (k, slot) in expected.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (n, &v) in original.iter().enumerate() {
                acc = sp_add(acc, v * sp_pow(w, (k * n) as u64, p) % p, p);
            }
            *slot = acc;
        }
        assert_eq!(x, expected);
    }

    #[test]
    fn run_then_run_inverse_scales_by_size() {
        let p = 97u64;
        let spm = spm_for(p, 32);
        let codelet = Codelet::init(4, &spm);
        let original = vec![5u64, 11, 20, 3];
        let mut x = original.clone();
        codelet.run(&mut x, &spm);
        codelet.run_inverse(&mut x, &spm);
        let inv4 = spm.inv_len(4);
        for v in x.iter_mut() {
            *v = *v * inv4 % p;
        }
        assert_eq!(x, original);
    }

    #[test]
    fn pfa_run_matches_direct_dft_of_coprime_size() {
        // size 3, cofactor 5 -> length 15
        let p = 31u64; // p - 1 = 30 = 2*3*5
        let spm = spm_for(p, 30);
        let codelet3 = Codelet::init(3, &spm);
        let mut x: Vec<u64> = (1..=15).collect();
        let original = x.clone();
        codelet3.pfa_run(&mut x, 5, &spm);

        // Recompute via the CRT index map directly for one axis and check
        // each length-3 slice is a correct direct DFT of its gathered input.
        let nb_inv_mod_na = ecm_sp::sp_inv(5 % 3, 3).unwrap();
        let na_inv_mod_nb = ecm_sp::sp_inv(3 % 5, 5).unwrap();
        for g in 0..5 {
            let mut gathered = [0u64; 3];
            for (i, slot) in gathered.iter_mut().enumerate() {
                *slot = original[crt_index(i, 3, nb_inv_mod_na, g, 5, na_inv_mod_nb, 15)];
            }
            let mut expected = gathered;
            codelet3.run(&mut expected, &spm);
            let mut got = [0u64; 3];
            for (i, slot) in got.iter_mut().enumerate() {
                *slot = x[crt_index(i, 3, nb_inv_mod_na, g, 5, na_inv_mod_nb, 15)];
            }
            assert_eq!(got, expected);
        }
    }
}
