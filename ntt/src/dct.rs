//! DCT-I via mirror-extension NTT, used to cache a reciprocal polynomial's
//! Chebyshev coefficients across stage-2 rounds without storing the full
//! symmetric coefficient list.
//!
//! A length-`n` DCT-I is computed the same way a real-input FFT-based DCT-I
//! library computes it: mirror the `n` coefficients into a length
//! `m = 2(n-1)` symmetric sequence and run an ordinary length-`m` transform;
//! the first `n` outputs are the DCT-I. Applying the same mirror-and-transform
//! step twice reproduces the input scaled by `m`, exactly as the classical
//! real DCT-I is self-inverse up to that scale factor.
use crate::error::NttError;
use crate::planner::Planner;
use crate::spm::SpModulus;

fn mirror_extend(c: &[u64]) -> Vec<u64> {
    let n = c.len();
    let m = 2 * (n - 1);
    let mut y = vec![0u64; m];
    y[..n].copy_from_slice(c);
    for (i, &v) in c.iter().enumerate().take(n - 1).skip(1) {
        y[m - i] = v;
    }
    y
}

/// Forward DCT-I, in place. A no-op for `c.len() < 2` (a constant or empty
/// sequence is its own transform).
pub fn dct1(c: &mut Vec<u64>, spm: &SpModulus, planner: &Planner) -> Result<(), NttError> {
    let n = c.len();
    if n < 2 {
        return Ok(());
    }
    let mut y = mirror_extend(c);
    planner.forward(&mut y, spm)?;
    c.copy_from_slice(&y[..n]);
    Ok(())
}

/// Inverse DCT-I: forward DCT-I again, then divide by `2(n-1)`.
pub fn idct1(c: &mut Vec<u64>, spm: &SpModulus, planner: &Planner) -> Result<(), NttError> {
    let n = c.len();
    if n < 2 {
        return Ok(());
    }
    dct1(c, spm, planner)?;
    let m = 2 * (n as u64 - 1);
    let inv_m = spm.inv_len(m);
    for v in c.iter_mut() {
        *v = *v * inv_m % spm.p;
    }
    Ok(())
}
