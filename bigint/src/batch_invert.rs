use num_bigint::BigUint;

use crate::modulus::Modulus;
use crate::residue::{InvertOutcome, Residue};

/// A factor of `N` discovered while computing a batch inverse: some partial
/// product in the accumulation chain was not invertible.
#[derive(Debug)]
pub struct FactorFound(pub BigUint);

/// Computes the modular inverse of every element of `values` in place,
/// using one modular inversion and `3(k-1)` multiplies for `k = values.len()`
/// (Montgomery's trick).
///
/// This is the standalone form of the accumulation scheme that the
/// elliptic-curve roots engine schedules per scalar bit, and that the P+1
/// extension-field path and the Dickson-polynomial finite-difference tables
/// also rely on: every call site that needs many inverses under one modulus
/// funnels through here instead of re-deriving the product-tree by hand.
///
/// If the single inversion of the total product fails, every individual
/// inverse is necessarily undefined (the total product and at least one
/// factor share a divisor of `N`), so the whole batch fails with the
/// discovered factor.
pub fn batch_invert(modulus: &Modulus, values: &mut [Residue]) -> Result<(), FactorFound> {
    if values.is_empty() {
        return Ok(());
    }
    if values.len() == 1 {
        return match modulus.invert(&values[0]) {
            InvertOutcome::Invertible(inv) => {
                values[0] = inv;
                Ok(())
            }
            InvertOutcome::FactorFound(f) => Err(FactorFound(f)),
        };
    }

    // Forward scan: partials[i] = values[0] * values[1] * ... * values[i].
    let mut partials: Vec<Residue> = Vec::with_capacity(values.len());
    partials.push(values[0].clone());
    for v in &values[1..] {
        let prev = partials.last().expect("partials is non-empty");
        partials.push(modulus.mul(prev, v));
    }

    let total = partials.last().expect("partials is non-empty");
    let mut inv_acc = match modulus.invert(total) {
        InvertOutcome::Invertible(inv) => inv,
        InvertOutcome::FactorFound(f) => return Err(FactorFound(f)),
    };

    // Backward scan: peel one factor off inv_acc at a time.
    for i in (1..values.len()).rev() {
        let inv_i = modulus.mul(&inv_acc, &partials[i - 1]);
        inv_acc = modulus.mul(&inv_acc, &values[i]);
        values[i] = inv_i;
    }
    values[0] = inv_acc;

    Ok(())
}
