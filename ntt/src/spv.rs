use ecm_sp::{sp_add, sp_neg, sp_sub, SpInt};

use crate::error::NttError;
use crate::spm::SpModulus;

/// A dense array of `sp_t`, length a power of two (or a product of small
/// primes for prime-factor transforms). Element order inside a transformed
/// vector is whatever the codelet that wrote it uses (bit-reversed for
/// radix-2 Cooley-Tukey, CRT-index-mapped for PFA); callers that
/// scatter/gather against a raw `Spv` must know which scheme is in force.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spv {
    data: Vec<SpInt>,
}

impl Spv {
    pub fn zeros(len: usize) -> Self {
        Spv {
            data: vec![0; len],
        }
    }

    pub fn from_vec(data: Vec<SpInt>) -> Self {
        Spv { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[SpInt] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [SpInt] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<SpInt> {
        self.data
    }

    fn check_len(&self, other: &Spv) -> Result<(), NttError> {
        if self.len() != other.len() {
            return Err(NttError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &Spv, spm: &SpModulus) -> Result<Spv, NttError> {
        self.check_len(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| sp_add(a, b, spm.p))
            .collect();
        Ok(Spv { data })
    }

    pub fn sub(&self, other: &Spv, spm: &SpModulus) -> Result<Spv, NttError> {
        self.check_len(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| sp_sub(a, b, spm.p))
            .collect();
        Ok(Spv { data })
    }

    pub fn neg(&self, spm: &SpModulus) -> Spv {
        let data = self.data.iter().map(|&a| sp_neg(a, spm.p)).collect();
        Spv { data }
    }

    /// Brings every element into canonical `[0, p)` form; a no-op unless a
    /// partial-mod codelet pass left elements in `[0, 2p)`.
    pub fn canonicalize(&mut self, spm: &SpModulus) {
        for x in self.data.iter_mut() {
            if *x >= spm.p {
                *x -= spm.p;
            }
        }
    }
}
