use num_bigint::BigUint;
use num_traits::Zero;

/// An integer in `[0, N)` held in whatever representation its [`crate::Modulus`]
/// selected. A `Residue` carries no reference to its modulus — every
/// operation on it goes through a `&Modulus` method, mirroring GMP's
/// explicit-modulus calling convention. Values are scrubbed to zero on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Residue {
    value: BigUint,
}

impl Residue {
    pub(crate) fn new(value: BigUint) -> Self {
        Residue { value }
    }

    pub(crate) fn raw(&self) -> &BigUint {
        &self.value
    }
}

impl Drop for Residue {
    fn drop(&mut self) {
        self.value = BigUint::zero();
    }
}

impl std::fmt::Debug for Residue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Deliberately do not print `value`: it is representation-dependent
        // (Montgomery-coded) and meaningless without the modulus context.
        f.debug_struct("Residue").finish_non_exhaustive()
    }
}

/// The result of attempting to invert a residue.
///
/// `invert` never returns an error: a non-invertible residue means `a` and
/// `N` share a nontrivial factor, which is exactly the event stage 2 is
/// searching for.
#[derive(Debug)]
pub enum InvertOutcome {
    Invertible(Residue),
    /// `gcd(a, N)`, with `1 < gcd < N`.
    FactorFound(BigUint),
}

impl InvertOutcome {
    pub fn invertible(self) -> Option<Residue> {
        match self {
            InvertOutcome::Invertible(r) => Some(r),
            InvertOutcome::FactorFound(_) => None,
        }
    }

    pub fn factor(self) -> Option<BigUint> {
        match self {
            InvertOutcome::Invertible(_) => None,
            InvertOutcome::FactorFound(f) => Some(f),
        }
    }
}
