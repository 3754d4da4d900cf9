use num_bigint::BigUint;
use thiserror::Error;

/// Errors raised at modulus-construction time or by malformed inputs.
///
/// Inversion failure is *not* represented here: per the stage-2 error
/// handling design, a failed inverse means a factor has been found and is
/// surfaced as data (see [`crate::residue::InvertOutcome`]), not as an
/// `Err`.
#[derive(Debug, Error)]
pub enum BigIntError {
    #[error("modulus must be greater than 1")]
    ModulusTooSmall,

    #[error("modulus must be odd for Montgomery representation")]
    ModulusEven,

    #[error("exponent bit width {0} exceeds supported range")]
    ExponentTooWide(u64),

    #[error("residue {0} is not in [0, n) for the active modulus")]
    OutOfRange(BigUint),
}
