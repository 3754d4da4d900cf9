use num_bigint::BigUint;
use thiserror::Error;

use ecm_bigint::BigIntError;
use ecm_curve::CurveError;
use ecm_ntt::NttError;
use ecm_poly::PolyError;
use ecm_storage::StorageError;

/// Errors raised while assembling or running a stage-2 round.
///
/// A discovered factor is never an error, per the workspace-wide
/// convention: it surfaces as [`crate::Stage2Outcome::Factor`] data, not as
/// `Err`. Every variant here is a genuine precondition failure (bad
/// parameters, an inconsistent factored set, a transform length the
/// planner cannot build, a storage I/O fault).
#[derive(Debug, Error)]
pub enum Stage2Error {
    #[error("stage-2 parameters are inconsistent: eulerphi(P={p}) = {eulerphi}, but s_1*s_2 = {s1}*{s2} = {product}")]
    InconsistentParams {
        p: u64,
        eulerphi: u64,
        s1: usize,
        s2: usize,
        product: usize,
    },

    #[error("s_1 ({s1}) must be strictly less than the transform length l ({l})")]
    S1NotLessThanL { s1: usize, l: usize },

    #[error("s_2 ({s2}) must not exceed the transform length l ({l}): l bounds the evaluation-vector handle's capacity")]
    S2ExceedsL { s2: usize, l: usize },

    #[error("transform length {l} must be a power of two")]
    TransformLengthNotPowerOfTwo { l: usize },

    #[error("requested S_1 cardinality {requested} but the factored sets only reach {available}")]
    SetCardinalityUnreachable { requested: usize, available: usize },

    #[error("empty evaluation set: s_2 must be at least 1")]
    EmptyEvaluationSet,

    #[error(transparent)]
    BigInt(#[from] BigIntError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Ntt(#[from] NttError),

    #[error(transparent)]
    Poly(#[from] PolyError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A factor surfaced mid-computation by a failed inversion, threaded up
/// through call sites that don't otherwise return [`Stage2Error`].
#[derive(Debug)]
pub struct FactorFound(pub BigUint);
