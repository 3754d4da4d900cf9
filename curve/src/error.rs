use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("curve parameters are degenerate (discriminant is zero)")]
    DegenerateCurve,

    #[error("batch of {expected} points and {actual} scalars have mismatched lengths")]
    LengthMismatch { expected: usize, actual: usize },
}
