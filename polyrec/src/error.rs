use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolyError {
    #[error("expected a polynomial of degree {expected}, got degree {actual}")]
    DegreeMismatch { expected: usize, actual: usize },

    #[error("operation requires a non-empty coefficient list")]
    EmptyPolynomial,
}
