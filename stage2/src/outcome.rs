use num_bigint::BigUint;

/// The result of an internal stage-2 step that may, instead of producing
/// its normal value, surface a factor of `N` directly — mirroring
/// [`ecm_bigint::InvertOutcome`] and [`ecm_curve::PointOutcome`] one level
/// up the call stack, so a factor discovered deep inside batch point
/// generation or batch inversion propagates without being mistaken for an
/// error.
pub enum RoundOutcome<T> {
    Value(T),
    Factor(BigUint),
}

impl<T> RoundOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RoundOutcome<U> {
        match self {
            RoundOutcome::Value(v) => RoundOutcome::Value(f(v)),
            RoundOutcome::Factor(n) => RoundOutcome::Factor(n),
        }
    }
}
