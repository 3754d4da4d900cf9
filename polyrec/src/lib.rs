//! Reciprocal Laurent polynomial algebra for ECM/P+1/P-1 stage 2.
//!
//! A stage-2 run builds one [`ReciprocalPoly`] `F` whose roots are the
//! traces of the points in the factored set `S_1` — either from a flat
//! trace array ([`poly_from_traces`]) or, when `S_1` is itself built from
//! smaller factors, by folding those factors in order of increasing
//! cardinality ([`poly_from_sets_v`]) — then evaluates it at every point of
//! `S_2` either one trace at a time (via [`chebyshev::evaluate_reciprocal`])
//! or all at once (via an NTT convolution, left to `ecm-stage2` since it
//! needs the CRT basis from `ecm-ntt`).
pub mod chebyshev;
pub mod error;
pub mod reciprocal;

pub use chebyshev::{chebyshev_v, chebyshev_v_sequence, evaluate_reciprocal, poly_from_sets_v, poly_from_traces};
pub use error::PolyError;
pub use reciprocal::ReciprocalPoly;
