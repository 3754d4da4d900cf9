//! Elliptic-curve and `P+1` group arithmetic for stage 2.
//!
//! Single-point operations go through affine coordinates
//! ([`weierstrass::Curve`]) and surface a discovered factor directly from a
//! failed [`ecm_bigint::Modulus::invert`]. Batches of points (step
//! progressions, multiples, independent scalar multiplications) go through
//! [`jacobian`]/[`roots`] instead, which never divide until the very end,
//! where [`jacobian::batch_to_affine`] applies Montgomery's trick once over
//! the whole batch.
pub mod error;
pub mod jacobian;
pub mod pp1;
pub mod roots;
pub mod weierstrass;

pub use error::CurveError;
pub use jacobian::{batch_to_affine, JacobianPoint};
pub use pp1::{ExtElement, QuadExt};
pub use roots::{arithmetic_progression, batch_scalar_mul, multiples, roots_f, roots_g};
pub use weierstrass::{Curve, Point, PointOutcome};
