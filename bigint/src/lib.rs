//! Montgomery-form modular arithmetic over an arbitrary-precision modulus
//! `N`, the foundation the rest of the stage-2 engine builds on.
//!
//! A [`Modulus`] is constructed once per factoring run (`Modulus::init`),
//! picks a representation by inspecting `N` (plain for even `N`, a
//! Mersenne-style fold for `N = 2^k - 1`, Montgomery otherwise), and every
//! subsequent [`Residue`] operation is a method on that context:
//!
//! ```
//! use ecm_bigint::Modulus;
//! use num_bigint::BigUint;
//!
//! let modulus = Modulus::init(BigUint::from(187u32)).unwrap(); // 11 * 17
//! let a = modulus.set_ui(9);
//! let b = modulus.set_ui(20);
//! assert_eq!(modulus.get_integer(&modulus.add(&a, &b)), BigUint::from(29u32));
//! assert_eq!(modulus.get_integer(&modulus.mul(&a, &b)), BigUint::from(180u32));
//! ```
//!
//! Inverting a residue that shares a factor with `N` is how this whole
//! system finds factors: see [`residue::InvertOutcome`].

pub mod batch_invert;
pub mod error;
pub mod modulus;
pub mod residue;

pub use batch_invert::{batch_invert, FactorFound};
pub use error::BigIntError;
pub use modulus::{Modulus, Representation};
pub use residue::{InvertOutcome, Residue};
