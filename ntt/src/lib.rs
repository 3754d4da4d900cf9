//! Small-prime NTT kernel: a CRT basis of word-sized NTT-friendly primes,
//! generic direct-DFT codelets combined by a length planner (prime-factor
//! algorithm where the factorization allows it, mixed-radix Cooley–Tukey
//! otherwise), and a DCT-I built on top for reciprocal-polynomial storage.
//!
//! ```
//! use ecm_ntt::{Planner, SpModulus};
//! use ecm_sp::primes::{distinct_prime_factors, find_primitive_root};
//!
//! let p = 97u64; // p - 1 = 96 = 2^5 * 3
//! let factors = distinct_prime_factors(p - 1);
//! let root = find_primitive_root(p, &factors).unwrap();
//! let spm = SpModulus::new(p, root, 32).unwrap();
//!
//! let planner = Planner::new();
//! let mut v = vec![1u64, 2, 3, 4];
//! planner.forward(&mut v, &spm).unwrap();
//! planner.inverse(&mut v, &spm).unwrap();
//! let inv_len = spm.inv_len(4);
//! for x in v.iter_mut() {
//!     *x = *x * inv_len % p;
//! }
//! assert_eq!(v, vec![1, 2, 3, 4]);
//! ```
pub mod codelet;
pub mod crt;
pub mod dct;
pub mod error;
pub mod planner;
pub mod spm;
pub mod spv;

pub use codelet::Codelet;
pub use crt::Mpzspm;
pub use dct::{dct1, idct1};
pub use error::NttError;
pub use planner::{Plan, Planner};
pub use spm::SpModulus;
pub use spv::Spv;
