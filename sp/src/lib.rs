//! Word-sized (`sp_t`) residue arithmetic modulo a machine-word NTT prime.
//!
//! This is the innermost layer of the NTT kernel: every codelet in
//! `ecm-ntt` is built from [`sp_int::sp_add`]/[`sp_int::sp_sub`]/
//! [`sp_int::sp_ntt_mul`], generic over a [`reduction::ReductionMode`]
//! (full vs. partial reduction) and optionally vectorized via
//! [`simd::Backend`].

pub mod error;
pub mod primes;
pub mod reduction;
pub mod simd;
pub mod sp_int;

pub use error::SpError;
pub use reduction::{Full, Partial, ReductionMode};
pub use simd::{Backend, Simd2, Simd4};
pub use sp_int::{sp_add, sp_inv, sp_mul, sp_neg, sp_ntt_mul, sp_pow, sp_reciprocal, sp_sub, SpInt};
