use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpError {
    #[error("{0} is not prime, or too small to serve as an NTT modulus")]
    NotPrime(u64),

    #[error("no primitive root of order {order} found below {searched} candidates")]
    NoPrimitiveRoot { order: u64, searched: u32 },

    #[error("value {0} has no inverse modulo the active prime")]
    NoInverse(u64),
}
