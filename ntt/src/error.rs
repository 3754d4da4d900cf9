use thiserror::Error;

#[derive(Debug, Error)]
pub enum NttError {
    #[error("transform length {0} cannot be factored over the supported codelet sizes")]
    UnsupportedLength(u64),

    #[error("CRT basis could not find enough NTT-friendly primes below the search bound for bound={bound}, max_ntt_size={max_ntt_size}")]
    PrimeSearchExhausted { bound: u64, max_ntt_size: u64 },

    #[error("out of memory allocating an NTT buffer of {0} elements")]
    OutOfMemory(usize),

    #[error("vector length {actual} does not match the expected transform length {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
