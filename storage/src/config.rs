/// Tuning knobs for file-backed vectors, replacing the reference's
/// `MPZSPV_FROMTO_MPZV_BLOCKLEN` environment variable with an explicit,
/// testable struct.
#[derive(Clone, Copy, Debug)]
pub struct StorageConfig {
    /// Coefficients per streamed block.
    pub stream_block_len: usize,
    /// Whether to overlap I/O with computation via a background thread.
    pub use_async_io: bool,
    /// Extra headroom reserved in the in-process read/write buffers, beyond
    /// one block's worth of bytes, to absorb a record whose serialized size
    /// varies slightly around the common case.
    pub oversize_buffer_bytes: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            stream_block_len: 65536,
            use_async_io: true,
            oversize_buffer_bytes: 0,
        }
    }
}
