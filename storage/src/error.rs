use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on a file-backed vector: {0}")]
    Io(#[from] std::io::Error),

    #[error("record index {index} is out of range for a vector of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("background I/O channel closed unexpectedly")]
    ChannelClosed,
}
