//! Dual RAM/file-backed coefficient vectors for stage 2, with optional
//! double-buffered background I/O.
//!
//! [`ListzHandle`] is the vector a caller actually holds: either a plain
//! `Vec<BigUint>` or a [`FileListz`] wrapping a fixed-record-width file.
//! [`BackgroundReader`] and [`BackgroundWriter`] stream blocks of a
//! `FileListz` on a dedicated thread so computation on one block overlaps
//! I/O on the next, controlled by [`StorageConfig`].
pub mod background;
pub mod config;
pub mod error;
pub mod listz;

pub use background::{read_all, BackgroundReader, BackgroundWriter};
pub use config::StorageConfig;
pub use error::StorageError;
pub use listz::{FileListz, ListzHandle};
