//! A vector of big integers (stage-2 polynomial coefficients, or an NTT
//! small-prime vector's big-integer counterpart) backed either by plain
//! `Vec<BigUint>` or by a fixed-record-width file, chosen once at creation
//! and transparent to the caller thereafter — the `listz_handle`/`mpzspv`
//! duality in the reference, collapsed into one type with two variants
//! instead of a function-pointer table.
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use num_bigint::BigUint;

use crate::error::StorageError;

/// A fixed-record-width file of big-integer coefficients, each serialized
/// little-endian and zero-padded to `record_bytes`.
pub struct FileListz {
    file: Mutex<File>,
    record_bytes: usize,
    len: usize,
}

impl FileListz {
    pub fn create(path: PathBuf, len: usize, record_bytes: usize) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.set_len((len * record_bytes) as u64)?;
        Ok(FileListz {
            file: Mutex::new(file),
            record_bytes,
            len,
        })
    }

    /// Opens a file previously populated by [`FileListz::create`] without
    /// truncating it, for a second pass of reads or writes over the same
    /// data (e.g. handing it to a [`crate::background::BackgroundReader`]
    /// after the original handle has gone out of scope).
    pub fn open(path: PathBuf, len: usize, record_bytes: usize) -> Result<Self, StorageError> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        Ok(FileListz {
            file: Mutex::new(file),
            record_bytes,
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn record_bytes(&self) -> usize {
        self.record_bytes
    }

    fn check(&self, index: usize) -> Result<(), StorageError> {
        if index >= self.len {
            return Err(StorageError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<BigUint, StorageError> {
        self.check(index)?;
        let mut buf = vec![0u8; self.record_bytes];
        let mut file = self.file.lock().expect("file-backed vector mutex poisoned");
        file.seek(SeekFrom::Start((index * self.record_bytes) as u64))?;
        file.read_exact(&mut buf)?;
        Ok(BigUint::from_bytes_le(&buf))
    }

    pub fn set(&self, index: usize, value: &BigUint) -> Result<(), StorageError> {
        self.check(index)?;
        let mut bytes = value.to_bytes_le();
        bytes.resize(self.record_bytes, 0);
        let mut file = self.file.lock().expect("file-backed vector mutex poisoned");
        file.seek(SeekFrom::Start((index * self.record_bytes) as u64))?;
        file.write_all(&bytes)?;
        Ok(())
    }

    pub fn get_block(&self, start: usize, count: usize) -> Result<Vec<BigUint>, StorageError> {
        (start..start + count).map(|i| self.get(i)).collect()
    }

    pub fn set_block(&self, start: usize, values: &[BigUint]) -> Result<(), StorageError> {
        for (offset, value) in values.iter().enumerate() {
            self.set(start + offset, value)?;
        }
        Ok(())
    }
}

/// Either an in-memory vector or a file-backed one, behind one interface.
pub enum ListzHandle {
    Ram(Vec<BigUint>),
    File(FileListz),
}

impl ListzHandle {
    pub fn ram(values: Vec<BigUint>) -> Self {
        ListzHandle::Ram(values)
    }

    pub fn file(path: PathBuf, len: usize, record_bytes: usize) -> Result<Self, StorageError> {
        Ok(ListzHandle::File(FileListz::create(path, len, record_bytes)?))
    }

    pub fn len(&self) -> usize {
        match self {
            ListzHandle::Ram(v) => v.len(),
            ListzHandle::File(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<BigUint, StorageError> {
        match self {
            ListzHandle::Ram(v) => v
                .get(index)
                .cloned()
                .ok_or(StorageError::OutOfRange { index, len: v.len() }),
            ListzHandle::File(f) => f.get(index),
        }
    }

    pub fn set(&mut self, index: usize, value: BigUint) -> Result<(), StorageError> {
        match self {
            ListzHandle::Ram(v) => {
                let len = v.len();
                let slot = v.get_mut(index).ok_or(StorageError::OutOfRange { index, len })?;
                *slot = value;
                Ok(())
            }
            ListzHandle::File(f) => f.set(index, &value),
        }
    }

    pub fn get_block(&self, start: usize, count: usize) -> Result<Vec<BigUint>, StorageError> {
        match self {
            ListzHandle::Ram(v) => {
                if start + count > v.len() {
                    return Err(StorageError::OutOfRange {
                        index: start + count,
                        len: v.len(),
                    });
                }
                Ok(v[start..start + count].to_vec())
            }
            ListzHandle::File(f) => f.get_block(start, count),
        }
    }

    pub fn set_block(&mut self, start: usize, values: &[BigUint]) -> Result<(), StorageError> {
        match self {
            ListzHandle::Ram(v) => {
                if start + values.len() > v.len() {
                    return Err(StorageError::OutOfRange {
                        index: start + values.len(),
                        len: v.len(),
                    });
                }
                v[start..start + values.len()].clone_from_slice(values);
                Ok(())
            }
            ListzHandle::File(f) => f.set_block(start, values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!("ecm-storage-test-{tag}-{nanos}.bin"))
    }

    #[test]
    fn ram_handle_round_trips() {
        let mut h = ListzHandle::ram(vec![BigUint::from(0u32); 4]);
        h.set(2, BigUint::from(12345u32)).unwrap();
        assert_eq!(h.get(2).unwrap(), BigUint::from(12345u32));
    }

    #[test]
    fn file_handle_round_trips_and_cleans_up() {
        let path = temp_path("roundtrip");
        {
            let mut h = ListzHandle::file(path.clone(), 8, 16).unwrap();
            for i in 0..8u32 {
                h.set(i as usize, BigUint::from(i * 1000 + 7)).unwrap();
            }
            for i in 0..8u32 {
                assert_eq!(h.get(i as usize).unwrap(), BigUint::from(i * 1000 + 7));
            }
            let block = h.get_block(2, 3).unwrap();
            assert_eq!(block, vec![BigUint::from(2007u32), BigUint::from(3007u32), BigUint::from(4007u32)]);
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn out_of_range_access_is_reported() {
        let h = ListzHandle::ram(vec![BigUint::from(0u32); 2]);
        assert!(matches!(
            h.get(5),
            Err(StorageError::OutOfRange { index: 5, len: 2 })
        ));
    }
}
