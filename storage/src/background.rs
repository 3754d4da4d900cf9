//! Overlaps file I/O with computation on a dedicated thread.
//!
//! The reference keeps one I/O thread alive for the lifetime of a stage-2
//! run and hands it work through a pair of bounded queues; a capacity-2
//! channel gives the same double buffering here (one block in flight, one
//! being prepared) without a custom ring buffer.
use std::path::PathBuf;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::JoinHandle;

use num_bigint::BigUint;

use crate::error::StorageError;
use crate::listz::FileListz;

/// Streams fixed-size blocks off a [`FileListz`] on a background thread,
/// so the caller can be transforming block `i` while block `i + 1` is
/// already being read off disk.
pub struct BackgroundReader {
    blocks: Receiver<Result<Vec<BigUint>, StorageError>>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundReader {
    pub fn spawn(listz: FileListz, block_len: usize) -> Self {
        let (tx, rx): (SyncSender<Result<Vec<BigUint>, StorageError>>, _) = sync_channel(2);
        let handle = std::thread::spawn(move || {
            let len = listz.len();
            let mut start = 0;
            while start < len {
                let count = block_len.min(len - start);
                let block = listz.get_block(start, count);
                let stop = block.is_err();
                if tx.send(block).is_err() || stop {
                    break;
                }
                start += count;
            }
        });
        BackgroundReader {
            blocks: rx,
            handle: Some(handle),
        }
    }

    /// Blocks until the next prefetched block is ready, or `None` once the
    /// whole vector has been streamed.
    pub fn next_block(&mut self) -> Option<Result<Vec<BigUint>, StorageError>> {
        self.blocks.recv().ok()
    }
}

impl Drop for BackgroundReader {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

enum WriteJob {
    Block(usize, Vec<BigUint>),
    Finish,
}

/// Accepts `(start_index, block)` pairs and writes them to a [`FileListz`]
/// on a background thread, so the caller can start computing the next
/// block immediately instead of waiting on the write to land on disk.
pub struct BackgroundWriter {
    jobs: SyncSender<WriteJob>,
    result: Receiver<Result<(), StorageError>>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWriter {
    pub fn spawn(listz: FileListz) -> Self {
        let (job_tx, job_rx) = sync_channel::<WriteJob>(2);
        let (result_tx, result_rx) = sync_channel(1);
        let handle = std::thread::spawn(move || {
            let mut outcome = Ok(());
            for job in job_rx {
                match job {
                    WriteJob::Block(start, values) => {
                        if let Err(e) = listz.set_block(start, &values) {
                            outcome = Err(e);
                            break;
                        }
                    }
                    WriteJob::Finish => break,
                }
            }
            let _ = result_tx.send(outcome);
        });
        BackgroundWriter {
            jobs: job_tx,
            result: result_rx,
            handle: Some(handle),
        }
    }

    pub fn write_block(&self, start: usize, values: Vec<BigUint>) -> Result<(), StorageError> {
        self.jobs
            .send(WriteJob::Block(start, values))
            .map_err(|_| StorageError::ChannelClosed)
    }

    /// Signals the background thread to stop, waits for it to finish, and
    /// returns the first error it encountered, if any.
    pub fn finish(mut self) -> Result<(), StorageError> {
        let _ = self.jobs.send(WriteJob::Finish);
        drop(self.jobs.clone());
        let outcome = self.result.recv().unwrap_or(Err(StorageError::ChannelClosed));
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        outcome
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Convenience entry point matching [`crate::config::StorageConfig`]:
/// decides at runtime whether to stream through a background thread or
/// read the whole file-backed vector inline, per `use_async_io`. Assumes
/// `path` already holds a vector of `len` records, as written by a prior
/// [`FileListz::create`] (or an earlier call to this function).
pub fn read_all(
    path: PathBuf,
    len: usize,
    record_bytes: usize,
    block_len: usize,
    use_async_io: bool,
) -> Result<Vec<BigUint>, StorageError> {
    let listz = FileListz::open(path, len, record_bytes)?;
    if !use_async_io {
        return listz.get_block(0, len);
    }
    let mut reader = BackgroundReader::spawn(listz, block_len);
    let mut out = Vec::with_capacity(len);
    while let Some(block) = reader.next_block() {
        out.extend(block?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!("ecm-storage-bg-{tag}-{nanos}.bin"))
    }

    #[test]
    fn background_reader_streams_all_blocks_in_order() {
        let path = temp_path("reader");
        let listz = FileListz::create(path.clone(), 10, 8).unwrap();
        for i in 0..10u32 {
            listz.set(i as usize, &BigUint::from(i)).unwrap();
        }
        let mut reader = BackgroundReader::spawn(listz, 3);
        let mut collected = Vec::new();
        while let Some(block) = reader.next_block() {
            collected.extend(block.unwrap());
        }
        let expected: Vec<BigUint> = (0..10u32).map(BigUint::from).collect();
        assert_eq!(collected, expected);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn background_writer_persists_all_blocks() {
        let path = temp_path("writer");
        let listz = FileListz::create(path.clone(), 6, 8).unwrap();
        let writer = BackgroundWriter::spawn(listz);
        writer
            .write_block(0, vec![BigUint::from(10u32), BigUint::from(11u32)])
            .unwrap();
        writer
            .write_block(2, vec![BigUint::from(12u32), BigUint::from(13u32)])
            .unwrap();
        writer
            .write_block(4, vec![BigUint::from(14u32), BigUint::from(15u32)])
            .unwrap();
        writer.finish().unwrap();

        let listz = FileListz::open(path.clone(), 6, 8).unwrap();
        for i in 0..6u32 {
            assert_eq!(listz.get(i as usize).unwrap(), BigUint::from(i + 10));
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_all_matches_inline_read_when_async_disabled() {
        let path = temp_path("readall");
        let listz = FileListz::create(path.clone(), 5, 8).unwrap();
        for i in 0..5u32 {
            listz.set(i as usize, &BigUint::from(i * 3)).unwrap();
        }
        drop(listz);
        let values = read_all(path.clone(), 5, 8, 2, false).unwrap();
        let expected: Vec<BigUint> = (0..5u32).map(|i| BigUint::from(i * 3)).collect();
        assert_eq!(values, expected);
        std::fs::remove_file(&path).unwrap();
    }
}
