//! The explicit `partition(len, worker_id, workers) -> (start, count)`
//! helper used everywhere a loop used to be an OpenMP `parallel for`:
//! splitting a round's work as evenly as possible across a fixed worker
//! count, with any remainder distributed one extra item to the first
//! workers rather than piled onto the last.
use rayon::prelude::*;

/// The `[start, start + count)` slice of `0..len` that `worker_id` (in
/// `0..workers`) owns, when `len` items are divided as evenly as possible
/// among `workers` workers.
pub fn partition(len: usize, worker_id: usize, workers: usize) -> (usize, usize) {
    assert!(workers > 0, "partition requires at least one worker");
    assert!(worker_id < workers, "worker_id must be in 0..workers");
    let base = len / workers;
    let remainder = len % workers;
    let count = base + usize::from(worker_id < remainder);
    let start = worker_id * base + worker_id.min(remainder);
    (start, count)
}

/// Runs `f` over every item of `items` across a rayon thread pool, in
/// index order for the returned vector but not necessarily in index order
/// of execution — the batched curve and polynomial operations this feeds
/// are already internally parallel-safe since every worker owns a
/// disjoint sub-slice via [`partition`].
pub fn parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync,
{
    items.par_iter().map(|item| f(item)).collect()
}
