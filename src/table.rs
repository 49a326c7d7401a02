/*!
 * Partition Table
 *
 * Owns the contiguous array of padded lock cells and fronts it with the
 * public operations. A caller picks a partition index externally
 * (typically key-hash masked by a power-of-two partition count — hashing
 * is the caller's business, the table only validates the index) and
 * every operation forwards to that cell's backend.
 *
 * Two surfaces share the cells:
 * - index-addressed (`read_lock` / `unlock` by partition number), which
 *   dispatches release on the cell's held-mode tag, and
 * - guard-based (`read` / `write`), where each acquisition returns an
 *   RAII token that releases itself with the right mode. Prefer guards
 *   in new code; the tag is cell-scoped and races between sessions.
 */

use crate::backend::{HostBackend, LockBackend, LockMode};
use crate::cell::LockCell;
use crate::guard::{ReadGuard, WriteGuard};
use crossbeam_utils::CachePadded;
use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for fallible table construction.
pub type TableResult<T> = Result<T, TableError>;

/// Table construction errors.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to allocate {count} partition cells")]
    Allocation {
        count: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Outcome of a non-blocking acquisition attempt.
///
/// `Busy` is contention, not an error: the partition was held in a
/// conflicting mode at the instant of the attempt.
#[must_use = "an Acquired result holds the partition until unlock"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryLock {
    Acquired,
    Busy,
}

impl TryLock {
    #[inline]
    pub fn is_acquired(self) -> bool {
        matches!(self, TryLock::Acquired)
    }

    #[inline]
    pub fn is_busy(self) -> bool {
        matches!(self, TryLock::Busy)
    }
}

/// Sharded reader-writer lock.
///
/// One logical lock backed by `partition_count` independent cells, so
/// keys hashed to different partitions never contend while same-key
/// callers get ordinary reader/writer exclusion. Cells are cache-line
/// padded; operations on different partitions share no state at all and
/// establish no ordering between one another.
///
/// The backend is a compile-time choice via the type parameter:
/// [`HostBackend`] (default), [`crate::LoopBackend`], or
/// [`crate::AtomicBackend`].
///
/// # Contract
///
/// Partition indices must be in `[0, partition_count)`; an out-of-range
/// index panics. `unlock` must be called exactly once per successful
/// index-addressed acquisition. There is no timeout or cancellation on
/// the blocking operations.
///
/// # Examples
///
/// ```
/// use partlock::PartitionedRwLock;
///
/// let table: PartitionedRwLock = PartitionedRwLock::with_partitions(8);
///
/// table.read_lock(3);
/// table.unlock(3);
///
/// // Guard surface: release happens on drop, with the right mode.
/// let guard = table.write(5);
/// drop(guard);
/// ```
pub struct PartitionedRwLock<B: LockBackend = HostBackend> {
    cells: Box<[CachePadded<LockCell<B>>]>,
}

impl<B: LockBackend> PartitionedRwLock<B> {
    /// Create a table with `partition_count` independent cells.
    ///
    /// A power-of-two count lets callers reduce a key hash with a mask.
    ///
    /// # Panics
    ///
    /// Panics if `partition_count` is zero.
    pub fn with_partitions(partition_count: usize) -> Self {
        assert!(partition_count > 0, "partition count must be nonzero");

        let cells: Box<[_]> = (0..partition_count)
            .map(|_| CachePadded::new(LockCell::new()))
            .collect();

        log::debug!(
            "partitioned rwlock created: {} partitions, backend={}",
            partition_count,
            B::NAME
        );
        Self { cells }
    }

    /// Create a table, reporting allocation failure instead of aborting.
    ///
    /// # Panics
    ///
    /// Panics if `partition_count` is zero (caller contract, same as
    /// [`Self::with_partitions`]).
    pub fn try_with_partitions(partition_count: usize) -> TableResult<Self> {
        assert!(partition_count > 0, "partition count must be nonzero");

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(partition_count)
            .map_err(|source| TableError::Allocation {
                count: partition_count,
                source,
            })?;
        for _ in 0..partition_count {
            cells.push(CachePadded::new(LockCell::new()));
        }

        log::debug!(
            "partitioned rwlock created: {} partitions, backend={}",
            partition_count,
            B::NAME
        );
        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    /// Number of independently lockable partitions.
    #[inline]
    pub fn partition_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn cell(&self, partition: usize) -> &LockCell<B> {
        // Slice indexing enforces the index contract.
        &self.cells[partition]
    }

    /// Block until no writer holds `partition`, then join its readers.
    pub fn read_lock(&self, partition: usize) {
        let cell = self.cell(partition);
        cell.backend().acquire_read();
        cell.record(LockMode::Read);
    }

    /// Non-blocking read attempt: one atomic operation or one
    /// non-blocking host call, `Busy` on any failure.
    pub fn try_read_lock(&self, partition: usize) -> TryLock {
        let cell = self.cell(partition);
        if cell.backend().try_acquire_read() {
            cell.record(LockMode::Read);
            TryLock::Acquired
        } else {
            TryLock::Busy
        }
    }

    /// Block until `partition` is fully unheld, then hold it exclusively.
    pub fn write_lock(&self, partition: usize) {
        let cell = self.cell(partition);
        cell.backend().acquire_write();
        cell.record(LockMode::Write);
    }

    /// Non-blocking write attempt, `Busy` unless the partition was fully
    /// unheld and the single acquisition attempt landed.
    pub fn try_write_lock(&self, partition: usize) -> TryLock {
        let cell = self.cell(partition);
        if cell.backend().try_acquire_write() {
            cell.record(LockMode::Write);
            TryLock::Acquired
        } else {
            TryLock::Busy
        }
    }

    /// Release `partition`, dispatching on the cell's held-mode tag:
    /// read release if the most recent acquisition was a read, write
    /// release if it was a write, no-op if the cell was never acquired.
    ///
    /// The tag is cell-scoped, not acquisition-scoped. Concurrent
    /// sessions that interleave a write acquisition between another
    /// session's read acquisition and its unlock will dispatch the wrong
    /// release; callers needing per-acquisition safety should use the
    /// guard surface ([`Self::read`] / [`Self::write`]) instead.
    pub fn unlock(&self, partition: usize) {
        let cell = self.cell(partition);
        if let Some(mode) = cell.held() {
            // Caller contract: one matching acquisition is held.
            unsafe { cell.backend().release(mode) };
        }
    }

    /// Acquire a read lock, returning a guard that releases on drop.
    pub fn read(&self, partition: usize) -> ReadGuard<'_, B> {
        let cell = self.cell(partition);
        cell.backend().acquire_read();
        cell.record(LockMode::Read);
        ReadGuard::new(cell)
    }

    /// Non-blocking guard-based read attempt.
    pub fn try_read(&self, partition: usize) -> Option<ReadGuard<'_, B>> {
        let cell = self.cell(partition);
        if cell.backend().try_acquire_read() {
            cell.record(LockMode::Read);
            Some(ReadGuard::new(cell))
        } else {
            None
        }
    }

    /// Acquire the write lock, returning a guard that releases on drop.
    pub fn write(&self, partition: usize) -> WriteGuard<'_, B> {
        let cell = self.cell(partition);
        cell.backend().acquire_write();
        cell.record(LockMode::Write);
        WriteGuard::new(cell)
    }

    /// Non-blocking guard-based write attempt.
    pub fn try_write(&self, partition: usize) -> Option<WriteGuard<'_, B>> {
        let cell = self.cell(partition);
        if cell.backend().try_acquire_write() {
            cell.record(LockMode::Write);
            Some(WriteGuard::new(cell))
        } else {
            None
        }
    }

    /// Whether `partition` currently has no reader and no writer.
    ///
    /// Diagnostic only: the answer can be stale by the time it returns.
    pub fn is_unlocked(&self, partition: usize) -> bool {
        self.cell(partition).backend().is_idle()
    }
}

impl<B: LockBackend> Drop for PartitionedRwLock<B> {
    fn drop(&mut self) {
        let held = self
            .cells
            .iter()
            .filter(|cell| !cell.backend().is_idle())
            .count();
        if held > 0 {
            log::warn!(
                "partitioned rwlock dropped with {} of {} partitions still held",
                held,
                self.cells.len()
            );
        }
    }
}
