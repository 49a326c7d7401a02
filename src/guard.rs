/*!
 * Acquisition Guards
 *
 * Per-acquisition RAII tokens. Unlike the index-addressed facade, each
 * guard remembers the mode of its own acquisition and releases exactly
 * that on drop, so concurrent sessions on one cell cannot dispatch each
 * other's release.
 */

use crate::backend::{LockBackend, LockMode};
use crate::cell::LockCell;

/// Holds one read acquisition on a partition; released on drop.
pub struct ReadGuard<'a, B: LockBackend> {
    cell: &'a LockCell<B>,
}

impl<'a, B: LockBackend> ReadGuard<'a, B> {
    pub(crate) fn new(cell: &'a LockCell<B>) -> Self {
        Self { cell }
    }
}

impl<B: LockBackend> Drop for ReadGuard<'_, B> {
    fn drop(&mut self) {
        // The guard is the capability: constructed only after a
        // successful read acquisition, consumed exactly once here.
        unsafe { self.cell.backend().release(LockMode::Read) };
    }
}

/// Holds the write acquisition on a partition; released on drop.
pub struct WriteGuard<'a, B: LockBackend> {
    cell: &'a LockCell<B>,
}

impl<'a, B: LockBackend> WriteGuard<'a, B> {
    pub(crate) fn new(cell: &'a LockCell<B>) -> Self {
        Self { cell }
    }
}

impl<B: LockBackend> Drop for WriteGuard<'_, B> {
    fn drop(&mut self) {
        unsafe { self.cell.backend().release(LockMode::Write) };
    }
}
