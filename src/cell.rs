/*!
 * Partition Cell
 *
 * The per-partition unit of state: the backend's lock word or primitive
 * plus the held-mode tag that index-addressed `unlock` dispatches on.
 * Cells are stored `CachePadded` in the table so neighbors never share
 * a cache line.
 */

use crate::backend::{LockBackend, LockMode};
use std::sync::atomic::{AtomicU8, Ordering};

const MODE_NONE: u8 = 0;
const MODE_READ: u8 = 1;
const MODE_WRITE: u8 = 2;

/// One partition's lock state.
///
/// The `held` tag records the most recent successful acquisition on the
/// cell by any caller. It is a dispatch hint, not a capability token: it
/// is not cleared on unlock, and two sessions releasing different
/// acquisitions on one cell race on it (see `PartitionedRwLock::unlock`).
pub(crate) struct LockCell<B> {
    backend: B,
    held: AtomicU8,
}

impl<B: LockBackend> LockCell<B> {
    pub(crate) fn new() -> Self {
        Self {
            backend: B::default(),
            held: AtomicU8::new(MODE_NONE),
        }
    }

    #[inline]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Record a successful acquisition. Relaxed: the tag is a hint and
    /// carries no payload; the backend's own ordering publishes the lock.
    #[inline]
    pub(crate) fn record(&self, mode: LockMode) {
        let tag = match mode {
            LockMode::Read => MODE_READ,
            LockMode::Write => MODE_WRITE,
        };
        self.held.store(tag, Ordering::Relaxed);
    }

    /// Mode of the most recent successful acquisition, if any.
    #[inline]
    pub(crate) fn held(&self) -> Option<LockMode> {
        match self.held.load(Ordering::Relaxed) {
            MODE_READ => Some(LockMode::Read),
            MODE_WRITE => Some(LockMode::Write),
            _ => None,
        }
    }
}
