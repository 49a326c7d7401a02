/*!
 * Lock Backend Strategies
 *
 * Three interchangeable acquisition engines for a single partition cell:
 * - Host-delegated (platform rwlock via parking_lot)
 * - Loop-integrated (runtime semaphore in the reader-permit arrangement)
 * - Atomic-counter (lock-free, busy-wait writer protocol)
 *
 * # Design: Generic Parameter Over Per-Call Branching
 *
 * The backend is chosen once, as a type parameter on the table. Every
 * operation monomorphizes down to direct calls on the selected backend —
 * no mode field, no discriminant check on the hot path.
 */

mod atomic;
mod event_loop;
mod host;

pub use atomic::AtomicBackend;
pub use event_loop::LoopBackend;
pub use host::HostBackend;

/// Mode of a single successful acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Read,
    Write,
}

/// Acquisition engine for one partition cell.
///
/// Implementations must be thread-safe: any number of threads may call
/// any combination of these methods on the same cell concurrently.
/// Blocking acquisitions have no timeout or cancellation; a blocked or
/// spinning caller stays put until the cell becomes available.
///
/// `try_*` methods never block beyond one atomic operation or one
/// non-blocking host call.
pub trait LockBackend: Default + Send + Sync + 'static {
    /// Strategy name for diagnostics and logging.
    const NAME: &'static str;

    /// Block until no writer holds the cell, then join the readers.
    fn acquire_read(&self);

    /// Single non-blocking read attempt. Returns `true` on acquisition.
    fn try_acquire_read(&self) -> bool;

    /// Block until the cell is fully unheld, then hold it exclusively.
    fn acquire_write(&self);

    /// Single non-blocking write attempt. Returns `true` on acquisition.
    fn try_acquire_write(&self) -> bool;

    /// Release one acquisition of `mode`.
    ///
    /// # Safety
    ///
    /// The caller must currently hold one matching acquisition of `mode`
    /// on this cell, obtained from the same backend instance. Releasing
    /// a mode that is not held corrupts the cell's exclusion protocol.
    unsafe fn release(&self, mode: LockMode);

    /// Whether the cell currently has no reader and no writer.
    ///
    /// Diagnostic only: the answer can be stale by the time it returns.
    fn is_idle(&self) -> bool;
}
