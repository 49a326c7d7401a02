/*!
 * Host-Delegated Backend
 *
 * Wraps the platform reader-writer lock. The raw (`lock_api`) form is
 * used rather than the guard form because the table releases by
 * partition index, so there is no guard value to return the lock with.
 */

use super::{LockBackend, LockMode};
use parking_lot::lock_api::RawRwLock as RawRwLockApi;
use parking_lot::RawRwLock;

/// Platform rwlock backend.
///
/// Fairness and writer-starvation behavior are whatever the host lock
/// provides; parking_lot's eventual-fairness policy applies here.
pub struct HostBackend {
    raw: RawRwLock,
}

impl Default for HostBackend {
    fn default() -> Self {
        Self {
            raw: RawRwLockApi::INIT,
        }
    }
}

impl LockBackend for HostBackend {
    const NAME: &'static str = "host";

    #[inline]
    fn acquire_read(&self) {
        self.raw.lock_shared();
    }

    #[inline]
    fn try_acquire_read(&self) -> bool {
        self.raw.try_lock_shared()
    }

    #[inline]
    fn acquire_write(&self) {
        self.raw.lock_exclusive();
    }

    #[inline]
    fn try_acquire_write(&self) -> bool {
        self.raw.try_lock_exclusive()
    }

    #[inline]
    unsafe fn release(&self, mode: LockMode) {
        match mode {
            LockMode::Read => self.raw.unlock_shared(),
            LockMode::Write => self.raw.unlock_exclusive(),
        }
    }

    #[inline]
    fn is_idle(&self) -> bool {
        !self.raw.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_shared() {
        let backend = HostBackend::default();

        backend.acquire_read();
        assert!(backend.try_acquire_read());
        assert!(!backend.try_acquire_write());

        unsafe {
            backend.release(LockMode::Read);
            backend.release(LockMode::Read);
        }
        assert!(backend.is_idle());
    }

    #[test]
    fn write_is_exclusive() {
        let backend = HostBackend::default();

        backend.acquire_write();
        assert!(!backend.try_acquire_read());
        assert!(!backend.try_acquire_write());

        unsafe { backend.release(LockMode::Write) };
        assert!(backend.try_acquire_write());
        unsafe { backend.release(LockMode::Write) };
    }
}
