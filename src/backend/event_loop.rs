/*!
 * Loop-Integrated Backend
 *
 * Wraps the async runtime's reader-writer arrangement: a semaphore with
 * `WRITER_PERMITS` total permits, where a reader takes one permit and a
 * writer takes all of them. This is the arrangement `tokio::sync::RwLock`
 * uses internally; expressing it directly yields the forget/`add_permits`
 * release that an index-addressed unlock needs, and the runtime's FIFO
 * permit queue means a waiting writer is not starved by new readers.
 */

use super::{LockBackend, LockMode};
use futures::executor::block_on;
use tokio::sync::Semaphore;

/// Permits held by a writer; also the reader limit per cell.
const WRITER_PERMITS: u32 = u32::MAX >> 3;

/// Runtime semaphore backend.
///
/// Blocking calls drive the async acquire on the current thread (the
/// same shape as `tokio::sync::RwLock::blocking_read`). Do not call the
/// blocking operations from inside an async task; use `try_*` there.
pub struct LoopBackend {
    permits: Semaphore,
}

impl Default for LoopBackend {
    fn default() -> Self {
        Self {
            permits: Semaphore::new(WRITER_PERMITS as usize),
        }
    }
}

impl LockBackend for LoopBackend {
    const NAME: &'static str = "loop";

    fn acquire_read(&self) {
        // The semaphore is never closed, so acquire cannot fail.
        let permit = block_on(self.permits.acquire()).expect("semaphore never closed");
        permit.forget();
    }

    fn try_acquire_read(&self) -> bool {
        match self.permits.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    fn acquire_write(&self) {
        let permit =
            block_on(self.permits.acquire_many(WRITER_PERMITS)).expect("semaphore never closed");
        permit.forget();
    }

    fn try_acquire_write(&self) -> bool {
        match self.permits.try_acquire_many(WRITER_PERMITS) {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    unsafe fn release(&self, mode: LockMode) {
        let returned = match mode {
            LockMode::Read => 1,
            LockMode::Write => WRITER_PERMITS as usize,
        };
        self.permits.add_permits(returned);
    }

    fn is_idle(&self) -> bool {
        self.permits.available_permits() == WRITER_PERMITS as usize
    }
}
