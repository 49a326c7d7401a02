/*!
 * Atomic-Counter Backend
 *
 * Lock-free reader-writer state in a single signed 32-bit word:
 *
 * - `0` — unheld
 * - `n > 0` — `n` readers hold the cell
 * - sign bit set — a writer is pending; in-flight readers may still be
 *   draining (`n + i32::MIN`), and no new reader can join
 * - `i32::MIN` exactly — pending with all readers drained
 * - `WRITE_HELD` (`-1`) — one writer holds the cell
 *
 * Writer acquisition is two-phase: fetch-or the pending bit (any reader
 * attempt now observes a negative word and backs off), then spin-yield
 * until the drained state swaps to held. A writer that loses the drained
 * swap to an overtaking writer re-arms the pending bit once the winner
 * releases; overtake is permitted, writer queuing is not.
 */

use super::{LockBackend, LockMode};
use crate::spin::SpinWait;
use std::sync::atomic::{AtomicI32, Ordering};

/// Sign bit: a writer has claimed the cell and readers are draining.
const WRITE_PENDING: i32 = i32::MIN;

/// One writer holds the cell.
const WRITE_HELD: i32 = -1;

/// Lock-free counter backend.
///
/// Blocking acquisitions busy-wait with a bounded spin-then-yield policy
/// (`crate::spin`) instead of parking; best suited to short critical
/// sections where the hold time is comparable to a context switch.
pub struct AtomicBackend {
    state: AtomicI32,
}

impl Default for AtomicBackend {
    fn default() -> Self {
        Self {
            state: AtomicI32::new(0),
        }
    }
}

impl AtomicBackend {
    /// Raw state word, for tests and drop-time diagnostics.
    #[cfg(test)]
    pub(crate) fn raw_state(&self) -> i32 {
        self.state.load(Ordering::Relaxed)
    }
}

impl LockBackend for AtomicBackend {
    const NAME: &'static str = "atomic";

    fn acquire_read(&self) {
        let mut spin = SpinWait::new();
        loop {
            let observed = self.state.load(Ordering::Relaxed);
            if observed < 0 {
                // Writer pending or held; no new readers until it clears.
                spin.wait();
                continue;
            }
            // Re-check after any failure: a writer may have set the
            // pending bit between the load and the swap.
            if self
                .state
                .compare_exchange_weak(observed, observed + 1, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
        }
    }

    fn try_acquire_read(&self) -> bool {
        let observed = self.state.load(Ordering::Relaxed);
        observed >= 0
            && self
                .state
                .compare_exchange(observed, observed + 1, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
    }

    fn acquire_write(&self) {
        let mut spin = SpinWait::new();
        loop {
            // Phase 1: claim the pending bit. Readers already inside keep
            // their counts in the low bits; nobody new gets in.
            self.state.fetch_or(WRITE_PENDING, Ordering::AcqRel);

            // Phase 2: wait for the in-flight readers to drain, then take
            // the cell in one swap.
            loop {
                match self.state.compare_exchange(
                    WRITE_PENDING,
                    WRITE_HELD,
                    Ordering::Acquire,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return,
                    // An overtaking writer won the drained swap and has
                    // since released; the pending bit went with it.
                    Err(current) if current >= 0 => break,
                    Err(_) => spin.wait(),
                }
            }
        }
    }

    fn try_acquire_write(&self) -> bool {
        // Single swap from fully unheld straight to held; no pending
        // phase, no retry.
        self.state
            .compare_exchange(0, WRITE_HELD, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn release(&self, mode: LockMode) {
        match mode {
            // Works with the pending bit set: the drained value is
            // reached when the last reader subtracts out.
            LockMode::Read => {
                self.state.fetch_sub(1, Ordering::Release);
            }
            // Clears any pending bit a waiting writer re-arms on its own.
            LockMode::Write => self.state.store(0, Ordering::Release),
        }
    }

    #[inline]
    fn is_idle(&self) -> bool {
        self.state.load(Ordering::Relaxed) == 0
    }
}
