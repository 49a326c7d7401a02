/*!
 * Bounded Spin-Then-Yield Waiter
 *
 * Two-phase backoff for the atomic backend's blocking paths: a tight
 * spin with the hardware hint while the wait is likely short, then
 * yielding to the scheduler so a contended partition does not burn a
 * core. There is no park phase — the counter protocol has no waker to
 * cut a sleep short.
 */

use std::thread;

/// Spin-phase iterations before each wait becomes a scheduler yield.
///
/// Tunable: raise for workloads with very short critical sections on
/// many cores, lower for oversubscribed machines.
pub const SPIN_LIMIT: u32 = 64;

/// Per-wait backoff state. Create one per acquisition attempt.
pub struct SpinWait {
    spins: u32,
}

impl SpinWait {
    pub const fn new() -> Self {
        Self { spins: 0 }
    }

    /// Burn one backoff step: spin hint below `SPIN_LIMIT`, yield after.
    #[inline]
    pub fn wait(&mut self) {
        if self.spins < SPIN_LIMIT {
            self.spins += 1;
            std::hint::spin_loop();
        } else {
            thread::yield_now();
        }
    }

    /// Restart the spin phase (for example after observing progress).
    #[inline]
    pub fn reset(&mut self) {
        self.spins = 0;
    }
}

impl Default for SpinWait {
    fn default() -> Self {
        Self::new()
    }
}
