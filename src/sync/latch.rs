//! Manual-reset wait/notify primitive.
//!
//! A [`Latch`] is a level-triggered event: `signal()` sets a flag and wakes
//! every blocked waiter, and the flag stays set until an explicit `reset()`,
//! releasing late waiters immediately. This is what makes the channel's
//! unlock-then-wait sequence safe: a signal that lands between the unlock
//! and the wait is not lost.

use std::sync::{Condvar, Mutex, PoisonError};
use thiserror::Error;

/// Failure of an underlying synchronization primitive.
///
/// The only representable failure in safe Rust is a lock poisoned by a
/// panicked thread. Callers treat it as fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    #[error("synchronization primitive poisoned by a panicked thread")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for SyncError {
    fn from(_: PoisonError<T>) -> Self {
        SyncError::Poisoned
    }
}

/// Manual-reset, multi-waiter, level-triggered event.
pub struct Latch {
    signaled: Mutex<bool>,
    cond: Condvar,
}

impl Latch {
    /// Creates a cleared latch.
    pub fn new() -> Self {
        Self {
            signaled: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Sets the flag and wakes every thread currently blocked in [`wait`].
    ///
    /// Idempotent beyond the re-broadcast: signaling an already-signaled
    /// latch changes nothing.
    ///
    /// [`wait`]: Latch::wait
    pub fn signal(&self) {
        // The flag is a plain bool; a poisoned guard cannot leave it in an
        // inconsistent state, so recover the inner value.
        let mut signaled = self
            .signaled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *signaled = true;
        self.cond.notify_all();
    }

    /// Clears the flag.
    ///
    /// Waits that already observed the flag as true have already returned;
    /// this only affects future waits.
    pub fn reset(&self) {
        let mut signaled = self
            .signaled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *signaled = false;
    }

    /// Blocks until the flag is true; returns immediately if it already is.
    pub fn wait(&self) -> Result<(), SyncError> {
        let mut signaled = self.signaled.lock()?;
        while !*signaled {
            signaled = self.cond.wait(signaled)?;
        }
        Ok(())
    }

    /// Non-blocking view of the flag.
    pub fn is_signaled(&self) -> bool {
        *self
            .signaled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_after_signal_does_not_block() {
        let latch = Latch::new();
        latch.signal();
        latch.wait().unwrap();
    }

    #[test]
    fn double_signal_behaves_as_one() {
        let latch = Latch::new();
        latch.signal();
        latch.signal();
        latch.wait().unwrap();
        assert!(latch.is_signaled());
    }

    #[test]
    fn reset_after_signal_blocks_next_wait() {
        let latch = Arc::new(Latch::new());
        latch.signal();
        latch.reset();
        assert!(!latch.is_signaled());

        let waiter = {
            let latch = latch.clone();
            thread::spawn(move || latch.wait())
        };

        // The waiter must still be blocked on the cleared latch.
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        latch.signal();
        waiter.join().unwrap().unwrap();
    }

    #[test]
    fn one_signal_releases_all_waiters() {
        let latch = Arc::new(Latch::new());
        let released = Arc::new(AtomicUsize::new(0));
        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let latch = latch.clone();
                let released = released.clone();
                thread::spawn(move || {
                    latch.wait().unwrap();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        // Let every waiter reach the condvar before the single signal.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        latch.signal();
        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 8);
    }
}
