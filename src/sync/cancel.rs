/*!
 * Cancellation Token
 * Cooperative cancellation with flag-and-wake semantics
 *
 * Replaces asynchronous signal handlers: the only asynchronous operation is
 * setting the flag and waking blocked waiters. Participants check the token
 * at defined suspension points and never interrupt a critical section.
 */

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Inner {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Cloneable cancellation handle shared between a participant and its parent
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                lock: Mutex::new(()),
                wake: Condvar::new(),
            }),
        }
    }

    /// Set the flag and wake every blocked waiter; idempotent
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            let _guard = self.inner.lock.lock();
            self.inner.wake.notify_all();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Cancellable sleep; returns false when woken by cancellation
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }

        let deadline = Instant::now() + duration;
        let mut guard = self.inner.lock.lock();
        while !self.is_cancelled() {
            if Instant::now() >= deadline {
                break;
            }
            self.inner.wake.wait_until(&mut guard, deadline);
        }
        !self.is_cancelled()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sleep_completes_without_cancellation() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert!(token.sleep(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_cancel_wakes_sleeper_early() {
        let token = CancelToken::new();
        let sleeper = {
            let token = token.clone();
            thread::spawn(move || token.sleep(Duration::from_secs(5)))
        };

        thread::sleep(Duration::from_millis(20));
        token.cancel();

        assert!(!sleeper.join().unwrap());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(!token.sleep(Duration::from_millis(1)));
    }
}
