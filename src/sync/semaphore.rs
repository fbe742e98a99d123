/*!
 * Admission Signal
 * Counting semaphore built on parking_lot Mutex + Condvar
 *
 * Each commission owns one signal, initialized to zero and raised to seat
 * capacity by the commission itself once its worker pool is live. Candidates
 * decrement it before scanning for a seat; the grading loop (and the seat
 * allocator's race fallback) increment it.
 */

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Counting semaphore limiting concurrent seat occupancy
pub struct AdmissionSignal {
    permits: Mutex<usize>,
    available: Condvar,
}

impl AdmissionSignal {
    /// Create a signal with an initial permit count
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.available.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Take a permit, waiting at most `timeout`; returns false on timeout
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut permits = self.permits.lock();
        while *permits == 0 {
            if self.available.wait_until(&mut permits, deadline).timed_out() && *permits == 0 {
                return false;
            }
        }
        *permits -= 1;
        true
    }

    /// Return one permit and wake a waiter
    pub fn release(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        self.available.notify_one();
    }

    /// Current permit count
    pub fn permits(&self) -> usize {
        *self.permits.lock()
    }
}
