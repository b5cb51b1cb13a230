//! Counting semaphore.
//!
//! The standard library has no semaphore; the tick/LOD handoff needs one
//! with try- and timeout-wait variants.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// A counting semaphore over a mutex and condvar.
#[derive(Debug)]
pub struct Semaphore {
    count: Mutex<u32>,
    condvar: Condvar,
}

impl Semaphore {
    /// Create a semaphore with an initial permit count.
    #[must_use]
    pub fn new(initial: u32) -> Self {
        Self {
            count: Mutex::new(initial),
            condvar: Condvar::new(),
        }
    }

    /// Add one permit and wake a waiter.
    pub fn signal(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
        drop(count);
        self.condvar.notify_one();
    }

    /// Block until a permit is available, then take it.
    pub fn wait(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        while *count == 0 {
            count = self
                .condvar
                .wait(count)
                .unwrap_or_else(|e| e.into_inner());
        }
        *count -= 1;
    }

    /// Take a permit if one is available right now. Returns `true` on
    /// success.
    pub fn try_wait(&self) -> bool {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    /// Wait up to `timeout` for a permit. Returns `true` if one was taken.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        let deadline = std::time::Instant::now() + timeout;
        while *count == 0 {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, result) = self
                .condvar
                .wait_timeout(count, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            count = guard;
            if result.timed_out() && *count == 0 {
                return false;
            }
        }
        *count -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_initial_permits() {
        let semaphore = Semaphore::new(2);
        assert!(semaphore.try_wait());
        assert!(semaphore.try_wait());
        assert!(!semaphore.try_wait());
    }

    #[test]
    fn test_signal_wakes_waiter() {
        let semaphore = Arc::new(Semaphore::new(0));
        let waiter = Arc::clone(&semaphore);
        let handle = std::thread::spawn(move || {
            waiter.wait();
        });
        semaphore.signal();
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_timeout_expires() {
        let semaphore = Semaphore::new(0);
        assert!(!semaphore.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_wait_timeout_takes_permit() {
        let semaphore = Semaphore::new(1);
        assert!(semaphore.wait_timeout(Duration::from_millis(10)));
        assert!(!semaphore.try_wait());
    }
}
