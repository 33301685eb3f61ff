//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is a monotone flag plus a wakeable wait. Signaling
//! it never preempts an in-flight syscall; it only makes the next checkpoint
//! (loop iteration, backend call entry, watcher wait) observe the signal and
//! raise [`FsErrorKind::Cancelled`](crate::error::FsErrorKind::Cancelled).
//! There is no reset: once set, a token stays set for its lifetime.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::error::{FsError, Result};

#[derive(Default)]
struct Inner {
    signalled: Mutex<bool>,
    condvar: Condvar,
}

/// A shareable, cloneable cancellation flag.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag. Idempotent; wakes any thread blocked in `wait_timeout`.
    pub fn signal(&self) {
        let mut guard = self.inner.signalled.lock().unwrap();
        *guard = true;
        self.inner.condvar.notify_all();
    }

    pub fn is_set(&self) -> bool {
        *self.inner.signalled.lock().unwrap()
    }

    /// Block for up to `timeout`, waking early if signalled.
    ///
    /// Returns `true` iff woken by cancellation (as opposed to the timeout
    /// elapsing).
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.inner.signalled.lock().unwrap();
        if *guard {
            return true;
        }
        let (guard, _) = self
            .inner
            .condvar
            .wait_timeout(guard, timeout)
            .unwrap();
        *guard
    }

    /// Convenience checkpoint: returns `Err(Cancelled)` if the token is set.
    pub fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(FsError::cancelled())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn starts_unset() {
        let token = CancellationToken::new();
        assert!(!token.is_set());
        assert!(token.check().is_ok());
    }

    #[test]
    fn signal_is_observed_immediately() {
        let token = CancellationToken::new();
        token.signal();
        assert!(token.is_set());
        assert!(token.check().unwrap_err().is_cancelled());
    }

    #[test]
    fn signal_is_monotone() {
        let token = CancellationToken::new();
        token.signal();
        token.signal();
        assert!(token.is_set());
    }

    #[test]
    fn wait_timeout_returns_false_when_not_signalled() {
        let token = CancellationToken::new();
        let start = Instant::now();
        let woken = token.wait_timeout(Duration::from_millis(50));
        assert!(!woken);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn wait_timeout_wakes_early_on_signal() {
        let token = CancellationToken::new();
        let signaller = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            signaller.signal();
        });
        let woken = token.wait_timeout(Duration::from_secs(5));
        handle.join().unwrap();
        assert!(woken);
    }
}
