use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// We define various kinds of latches, which are all a primitive signaling
/// mechanism. A latch starts as false. Eventually someone calls `set()` and
/// it becomes true. You can test if it has been set by calling `is_set()`.
pub trait Latch {
    /// Set the latch, signalling others.
    fn set(&self);
    /// Test if the latch is set.
    fn is_set(&self) -> bool;
}

/// A Latch starts as false and eventually becomes true. You can block until
/// it becomes true. Unlike the one-shot latches, a `LockLatch` could be reset
/// and reused.
#[derive(Debug, Default)]
pub struct LockLatch {
    m: Mutex<bool>,
    v: Condvar,
}

impl LockLatch {
    #[inline]
    pub fn new() -> LockLatch {
        LockLatch {
            m: Mutex::new(false),
            v: Condvar::new(),
        }
    }

    /// Block until latch is set.
    pub fn wait(&self) {
        let mut guard = self.m.lock().unwrap();
        while !*guard {
            guard = self.v.wait(guard).unwrap();
        }
    }

    /// Block until latch is set or `timeout` elapsed. Returns true if the latch
    /// has been set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.m.lock().unwrap();

        while !*guard {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            guard = self.v.wait_timeout(guard, deadline - now).unwrap().0;
        }

        true
    }

    /// Resets the latch to false, returns the previous state.
    pub fn reset(&self) -> bool {
        let mut guard = self.m.lock().unwrap();
        ::std::mem::replace(&mut *guard, false)
    }
}

impl Latch for LockLatch {
    #[inline]
    fn set(&self) {
        let mut guard = self.m.lock().unwrap();
        *guard = true;
        self.v.notify_all();
    }

    #[inline]
    fn is_set(&self) -> bool {
        *self.m.lock().unwrap()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn wait_timeout() {
        let latch = LockLatch::new();
        assert!(!latch.wait_timeout(Duration::from_millis(5)));

        latch.set();
        assert!(latch.is_set());
        assert!(latch.wait_timeout(Duration::from_millis(5)));

        assert!(latch.reset());
        assert!(!latch.is_set());
    }

    #[test]
    fn cross_thread() {
        let latch = Arc::new(LockLatch::new());
        let tx = latch.clone();
        let handle = thread::spawn(move || tx.set());

        latch.wait();
        handle.join().unwrap();
        assert!(latch.is_set());
    }
}
