//! The readiness notifier. Workers and the file watcher signal it whenever there is
//! something worth a `ResourceManager::poll`, and the thread which owns the manager
//! waits on it.
//!
//! The notifier is backed by a single OS primitive per platform:
//!
//! 1. On unix, a non-blocking self-pipe. Its read end is exported with `wait_fds`.
//! 2. On windows, a manual-reset event object exported with `wait_handles`.
//! 3. Elsewhere, a plain mutex/condvar latch that could only be waited in-process.
//!
//! Exactly one of `wait_fds` and `wait_handles` returns a non-empty slice on a given
//! platform, so a host event loop could multiplex it alongside its own I/O.

pub mod backends;

use std::time::Duration;

use crate::errors::*;

use self::backends::Visitor;

/// A file descriptor that becomes readable when the notifier is signalled.
pub type WaitFd = std::os::raw::c_int;
/// A native handle that becomes signalled when the notifier is signalled.
pub type WaitHandle = *mut std::ffi::c_void;

pub struct Notifier {
    visitor: Box<dyn Visitor>,
}

impl Notifier {
    /// Creates a notifier with the native backend of current platform.
    pub fn new() -> Result<Self> {
        let visitor = backends::new().map_err(Error::Notifier)?;
        Ok(Notifier { visitor })
    }

    /// Creates a notifier which is not backed by any OS primitive.
    #[cfg(test)]
    pub fn headless() -> Self {
        Notifier {
            visitor: backends::new_headless(),
        }
    }

    /// Marks the notifier as ready, waking up any waiter.
    #[inline]
    pub fn notify(&self) {
        self.visitor.notify();
    }

    /// Consumes the readiness.
    #[inline]
    pub fn clear(&self) {
        self.visitor.clear();
    }

    /// Blocks current thread until the notifier is ready.
    pub fn wait(&self) -> Result<()> {
        self.visitor.wait(None)?;
        Ok(())
    }

    /// Blocks current thread until the notifier is ready or `timeout` elapsed. Returns
    /// true if it is ready.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool> {
        Ok(self.visitor.wait(Some(timeout))?)
    }

    #[inline]
    pub fn wait_fds(&self) -> &[WaitFd] {
        self.visitor.fds()
    }

    #[inline]
    pub fn wait_handles(&self) -> &[WaitHandle] {
        self.visitor.handles()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn check(notifier: &Notifier) {
        assert!(!notifier.wait_timeout(Duration::from_millis(1)).unwrap());

        notifier.notify();
        notifier.notify();
        assert!(notifier.wait_timeout(Duration::from_millis(1)).unwrap());
        // Waiting does not consume readiness.
        assert!(notifier.wait_timeout(Duration::from_millis(1)).unwrap());

        notifier.clear();
        assert!(!notifier.wait_timeout(Duration::from_millis(1)).unwrap());
    }

    #[test]
    fn native() {
        let notifier = Notifier::new().unwrap();
        check(&notifier);

        #[cfg(unix)]
        {
            assert_eq!(notifier.wait_fds().len(), 1);
            assert!(notifier.wait_handles().is_empty());
        }

        #[cfg(windows)]
        {
            assert!(notifier.wait_fds().is_empty());
            assert_eq!(notifier.wait_handles().len(), 1);
        }
    }

    #[test]
    fn headless() {
        let notifier = Notifier::headless();
        check(&notifier);
        assert!(notifier.wait_fds().is_empty());
        assert!(notifier.wait_handles().is_empty());
    }

    #[test]
    fn cross_thread() {
        let notifier = Arc::new(Notifier::new().unwrap());
        let tx = notifier.clone();
        let handle = thread::spawn(move || tx.notify());

        notifier.wait().unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn saturate() {
        let notifier = Notifier::new().unwrap();
        for _ in 0..100_000 {
            notifier.notify();
        }

        notifier.clear();
        assert!(!notifier.wait_timeout(Duration::from_millis(1)).unwrap());
    }
}
