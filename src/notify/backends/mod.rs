mod headless;

use std::io;
use std::time::Duration;

use super::{WaitFd, WaitHandle};

/// The platform specific readiness source.
pub trait Visitor: Send + Sync {
    /// Marks the source as ready. Signalling an already ready source is a no-op.
    fn notify(&self);
    /// Consumes the readiness, the source will not be ready until next `notify`.
    fn clear(&self);
    /// Blocks current thread until the source is ready or `timeout` elapsed. Returns
    /// true if the source is ready. The readiness is NOT consumed.
    fn wait(&self, timeout: Option<Duration>) -> io::Result<bool>;

    /// The descriptors which become readable once the source is ready.
    fn fds(&self) -> &[WaitFd] {
        &[]
    }

    /// The handles which become signalled once the source is ready.
    fn handles(&self) -> &[WaitHandle] {
        &[]
    }
}

pub fn new_headless() -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new())
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use self::unix::new;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::new;

#[cfg(not(any(unix, windows)))]
pub fn new() -> io::Result<Box<dyn Visitor>> {
    Ok(new_headless())
}
