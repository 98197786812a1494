use std::io;
use std::time::Duration;

use crate::sched::{Latch, LockLatch};

use super::Visitor;

/// A readiness source without any OS primitive, it could only be waited with
/// `Visitor::wait`.
pub struct HeadlessVisitor {
    latch: LockLatch,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        HeadlessVisitor {
            latch: LockLatch::new(),
        }
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn notify(&self) {
        self.latch.set();
    }

    #[inline]
    fn clear(&self) {
        self.latch.reset();
    }

    fn wait(&self, timeout: Option<Duration>) -> io::Result<bool> {
        match timeout {
            Some(timeout) => Ok(self.latch.wait_timeout(timeout)),
            None => {
                self.latch.wait();
                Ok(true)
            }
        }
    }
}
