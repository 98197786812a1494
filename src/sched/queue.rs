use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crossbeam_deque::{Injector, Steal};

/// An unbounded FIFO of jobs shared between the producers and the worker threads.
/// Workers that found the queue empty could park on it with `wait_timeout`.
pub struct JobQueue<T> {
    injector: Injector<T>,
    watcher: Watcher,
    terminated: AtomicBool,
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        JobQueue {
            injector: Injector::new(),
            watcher: Watcher(Mutex::new(()), Condvar::new()),
            terminated: AtomicBool::new(false),
        }
    }

    /// Push a job into the queue; it will be taken by whatever worker has nothing to do.
    pub fn push(&self, job: T) {
        self.injector.push(job);
        self.watcher.notify_one();
    }

    /// Pops the oldest job in the queue.
    pub fn pop(&self) -> Option<T> {
        loop {
            match self.injector.steal() {
                Steal::Success(job) => return Some(job),
                Steal::Empty => return None,
                Steal::Retry => {}
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.injector.is_empty()
    }

    /// Blocks current thread until a job has been pushed, the queue is terminated
    /// or `ms` milliseconds elapsed.
    pub fn wait_timeout(&self, ms: u64) {
        self.watcher
            .wait_timeout(ms, || self.is_empty() && !self.is_terminated());
    }

    /// Signals all the workers parked on this queue to quit.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
        self.watcher.notify_all();
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl<T> Default for JobQueue<T> {
    fn default() -> Self {
        JobQueue::new()
    }
}

struct Watcher(Mutex<()>, Condvar);

impl Watcher {
    #[inline]
    fn wait_timeout<F: Fn() -> bool>(&self, ms: u64, idle: F) {
        let duration = Duration::from_millis(ms);
        let v = self.0.lock().unwrap();

        // The condition is checked under the lock, so a notification sent between
        // the check and the wait could not be lost.
        if idle() {
            let _ = self.1.wait_timeout(v, duration);
        }
    }

    #[inline]
    fn notify_one(&self) {
        let _v = self.0.lock().unwrap();
        self.1.notify_one()
    }

    #[inline]
    fn notify_all(&self) {
        let _v = self.0.lock().unwrap();
        self.1.notify_all()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fifo() {
        let queue = JobQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);

        for i in 0..4 {
            queue.push(i);
        }

        assert!(!queue.is_empty());
        for i in 0..4 {
            assert_eq!(queue.pop(), Some(i));
        }

        assert!(queue.is_empty());
    }

    #[test]
    fn terminate() {
        let queue = JobQueue::<u32>::new();
        assert!(!queue.is_terminated());

        queue.terminate();
        assert!(queue.is_terminated());

        // Returns immediately once terminated.
        queue.wait_timeout(60_000);
    }
}
