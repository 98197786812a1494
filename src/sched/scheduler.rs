use std::sync::Arc;
use std::thread;

use super::queue::JobQueue;
use crate::errors::*;

/// A fixed set of worker threads. Every worker pops jobs from the shared `JobQueue`
/// and feeds them into the same handler until the queue is terminated.
pub struct Scheduler<T: Send + 'static> {
    queue: Arc<JobQueue<T>>,
    threads: Vec<thread::JoinHandle<()>>,
}

impl<T: Send + 'static> Scheduler<T> {
    /// Spawns `num` workers named `{name}-{index}`. Fails if any of the threads could
    /// not be created, the threads that were spawned already are shut down.
    pub fn new<F>(
        name: &str,
        num: usize,
        stack_size: Option<usize>,
        queue: Arc<JobQueue<T>>,
        func: F,
    ) -> Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        let mut scheduler = Scheduler {
            queue,
            threads: Vec::with_capacity(num),
        };

        for i in 0..num {
            let mut b = thread::Builder::new().name(format!("{}-{}", name, i));
            if let Some(stack_size) = stack_size {
                b = b.stack_size(stack_size);
            }

            let queue = scheduler.queue.clone();
            let func = func.clone();
            let handle = b
                .spawn(move || Scheduler::main_loop(&queue, &*func))
                .map_err(Error::SpawnThread)?;

            scheduler.threads.push(handle);
        }

        Ok(scheduler)
    }

    /// Signals the workers to quit and blocks current thread until all of them
    /// finished their current job gracefully. Jobs left in the queue are dropped
    /// without being executed.
    pub fn terminate(&mut self) {
        self.queue.terminate();

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                warn!("A worker thread exited with panic.");
            }
        }
    }

    fn main_loop<F: Fn(T)>(queue: &JobQueue<T>, func: &F) {
        let mut ms = 1;

        while !queue.is_terminated() {
            if let Some(job) = queue.pop() {
                func(job);
                ms = 1;
            } else {
                queue.wait_timeout(ms);
                ms = (ms * 2).min(48);
            }
        }
    }
}

impl<T: Send + 'static> Drop for Scheduler<T> {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[test]
    fn execute() {
        let counter = Arc::new(AtomicUsize::new(0));
        let queue = Arc::new(JobQueue::new());

        let c = counter.clone();
        let mut scheduler = Scheduler::new("test", 4, None, queue.clone(), move |v: usize| {
            c.fetch_add(v, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(scheduler.threads.len(), 4);
        for i in 1..=100 {
            queue.push(i);
        }

        let ts = Instant::now();
        while counter.load(Ordering::SeqCst) != 5050 {
            assert!(ts.elapsed() < Duration::from_secs(10), "deadlock found!");
            thread::sleep(Duration::from_millis(1));
        }

        scheduler.terminate();
        assert!(scheduler.threads.is_empty());
    }
}
