use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::errors::*;
use crate::sched::{JobQueue, Latch, LockLatch};

use super::loader::Loader;
use super::table::ResourceState;
use super::worker::{self, Job, Shared};

/// A background thread which compares the modification time of every `Active` or
/// `Failed` resource with the one recorded by its last load attempt, and pushes a
/// new load job for the resources that have been changed on disk.
pub struct Watcher {
    terminated: Arc<AtomicBool>,
    wakeup: Arc<LockLatch>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Watcher {
    pub fn new<L: Loader>(
        shared: Arc<Shared<L>>,
        queue: Arc<JobQueue<Job>>,
        timeslice: Arc<AtomicU32>,
    ) -> Result<Self> {
        let terminated = Arc::new(AtomicBool::new(false));
        let wakeup = Arc::new(LockLatch::new());

        let (t, w) = (terminated.clone(), wakeup.clone());
        let handle = thread::Builder::new()
            .name("resman-watcher".into())
            .spawn(move || loop {
                let ms = timeslice.load(Ordering::Relaxed).max(1);
                if w.wait_timeout(Duration::from_millis(u64::from(ms))) {
                    w.reset();
                    if t.load(Ordering::SeqCst) {
                        return;
                    }

                    // Woken up by a new timeslice, restarts the sleep with it.
                    continue;
                }

                scan(&shared, &queue);
            })
            .map_err(Error::SpawnThread)?;

        Ok(Watcher {
            terminated,
            wakeup,
            handle: Some(handle),
        })
    }

    /// Interrupts the current sleep of watcher thread, so a changed timeslice takes
    /// effect immediately.
    pub fn wakeup(&self) {
        self.wakeup.set();
    }

    /// Stops the watcher thread and blocks until it exits.
    pub fn terminate(&mut self) {
        self.terminated.store(true, Ordering::SeqCst);
        self.wakeup.set();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("The file watcher exited with panic.");
            }
        }
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Scans the watched resources once, returns the number of re-queued resources.
pub fn scan<L: Loader>(shared: &Shared<L>, queue: &JobQueue<Job>) -> usize {
    let watched = shared.table.lock().unwrap().watched();

    // Stats files without holding the table lock.
    let changed: Vec<_> = watched
        .into_iter()
        .filter(|(_, path, ts)| worker::modified(path) > *ts)
        .collect();

    if changed.is_empty() {
        return 0;
    }

    // Marks the candidates as outstanding before they become `Queued`, so `wait_job`
    // and `wait_all` never observe a queued resource without a job.
    for (id, _, _) in &changed {
        shared.completions.begin(*id);
    }

    let mut jobs = Vec::with_capacity(changed.len());
    let mut skipped = Vec::new();
    {
        let mut table = shared.table.lock().unwrap();
        for (id, path, ts) in changed {
            match table.get_mut(id) {
                Some(record) if record.state.is_watched() && record.modified == ts => {
                    trace!("{:?} has been modified, reloads {}.", path, id);
                    record.state = ResourceState::Queued;
                    jobs.push(Job { id, path });
                }
                _ => skipped.push(id),
            }
        }
    }

    for id in skipped {
        shared.completions.cancel(id);
    }

    let num = jobs.len();
    for job in jobs {
        queue.push(job);
    }

    if num > 0 {
        shared.notifier.notify();
    }

    num
}
