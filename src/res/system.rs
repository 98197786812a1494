use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::*;
use crate::notify::{Notifier, WaitFd, WaitHandle};
use crate::sched::{JobQueue, Scheduler};
use crate::utils::FastHashMap;

use super::completion::CompletionQueue;
use super::id::ResourceId;
use super::loader::Loader;
use super::params::{ResOption, ResourceParams};
use super::table::{ResourceState, ResourceTable};
use super::watcher::Watcher;
use super::worker::{self, Job, Shared};

/// The main-thread half of a resource.
struct Slot<D> {
    name: Box<Path>,
    data: D,
}

/// The `ResourceManager` takes care of loading resource files asynchronously with
/// a pool of worker threads, finalizing them in the thread which calls `poll`, and
/// reloading them once they are modified on disk.
///
/// All the methods which take `&mut self` (`add`, `remove`, `poll` and the data
/// accessors) are the "main thread" side of the manager. The callbacks `done` and
/// `destroy` are only ever invoked from these methods, or from `drop`.
pub struct ResourceManager<L: Loader> {
    shared: Arc<Shared<L>>,
    queue: Arc<JobQueue<Job>>,
    scheduler: Scheduler<Job>,
    watcher: Option<Watcher>,
    timeslice: Arc<AtomicU32>,
    slots: FastHashMap<ResourceId, Slot<L::Data>>,
}

impl<L: Loader> ResourceManager<L> {
    /// Creates a new `ResourceManager` with default params.
    pub fn new(loader: L) -> Result<Self> {
        ResourceManager::with_params(loader, ResourceParams::default())
    }

    /// Creates a new `ResourceManager`. Fails if the worker threads, the watcher thread
    /// or the readiness notifier could not be created.
    pub fn with_params(loader: L, params: ResourceParams) -> Result<Self> {
        params.validate()?;

        let shared = Arc::new(Shared {
            loader,
            table: Mutex::new(ResourceTable::new()),
            completions: CompletionQueue::new(),
            notifier: Notifier::new()?,
        });

        let queue = Arc::new(JobQueue::new());

        let scheduler = {
            let shared = shared.clone();
            Scheduler::new(
                "resman-worker",
                params.workers,
                params.stack_size,
                queue.clone(),
                move |job| worker::execute(&shared, job),
            )?
        };

        let timeslice = Arc::new(AtomicU32::new(params.timeslice));
        let watcher = if params.watch {
            Some(Watcher::new(shared.clone(), queue.clone(), timeslice.clone())?)
        } else {
            None
        };

        info!(
            "Creates resource manager with {} workers (watch: {}).",
            params.workers, params.watch
        );

        Ok(ResourceManager {
            shared,
            queue,
            scheduler,
            watcher,
            timeslice,
            slots: FastHashMap::default(),
        })
    }

    /// Returns the callbacks of this manager.
    #[inline]
    pub fn loader(&self) -> &L {
        &self.shared.loader
    }

    /// Changes a runtime option. A new `ResOption::Timeslice` takes effect immediately,
    /// the watcher restarts its current sleep with it.
    pub fn set_option(&mut self, option: ResOption, value: i32) {
        match option {
            ResOption::Timeslice => {
                self.timeslice.store(value.max(1) as u32, Ordering::Relaxed);
                if let Some(ref watcher) = self.watcher {
                    watcher.wakeup();
                }
            }
        }
    }

    pub fn option(&self, option: ResOption) -> i32 {
        match option {
            ResOption::Timeslice => self.timeslice.load(Ordering::Relaxed) as i32,
        }
    }

    /// Adds a new resource file and triggers its loading. If a resource with the same
    /// name is managed already, `data` is dropped and the existing id is returned.
    pub fn add<T: AsRef<Path>>(&mut self, name: T, data: L::Data) -> ResourceId {
        let name = name.as_ref();

        let (id, created) = self.shared.table.lock().unwrap().insert(name);
        if !created {
            return id;
        }

        self.slots.insert(
            id,
            Slot {
                name: name.into(),
                data,
            },
        );

        debug!("Adds {} with {:?}.", id, name);
        self.shared.completions.begin(id);
        self.queue.push(Job {
            id,
            path: Arc::from(name),
        });

        id
    }

    /// Returns the id of resource `name`.
    pub fn find<T: AsRef<Path>>(&self, name: T) -> Option<ResourceId> {
        self.shared.table.lock().unwrap().find(name.as_ref())
    }

    /// Removes and destroys a resource. If its load callback is running, the destruction
    /// is deferred to the `poll` which processes the completion of that job.
    pub fn remove(&mut self, id: ResourceId) {
        {
            let mut table = self.shared.table.lock().unwrap();
            match table.state(id) {
                None | Some(ResourceState::PendingDestroy) => return,
                Some(ResourceState::Loading) => {
                    debug!("Defers the destruction of loading {}.", id);
                    if let Some(record) = table.get_mut(id) {
                        record.state = ResourceState::PendingDestroy;
                    }
                    return;
                }
                Some(_) => {
                    table.remove(id);
                }
            }
        }

        self.destroy(id);
    }

    /// Schedules the `done` and `destroy` callbacks of finished jobs. Returns the
    /// number of resources finalized or destroyed.
    pub fn poll(&mut self) -> usize {
        // Clears before draining, so completions pushed after the drain keep the
        // notifier signalled.
        self.shared.notifier.clear();

        let mut num = 0;
        for completion in self.shared.completions.drain() {
            let id = completion.id;
            let state = self.shared.table.lock().unwrap().state(id);

            match state {
                Some(ResourceState::PendingFinalize) => {
                    let loader = &self.shared.loader;
                    let outcome = match self.slots.get_mut(&id) {
                        Some(slot) => completion
                            .outcome
                            .and_then(|value| loader.done(id, &mut slot.data, value)),
                        None => continue,
                    };

                    let mut table = self.shared.table.lock().unwrap();
                    if let Some(record) = table.get_mut(id) {
                        match outcome {
                            Ok(()) => {
                                record.state = ResourceState::Active;
                                record.result = 0;
                                record.load_count += 1;
                                debug!("Finalizes {} ({} loads).", id, record.load_count);
                            }
                            Err(err) => {
                                warn!("Failed to load {:?}. {}", record.name, err);
                                record.state = ResourceState::Failed;
                                record.result = err.code();
                            }
                        }
                    }

                    num += 1;
                }
                Some(ResourceState::PendingDestroy) => {
                    self.shared.table.lock().unwrap().remove(id);
                    self.destroy(id);
                    num += 1;
                }
                _ => {}
            }
        }

        num
    }

    /// Returns the number of resources whose jobs or finalizations are pending.
    #[inline]
    pub fn pending(&self) -> usize {
        self.shared.table.lock().unwrap().pending()
    }

    /// Blocks current thread until the job of resource `id` completes.
    #[inline]
    pub fn wait_job(&self, id: ResourceId) {
        self.shared.completions.wait_job(id);
    }

    /// Blocks current thread until any job completes. Returns immediately if there
    /// are completions not polled yet, or if there is no job at all.
    #[inline]
    pub fn wait_any(&self) {
        self.shared.completions.wait_any();
    }

    /// Blocks current thread until all the jobs complete. The completed jobs still
    /// require a `poll` to be finalized.
    #[inline]
    pub fn wait_all(&self) {
        self.shared.completions.wait_all();
    }

    /// Blocks current thread until any job completes or any file modification is
    /// detected. `poll` should be called after this returns, `wait` never invokes
    /// callbacks by itself.
    pub fn wait(&self) -> Result<()> {
        self.shared.notifier.wait()
    }

    /// Like `wait`, but gives up after `timeout`. Returns true if there is something
    /// to poll.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool> {
        self.shared.notifier.wait_timeout(timeout)
    }

    /// Returns the file descriptors which become readable when there is something to
    /// poll. It is empty on platforms other than unix.
    #[inline]
    pub fn wait_fds(&self) -> &[WaitFd] {
        self.shared.notifier.wait_fds()
    }

    /// Returns the handles which become signalled when there is something to poll.
    /// It is empty on platforms other than windows.
    #[inline]
    pub fn wait_handles(&self) -> &[WaitHandle] {
        self.shared.notifier.wait_handles()
    }

    #[inline]
    pub fn name(&self, id: ResourceId) -> Option<&Path> {
        self.slots.get(&id).map(|v| &*v.name)
    }

    #[inline]
    pub fn data(&self, id: ResourceId) -> Option<&L::Data> {
        self.slots.get(&id).map(|v| &v.data)
    }

    #[inline]
    pub fn data_mut(&mut self, id: ResourceId) -> Option<&mut L::Data> {
        self.slots.get_mut(&id).map(|v| &mut v.data)
    }

    /// Replaces the data of resource `id`, returns the previous one. The data is
    /// dropped and `None` is returned if the resource does not exist.
    pub fn set_data(&mut self, id: ResourceId, data: L::Data) -> Option<L::Data> {
        self.slots
            .get_mut(&id)
            .map(|v| ::std::mem::replace(&mut v.data, data))
    }

    /// Returns the result of latest finalized load attempt, 0 means success.
    #[inline]
    pub fn result(&self, id: ResourceId) -> Option<i32> {
        self.shared.table.lock().unwrap().get(id).map(|v| v.result)
    }

    /// Returns how many times the resource has been loaded successfully.
    #[inline]
    pub fn load_count(&self, id: ResourceId) -> Option<u32> {
        self.shared.table.lock().unwrap().get(id).map(|v| v.load_count)
    }

    #[inline]
    pub fn state(&self, id: ResourceId) -> Option<ResourceState> {
        self.shared.table.lock().unwrap().state(id)
    }

    /// Returns the number of managed resources.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn destroy(&mut self, id: ResourceId) {
        if let Some(slot) = self.slots.remove(&id) {
            debug!("Destroys {} with {:?}.", id, slot.name);
            self.shared.loader.destroy(id, slot.data);
        }
    }
}

impl<L: Loader> Drop for ResourceManager<L> {
    fn drop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.terminate();
        }

        self.scheduler.terminate();

        let mut ids: Vec<_> = self.slots.keys().cloned().collect();
        ids.sort();

        for id in ids {
            self.destroy(id);
        }

        info!("Resource manager terminated.");
    }
}
