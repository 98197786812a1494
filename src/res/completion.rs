use std::sync::{Condvar, Mutex};

use crate::utils::FastHashSet;

use super::id::ResourceId;
use super::loader::LoadError;

/// The outcome of a finished job.
pub struct Completion<T> {
    pub id: ResourceId,
    pub outcome: Result<T, LoadError>,
}

struct Completions<T> {
    entries: Vec<Completion<T>>,
    // Resources with a job pushed but not completed yet.
    outstanding: FastHashSet<ResourceId>,
    generation: u64,
}

/// The list of finished jobs, pushed by workers and drained by `poll`.
///
/// It also tracks the outstanding jobs, so a job is moved from outstanding to finished
/// under a single lock. Threads blocked in the `wait_*` methods could never observe a
/// job which has left the outstanding set without its completion being visible.
pub struct CompletionQueue<T> {
    m: Mutex<Completions<T>>,
    v: Condvar,
}

impl<T> CompletionQueue<T> {
    pub fn new() -> Self {
        CompletionQueue {
            m: Mutex::new(Completions {
                entries: Vec::new(),
                outstanding: FastHashSet::default(),
                generation: 0,
            }),
            v: Condvar::new(),
        }
    }

    /// Marks a job of resource `id` as outstanding. Must be called before the job is
    /// pushed into the job queue.
    pub fn begin(&self, id: ResourceId) {
        self.m.lock().unwrap().outstanding.insert(id);
    }

    /// Marks the job of resource `id` as discarded without completion.
    pub fn cancel(&self, id: ResourceId) {
        let mut guard = self.m.lock().unwrap();
        guard.outstanding.remove(&id);
        self.v.notify_all();
    }

    pub fn push(&self, completion: Completion<T>) {
        let mut guard = self.m.lock().unwrap();
        guard.outstanding.remove(&completion.id);
        guard.entries.push(completion);
        guard.generation += 1;
        self.v.notify_all();
    }

    /// Takes all the finished jobs in completion order.
    pub fn drain(&self) -> Vec<Completion<T>> {
        let mut guard = self.m.lock().unwrap();
        ::std::mem::replace(&mut guard.entries, Vec::new())
    }

    /// Blocks current thread until the job of resource `id` completes.
    pub fn wait_job(&self, id: ResourceId) {
        let mut guard = self.m.lock().unwrap();
        while guard.outstanding.contains(&id) {
            guard = self.v.wait(guard).unwrap();
        }
    }

    /// Blocks current thread until any job completes. Returns immediately if there
    /// are undrained completions or no outstanding job at all.
    pub fn wait_any(&self) {
        let mut guard = self.m.lock().unwrap();
        if !guard.entries.is_empty() {
            return;
        }

        let generation = guard.generation;
        while guard.generation == generation && !guard.outstanding.is_empty() {
            guard = self.v.wait(guard).unwrap();
        }
    }

    /// Blocks current thread until there is no outstanding job.
    pub fn wait_all(&self) {
        let mut guard = self.m.lock().unwrap();
        while !guard.outstanding.is_empty() {
            guard = self.v.wait(guard).unwrap();
        }
    }
}
