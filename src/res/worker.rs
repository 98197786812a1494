use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::notify::Notifier;
use crate::sched::unwind;

use super::completion::{Completion, CompletionQueue};
use super::id::ResourceId;
use super::loader::{LoadError, Loader};
use super::table::{ResourceState, ResourceTable};

/// A request to run the load callback of a resource. It carries only the id and
/// the name, workers look the record up again before touching it.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: ResourceId,
    pub path: Arc<Path>,
}

/// The parts of `ResourceManager` shared with the worker and watcher threads.
pub struct Shared<L: Loader> {
    pub loader: L,
    pub table: Mutex<ResourceTable>,
    pub completions: CompletionQueue<L::Intermediate>,
    pub notifier: Notifier,
}

/// Returns the modification time of file, or `None` if it could not be read.
pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|v| v.modified()).ok()
}

/// Runs a job in current (worker) thread.
pub fn execute<L: Loader>(shared: &Shared<L>, job: Job) {
    {
        let mut table = shared.table.lock().unwrap();
        match table.get_mut(job.id) {
            Some(record) if record.state == ResourceState::Queued => {
                record.state = ResourceState::Loading;
            }
            _ => {
                debug!("Discards the load job of removed {}.", job.id);
                shared.completions.cancel(job.id);
                return;
            }
        }
    }

    // Stats before loading, so changes made during loading trigger another reload.
    let ts = modified(&job.path);

    debug!("Loads {} from {:?}.", job.id, job.path);
    let outcome = match unwind::halt_unwinding(|| shared.loader.load(job.id, &job.path)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let msg = unwind::panic_message(&*payload);
            warn!("Load callback of {:?} panicked: {}", job.path, msg);
            Err(LoadError::with_message(LoadError::PANICKED, msg))
        }
    };

    {
        let mut table = shared.table.lock().unwrap();
        if let Some(record) = table.get_mut(job.id) {
            record.modified = ts;
            if record.state == ResourceState::Loading {
                record.state = ResourceState::PendingFinalize;
            }
        }
    }

    shared.completions.push(Completion {
        id: job.id,
        outcome,
    });

    shared.notifier.notify();
}
