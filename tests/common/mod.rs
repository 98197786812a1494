#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use resman::prelude::*;

/// Records every callback invocation of `MockLoader`.
#[derive(Default)]
pub struct Calls {
    pub loads: AtomicUsize,
    pub dones: Mutex<Vec<ResourceId>>,
    pub destroys: Mutex<Vec<(ResourceId, u32)>>,
    pub main: Mutex<Option<thread::ThreadId>>,
    pub foreign: AtomicBool,
    pub blocked: AtomicBool,
}

impl Calls {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn dones(&self) -> Vec<ResourceId> {
        self.dones.lock().unwrap().clone()
    }

    pub fn destroys(&self) -> Vec<ResourceId> {
        self.destroys.lock().unwrap().iter().map(|v| v.0).collect()
    }

    pub fn block(&self) {
        self.blocked.store(true, Ordering::SeqCst);
    }

    pub fn unblock(&self) {
        self.blocked.store(false, Ordering::SeqCst);
    }

    fn check_thread(&self) {
        let current = thread::current().id();
        if *self.main.lock().unwrap() != Some(current) {
            self.foreign.store(true, Ordering::SeqCst);
        }
    }
}

/// Loads text files. Files with content `reject` fail in `done` with code 5, and files
/// with content `panic` make the load callback panic.
pub struct MockLoader {
    pub calls: Arc<Calls>,
}

impl MockLoader {
    pub fn new() -> (Self, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        *calls.main.lock().unwrap() = Some(thread::current().id());

        (
            MockLoader {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Loader for MockLoader {
    type Data = u32;
    type Intermediate = String;

    fn load(&self, _: ResourceId, path: &Path) -> Result<String, LoadError> {
        self.calls.loads.fetch_add(1, Ordering::SeqCst);

        while self.calls.blocked.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
        }

        let text = fs::read_to_string(path).map_err(|_| LoadError::new(-1))?;
        if text == "panic" {
            panic!("mock panic");
        }

        Ok(text)
    }

    fn done(&self, id: ResourceId, data: &mut u32, value: String) -> Result<(), LoadError> {
        self.calls.check_thread();
        self.calls.dones.lock().unwrap().push(id);

        if value == "reject" {
            return Err(LoadError::with_message(5, "rejected"));
        }

        *data += 1;
        Ok(())
    }

    fn destroy(&self, id: ResourceId, data: u32) {
        self.calls.check_thread();
        self.calls.destroys.lock().unwrap().push((id, data));
    }
}

pub use tempfile::TempDir;

/// Creates a temporary directory, which is removed on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

pub trait TempDirExt {
    /// Writes a file into the directory, returns its path.
    fn file(&self, name: &str, content: &str) -> PathBuf;
    /// Returns the path of `name` in the directory without creating it.
    fn child(&self, name: &str) -> PathBuf;
}

impl TempDirExt for TempDir {
    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.child(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn child(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }
}

pub fn params(workers: usize, watch: bool) -> ResourceParams {
    ResourceParams {
        workers,
        stack_size: None,
        timeslice: 5,
        watch,
    }
}

/// Polls `func` until it returns true, panics after 10 seconds.
pub fn wait_until<F: FnMut() -> bool>(mut func: F) {
    let ts = Instant::now();
    while !func() {
        assert!(ts.elapsed() < Duration::from_secs(10), "deadlock found!");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Polls the manager until `func` returns true, panics after 10 seconds.
pub fn poll_until<F>(resources: &mut ResourceManager<MockLoader>, mut func: F)
where
    F: FnMut(&ResourceManager<MockLoader>) -> bool,
{
    let ts = Instant::now();
    loop {
        resources.poll();
        if func(resources) {
            return;
        }

        assert!(ts.elapsed() < Duration::from_secs(10), "deadlock found!");
        let _ = resources.wait_timeout(Duration::from_millis(10));
    }
}
