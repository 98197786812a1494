//! The `ResourceManager` provides a standardized interface to load resource files
//! asynchronously, and to keep them up to date while they are modified on disk.
//!
//! # Loader
//!
//! The actual reading and parsing of files is supplied by the application as a
//! `Loader`. The loading of a resource is split into two stages:
//!
//! 1. `Loader::load` is executed in a background worker thread. It should perform the
//! I/O and any parts of loading which could be done without the main thread, and
//! returns an `Intermediate` value.
//! 2. `Loader::done` is executed in the thread which calls `ResourceManager::poll`
//! (the "main" thread) with the intermediate value. It should be as fast as possible,
//! since it blocks the main thread.
//!
//! `Loader::destroy` is called, also in the main thread, when a resource is removed
//! or the manager is dropped.
//!
//! # Life-cycle
//!
//! Every resource goes through the states described by `ResourceState`. A resource
//! which is removed while its load callback is running is not destroyed until the
//! callback returns and the completion is polled, so workers never observe a freed
//! resource.
//!
//! # Hot-reloading
//!
//! A watcher thread compares the modification time of each loaded file with the one
//! recorded at its last load, every `ResOption::Timeslice` milliseconds. Changed files
//! are pushed into the job queue again, and the application observes the reload as
//! another finalization with an incremented `ResourceManager::load_count`.
//!
//! # Waiting
//!
//! `ResourceManager::wait` blocks until there is something to poll. Applications that
//! own an event loop could instead register `ResourceManager::wait_fds` (unix) or
//! `ResourceManager::wait_handles` (windows) and call `poll` whenever they become
//! ready.

pub mod id;
pub mod loader;
pub mod params;
pub mod table;

mod completion;
mod system;
mod watcher;
mod worker;

pub mod prelude {
    pub use super::id::ResourceId;
    pub use super::loader::{LoadError, Loader};
    pub use super::params::{ResOption, ResourceParams};
    pub use super::table::ResourceState;
    pub use super::ResourceManager;
}

pub use self::id::ResourceId;
pub use self::loader::{LoadError, Loader};
pub use self::params::{ResOption, ResourceParams};
pub use self::system::ResourceManager;
pub use self::table::ResourceState;
