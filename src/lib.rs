//! # What is This?
//!
//! `resman` is a multithreaded resource data file manager. Applications register named
//! resource files, the files are loaded asynchronously by a pool of background workers,
//! and the finalization callbacks run synchronously in the thread which calls
//! `ResourceManager::poll`. Files that were loaded once are watched for modifications and
//! reloaded automatically.
//!
//! ```rust,ignore
//! use resman::prelude::*;
//!
//! let mut resources = ResourceManager::new(TextLoader)?;
//! let id = resources.add("assets/config.txt", String::new());
//!
//! loop {
//!     resources.wait()?;
//!     resources.poll();
//! }
//! ```
//!
//! The readiness of the manager could also be multiplexed into a host event loop with
//! `ResourceManager::wait_fds` (unix) or `ResourceManager::wait_handles` (windows).

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod errors;
pub mod notify;
pub mod res;
pub mod sched;
pub mod utils;

pub mod prelude;

pub use self::errors::Result;
