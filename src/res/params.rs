//! Functions for loading the settings of `ResourceManager`.

use std::fs;
use std::path::Path;

use crate::errors::*;

/// The runtime options which could be changed with `ResourceManager::set_option`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResOption {
    /// The interval in milliseconds between two scans of the file watcher. Smaller
    /// values reduce the latency of hot-reloading at the cost of more `stat` calls.
    Timeslice = 0,
}

impl ResOption {
    pub const NUM: usize = 1;

    /// Converts a raw integer key into option.
    pub fn from_raw(v: i32) -> Option<Self> {
        match v {
            0 => Some(ResOption::Timeslice),
            _ => None,
        }
    }
}

/// A structure containing configuration data for the `ResourceManager`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceParams {
    /// The number of worker threads, which bounds the number of `load` callbacks
    /// running concurrently.
    pub workers: usize,
    /// The stack size of worker threads, uses the platform default if `None`.
    pub stack_size: Option<usize>,
    /// The initial value of `ResOption::Timeslice` in milliseconds.
    pub timeslice: u32,
    /// Enables the file watcher.
    pub watch: bool,
}

impl Default for ResourceParams {
    fn default() -> Self {
        let workers = ::std::thread::available_parallelism()
            .map(|v| v.get())
            .unwrap_or(4);

        ResourceParams {
            workers,
            stack_size: None,
            timeslice: 100,
            watch: true,
        }
    }
}

impl ResourceParams {
    /// Parses params from a JSON document, missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: ResourceParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads params from a JSON file.
    pub fn load<T: AsRef<Path>>(path: T) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        ResourceParams::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidParams(
                "At least one worker thread is required.".to_owned(),
            ));
        }

        if self.timeslice == 0 {
            return Err(Error::InvalidParams(
                "The timeslice must be at least 1 millisecond.".to_owned(),
            ));
        }

        Ok(())
    }
}
