use std::io;
use std::ptr;
use std::time::Duration;

use windows_sys::Win32::Foundation::{CloseHandle, WAIT_FAILED, WAIT_OBJECT_0};
use windows_sys::Win32::System::Threading::{
    CreateEventW, ResetEvent, SetEvent, WaitForSingleObject, INFINITE,
};

use super::super::WaitHandle;
use super::Visitor;

/// A manual-reset event object. It stays signalled until `clear`.
pub struct WindowsVisitor {
    handles: [WaitHandle; 1],
}

// Event objects are process-wide kernel objects which could be signalled and
// waited from any thread.
unsafe impl Send for WindowsVisitor {}
unsafe impl Sync for WindowsVisitor {}

pub fn new() -> io::Result<Box<dyn Visitor>> {
    let handle = unsafe { CreateEventW(ptr::null(), 1, 0, ptr::null()) };
    if handle.is_null() {
        return Err(io::Error::last_os_error());
    }

    Ok(Box::new(WindowsVisitor { handles: [handle] }))
}

impl Visitor for WindowsVisitor {
    fn notify(&self) {
        if unsafe { SetEvent(self.handles[0]) } == 0 {
            warn!(
                "Failed to signal readiness event: {}",
                io::Error::last_os_error()
            );
        }
    }

    fn clear(&self) {
        unsafe {
            ResetEvent(self.handles[0]);
        }
    }

    fn wait(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let ms = match timeout {
            None => INFINITE,
            Some(v) => v.as_millis().min(u128::from(INFINITE - 1)) as u32,
        };

        match unsafe { WaitForSingleObject(self.handles[0], ms) } {
            WAIT_OBJECT_0 => Ok(true),
            WAIT_FAILED => Err(io::Error::last_os_error()),
            _ => Ok(false),
        }
    }

    #[inline]
    fn handles(&self) -> &[WaitHandle] {
        &self.handles
    }
}

impl Drop for WindowsVisitor {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.handles[0]);
        }
    }
}
