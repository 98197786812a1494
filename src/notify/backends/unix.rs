use std::io;
use std::time::{Duration, Instant};

use super::super::WaitFd;
use super::Visitor;

/// A self-pipe. The read end is exported to the host event loop, it becomes
/// readable once anything was written into the write end.
pub struct UnixVisitor {
    // [read, write]
    fds: [WaitFd; 2],
}

pub fn new() -> io::Result<Box<dyn Visitor>> {
    let mut fds: [WaitFd; 2] = [-1, -1];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }

    let visitor = UnixVisitor { fds };
    for &fd in &visitor.fds {
        set_nonblocking_cloexec(fd)?;
    }

    Ok(Box::new(visitor))
}

fn set_nonblocking_cloexec(fd: WaitFd) -> io::Result<()> {
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 || libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }

        let flags = libc::fcntl(fd, libc::F_GETFD);
        if flags < 0 || libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) < 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

impl Visitor for UnixVisitor {
    fn notify(&self) {
        let byte = 1u8;
        loop {
            let n = unsafe { libc::write(self.fds[1], &byte as *const u8 as *const _, 1) };
            if n >= 0 {
                return;
            }

            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                // The pipe is full, so it is readable already.
                io::ErrorKind::WouldBlock => return,
                _ => {
                    warn!("Failed to signal readiness pipe: {}", err);
                    return;
                }
            }
        }
    }

    fn clear(&self) {
        let mut buf = [0u8; 64];
        loop {
            let n = unsafe { libc::read(self.fds[0], buf.as_mut_ptr() as *mut _, buf.len()) };
            if n > 0 {
                continue;
            }

            if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }

            return;
        }
    }

    fn wait(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let deadline = timeout.map(|v| Instant::now() + v);

        loop {
            let ms = match deadline {
                None => -1,
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    // Rounds up, so we never spin with a zero timeout before the deadline.
                    let ms = left.as_millis() + u128::from(left.subsec_nanos() % 1_000_000 != 0);
                    ms.min(i32::max_value() as u128) as libc::c_int
                }
            };

            let mut pfd = libc::pollfd {
                fd: self.fds[0],
                events: libc::POLLIN,
                revents: 0,
            };

            let n = unsafe { libc::poll(&mut pfd, 1, ms) };
            if n >= 0 {
                return Ok(n > 0);
            }

            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    #[inline]
    fn fds(&self) -> &[WaitFd] {
        &self.fds[..1]
    }
}

impl Drop for UnixVisitor {
    fn drop(&mut self) {
        for &fd in &self.fds {
            if fd >= 0 {
                unsafe {
                    libc::close(fd);
                }
            }
        }
    }
}
