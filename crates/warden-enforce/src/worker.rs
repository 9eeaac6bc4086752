//! Time-bounded execution in a forked worker process.
//!
//! The body runs in a child process. Its result crosses back as one JSON document over a
//! pipe. The parent waits on the pipe until the deadline, then kills the child with
//! `SIGKILL` and discards anything it wrote. The child never logs, and its panic hook is
//! silenced so a panicking body prints nothing.
//!
//! Completion is detected as end-of-file on the pipe, so no other fork may inherit the
//! write end. Pipe creation and fork are serialized process-wide until the parent has
//! closed its copy.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FunctionError, WorkerError};

/// What a worker sends back on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "snake_case")]
pub enum WorkerReport {
    Returned(Value),
    Failed(FunctionError),
    Panicked(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Timed {
    Finished(Result<Value, FunctionError>),
    Expired,
}

/// Run `body` in an isolated worker, giving it at most `limit` wall-clock time.
///
/// A panic inside the worker is re-raised in the calling thread.
pub fn run_isolated<F>(limit: Duration, body: F) -> Result<Timed, WorkerError>
where
    F: FnOnce() -> Result<Value, FunctionError>,
{
    match imp::spawn_and_wait(limit, body)? {
        None => Ok(Timed::Expired),
        Some(WorkerReport::Returned(value)) => Ok(Timed::Finished(Ok(value))),
        Some(WorkerReport::Failed(err)) => Ok(Timed::Finished(Err(err))),
        Some(WorkerReport::Panicked(message)) => std::panic::resume_unwind(Box::new(message)),
    }
}

#[cfg(unix)]
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(unix)]
mod imp {
    use std::io;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Mutex, PoisonError};
    use std::time::{Duration, Instant};

    use libc::c_int;
    use serde_json::Value;

    use super::{panic_message, WorkerReport};
    use crate::error::{FunctionError, WorkerError};

    /// Held from `pipe` until the parent closes its write end.
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    /// `None` means the deadline passed and the worker was killed.
    pub(super) fn spawn_and_wait<F>(
        limit: Duration,
        body: F,
    ) -> Result<Option<WorkerReport>, WorkerError>
    where
        F: FnOnce() -> Result<Value, FunctionError>,
    {
        let spawning = SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let mut fds: [c_int; 2] = [0; 2];
        // SAFETY: `fds` is a valid two-element buffer for pipe(2).
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(WorkerError::Pipe(io::Error::last_os_error().to_string()));
        }
        let (read_fd, write_fd) = (fds[0], fds[1]);

        // SAFETY: the child only runs `body`, serializes, writes and `_exit`s. It never
        // returns into the caller's stack frames.
        let pid = unsafe { libc::fork() };
        if pid < 0 {
            let err = io::Error::last_os_error().to_string();
            close(read_fd);
            close(write_fd);
            return Err(WorkerError::Fork(err));
        }

        if pid == 0 {
            close(read_fd);
            panic::set_hook(Box::new(|_| {}));
            let report = match panic::catch_unwind(AssertUnwindSafe(body)) {
                Ok(Ok(value)) => WorkerReport::Returned(value),
                Ok(Err(err)) => WorkerReport::Failed(err),
                Err(payload) => WorkerReport::Panicked(panic_message(payload.as_ref())),
            };
            let bytes = serde_json::to_vec(&report).unwrap_or_default();
            write_all(write_fd, &bytes);
            close(write_fd);
            // SAFETY: terminates the child without running the parent's destructors or
            // flushing its inherited stdio buffers.
            unsafe { libc::_exit(0) };
        }

        close(write_fd);
        drop(spawning);

        // A deadline past the end of `Instant` never arrives.
        let collected = read_until(read_fd, Instant::now().checked_add(limit));
        close(read_fd);

        // Killing an already exited child is harmless; reaping is always required.
        kill_and_reap(pid);

        match collected? {
            None => Ok(None),
            Some(bytes) if bytes.is_empty() => Err(WorkerError::NoReport),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| WorkerError::Decode(e.to_string())),
        }
    }

    /// Read the pipe to EOF, or return `None` if the deadline passes first.
    fn read_until(
        fd: c_int,
        deadline: Option<Instant>,
    ) -> Result<Option<Vec<u8>>, WorkerError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let timeout_ms = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(None);
                    }
                    remaining.as_micros().div_ceil(1000).min(c_int::MAX as u128) as c_int
                }
                // poll(2) waits indefinitely on a negative timeout.
                None => -1,
            };
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            // SAFETY: `pfd` is a single valid pollfd.
            let ready = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(WorkerError::Io(err.to_string()));
            }
            if ready == 0 {
                continue;
            }
            // SAFETY: `chunk` is a valid writable buffer of the given length.
            let n = unsafe { libc::read(fd, chunk.as_mut_ptr().cast(), chunk.len()) };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(WorkerError::Io(err.to_string()));
            }
            if n == 0 {
                return Ok(Some(out));
            }
            out.extend_from_slice(&chunk[..n as usize]);
        }
    }

    fn write_all(fd: c_int, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            // SAFETY: `bytes` is a valid readable buffer of the given length.
            let n = unsafe { libc::write(fd, bytes.as_ptr().cast(), bytes.len()) };
            if n < 0 {
                if io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return;
            }
            bytes = &bytes[n as usize..];
        }
    }

    fn kill_and_reap(pid: libc::pid_t) {
        let mut status: c_int = 0;
        // SAFETY: `pid` is our own child; `status` is a valid out-pointer.
        unsafe {
            libc::kill(pid, libc::SIGKILL);
            while libc::waitpid(pid, &mut status, 0) < 0
                && io::Error::last_os_error().kind() == io::ErrorKind::Interrupted
            {}
        }
    }

    fn close(fd: c_int) {
        // SAFETY: closing a descriptor this module opened.
        unsafe {
            libc::close(fd);
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::time::Duration;

    use serde_json::Value;

    use super::WorkerReport;
    use crate::error::{FunctionError, WorkerError};

    pub(super) fn spawn_and_wait<F>(
        _limit: Duration,
        _body: F,
    ) -> Result<Option<WorkerReport>, WorkerError>
    where
        F: FnOnce() -> Result<Value, FunctionError>,
    {
        Err(WorkerError::Unsupported)
    }
}
