//! Append-Only Log Sinks
//!
//! Every call to [`LogSink::log`] produces exactly one line, written with a
//! single `write` on a file opened in append mode. Threads of one process are
//! serialized by a mutex; separate processes appending to the same path are
//! serialized by an advisory `flock` held for the duration of the write.
//!
//! Lines follow the classic `Logger` layout:
//!
//! ```text
//! I, [2015-01-17T10:21:07.123456 #4242]  INFO -- : pid:4242 12: [2, 2, 3]
//! ```

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};

/// Errors raised while opening a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single append-only log file
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl LogSink {
    /// Open (or create) `path` for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path this sink appends to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line. Write failures go to diagnostics, never to the caller.
    pub fn log(&self, message: impl fmt::Display) {
        let line = format_line(&message);
        if let Err(e) = self.append(&line) {
            tracing::error!(path = %self.path.display(), error = %e, "failed to append log line");
        }
    }

    fn append(&self, line: &str) -> io::Result<()> {
        // Poisoning only means a worker panicked elsewhere; the file is intact.
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let _lock = FileLock::exclusive(&file)?;
        file.write_all(line.as_bytes())
    }
}

fn format_line(message: &dyn fmt::Display) -> String {
    format!(
        "I, [{} #{}]  INFO -- : {}\n",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"),
        std::process::id(),
        message
    )
}

/// Exclusive advisory lock on an open file, released on drop.
#[cfg(unix)]
struct FileLock {
    fd: RawFd,
}

#[cfg(unix)]
impl FileLock {
    fn exclusive(file: &File) -> io::Result<Self> {
        let fd = file.as_raw_fd();
        loop {
            let ret = unsafe { libc::flock(fd, libc::LOCK_EX) };
            if ret == 0 {
                return Ok(Self { fd });
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

#[cfg(unix)]
impl Drop for FileLock {
    fn drop(&mut self) {
        unsafe {
            libc::flock(self.fd, libc::LOCK_UN);
        }
    }
}

/// No advisory locking off Unix; append mode alone orders the writes.
#[cfg(not(unix))]
struct FileLock;

#[cfg(not(unix))]
impl FileLock {
    fn exclusive(_file: &File) -> io::Result<Self> {
        Ok(Self)
    }
}

/// The two sinks of a forkbench session.
///
/// Created once at startup and shared by reference (or `Arc`) with every
/// component that logs; the files are closed when the logger is dropped.
#[derive(Debug)]
pub struct Logger {
    activity: LogSink,
    benchmark: LogSink,
}

impl Logger {
    /// Open both sinks. Failure here is fatal for the session.
    pub fn open(
        activity: impl AsRef<Path>,
        benchmark: impl AsRef<Path>,
    ) -> Result<Self, SinkError> {
        Ok(Self {
            activity: LogSink::open(activity)?,
            benchmark: LogSink::open(benchmark)?,
        })
    }

    /// General activity log: worker lifecycle and factorization lines
    pub fn activity(&self) -> &LogSink {
        &self.activity
    }

    /// Benchmark result log: comparison markers and measurements
    pub fn benchmark(&self) -> &LogSink {
        &self.benchmark
    }
}
