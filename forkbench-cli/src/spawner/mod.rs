//! Worker Spawners
//!
//! Start `workers` fresh workers over the same range, then block until every
//! one of them has finished.
//!
//! ## Modes
//!
//! - **Processes (`ProcessSpawner`)**: re-executes the forkbench binary with
//!   the hidden `--forkbench-worker` flag once per worker and waits for every
//!   child. Children open the activity log themselves.
//!
//! - **Threads (`ThreadSpawner`)**: spawns one named OS thread per worker and
//!   joins them all. Threads share the harness `Logger`.
//!
//! Neither mode retries, times out, or reuses workers. A worker that dies is
//! reported and the rest are still awaited.

mod process;
mod thread;

pub use process::{ProcessSpawner, WORKER_FLAG};
pub use thread::ThreadSpawner;

use forkbench_core::RunConfig;
use std::fmt;
use thiserror::Error;

/// Errors returned by a spawner run
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("Failed to locate worker executable: {0}")]
    Executable(#[source] std::io::Error),

    #[error("Failed to spawn {mode} worker {index}: {source}")]
    Spawn {
        mode: SpawnMode,
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Unit of concurrency a spawner uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnMode {
    /// Independent OS processes
    Process,
    /// Threads of the harness process
    Thread,
}

impl SpawnMode {
    /// Lowercase label used in logs and reports
    pub fn label(self) -> &'static str {
        match self {
            SpawnMode::Process => "process",
            SpawnMode::Thread => "thread",
        }
    }
}

impl fmt::Display for SpawnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something that runs one full set of workers and waits for all of them
pub trait Spawner {
    /// Which kind of worker this spawner starts
    fn mode(&self) -> SpawnMode;

    /// Spawn `config.workers()` workers and block until all have finished
    fn run(&self, config: &RunConfig) -> Result<(), SpawnError>;
}

impl<S: Spawner + ?Sized> Spawner for &S {
    fn mode(&self) -> SpawnMode {
        (**self).mode()
    }

    fn run(&self, config: &RunConfig) -> Result<(), SpawnError> {
        (**self).run(config)
    }
}
