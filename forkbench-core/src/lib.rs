#![warn(missing_docs)]
//! Forkbench Core - Worker Runtime
//!
//! Everything a single worker needs, independent of how it was spawned:
//! - `factorize`, the CPU-bound trial-division workload
//! - `RunConfig`, the worker count and inclusive range of one run
//! - `LogSink`/`Logger`, append-only text logs safe for concurrent writers
//! - `run_worker`, the per-worker loop shared by process and thread mode
//! - `Timer`, wall-clock plus user/system CPU time measurement

mod logger;
mod measure;
mod run;
mod worker;
mod workload;

pub use logger::{LogSink, Logger, SinkError};
pub use measure::{CpuTimes, Elapsed, Timer};
pub use run::{DEFAULT_RANGE, DEFAULT_WORKERS, RunConfig, RunConfigError};
pub use worker::{LogRecord, RecordEvent, WorkerIdentity, run_worker};
pub use workload::factorize;
