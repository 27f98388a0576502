#![warn(missing_docs)]
//! # Forkbench
//!
//! Processes or threads: which carries a CPU-bound workload more cheaply?
//!
//! Forkbench starts `W` workers, either as OS processes or as threads of one
//! process, and has every worker factorize every number of the same range by
//! naive trial division, logging each result. The run is timed end to end:
//! - **Process mode**: the binary re-executes itself once per worker and waits for all children
//! - **Thread mode**: one named OS thread per worker, all joined before returning
//! - **Benchmark**: both modes back to back, real/user/system time written to a separate log
//! - **Append-only logs**: one line per event, safe for concurrent threads and processes
//!
//! ## Quick Start
//!
//! ```ignore
//! use forkbench::prelude::*;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(Logger::open("log.txt", "performance.txt")?);
//! let config = RunConfig::new(5, 0, 1000)?;
//! ThreadSpawner::new(logger).run(&config)?;
//! ```

// Re-export core types
pub use forkbench_core::{
    CpuTimes, DEFAULT_RANGE, DEFAULT_WORKERS, Elapsed, LogRecord, LogSink, Logger, RecordEvent,
    RunConfig, RunConfigError, SinkError, Timer, WorkerIdentity, factorize, run_worker,
};

// Re-export harness types
pub use forkbench_cli::{
    BenchmarkMeasurement, BenchmarkRunner, Command, CommandLoop, Dispatcher, ForkbenchConfig,
    Harness, ProcessSpawner, RangeSource, SpawnError, SpawnMode, Spawner, ThreadSpawner,
    format_comparison,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkRunner, Logger, ProcessSpawner, RunConfig, Spawner, ThreadSpawner, factorize,
    };
}

/// Run the Forkbench CLI.
///
/// Call this from the binary's `main()`:
/// ```ignore
/// fn main() {
///     forkbench::run().unwrap();
/// }
/// ```
pub use forkbench_cli::run;
