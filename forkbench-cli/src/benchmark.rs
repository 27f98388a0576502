//! Process vs. Thread Benchmark
//!
//! Times one full process run and then one full thread run over the same
//! configuration, sequentially, and records both in the benchmark log:
//!
//! ```text
//! started process vs thread benchmark
//! process ++ user=0.000412 system=0.001200 total=0.001612 real=0.104563
//! thread ++ user=0.093001 system=0.004000 total=0.097001 real=0.031020
//! completed process vs thread benchmark
//! ```
//!
//! The two measurements are reported side by side; no ratio is derived.

use crate::spawner::{SpawnError, SpawnMode, Spawner};
use forkbench_core::{Elapsed, Logger, RunConfig, Timer};
use std::fmt;
use std::sync::Arc;

/// Timing of one spawner variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkMeasurement {
    /// Which variant was timed
    pub mode: SpawnMode,
    /// Real and CPU time of the whole run
    pub elapsed: Elapsed,
}

impl fmt::Display for BenchmarkMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ++ {}", self.mode, self.elapsed)
    }
}

/// Runs the process spawner, then the thread spawner, timing each
pub struct BenchmarkRunner<P, T> {
    processes: P,
    threads: T,
    logger: Arc<Logger>,
}

impl<P: Spawner, T: Spawner> BenchmarkRunner<P, T> {
    /// Create a runner over the two spawners
    pub fn new(processes: P, threads: T, logger: Arc<Logger>) -> Self {
        Self {
            processes,
            threads,
            logger,
        }
    }

    /// Time both variants back to back and log the results.
    ///
    /// Returns `(process, thread)` measurements.
    pub fn compare(
        &self,
        config: &RunConfig,
    ) -> Result<(BenchmarkMeasurement, BenchmarkMeasurement), SpawnError> {
        let sink = self.logger.benchmark();
        sink.log("started process vs thread benchmark");

        let process = measure(&self.processes, config)?;
        sink.log(process);

        let thread = measure(&self.threads, config)?;
        sink.log(thread);

        sink.log("completed process vs thread benchmark");
        Ok((process, thread))
    }
}

fn measure<S: Spawner>(
    spawner: &S,
    config: &RunConfig,
) -> Result<BenchmarkMeasurement, SpawnError> {
    let timer = Timer::start();
    spawner.run(config)?;
    let elapsed = timer.stop();

    tracing::info!(
        mode = %spawner.mode(),
        real_s = elapsed.real.as_secs_f64(),
        "spawner run timed"
    );
    Ok(BenchmarkMeasurement {
        mode: spawner.mode(),
        elapsed,
    })
}
