//! Harness
//!
//! Owns the session logger and both spawners, and carries out the three
//! flows (processes, threads, benchmark) with their status output.

use crate::benchmark::{BenchmarkMeasurement, BenchmarkRunner};
use crate::command::{Command, Dispatcher};
use crate::formatting::format_comparison;
use crate::spawner::{ProcessSpawner, SpawnError, Spawner, ThreadSpawner};
use forkbench_core::{Logger, RunConfig};
use std::io::Write;
use std::sync::Arc;

/// Process and thread spawners sharing one logger
pub struct Harness {
    logger: Arc<Logger>,
    processes: ProcessSpawner,
    threads: ThreadSpawner,
}

impl Harness {
    /// Harness whose process workers re-execute the running binary
    pub fn new(logger: Arc<Logger>) -> Result<Self, SpawnError> {
        let processes = ProcessSpawner::new(Arc::clone(&logger))?;
        Ok(Self::with_process_spawner(processes, logger))
    }

    /// Harness with an explicit process spawner (for testing)
    pub fn with_process_spawner(processes: ProcessSpawner, logger: Arc<Logger>) -> Self {
        Self {
            threads: ThreadSpawner::new(Arc::clone(&logger)),
            processes,
            logger,
        }
    }

    /// Run every worker as an OS process
    pub fn run_processes(&self, config: &RunConfig) -> Result<(), SpawnError> {
        self.processes.run(config)
    }

    /// Run every worker as a thread
    pub fn run_threads(&self, config: &RunConfig) -> Result<(), SpawnError> {
        self.threads.run(config)
    }

    /// Time processes then threads
    pub fn run_benchmark(
        &self,
        config: &RunConfig,
    ) -> Result<(BenchmarkMeasurement, BenchmarkMeasurement), SpawnError> {
        let runner =
            BenchmarkRunner::new(&self.processes, &self.threads, Arc::clone(&self.logger));
        runner.compare(config)
    }
}

impl Dispatcher for Harness {
    fn dispatch(
        &mut self,
        command: Command,
        config: &RunConfig,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        tracing::debug!(
            ?command,
            workers = config.workers(),
            start = config.start(),
            end = config.end(),
            "dispatching"
        );
        match command {
            Command::Processes => {
                writeln!(out, "spawning processes..")?;
                out.flush()?;
                self.run_processes(config)?;
            }
            Command::Threads => {
                writeln!(out, "spawning Threads..")?;
                out.flush()?;
                self.run_threads(config)?;
            }
            Command::Benchmark => {
                writeln!(out, "running process vs thread benchmark..")?;
                out.flush()?;
                let (process, thread) = self.run_benchmark(config)?;
                write!(out, "{}", format_comparison(&process, &thread))?;
            }
            Command::Exit => {}
        }
        Ok(())
    }
}
