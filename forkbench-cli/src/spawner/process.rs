//! Process Spawner
//!
//! Runs each worker in its own OS process by re-executing a forkbench binary
//! in worker mode. The supervisor only spawns and waits; children report
//! through the activity log file, never back to the parent.

use super::{SpawnError, SpawnMode, Spawner};
use forkbench_core::{Logger, RunConfig};
use std::env;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

/// Hidden flag that switches the binary into worker mode
pub const WORKER_FLAG: &str = "--forkbench-worker";

/// Spawns workers as independent OS processes
pub struct ProcessSpawner {
    program: PathBuf,
    logger: Arc<Logger>,
}

impl ProcessSpawner {
    /// Spawner that re-executes the running binary
    pub fn new(logger: Arc<Logger>) -> Result<Self, SpawnError> {
        let program = env::current_exe().map_err(SpawnError::Executable)?;
        Ok(Self::with_program(program, logger))
    }

    /// Spawner for a specific forkbench binary (for testing)
    pub fn with_program(program: impl Into<PathBuf>, logger: Arc<Logger>) -> Self {
        Self {
            program: program.into(),
            logger,
        }
    }

    fn command(&self, config: &RunConfig, index: usize) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(WORKER_FLAG)
            .arg("--worker-index")
            .arg(index.to_string())
            .arg("--start")
            .arg(config.start().to_string())
            .arg("--end")
            .arg(config.end().to_string())
            .arg("--stagger")
            .arg(format!("{}ns", config.stagger().as_nanos()))
            .arg("--activity-log")
            .arg(self.logger.activity().path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        command
    }

    /// Wait for every child, tolerating abnormal exits
    fn wait_all(children: Vec<(usize, Child)>) {
        for (index, mut child) in children {
            let pid = child.id();
            match child.wait() {
                Ok(status) if status.success() => {
                    tracing::debug!(index, pid, "worker process exited");
                }
                Ok(status) => {
                    tracing::warn!(index, pid, %status, "worker process exited abnormally");
                }
                Err(e) => {
                    tracing::warn!(index, pid, error = %e, "failed to wait for worker process");
                }
            }
        }
    }
}

impl Spawner for ProcessSpawner {
    fn mode(&self) -> SpawnMode {
        SpawnMode::Process
    }

    fn run(&self, config: &RunConfig) -> Result<(), SpawnError> {
        let sink = self.logger.activity();
        sink.log("starting process performance test");

        let mut children = Vec::with_capacity(config.workers());
        let mut spawn_error = None;

        for index in 0..config.workers() {
            match self.command(config, index).spawn() {
                Ok(child) => {
                    tracing::debug!(index, pid = child.id(), "spawned worker process");
                    children.push((index, child));
                }
                Err(source) => {
                    spawn_error = Some(SpawnError::Spawn {
                        mode: SpawnMode::Process,
                        index,
                        source,
                    });
                    break;
                }
            }
        }

        // Children already running are awaited even when a later spawn failed
        Self::wait_all(children);
        sink.log("process performance test finished");

        match spawn_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
