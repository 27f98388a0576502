//! Thread Spawner

use super::{SpawnError, SpawnMode, Spawner};
use forkbench_core::{Logger, RunConfig, WorkerIdentity, run_worker};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Spawns workers as named threads of the harness process
pub struct ThreadSpawner {
    logger: Arc<Logger>,
}

impl ThreadSpawner {
    /// Create a spawner whose threads log through `logger`
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    fn spawn_worker(
        &self,
        config: &RunConfig,
        index: usize,
    ) -> Result<JoinHandle<()>, std::io::Error> {
        let logger = Arc::clone(&self.logger);
        let config = *config;

        thread::Builder::new()
            .name(format!("worker-{index}"))
            .spawn(move || {
                let identity = WorkerIdentity::current_thread();
                run_worker(&identity, &config, logger.activity(), config.delay_for(index));
            })
    }
}

impl Spawner for ThreadSpawner {
    fn mode(&self) -> SpawnMode {
        SpawnMode::Thread
    }

    fn run(&self, config: &RunConfig) -> Result<(), SpawnError> {
        let sink = self.logger.activity();
        sink.log("starting thread performance test");

        let mut handles = Vec::with_capacity(config.workers());
        let mut spawn_error = None;

        for index in 0..config.workers() {
            match self.spawn_worker(config, index) {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    spawn_error = Some(SpawnError::Spawn {
                        mode: SpawnMode::Thread,
                        index,
                        source,
                    });
                    break;
                }
            }
        }

        for (index, handle) in handles {
            match handle.join() {
                Ok(()) => tracing::debug!(index, "worker thread joined"),
                Err(_) => tracing::warn!(index, "worker thread panicked"),
            }
        }
        sink.log("thread performance test finished");

        match spawn_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
