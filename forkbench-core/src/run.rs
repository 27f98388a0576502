//! Run Configuration

use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;

/// Number of workers spawned per run unless configured otherwise
pub const DEFAULT_WORKERS: usize = 5;

/// Range used when the range is not prompted for
pub const DEFAULT_RANGE: (u64, u64) = (0, 1000);

/// Errors raised while building a [`RunConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunConfigError {
    /// Zero workers requested
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// `start` lies past `end`
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: u64, end: u64 },
}

/// Parameters shared by every worker of a single run.
///
/// Each worker processes the full inclusive range on its own; the range is
/// never split between workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    workers: usize,
    start: u64,
    end: u64,
    stagger: Duration,
}

impl RunConfig {
    /// Create a validated run configuration
    pub fn new(workers: usize, start: u64, end: u64) -> Result<Self, RunConfigError> {
        if workers == 0 {
            return Err(RunConfigError::NoWorkers);
        }
        if start > end {
            return Err(RunConfigError::InvalidRange { start, end });
        }
        Ok(Self {
            workers,
            start,
            end,
            stagger: Duration::ZERO,
        })
    }

    /// Delay worker `i` by `i * stagger` before it starts logging
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Number of workers to spawn
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// First number of the range
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last number of the range (inclusive)
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Per-index start delay step
    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    /// Inclusive range every worker walks
    pub fn range(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }

    /// Start delay for the worker at `index`
    pub fn delay_for(&self, index: usize) -> Duration {
        self.stagger.saturating_mul(index as u32)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            start: DEFAULT_RANGE.0,
            end: DEFAULT_RANGE.1,
            stagger: Duration::ZERO,
        }
    }
}
