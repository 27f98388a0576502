//! Worker Body
//!
//! The loop every worker runs, whether it lives in a child process or in a
//! thread of the harness. Both modes call the same body, so the activity log
//! looks the same for either.

use crate::logger::LogSink;
use crate::run::RunConfig;
use crate::workload::factorize;
use std::fmt;
use std::time::Duration;

/// Who wrote a log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerIdentity {
    /// A child process, tagged by its OS pid
    Process(u32),
    /// A thread of the harness, tagged by its thread name
    Thread(String),
}

impl WorkerIdentity {
    /// Identity of the calling process
    pub fn current_process() -> Self {
        WorkerIdentity::Process(std::process::id())
    }

    /// Identity of the calling thread; unnamed threads fall back to their id
    pub fn current_thread() -> Self {
        let thread = std::thread::current();
        match thread.name() {
            Some(name) => WorkerIdentity::Thread(name.to_string()),
            None => WorkerIdentity::Thread(format!("{:?}", thread.id())),
        }
    }
}

impl fmt::Display for WorkerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerIdentity::Process(pid) => write!(f, "pid:{pid}"),
            WorkerIdentity::Thread(name) => write!(f, "thread:{name}"),
        }
    }
}

/// What a record reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    /// Worker started
    Began,
    /// One number of the range and its prime factors
    Factored { number: u64, factors: Vec<u64> },
    /// Worker walked the whole range
    Completed,
}

/// One line of the activity log written by a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// Writer of the record
    pub worker: &'a WorkerIdentity,
    /// Payload of the record
    pub event: RecordEvent,
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.event {
            RecordEvent::Began => write!(f, "{} began", self.worker),
            RecordEvent::Factored { number, factors } => {
                write!(f, "{} {}: {:?}", self.worker, number, factors)
            }
            RecordEvent::Completed => write!(f, "{} completed", self.worker),
        }
    }
}

/// Run one worker to completion.
///
/// Sleeps for `delay`, logs `began`, factorizes every number of the range
/// logging each result, then logs `completed`.
pub fn run_worker(
    identity: &WorkerIdentity,
    config: &RunConfig,
    sink: &LogSink,
    delay: Duration,
) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }

    sink.log(LogRecord {
        worker: identity,
        event: RecordEvent::Began,
    });

    for number in config.range() {
        sink.log(LogRecord {
            worker: identity,
            event: RecordEvent::Factored {
                number,
                factors: factorize(number),
            },
        });
    }

    sink.log(LogRecord {
        worker: identity,
        event: RecordEvent::Completed,
    });
}
