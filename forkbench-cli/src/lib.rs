#![warn(missing_docs)]
//! Forkbench CLI Library
//!
//! This module provides the CLI infrastructure of the `forkbench` binary:
//! configuration layering, the process and thread spawners, the benchmark
//! runner, and the interactive command loop.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     forkbench_cli::run().unwrap();
//! }
//! ```

mod benchmark;
mod command;
mod config;
mod formatting;
mod harness;
mod spawner;

pub use benchmark::{BenchmarkMeasurement, BenchmarkRunner};
pub use command::{Command, CommandError, CommandLoop, Dispatcher, USAGE, parse_range};
pub use config::*;
pub use formatting::format_comparison;
pub use harness::Harness;
pub use spawner::{ProcessSpawner, SpawnError, SpawnMode, Spawner, ThreadSpawner, WORKER_FLAG};

use anyhow::Context;
use clap::{Parser, Subcommand};
use forkbench_core::{LogSink, Logger, RunConfig, WorkerIdentity, run_worker};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Forkbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "forkbench")]
#[command(author, version, about = "Forkbench - processes vs. threads on a CPU-bound workload")]
pub struct Cli {
    /// Optional subcommand; without one, commands are read from stdin
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (discovered as forkbench.toml if not specified)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of workers per run
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Where the range comes from: fixed or prompt
    #[arg(long, value_enum)]
    pub range_source: Option<RangeSource>,

    /// First number of the fixed range
    #[arg(long)]
    pub start: Option<u64>,

    /// Last number of the fixed range (inclusive)
    #[arg(long)]
    pub end: Option<u64>,

    /// Delay worker i by i * stagger before it starts (e.g., "50ms")
    #[arg(long)]
    pub stagger: Option<String>,

    /// General activity log file
    #[arg(long)]
    pub activity_log: Option<PathBuf>,

    /// Benchmark result log file
    #[arg(long)]
    pub benchmark_log: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Run as worker process (used by the process spawner)
    #[arg(long, hide = true)]
    pub forkbench_worker: bool,

    /// Internal: Index of this worker within its run
    #[arg(long, hide = true, default_value = "0")]
    pub worker_index: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the workers as processes, without prompting
    Process,
    /// Run the workers as threads, without prompting
    Thread,
    /// Time processes, then threads, without prompting
    Bench,
    /// Print a default forkbench.toml
    Init,
}

/// Settings of one session after layering forkbench.toml and CLI flags
#[derive(Debug, Clone)]
pub struct Settings {
    /// Worker count, range and stagger
    pub run: RunConfig,
    /// Whether the range is prompted for
    pub range_source: RangeSource,
    /// General activity log file
    pub activity_log: PathBuf,
    /// Benchmark result log file
    pub benchmark_log: PathBuf,
}

impl Settings {
    /// Build settings by layering: forkbench.toml defaults → CLI overrides.
    pub fn resolve(cli: &Cli, config: &ForkbenchConfig) -> anyhow::Result<Self> {
        let runner = &config.runner;
        let workers = cli.workers.unwrap_or(runner.workers);
        let start = cli.start.unwrap_or(runner.range_start);
        let end = cli.end.unwrap_or(runner.range_end);
        let stagger = parse_stagger(cli.stagger.as_deref().unwrap_or(&runner.stagger))?;

        let run = RunConfig::new(workers, start, end)?.with_stagger(stagger);

        Ok(Self {
            run,
            range_source: cli.range_source.unwrap_or(runner.range_source),
            activity_log: cli
                .activity_log
                .clone()
                .unwrap_or_else(|| config.logging.activity_log.clone()),
            benchmark_log: cli
                .benchmark_log
                .clone()
                .unwrap_or_else(|| config.logging.benchmark_log.clone()),
        })
    }
}

fn parse_stagger(s: &str) -> anyhow::Result<Duration> {
    let nanos = ForkbenchConfig::parse_duration(s).context("invalid stagger")?;
    Ok(Duration::from_nanos(nanos))
}

/// Run the Forkbench CLI with the process arguments.
/// This is the main entry point of the binary.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Forkbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Handle worker mode first (before any other initialization)
    if cli.forkbench_worker {
        init_tracing(cli.verbose);
        return run_worker_mode(&cli);
    }

    init_tracing(cli.verbose);

    if cli.command == Some(Commands::Init) {
        print!("{}", ForkbenchConfig::default_toml());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => ForkbenchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ForkbenchConfig::discover().unwrap_or_default(),
    };
    let settings = Settings::resolve(&cli, &config)?;

    // Log sinks are required for every flow; failing to open them is fatal
    let logger = Logger::open(&settings.activity_log, &settings.benchmark_log)
        .context("log files unavailable")?;
    let mut harness = Harness::new(Arc::new(logger))?;

    match cli.command {
        Some(Commands::Process) => {
            harness.dispatch(Command::Processes, &settings.run, &mut io::stdout())?
        }
        Some(Commands::Thread) => {
            harness.dispatch(Command::Threads, &settings.run, &mut io::stdout())?
        }
        Some(Commands::Bench) => {
            harness.dispatch(Command::Benchmark, &settings.run, &mut io::stdout())?
        }
        Some(Commands::Init) => {}
        None => {
            let stdin = io::stdin();
            let mut command_loop =
                CommandLoop::new(stdin.lock(), io::stdout(), settings.range_source, settings.run);
            let command = command_loop.run(&mut harness)?;
            tracing::debug!(?command, "command loop finished");
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, which worker processes inherit from the parent
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "forkbench_cli=debug,forkbench_core=debug"
    } else {
        "forkbench_cli=info,forkbench_core=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run as a worker process (spawned by `ProcessSpawner`)
fn run_worker_mode(cli: &Cli) -> anyhow::Result<()> {
    let activity_log = cli
        .activity_log
        .as_ref()
        .context("worker mode requires --activity-log")?;
    let start = cli.start.context("worker mode requires --start")?;
    let end = cli.end.context("worker mode requires --end")?;
    let stagger = parse_stagger(cli.stagger.as_deref().unwrap_or("0ns"))?;

    let config = RunConfig::new(1, start, end)?.with_stagger(stagger);
    let sink = LogSink::open(activity_log)?;

    run_worker(
        &WorkerIdentity::current_process(),
        &config,
        &sink,
        config.delay_for(cli.worker_index),
    );
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "forkbench",
            "--workers",
            "2",
            "--end",
            "5",
            "--range-source",
            "prompt",
            "--activity-log",
            "custom.log",
        ]);
        let settings = Settings::resolve(&cli, &ForkbenchConfig::default()).unwrap();

        assert_eq!(settings.run.workers(), 2);
        assert_eq!(settings.run.range(), 0..=5);
        assert_eq!(settings.range_source, RangeSource::Prompt);
        assert_eq!(settings.activity_log, PathBuf::from("custom.log"));
        assert_eq!(settings.benchmark_log, PathBuf::from("performance.txt"));
    }

    #[test]
    fn test_config_used_without_flags() {
        let cli = Cli::parse_from(["forkbench", "bench"]);
        let mut config = ForkbenchConfig::default();
        config.runner.workers = 3;
        config.runner.stagger = "10ms".to_string();

        let settings = Settings::resolve(&cli, &config).unwrap();
        assert_eq!(cli.command, Some(Commands::Bench));
        assert_eq!(settings.run.workers(), 3);
        assert_eq!(settings.run.stagger(), Duration::from_millis(10));
        assert_eq!(settings.range_source, RangeSource::Fixed);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let zero_workers = Cli::parse_from(["forkbench", "--workers", "0"]);
        assert!(Settings::resolve(&zero_workers, &ForkbenchConfig::default()).is_err());

        let inverted = Cli::parse_from(["forkbench", "--start", "10", "--end", "2"]);
        assert!(Settings::resolve(&inverted, &ForkbenchConfig::default()).is_err());
    }

    #[test]
    fn test_worker_flags_parse() {
        let cli = Cli::parse_from([
            "forkbench",
            WORKER_FLAG,
            "--worker-index",
            "3",
            "--start",
            "1",
            "--end",
            "4",
            "--stagger",
            "0ns",
            "--activity-log",
            "log.txt",
        ]);
        assert!(cli.forkbench_worker);
        assert_eq!(cli.worker_index, 3);
        assert_eq!(cli.start, Some(1));
        assert_eq!(cli.end, Some(4));
    }
}
