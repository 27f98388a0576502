//! Configuration loading from forkbench.toml
//!
//! Forkbench configuration can be specified in a `forkbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use forkbench_core::{DEFAULT_RANGE, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Forkbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForkbenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Log file configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the numeric range of a run comes from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RangeSource {
    /// Use `range_start..=range_end` from the configuration
    #[default]
    Fixed,
    /// Ask for "start end" on stdin before each run
    Prompt,
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Workers spawned per run
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// "fixed" or "prompt"
    #[serde(default)]
    pub range_source: RangeSource,
    /// First number of the fixed range
    #[serde(default = "default_range_start")]
    pub range_start: u64,
    /// Last number of the fixed range (inclusive)
    #[serde(default = "default_range_end")]
    pub range_end: u64,
    /// Start delay step between workers (e.g., "0ms", "50ms")
    #[serde(default = "default_stagger")]
    pub stagger: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            range_source: RangeSource::default(),
            range_start: default_range_start(),
            range_end: default_range_end(),
            stagger: default_stagger(),
        }
    }
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}
fn default_range_start() -> u64 {
    DEFAULT_RANGE.0
}
fn default_range_end() -> u64 {
    DEFAULT_RANGE.1
}
fn default_stagger() -> String {
    "0ms".to_string()
}

/// Log file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// General activity log
    #[serde(default = "default_activity_log")]
    pub activity_log: PathBuf,
    /// Benchmark result log
    #[serde(default = "default_benchmark_log")]
    pub benchmark_log: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            activity_log: default_activity_log(),
            benchmark_log: default_benchmark_log(),
        }
    }
}

fn default_activity_log() -> PathBuf {
    PathBuf::from("log.txt")
}
fn default_benchmark_log() -> PathBuf {
    PathBuf::from("performance.txt")
}

impl ForkbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("forkbench.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %e,
                            "ignoring unreadable configuration"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Forkbench Configuration

[runner]
# Workers spawned per run (each walks the whole range)
workers = 5
# Range source: "fixed" uses range_start..range_end, "prompt" asks before each run
range_source = "fixed"
range_start = 0
range_end = 1000
# Delay worker i by i * stagger before it starts
stagger = "0ms"

[logging]
# General activity log (worker lifecycle and factorizations)
activity_log = "log.txt"
# Benchmark result log (process vs thread timings)
benchmark_log = "performance.txt"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if value < 0.0 {
            return Err(anyhow::anyhow!("Negative duration: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}
