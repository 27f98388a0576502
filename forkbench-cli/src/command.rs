//! Interactive Command Loop
//!
//! Reads commands line by line until one is recognized, resolves the range
//! for it, hands it to a [`Dispatcher`] and returns. Unknown input prints the
//! usage text and prompts again.

use crate::config::RangeSource;
use forkbench_core::{RunConfig, RunConfigError};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// Usage text printed for unrecognized commands
pub const USAGE: &str =
    "usage: [p-runs processes|t-runs threads|b-runs process vs thread benchmark|exit]";

const COMMAND_PROMPT: &str = "Enter command: ";
const RANGE_PROMPT: &str = "Enter numerical range (separated by a space): ";

/// Errors raised while reading user input; all are recovered by re-prompting
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0:?}")]
    Unknown(String),

    #[error("expected two whole numbers separated by a space, got {0:?}")]
    MalformedRange(String),

    #[error(transparent)]
    InvalidRange(#[from] RunConfigError),
}

/// A recognized command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `p`: run the workers as processes
    Processes,
    /// `t`: run the workers as threads
    Threads,
    /// `b`: time processes, then threads
    Benchmark,
    /// `exit`: leave without running anything
    Exit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" => Ok(Command::Processes),
            "t" => Ok(Command::Threads),
            "b" => Ok(Command::Benchmark),
            "exit" => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(s.trim().to_string())),
        }
    }
}

/// Parse a `"start end"` line
pub fn parse_range(line: &str) -> Result<(u64, u64), CommandError> {
    let malformed = || CommandError::MalformedRange(line.trim().to_string());
    let mut parts = line.split_whitespace();

    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let start = start.parse().map_err(|_| malformed())?;
    let end = end.parse().map_err(|_| malformed())?;
    Ok((start, end))
}

/// Carries out a recognized command
pub trait Dispatcher {
    /// Run `command` with the resolved configuration, writing status to `out`
    fn dispatch(
        &mut self,
        command: Command,
        config: &RunConfig,
        out: &mut dyn Write,
    ) -> anyhow::Result<()>;
}

/// Prompt/read/dispatch loop over any line-oriented input
pub struct CommandLoop<R, W> {
    input: R,
    output: W,
    range_source: RangeSource,
    base: RunConfig,
}

impl<R: BufRead, W: Write> CommandLoop<R, W> {
    /// `base` supplies the worker count and stagger, and the range when
    /// `range_source` is fixed
    pub fn new(input: R, output: W, range_source: RangeSource, base: RunConfig) -> Self {
        Self {
            input,
            output,
            range_source,
            base,
        }
    }

    /// Read until a command is recognized, dispatch it, and return it.
    ///
    /// Returns `None` when input ends before anything was dispatched.
    pub fn run(&mut self, dispatcher: &mut impl Dispatcher) -> anyhow::Result<Option<Command>> {
        self.prompt(COMMAND_PROMPT)?;

        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };

            match line.parse::<Command>() {
                Ok(Command::Exit) => return Ok(Some(Command::Exit)),
                Ok(command) => {
                    let Some(config) = self.resolve_config()? else {
                        return Ok(None);
                    };
                    dispatcher.dispatch(command, &config, &mut self.output)?;
                    return Ok(Some(command));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "rejected command");
                    writeln!(self.output, "{USAGE}")?;
                    self.prompt(COMMAND_PROMPT)?;
                }
            }
        }
    }

    fn resolve_config(&mut self) -> io::Result<Option<RunConfig>> {
        if self.range_source == RangeSource::Fixed {
            return Ok(Some(self.base));
        }

        loop {
            self.prompt(RANGE_PROMPT)?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };

            let parsed = parse_range(&line).and_then(|(start, end)| {
                RunConfig::new(self.base.workers(), start, end).map_err(CommandError::from)
            });
            match parsed {
                Ok(config) => return Ok(Some(config.with_stagger(self.base.stagger()))),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    // Undecodable bytes become U+FFFD so a garbled line is rejected like any other
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }
}
