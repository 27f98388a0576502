//! Integration tests for Forkbench
//!
//! These tests drive the real `forkbench` binary, both as the worker program
//! of a `ProcessSpawner` and end to end through stdin.

use forkbench::{Logger, ProcessSpawner, RunConfig, Spawner};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_forkbench");

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn scratch_dir(name: &str) -> PathBuf {
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "forkbench-it-{name}-{}-{unique}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Log lines with the `Logger` prefix stripped; panics on a malformed line
fn payloads(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| {
            assert!(line.starts_with("I, ["), "malformed line: {line}");
            line.split_once(" -- : ")
                .unwrap_or_else(|| panic!("malformed line: {line}"))
                .1
                .to_string()
        })
        .collect()
}

fn count(payloads: &[String], pred: impl Fn(&str) -> bool) -> usize {
    payloads.iter().filter(|p| pred(p)).count()
}

fn is_factorization(payload: &str) -> bool {
    payload.contains(": [")
}

/// Run the binary inside `dir` with both logs in `dir`, feeding `stdin`
fn forkbench(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .current_dir(dir)
        .args(["--activity-log", "log.txt", "--benchmark-log", "performance.txt"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // The binary may leave before reading everything; a closed pipe is fine
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

/// Every process worker walks the whole range on its own
#[test]
fn test_process_spawner_redundant_full_range() {
    let dir = scratch_dir("process-range");
    let logger =
        Arc::new(Logger::open(dir.join("log.txt"), dir.join("performance.txt")).unwrap());
    let spawner = ProcessSpawner::with_program(BIN, logger);

    spawner.run(&RunConfig::new(3, 0, 9).unwrap()).unwrap();

    let lines = payloads(&dir.join("log.txt"));
    assert_eq!(count(&lines, |p| p.ends_with(" began")), 3);
    assert_eq!(count(&lines, is_factorization), 3 * 10);
    assert_eq!(count(&lines, |p| p.ends_with(" completed")), 3);

    // Three distinct child pids, none of them ours
    let pids: HashSet<&str> = lines
        .iter()
        .filter(|p| p.starts_with("pid:"))
        .map(|p| p.split(' ').next().unwrap())
        .collect();
    assert_eq!(pids.len(), 3);
    assert!(!pids.contains(format!("pid:{}", std::process::id()).as_str()));
}

/// The spawner returns only after the slowest child has logged `completed`
#[test]
fn test_process_spawner_waits_for_slowest_worker() {
    let dir = scratch_dir("process-stagger");
    let logger =
        Arc::new(Logger::open(dir.join("log.txt"), dir.join("performance.txt")).unwrap());
    let spawner = ProcessSpawner::with_program(BIN, logger);
    let config = RunConfig::new(3, 0, 3)
        .unwrap()
        .with_stagger(Duration::from_millis(100));

    let started = Instant::now();
    spawner.run(&config).unwrap();
    let elapsed = started.elapsed();

    // The third worker sleeps 200ms before it begins
    assert!(elapsed >= Duration::from_millis(200));
    let lines = payloads(&dir.join("log.txt"));
    assert_eq!(count(&lines, |p| p.ends_with(" completed")), 3);
    assert_eq!(
        lines.last().map(String::as_str),
        Some("process performance test finished")
    );
}

/// `p`, two workers, range 0..5 typed at the prompt
#[test]
fn test_interactive_process_run() {
    let dir = scratch_dir("e2e-process");
    let output = forkbench(&dir, &["--workers", "2", "--range-source", "prompt"], "p\n0 5\n");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("spawning processes.."));

    let lines = payloads(&dir.join("log.txt"));
    assert_eq!(count(&lines, |p| p.ends_with(" began")), 2);
    assert_eq!(count(&lines, is_factorization), 12);
    assert_eq!(count(&lines, |p| p.ends_with(" completed")), 2);
}

/// `b`, range 1..100 typed at the prompt
#[test]
fn test_interactive_benchmark_log() {
    let dir = scratch_dir("e2e-bench");
    let output = forkbench(&dir, &["--range-source", "prompt"], "b\n1 100\n");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let lines = payloads(&dir.join("performance.txt"));
    assert_eq!(lines.len(), 4, "benchmark log: {lines:?}");
    assert_eq!(lines[0], "started process vs thread benchmark");
    assert!(lines[1].starts_with("process ++ "));
    assert!(lines[2].starts_with("thread ++ "));
    assert_eq!(lines[3], "completed process vs thread benchmark");

    for line in &lines[1..3] {
        let real: f64 = line.rsplit_once("real=").unwrap().1.parse().unwrap();
        assert!(real >= 0.0);
    }

    // Both variants ran the default five workers over 100 numbers
    let activity = payloads(&dir.join("log.txt"));
    assert_eq!(count(&activity, is_factorization), 2 * 5 * 100);
}

/// An unknown command prints usage and waits for another one
#[test]
fn test_unknown_command_reprompts() {
    let dir = scratch_dir("e2e-unknown");
    let output = forkbench(&dir, &["--workers", "1", "--end", "3"], "q\nt\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("usage:"));
    assert!(stdout.contains("spawning Threads.."));

    let lines = payloads(&dir.join("log.txt"));
    assert_eq!(count(&lines, |p| p.starts_with("thread:worker-0 ")), 4 + 2);
}

/// `exit` and end of input both leave with status 0 and run nothing
#[test]
fn test_exit_without_running() {
    for input in ["exit\n", ""] {
        let dir = scratch_dir("e2e-exit");
        let output = forkbench(&dir, &[], input);

        assert!(output.status.success());
        assert!(payloads(&dir.join("log.txt")).is_empty());
    }
}

/// Non-interactive subcommand with a fixed range
#[test]
fn test_thread_subcommand() {
    let dir = scratch_dir("e2e-thread");
    let output = forkbench(&dir, &["--workers", "2", "--start", "0", "--end", "5", "thread"], "");

    assert!(output.status.success());
    let lines = payloads(&dir.join("log.txt"));
    assert_eq!(count(&lines, |p| p.ends_with(" began")), 2);
    assert_eq!(count(&lines, is_factorization), 12);
    assert_eq!(count(&lines, |p| p.ends_with(" completed")), 2);
}

/// An unopenable log file is fatal
#[test]
fn test_missing_log_directory_is_fatal() {
    let dir = scratch_dir("e2e-fatal");
    let output = Command::new(BIN)
        .current_dir(&dir)
        .args(["--activity-log", "missing/log.txt", "process"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("log files unavailable"));
}

/// `init` prints a configuration that the binary accepts back
#[test]
fn test_init_roundtrip() {
    let dir = scratch_dir("e2e-init");
    let output = Command::new(BIN).current_dir(&dir).arg("init").output().unwrap();
    assert!(output.status.success());
    std::fs::write(dir.join("forkbench.toml"), &output.stdout).unwrap();

    let output = forkbench(&dir, &["--workers", "1", "--end", "2", "thread"], "");
    assert!(output.status.success());
    assert_eq!(count(&payloads(&dir.join("log.txt")), is_factorization), 3);
}

/// A worker process that cannot write its log says so on stderr
#[cfg(target_os = "linux")]
#[test]
fn test_worker_write_failure_reported() {
    let output = Command::new(BIN)
        .args([
            "--forkbench-worker",
            "--start",
            "0",
            "--end",
            "2",
            "--activity-log",
            "/dev/full",
        ])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    // Log failures are not fatal to the worker
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to append log line"), "stderr: {stderr}");
}
