//! Output Formatting
//!
//! Human-readable summary of a process vs. thread comparison.

use crate::benchmark::BenchmarkMeasurement;

/// Format both measurements for terminal display
pub fn format_comparison(
    process: &BenchmarkMeasurement,
    thread: &BenchmarkMeasurement,
) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Process vs Thread Results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    for measurement in [process, thread] {
        let elapsed = &measurement.elapsed;
        output.push_str(&format!(
            "  {:<8} real: {:>10.6} s  user: {:>10.6} s  system: {:>10.6} s  total: {:>10.6} s\n",
            measurement.mode.label(),
            elapsed.real.as_secs_f64(),
            elapsed.user.as_secs_f64(),
            elapsed.system.as_secs_f64(),
            elapsed.total().as_secs_f64(),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawner::SpawnMode;
    use forkbench_core::Elapsed;
    use std::time::Duration;

    #[test]
    fn test_one_row_per_mode() {
        let process = BenchmarkMeasurement {
            mode: SpawnMode::Process,
            elapsed: Elapsed {
                real: Duration::from_millis(120),
                ..Default::default()
            },
        };
        let thread = BenchmarkMeasurement {
            mode: SpawnMode::Thread,
            elapsed: Elapsed {
                real: Duration::from_millis(40),
                ..Default::default()
            },
        };

        let output = format_comparison(&process, &thread);
        let rows: Vec<&str> = output.lines().filter(|l| l.contains("real:")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].trim_start().starts_with("process"));
        assert!(rows[0].contains("0.120000 s"));
        assert!(rows[1].trim_start().starts_with("thread"));
        assert!(rows[1].contains("0.040000 s"));
    }
}
