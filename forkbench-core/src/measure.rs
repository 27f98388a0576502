//! Wall-Clock and CPU-Time Measurement
//!
//! A [`Timer`] captures real time alongside the user and system CPU time of
//! this process and of every child it has already waited for. Process-mode
//! runs spend almost all their CPU in children, so both are summed.

use std::fmt;
use std::time::{Duration, Instant};

/// User and system CPU time consumed so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: Duration,
    pub system: Duration,
}

impl CpuTimes {
    /// CPU time of this process plus its reaped children
    #[cfg(unix)]
    pub fn now() -> Self {
        let own = rusage(libc::RUSAGE_SELF);
        let children = rusage(libc::RUSAGE_CHILDREN);
        Self {
            user: own.user + children.user,
            system: own.system + children.system,
        }
    }

    #[cfg(not(unix))]
    pub fn now() -> Self {
        // CPU accounting not supported on this platform
        Self::default()
    }

    fn saturating_sub(self, earlier: Self) -> Self {
        Self {
            user: self.user.saturating_sub(earlier.user),
            system: self.system.saturating_sub(earlier.system),
        }
    }
}

#[cfg(unix)]
fn rusage(who: libc::c_int) -> CpuTimes {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::getrusage(who, &mut usage) };
    if ret != 0 {
        tracing::debug!(error = %std::io::Error::last_os_error(), "getrusage failed");
        return CpuTimes::default();
    }
    CpuTimes {
        user: timeval_to_duration(usage.ru_utime),
        system: timeval_to_duration(usage.ru_stime),
    }
}

#[cfg(unix)]
fn timeval_to_duration(tv: libc::timeval) -> Duration {
    Duration::from_secs(tv.tv_sec.max(0) as u64) + Duration::from_micros(tv.tv_usec.max(0) as u64)
}

/// Elapsed real and CPU time of one timed section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elapsed {
    pub real: Duration,
    pub user: Duration,
    pub system: Duration,
}

impl Elapsed {
    /// User plus system CPU time
    pub fn total(&self) -> Duration {
        self.user + self.system
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user={:.6} system={:.6} total={:.6} real={:.6}",
            self.user.as_secs_f64(),
            self.system.as_secs_f64(),
            self.total().as_secs_f64(),
            self.real.as_secs_f64()
        )
    }
}

/// Timer for one benchmarked section
pub struct Timer {
    start: Instant,
    cpu_start: CpuTimes,
}

impl Timer {
    /// Start a new timer
    pub fn start() -> Self {
        let cpu_start = CpuTimes::now();
        Self {
            start: Instant::now(),
            cpu_start,
        }
    }

    /// Stop the timer and return what elapsed since `start`
    pub fn stop(&self) -> Elapsed {
        let real = self.start.elapsed();
        let cpu = CpuTimes::now().saturating_sub(self.cpu_start);
        Elapsed {
            real,
            user: cpu.user,
            system: cpu.system,
        }
    }
}
