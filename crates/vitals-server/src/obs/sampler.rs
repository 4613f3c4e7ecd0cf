//! Process gauges sampled at scrape time.
//!
//! The metrics handler calls [`sample_process`] right before rendering, so
//! `render()` stays a pure function of registry state.

use vitals_core::error::Result;

use crate::app_state::AppState;
use crate::obs::{HEALTH_ALIVE, HEALTH_READY, MEMORY_USAGE_BYTES, UPTIME_SECONDS};

/// Resident and virtual memory of this process, when the platform exposes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub rss_bytes: Option<u64>,
    pub virtual_bytes: Option<u64>,
}

impl ProcessStats {
    #[cfg(target_os = "linux")]
    pub fn read() -> Self {
        match std::fs::read_to_string("/proc/self/status") {
            Ok(s) => Self::parse_proc_status(&s),
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn read() -> Self {
        Self::default()
    }

    /// Parse `VmRSS` / `VmSize` (reported in kB) from `/proc/<pid>/status`.
    pub fn parse_proc_status(s: &str) -> Self {
        let mut stats = Self::default();
        for line in s.lines() {
            let Some((key, rest)) = line.split_once(':') else { continue };
            let target = match key {
                "VmRSS" => &mut stats.rss_bytes,
                "VmSize" => &mut stats.virtual_bytes,
                _ => continue,
            };
            let kb = rest
                .split_whitespace()
                .next()
                .and_then(|n| n.parse::<u64>().ok());
            *target = kb.map(|kb| kb.saturating_mul(1024));
        }
        stats
    }
}

/// Write uptime, memory and health gauges into the registry.
pub fn sample_process(state: &AppState) -> Result<()> {
    let reg = state.metrics();
    reg.set_gauge(UPTIME_SECONDS, &[], state.uptime().as_secs_f64())?;

    let stats = ProcessStats::read();
    if let Some(rss) = stats.rss_bytes {
        reg.set_gauge(MEMORY_USAGE_BYTES, &[("type", "rss")], rss as f64)?;
    }
    if let Some(vsz) = stats.virtual_bytes {
        reg.set_gauge(MEMORY_USAGE_BYTES, &[("type", "virtual")], vsz as f64)?;
    }

    let health = state.health();
    reg.set_gauge(HEALTH_ALIVE, &[], if health.is_alive() { 1.0 } else { 0.0 })?;
    reg.set_gauge(HEALTH_READY, &[], if health.is_ready() { 1.0 } else { 0.0 })?;
    Ok(())
}
