use log::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct MemoryStats {
    pub rss_mb: f64,
    pub percent: Option<f64>,
}

#[cfg(target_os = "linux")]
pub fn get_memory_usage() -> Option<MemoryStats> {
    use std::fs::read_to_string;

    fn field_kb(content: &str, key: &str) -> Option<f64> {
        content
            .lines()
            .find(|line| line.starts_with(key))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|s| s.parse::<f64>().ok())
    }

    let status = read_to_string("/proc/self/status").ok()?;
    let rss_kb = field_kb(&status, "VmRSS:")?;
    let percent = read_to_string("/proc/meminfo")
        .ok()
        .and_then(|meminfo| field_kb(&meminfo, "MemTotal:"))
        .filter(|total| *total > 0.0)
        .map(|total| rss_kb / total * 100.0);
    Some(MemoryStats {
        rss_mb: rss_kb / 1024.0,
        percent,
    })
}

#[cfg(not(target_os = "linux"))]
pub fn get_memory_usage() -> Option<MemoryStats> {
    None
}

fn describe(note: &str) -> String {
    match get_memory_usage() {
        Some(stats) => {
            let percent_str = stats
                .percent
                .map_or_else(|| "N/A".to_string(), |p| format!("{:.1}%", p));
            format!(
                "Memory usage ({}): {:.1} MB physical (RSS), {} of system memory",
                note, stats.rss_mb, percent_str
            )
        }
        None => format!(
            "Memory usage tracking not available on this platform ({}, {})",
            std::env::consts::OS,
            note
        ),
    }
}

pub fn log_memory_usage(note: &str) {
    info!("{}", describe(note));
}

/// Per-archive checkpoints go to debug to keep INFO output readable.
pub fn trace_memory_usage(note: &str) {
    if log::log_enabled!(log::Level::Debug) {
        debug!("{}", describe(note));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn reads_own_rss() {
        let stats = get_memory_usage().expect("procfs available");
        assert!(stats.rss_mb > 0.0);
    }

    #[test]
    fn description_names_the_checkpoint() {
        assert!(describe("after v1").contains("after v1"));
    }
}
