//! Time-related utilities

use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current system time in nanoseconds since UNIX epoch
pub fn system_time_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_nanos() as u64
}

/// Wall-clock time formatted for report headers.
pub fn report_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time() {
        let nanos = system_time_nanos();

        // Basic sanity check
        assert!(nanos > 1_600_000_000_000_000_000); // After 2020
    }

    #[test]
    fn test_report_timestamp_shape() {
        let stamp = report_timestamp();
        assert_eq!(stamp.len(), "2026-01-01 00:00:00".len());
    }
}
