//! JSON output
//!
//! Exports the run report and the optional phase log for further analysis.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::observer::PhaseStamp;
use crate::BenchReport;

/// Write the full report (samples, summary, phase stamps) as pretty JSON.
pub fn write_json(path: &Path, report: &BenchReport) -> Result<()> {
    info!("Writing JSON report: {}", path.display());

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report)
        .context("failed to serialize report to JSON")?;

    Ok(())
}

/// Write the phase timestamp log on its own.
pub fn write_phase_log(path: &Path, phases: &[PhaseStamp]) -> Result<()> {
    info!("Writing phase log: {}", path.display());

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, phases)
        .context("failed to serialize phase log to JSON")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_shared::types::sample::{LatencySample, Summary};

    #[test]
    fn test_write_json_roundtrips() {
        let report = BenchReport {
            endpoint: "127.0.0.1:12345".to_string(),
            trials: 2,
            warmup: 0,
            started_at_ns: 42,
            samples: vec![
                LatencySample { trial: 0, millis: 10.0 },
                LatencySample { trial: 1, millis: 12.0 },
            ],
            summary: Summary {
                mean_ms: 11.0,
                stdev_ms: std::f64::consts::SQRT_2,
                kept: 2,
                discarded: 0,
            },
            phases: vec![],
        };

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("report.json");
        write_json(&path, &report).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: BenchReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.samples.len(), 2);
        assert_eq!(parsed.summary.kept, 2);
    }
}
