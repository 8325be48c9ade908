//! Plain-text run report.

use std::io::Write;

use anyhow::Result;

use tandem_shared::utils::time::report_timestamp;

use crate::BenchReport;

/// Write the human-readable summary of a completed run.
pub fn write_report(mut w: impl Write, report: &BenchReport) -> Result<()> {
    writeln!(w, "Inference Latency Report")?;
    writeln!(w, "========================")?;
    writeln!(w, "Generated: {}", report_timestamp())?;
    writeln!(w, "Endpoint:  {}", report.endpoint)?;
    writeln!(
        w,
        "Trials:    {} ({} discarded as warm-up)",
        report.trials, report.summary.discarded
    )?;
    writeln!(w)?;

    writeln!(w, "{:>6} {:>14}", "Trial", "Latency (ms)")?;
    for sample in report.samples.iter().skip(report.warmup) {
        writeln!(w, "{:>6} {:>14.3}", sample.trial, sample.millis)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "Latency: {:.3} ms (stdev: {:.3})",
        report.summary.mean_ms, report.summary.stdev_ms
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_shared::types::sample::{LatencySample, Summary};

    #[test]
    fn test_report_lists_only_stable_trials() {
        let report = BenchReport {
            endpoint: "127.0.0.1:12345".to_string(),
            trials: 4,
            warmup: 2,
            started_at_ns: 0,
            samples: vec![
                LatencySample { trial: 0, millis: 900.0 },
                LatencySample { trial: 1, millis: 800.0 },
                LatencySample { trial: 2, millis: 31.25 },
                LatencySample { trial: 3, millis: 32.75 },
            ],
            summary: Summary {
                mean_ms: 32.0,
                stdev_ms: 1.06,
                kept: 2,
                discarded: 2,
            },
            phases: vec![],
        };

        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Latency: 32.000 ms (stdev: 1.060)"));
        assert!(text.contains("31.250"));
        assert!(!text.contains("900.000"));
    }
}
