//! Report command implementation
//!
//! Re-summarizes a saved run, optionally with a different warm-up discard,
//! without touching the server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tandem_bench::{sampler, BenchReport};

use crate::output;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Report JSON produced by `tandem run --json`
    pub input: PathBuf,

    /// Recompute the statistics with this warm-up discard
    #[arg(short, long)]
    pub warmup: Option<usize>,
}

pub async fn run(args: ReportArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read report {}", args.input.display()))?;
    let mut report: BenchReport = serde_json::from_str(&text)
        .with_context(|| format!("invalid report {}", args.input.display()))?;

    if let Some(warmup) = args.warmup {
        report.summary = sampler::summarize(&report.samples, warmup)
            .context("cannot recompute statistics")?;
        report.warmup = warmup;
        output::info(&format!("recomputed with warm-up discard of {warmup}"));
    }

    tandem_bench::output::report::write_report(std::io::stdout().lock(), &report)?;
    Ok(())
}
