//! Run command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use tandem_bench::Config;

use crate::output;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario TOML file (flags below override its values)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Server host
    #[arg(long)]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of trials
    #[arg(short, long)]
    pub trials: Option<usize>,

    /// Leading trials discarded as warm-up
    #[arg(short, long)]
    pub warmup: Option<usize>,

    /// Raw input tensor file (a synthetic batch is used if omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.scenario {
        Some(path) => {
            info!("Loading scenario from {}", path.display());
            Config::from_toml_file(path)?
        }
        None => Config::default(),
    };

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if let Some(warmup) = args.warmup {
        config.warmup = warmup;
    }
    if let Some(input) = args.input {
        config.input_path = Some(input);
    }
    if let Some(json) = args.json {
        config.json_output = Some(json);
    }

    let bar = ProgressBar::new(config.trials as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} trials {msg}")
            .context("invalid progress template")?,
    );

    let report = tandem_bench::run_benchmark_with(config, |sample| {
        bar.set_message(format!("{:.1} ms", sample.millis));
        bar.inc(1);
    })
    .await?;
    bar.finish_and_clear();

    tandem_bench::output::report::write_report(std::io::stdout().lock(), &report)?;
    output::success(&format!(
        "mean {:.3} ms (stdev {:.3}) over {} stable trials",
        report.summary.mean_ms, report.summary.stdev_ms, report.summary.kept
    ));
    Ok(())
}
