//! Benchmark runner binary
//!
//! Drives the full scenario from flat command-line flags and prints the
//! plain-text report to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tandem_bench::{output, Config};
use tandem_shared::utils::parse_duration;

#[derive(Parser, Debug)]
#[command(name = "tandem-bench")]
#[command(about = "Inference latency benchmark against a model-serving endpoint", long_about = None)]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 12345)]
    port: u16,

    /// Number of trials
    #[arg(short, long, default_value_t = 20)]
    trials: usize,

    /// Leading trials discarded as warm-up
    #[arg(short, long, default_value_t = 10)]
    warmup: usize,

    /// Name the training session announces to the server
    #[arg(long, default_value = "resnet152_training")]
    training_name: String,

    /// Name the inference session announces to the server
    #[arg(long, default_value = "resnet152_inference")]
    inference_name: String,

    /// Delay after opening the training session (e.g. "4s", "500ms")
    #[arg(long, default_value = "4s")]
    post_training_open_delay: String,

    /// Delay before collecting the training reply
    #[arg(long, default_value = "1s")]
    pre_training_close_delay: String,

    /// Delay between consecutive trials
    #[arg(long, default_value = "1s")]
    inter_trial_delay: String,

    /// Batch size of the input tensor
    #[arg(short, long, default_value_t = 1)]
    batch_size: usize,

    /// Raw input tensor file (a synthetic batch is used if omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the phase timestamp log as JSON
    #[arg(long)]
    phase_log: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().map_err(|err| anyhow::anyhow!(err))?;

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config {
        host: args.host,
        port: args.port,
        trials: args.trials,
        warmup: args.warmup,
        training_name: args.training_name,
        inference_name: args.inference_name,
        post_training_open_delay: parse_duration(&args.post_training_open_delay)
            .context("invalid --post-training-open-delay")?,
        pre_training_close_delay: parse_duration(&args.pre_training_close_delay)
            .context("invalid --pre-training-close-delay")?,
        inter_trial_delay: parse_duration(&args.inter_trial_delay)
            .context("invalid --inter-trial-delay")?,
        batch_size: args.batch_size,
        input_path: args.input,
        json_output: args.json,
        phase_log_output: args.phase_log,
    };

    let report = tandem_bench::run_benchmark(config).await?;
    output::report::write_report(std::io::stdout().lock(), &report)?;
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
