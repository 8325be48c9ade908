//! Inference latency benchmark library
//!
//! Measures end-to-end inference latency against a model-serving endpoint
//! while an independent training session runs against the same server,
//! using two concurrently-open but sequentially-driven sessions per trial.

pub mod channel;
pub mod config;
pub mod error;
pub mod input;
pub mod observer;
pub mod output;
pub mod sampler;
pub mod session;
pub mod trial;

pub use config::Config;
pub use error::BenchError;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use tandem_shared::types::sample::{LatencySample, Summary};
use tandem_shared::utils::time::system_time_nanos;

use observer::{PhaseLog, PhaseStamp};

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub endpoint: String,
    pub trials: usize,
    pub warmup: usize,
    pub started_at_ns: u64,
    pub samples: Vec<LatencySample>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<PhaseStamp>,
}

/// Run the full benchmark scenario described by `config`.
pub async fn run_benchmark(config: Config) -> Result<BenchReport> {
    run_benchmark_with(config, |_| {}).await
}

/// Like [`run_benchmark`], invoking `on_sample` after every completed
/// trial.
pub async fn run_benchmark_with(
    config: Config,
    on_sample: impl FnMut(&LatencySample),
) -> Result<BenchReport> {
    config.validate().context("invalid configuration")?;
    let endpoint = config.endpoint()?;

    let spec = input::TensorSpec::imagenet(config.batch_size);
    let payload = input::load_payload(config.input_path.as_deref(), spec)?;
    info!(
        %endpoint,
        trials = config.trials,
        warmup = config.warmup,
        payload_bytes = payload.len(),
        "starting benchmark"
    );

    let started_at_ns = system_time_nanos();
    let phase_log = Arc::new(PhaseLog::new());
    let runner = trial::TrialRunner::new(
        endpoint,
        config.clone(),
        payload,
        phase_log.clone(),
    );
    let samples = runner.run(on_sample).await.context("benchmark run aborted")?;

    let summary = sampler::summarize(&samples, config.warmup)?;
    info!(
        mean_ms = summary.mean_ms,
        stdev_ms = summary.stdev_ms,
        kept = summary.kept,
        "benchmark complete"
    );

    let report = BenchReport {
        endpoint: endpoint.to_string(),
        trials: config.trials,
        warmup: config.warmup,
        started_at_ns,
        samples,
        summary,
        phases: phase_log.snapshot(),
    };

    if let Some(path) = &config.json_output {
        output::json::write_json(path, &report)?;
    }
    if let Some(path) = &config.phase_log_output {
        output::json::write_phase_log(path, &report.phases)?;
    }

    Ok(report)
}
