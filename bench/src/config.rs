//! Benchmark run configuration.
//!
//! Defaults reproduce the reference scenario: 20 trials against
//! localhost:12345, the first 10 discarded as warm-up, with the pacing
//! delays that emulate a long-running training job sharing the server with
//! interactive inference. The delays are scenario parameters, not
//! timeouts; tests shrink them to zero.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use tandem_shared::utils::parse_duration;

/// One benchmark scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Number of trials to run
    pub trials: usize,

    /// Leading samples discarded before computing statistics
    pub warmup: usize,

    /// Name the training session announces to the server
    pub training_name: String,

    /// Name the inference session announces to the server
    pub inference_name: String,

    /// Pause after opening the training session, so the server has begun
    /// training before the inference request lands
    #[serde(deserialize_with = "duration_str")]
    pub post_training_open_delay: Duration,

    /// Pause before collecting the training reply
    #[serde(deserialize_with = "duration_str")]
    pub pre_training_close_delay: Duration,

    /// Pause between consecutive trials
    #[serde(deserialize_with = "duration_str")]
    pub inter_trial_delay: Duration,

    /// Batch size of the input tensor
    pub batch_size: usize,

    /// Raw input tensor file; a synthetic batch is used when absent
    pub input_path: Option<PathBuf>,

    /// Write the full report as JSON
    pub json_output: Option<PathBuf>,

    /// Write the per-phase timestamp log as JSON
    pub phase_log_output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 12345,
            trials: 20,
            warmup: 10,
            training_name: "resnet152_training".to_string(),
            inference_name: "resnet152_inference".to_string(),
            post_training_open_delay: Duration::from_secs(4),
            pre_training_close_delay: Duration::from_secs(1),
            inter_trial_delay: Duration::from_secs(1),
            batch_size: 1,
            input_path: None,
            json_output: None,
            phase_log_output: None,
        }
    }
}

impl Config {
    /// Load a scenario from a TOML file. Missing fields fall back to the
    /// reference scenario defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid scenario file {}", path.display()))
    }

    /// Resolve the server endpoint to a socket address.
    pub fn endpoint(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("cannot resolve {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("no address found for {}:{}", self.host, self.port))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            anyhow::bail!("trial count must be greater than 0");
        }

        if self.trials.saturating_sub(self.warmup) < 2 {
            anyhow::bail!(
                "{} trials leave fewer than 2 samples after the {}-trial warm-up discard",
                self.trials,
                self.warmup
            );
        }

        if self.training_name.is_empty() || self.inference_name.is_empty() {
            anyhow::bail!(
                "session names must not be empty (a zero-length name is the close sentinel)"
            );
        }

        if self.batch_size == 0 {
            anyhow::bail!("batch size must be greater than 0");
        }

        Ok(())
    }
}

fn duration_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}
