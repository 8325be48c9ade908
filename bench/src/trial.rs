//! Per-trial orchestration of the training and inference sessions.
//!
//! Both sessions exist concurrently during a trial but are driven from one
//! logical thread of control with explicit pacing sleeps between protocol
//! phases. There is no timeout on any blocking operation, so a hung server
//! stalls the run; the only way to stop early is process termination.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tokio::time::sleep;
use tracing::{debug, info};

use tandem_shared::types::sample::LatencySample;
use tandem_shared::types::session::SessionKind;

use crate::config::Config;
use crate::error::BenchError;
use crate::observer::PhaseObserver;
use crate::session::Session;

/// Drives the two sessions through one trial after another.
pub struct TrialRunner {
    endpoint: SocketAddr,
    config: Config,
    payload: Bytes,
    observer: Arc<dyn PhaseObserver>,
}

impl TrialRunner {
    pub fn new(
        endpoint: SocketAddr,
        config: Config,
        payload: Bytes,
        observer: Arc<dyn PhaseObserver>,
    ) -> Self {
        Self {
            endpoint,
            config,
            payload,
            observer,
        }
    }

    /// Run one trial and return the inference latency sample.
    ///
    /// The measured span runs from the instant the inference connection is
    /// established to the instant its reply has been fully received; the
    /// training session is never timed.
    pub async fn run_trial(&self, trial: usize) -> Result<LatencySample, BenchError> {
        // Start training first; its reply is collected only after the
        // inference exchange completes.
        let mut training = Session::open(
            self.endpoint,
            SessionKind::new(self.config.training_name.as_str()),
            self.observer.clone(),
        )
        .await?;
        training
            .send_request(&self.config.training_name, &[])
            .await?;
        sleep(self.config.post_training_open_delay).await;

        let mut inference = Session::open(
            self.endpoint,
            SessionKind::new(self.config.inference_name.as_str()),
            self.observer.clone(),
        )
        .await?;
        let started = Instant::now();
        inference
            .send_request(&self.config.inference_name, &self.payload)
            .await?;
        let reply = inference.recv_reply().await?;
        let millis = started.elapsed().as_secs_f64() * 1000.0;
        debug!(trial, reply = %reply, "inference exchange complete");

        sleep(self.config.pre_training_close_delay).await;
        training.recv_reply().await?;

        inference.close().await?;
        training.close().await?;
        sleep(self.config.inter_trial_delay).await;

        Ok(LatencySample { trial, millis })
    }

    /// Run every configured trial in order, invoking `on_sample` once per
    /// completed trial.
    pub async fn run(
        &self,
        mut on_sample: impl FnMut(&LatencySample),
    ) -> Result<Vec<LatencySample>, BenchError> {
        let mut samples = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            let sample = self.run_trial(trial).await?;
            info!(trial, latency_ms = sample.millis, "trial complete");
            on_sample(&sample);
            samples.push(sample);
        }
        Ok(samples)
    }
}
