//! Latency sample and summary types.

use serde::{Deserialize, Serialize};

/// One end-to-end inference latency measurement, tagged with the trial that
/// produced it. Appended once per completed trial, in trial order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    pub trial: usize,
    pub millis: f64,
}

/// Summary statistics over the post-warm-up samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean in milliseconds.
    pub mean_ms: f64,

    /// Sample standard deviation (Bessel-corrected) in milliseconds.
    pub stdev_ms: f64,

    /// Samples the statistics were computed from.
    pub kept: usize,

    /// Warm-up samples discarded before computing.
    pub discarded: usize,
}
