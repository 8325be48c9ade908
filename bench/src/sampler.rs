//! Latency summary statistics with a warm-up discard.
//!
//! The first trials of a run carry cold-start effects (first-connection
//! overhead, OS and network warm-up), so a fixed-size prefix of the sample
//! sequence is dropped before any statistic is computed.

use tandem_shared::types::sample::{LatencySample, Summary};

use crate::error::BenchError;

/// Drop the first `warmup` samples and compute the arithmetic mean and the
/// sample standard deviation (Bessel-corrected, n-1) of the remainder.
///
/// Fails when fewer than 2 samples remain; a standard deviation is
/// undefined below that.
pub fn summarize(samples: &[LatencySample], warmup: usize) -> Result<Summary, BenchError> {
    let stable = samples.get(warmup..).unwrap_or(&[]);
    if stable.len() < 2 {
        return Err(BenchError::InsufficientData { have: stable.len() });
    }

    let n = stable.len() as f64;
    let mean = stable.iter().map(|s| s.millis).sum::<f64>() / n;
    let variance = stable
        .iter()
        .map(|s| (s.millis - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);

    Ok(Summary {
        mean_ms: mean,
        stdev_ms: variance.sqrt(),
        kept: stable.len(),
        discarded: warmup.min(samples.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[f64]) -> Vec<LatencySample> {
        values
            .iter()
            .enumerate()
            .map(|(trial, &millis)| LatencySample { trial, millis })
            .collect()
    }

    #[test]
    fn test_mean_and_stdev_over_suffix() {
        // 20 trials, warm-up 10: only t10..t19 count.
        let mut values: Vec<f64> = (0..10).map(|i| 1000.0 + i as f64).collect();
        values.extend([10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0]);

        let summary = summarize(&samples(&values), 10).unwrap();
        assert_eq!(summary.kept, 10);
        assert_eq!(summary.discarded, 10);
        assert!((summary.mean_ms - 19.0).abs() < 1e-9);
        // Sample stdev of an arithmetic sequence 10..=28 step 2.
        assert!((summary.stdev_ms - 6.0553).abs() < 1e-3);
    }

    #[test]
    fn test_constant_sequence_has_zero_stdev() {
        let summary = summarize(&samples(&[5.0; 12]), 10).unwrap();
        assert_eq!(summary.mean_ms, 5.0);
        assert_eq!(summary.stdev_ms, 0.0);
    }

    #[test]
    fn test_warmup_samples_cannot_affect_the_result() {
        let quiet: Vec<f64> = (0..20).map(|i| 30.0 + (i % 3) as f64).collect();
        let mut noisy = quiet.clone();
        for v in noisy.iter_mut().take(10) {
            *v = 99_999.0;
        }

        let a = summarize(&samples(&quiet), 10).unwrap();
        let b = summarize(&samples(&noisy), 10).unwrap();
        assert_eq!(a.mean_ms, b.mean_ms);
        assert_eq!(a.stdev_ms, b.stdev_ms);
    }

    #[test]
    fn test_insufficient_data() {
        let err = summarize(&samples(&[1.0; 11]), 10).unwrap_err();
        assert!(matches!(err, BenchError::InsufficientData { have: 1 }));

        // Warm-up larger than the sequence leaves nothing.
        let err = summarize(&samples(&[1.0; 5]), 10).unwrap_err();
        assert!(matches!(err, BenchError::InsufficientData { have: 0 }));
    }

    #[test]
    fn test_two_samples_is_enough() {
        let summary = summarize(&samples(&[10.0, 20.0]), 0).unwrap();
        assert_eq!(summary.mean_ms, 15.0);
        assert!((summary.stdev_ms - (50.0f64).sqrt()).abs() < 1e-9);
        assert_eq!(summary.discarded, 0);
    }
}
