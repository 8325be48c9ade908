//! Phase instrumentation for session transitions.
//!
//! Every transition point in the session protocol reports to an observer
//! injected by the caller, so latency phases can be traced without coupling
//! the framing logic to any particular clock or log. Observers are scoped
//! to one run; there is no process-wide state.

use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Instrumented points in a session's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Connect,
    BeforeRequestSerialize,
    AfterSerialize,
    AfterSend,
    AfterReply,
    BeforeClose,
    AfterClose,
}

/// Receives a callback at every session transition point.
///
/// Implementations capture their own monotonic timestamp; the session layer
/// only reports that the transition happened.
pub trait PhaseObserver: Send + Sync {
    fn record(&self, session: &str, phase: Phase);
}

/// Observer that discards every phase.
pub struct NoopObserver;

impl PhaseObserver for NoopObserver {
    fn record(&self, _session: &str, _phase: Phase) {}
}

/// One recorded transition, as a microsecond offset from the start of the
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStamp {
    pub session: String,
    pub phase: Phase,
    pub offset_us: u64,
}

/// Collects phase stamps for one run, anchored to the instant the log was
/// created.
pub struct PhaseLog {
    started: Instant,
    entries: Mutex<Vec<PhaseStamp>>,
}

impl PhaseLog {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Vec<PhaseStamp> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for PhaseLog {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseObserver for PhaseLog {
    fn record(&self, session: &str, phase: Phase) {
        let offset_us = self.started.elapsed().as_micros() as u64;
        self.entries.lock().unwrap().push(PhaseStamp {
            session: session.to_string(),
            phase,
            offset_us,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_log_records_in_order() {
        let log = PhaseLog::new();
        log.record("resnet152_training", Phase::Connect);
        log.record("resnet152_inference", Phase::Connect);
        log.record("resnet152_inference", Phase::AfterReply);

        let stamps = log.snapshot();
        assert_eq!(stamps.len(), 3);
        assert_eq!(stamps[0].session, "resnet152_training");
        assert_eq!(stamps[0].phase, Phase::Connect);
        assert_eq!(stamps[2].phase, Phase::AfterReply);
        // Offsets never move backwards.
        assert!(stamps[0].offset_us <= stamps[1].offset_us);
        assert!(stamps[1].offset_us <= stamps[2].offset_us);
    }

    #[test]
    fn test_noop_observer() {
        NoopObserver.record("any", Phase::BeforeClose);
    }
}
