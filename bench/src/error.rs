//! Error types for the benchmark library.

use std::net::SocketAddr;

use tandem_shared::protocol::wire::WireError;
use tandem_shared::types::session::SessionState;

/// Errors surfaced by the benchmark client.
///
/// None of these are recovered locally. A failure in any trial aborts the
/// whole run: a skipped trial would break the trial-to-trial pacing the
/// sample sequence is built on.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The endpoint could not be reached.
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Partial or failed I/O on an established connection.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer violated the wire protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Malformed frame data.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An operation was invoked in a session state that does not permit it.
    #[error("{op} is not valid in session state {state:?}")]
    State {
        op: &'static str,
        state: SessionState,
    },

    /// Too few samples remain after the warm-up discard.
    #[error("need at least 2 samples after the warm-up discard, have {have}")]
    InsufficientData { have: usize },
}
