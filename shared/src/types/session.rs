//! Session identity and lifecycle types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one benchmark session.
///
/// `Idle` may loop back to `RequestSent` for session kinds that issue more
/// than one request on the same connection; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Connected,
    RequestSent,
    AwaitingReply,
    Idle,
    Closed,
}

/// Identifies a logical session to the server.
///
/// Kinds are opaque strings meaningful only to the server
/// (`"resnet152_training"` and `"resnet152_inference"` in the reference
/// scenario); nothing in the client interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKind(String);

impl SessionKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
