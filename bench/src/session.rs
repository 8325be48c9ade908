//! Session protocol: request, reply, and sentinel close over a framed
//! channel.
//!
//! A session walks `Unopened -> Connected -> RequestSent -> AwaitingReply
//! -> Idle -> Closed`; `Idle` loops back to `RequestSent` when the same
//! session issues another request. Invalid transitions are rejected before
//! any bytes move.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::debug;

use tandem_shared::protocol::wire::{self, Reply};
use tandem_shared::types::session::{SessionKind, SessionState};

use crate::channel::FramedChannel;
use crate::error::BenchError;
use crate::observer::{Phase, PhaseObserver};

/// One client-held logical interaction with the server, bound to its own
/// connection for its whole lifetime.
pub struct Session {
    kind: SessionKind,
    state: SessionState,
    channel: FramedChannel,
    observer: Arc<dyn PhaseObserver>,
}

impl Session {
    /// Establish the underlying connection and enter `Connected`.
    pub async fn open(
        addr: SocketAddr,
        kind: SessionKind,
        observer: Arc<dyn PhaseObserver>,
    ) -> Result<Self, BenchError> {
        let channel = FramedChannel::connect(addr).await?;
        observer.record(kind.as_str(), Phase::Connect);
        debug!(kind = kind.as_str(), %addr, "session connected");
        Ok(Self {
            kind,
            state: SessionState::Connected,
            channel,
            observer,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    fn expect_state(
        &self,
        op: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), BenchError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(BenchError::State {
                op,
                state: self.state,
            })
        }
    }

    /// Send the name frame and the data frame, in order, then await a reply.
    ///
    /// Valid from `Connected` or `Idle`. The name must be nonzero-length;
    /// the payload may be empty (the training session sends no payload at
    /// all, its parameters are implied server-side by the name).
    pub async fn send_request(
        &mut self,
        name: &str,
        payload: &[u8],
    ) -> Result<(), BenchError> {
        self.expect_state("send_request", &[SessionState::Connected, SessionState::Idle])?;

        self.observer
            .record(self.kind.as_str(), Phase::BeforeRequestSerialize);
        let bytes = wire::encode_request(name, payload)?;
        self.observer.record(self.kind.as_str(), Phase::AfterSerialize);

        self.state = SessionState::RequestSent;
        self.channel.send_bytes(&bytes).await?;
        self.observer.record(self.kind.as_str(), Phase::AfterSend);
        self.state = SessionState::AwaitingReply;

        debug!(
            kind = self.kind.as_str(),
            name,
            payload_bytes = payload.len(),
            "request sent"
        );
        Ok(())
    }

    /// Read the fixed 4-byte acknowledgment.
    ///
    /// Valid only from `AwaitingReply`. The token content is opaque and
    /// never validated; a peer close before all 4 bytes have arrived is a
    /// protocol violation.
    pub async fn recv_reply(&mut self) -> Result<Reply, BenchError> {
        self.expect_state("recv_reply", &[SessionState::AwaitingReply])?;

        let bytes = match self.channel.recv_exact(wire::REPLY_LEN).await {
            Ok(bytes) => bytes,
            Err(BenchError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(BenchError::Protocol(format!(
                    "connection closed before the {}-byte reply completed",
                    wire::REPLY_LEN
                )));
            }
            Err(e) => return Err(e),
        };
        let mut token = [0u8; wire::REPLY_LEN];
        token.copy_from_slice(&bytes);
        let reply = Reply(token);

        self.observer.record(self.kind.as_str(), Phase::AfterReply);
        self.state = SessionState::Idle;
        debug!(kind = self.kind.as_str(), reply = %reply, "reply received");
        Ok(reply)
    }

    /// Send the zero-length name-frame sentinel and release the connection.
    ///
    /// Valid from `Connected` or `Idle`. The sentinel is the only
    /// well-formed termination and must be the last frame on the
    /// connection; no data frame follows it.
    pub async fn close(&mut self) -> Result<(), BenchError> {
        self.expect_state("close", &[SessionState::Connected, SessionState::Idle])?;

        self.observer.record(self.kind.as_str(), Phase::BeforeClose);
        self.channel.send_bytes(&wire::close_frame()).await?;
        self.channel.shutdown().await?;
        self.state = SessionState::Closed;
        self.observer.record(self.kind.as_str(), Phase::AfterClose);

        debug!(kind = self.kind.as_str(), "session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn connected_session() -> (Session, tokio::net::TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accept = tokio::spawn(async move { listener.accept().await.unwrap().0 });
        let session = Session::open(
            addr,
            SessionKind::new("resnet152_inference"),
            Arc::new(NoopObserver),
        )
        .await
        .unwrap();
        (session, accept.await.unwrap())
    }

    #[tokio::test]
    async fn test_recv_reply_before_request_is_state_error() {
        let (mut session, _peer) = connected_session().await;
        assert_eq!(session.state(), SessionState::Connected);

        match session.recv_reply().await {
            Err(BenchError::State { op, state }) => {
                assert_eq!(op, "recv_reply");
                assert_eq!(state, SessionState::Connected);
            }
            other => panic!("expected a state error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_close_while_awaiting_reply_is_state_error() {
        let (mut session, _peer) = connected_session().await;
        session.send_request("resnet152_inference", b"data").await.unwrap();
        assert_eq!(session.state(), SessionState::AwaitingReply);

        assert!(matches!(
            session.close().await,
            Err(BenchError::State { op: "close", .. })
        ));
    }

    #[tokio::test]
    async fn test_reply_transitions_to_idle() {
        let (mut session, mut peer) = connected_session().await;
        session.send_request("resnet152_inference", &[]).await.unwrap();

        peer.write_all(b"0000").await.unwrap();
        let reply = session.recv_reply().await.unwrap();
        assert_eq!(reply.as_str_lossy(), "0000");
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_short_reply_is_protocol_error() {
        let (mut session, mut peer) = connected_session().await;
        session.send_request("resnet152_inference", &[]).await.unwrap();

        peer.write_all(b"00").await.unwrap();
        drop(peer);

        assert!(matches!(
            session.recv_reply().await,
            Err(BenchError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn test_close_sends_only_the_sentinel() {
        let (mut session, mut peer) = connected_session().await;
        session.close().await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);

        let mut buf = Vec::new();
        peer.read_to_end(&mut buf).await.unwrap();
        // Exactly u32le(0) and nothing after it.
        assert_eq!(buf, vec![0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected_before_any_write() {
        let (mut session, mut peer) = connected_session().await;
        assert!(matches!(
            session.send_request("", b"data").await,
            Err(BenchError::Wire(_))
        ));
        // Still Connected, and a clean close works; the peer sees only the
        // sentinel.
        session.close().await.unwrap();
        let mut buf = Vec::new();
        peer.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, vec![0, 0, 0, 0]);
    }
}
