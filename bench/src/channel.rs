//! Length-prefixed framing over a TCP connection.
//!
//! A channel owns its connection exclusively; there is never concurrent
//! access to one channel, so no locking is involved. All operations block
//! the calling task until completion or I/O failure. There are no implicit
//! retries and no timeouts: any partial I/O is surfaced to the caller.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use tandem_shared::protocol::wire::LEN_PREFIX_LEN;

use crate::error::BenchError;

/// One side of a framed, ordered, reliable byte stream.
#[derive(Debug)]
pub struct FramedChannel {
    stream: TcpStream,
    peer: SocketAddr,
}

impl FramedChannel {
    /// Connect to the server endpoint.
    pub async fn connect(addr: SocketAddr) -> Result<Self, BenchError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| BenchError::Connection { addr, source })?;
        Ok(Self { stream, peer: addr })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Write one frame: `u32le(len)` followed by the payload.
    ///
    /// The prefix and payload go out in a single `write_all`, so two frames
    /// from the same caller can never interleave.
    pub async fn send_frame(&mut self, payload: &[u8]) -> Result<(), BenchError> {
        let len = u32::try_from(payload.len()).map_err(|_| {
            BenchError::Protocol(format!(
                "frame body of {} bytes does not fit a u32 length prefix",
                payload.len()
            ))
        })?;
        let mut buf = Vec::with_capacity(LEN_PREFIX_LEN + payload.len());
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(payload);
        self.stream.write_all(&buf).await?;
        Ok(())
    }

    /// Write pre-encoded bytes: an encoded request pair, or the close
    /// sentinel.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), BenchError> {
        self.stream.write_all(bytes).await?;
        Ok(())
    }

    /// Read exactly `n` bytes. A peer close before `n` bytes have arrived
    /// surfaces as an I/O error (`UnexpectedEof`).
    pub async fn recv_exact(&mut self, n: usize) -> Result<Vec<u8>, BenchError> {
        let mut buf = vec![0u8; n];
        self.stream.read_exact(&mut buf).await?;
        Ok(buf)
    }

    /// Flush and shut down the write half of the connection.
    pub async fn shutdown(&mut self) -> Result<(), BenchError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_send_frame_layout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4 + 3];
            sock.read_exact(&mut buf).await.unwrap();
            buf
        });

        let mut channel = FramedChannel::connect(addr).await.unwrap();
        channel.send_frame(b"abc").await.unwrap();

        let seen = server.await.unwrap();
        assert_eq!(&seen[..4], &3u32.to_le_bytes());
        assert_eq!(&seen[4..], b"abc");
    }

    #[tokio::test]
    async fn test_recv_exact_short_read_is_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"xy").await.unwrap();
            // Drop closes the connection after only 2 bytes.
        });

        let mut channel = FramedChannel::connect(addr).await.unwrap();
        let err = channel.recv_exact(4).await.unwrap_err();
        match err {
            BenchError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected an i/o error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to obtain a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        match FramedChannel::connect(addr).await {
            Err(BenchError::Connection { addr: seen, .. }) => assert_eq!(seen, addr),
            other => panic!("expected a connection error, got {:?}", other.map(|_| ())),
        }
    }
}
