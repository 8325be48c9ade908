//! Wire framing for the model-serving benchmark protocol.
//!
//! Every request is a pair of length-prefixed frames: a name frame carrying
//! the UTF-8 session identifier, then a data frame carrying the opaque
//! payload (possibly empty). Length prefixes are 32-bit little-endian so the
//! client and server agree on the layout regardless of host.
//!
//! A name frame of length zero is the close sentinel: it terminates the
//! session and no data frame follows it. It must be the last frame sent on
//! a connection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of a frame length prefix in bytes.
pub const LEN_PREFIX_LEN: usize = 4;

/// Size of the fixed server reply in bytes.
pub const REPLY_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("request name must not be empty (a zero-length name is the close sentinel)")]
    EmptyName,

    #[error("frame body of {0} bytes does not fit a u32 length prefix")]
    Oversize(usize),

    #[error("truncated frame: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("{0} unexpected bytes after a complete request")]
    TrailingBytes(usize),
}

/// A request as it travels on the wire: a session/model name plus an opaque
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub name: String,
    pub payload: Vec<u8>,
}

/// Result of decoding bytes that may hold either a request or the close
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Request(Request),
    Close,
}

impl Request {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Encode the name frame and the data frame into one buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        encode_request(&self.name, &self.payload)
    }

    /// Decode a request pair, or recognize the close sentinel.
    ///
    /// A zero-length name frame decodes to [`Decoded::Close`] without any
    /// attempt to read a data frame after it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Decoded, WireError> {
        let mut at = 0;
        let name_bytes = take_frame(bytes, &mut at)?;
        if name_bytes.is_empty() {
            if at != bytes.len() {
                return Err(WireError::TrailingBytes(bytes.len() - at));
            }
            return Ok(Decoded::Close);
        }
        let name = String::from_utf8_lossy(name_bytes).into_owned();
        let payload = take_frame(bytes, &mut at)?.to_vec();
        if at != bytes.len() {
            return Err(WireError::TrailingBytes(bytes.len() - at));
        }
        Ok(Decoded::Request(Request { name, payload }))
    }
}

/// Encode a request pair without building a [`Request`] first. The single
/// explicit encode path: the name is UTF-8, prefixed by its byte length.
pub fn encode_request(name: &str, payload: &[u8]) -> Result<Vec<u8>, WireError> {
    if name.is_empty() {
        return Err(WireError::EmptyName);
    }
    let name_bytes = name.as_bytes();
    let mut buf =
        Vec::with_capacity(2 * LEN_PREFIX_LEN + name_bytes.len() + payload.len());
    put_frame(&mut buf, name_bytes)?;
    put_frame(&mut buf, payload)?;
    Ok(buf)
}

/// The 4-byte close sentinel: a zero length prefix with no frame body.
pub fn close_frame() -> [u8; LEN_PREFIX_LEN] {
    0u32.to_le_bytes()
}

/// Opaque 4-byte status token returned by the server after each request.
/// The benchmark records it but never interprets its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply(pub [u8; REPLY_LEN]);

impl Reply {
    pub fn as_str_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

fn put_frame(buf: &mut Vec<u8>, body: &[u8]) -> Result<(), WireError> {
    let len = u32::try_from(body.len()).map_err(|_| WireError::Oversize(body.len()))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(body);
    Ok(())
}

fn take_frame<'a>(bytes: &'a [u8], at: &mut usize) -> Result<&'a [u8], WireError> {
    let prefix_end = *at + LEN_PREFIX_LEN;
    if bytes.len() < prefix_end {
        return Err(WireError::Truncated {
            needed: prefix_end,
            got: bytes.len(),
        });
    }
    let mut prefix = [0u8; LEN_PREFIX_LEN];
    prefix.copy_from_slice(&bytes[*at..prefix_end]);
    let len = u32::from_le_bytes(prefix) as usize;
    let body_end = prefix_end + len;
    if bytes.len() < body_end {
        return Err(WireError::Truncated {
            needed: body_end,
            got: bytes.len(),
        });
    }
    *at = body_end;
    Ok(&bytes[prefix_end..body_end])
}
