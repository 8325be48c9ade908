//! Input payload provider.
//!
//! The benchmark treats the inference input as an opaque byte buffer of a
//! known size. The buffer either comes from a raw file prepared elsewhere
//! (image decoding and preprocessing are outside this tool) or is
//! synthesized in the serialized layout the server expects: row-major NCHW
//! float32, little-endian.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// Bytes per f32 element.
const ELEM_LEN: usize = 4;

/// Shape of one serialized input batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
    pub batch: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl TensorSpec {
    /// The reference scenario shape: a batch of 224x224 RGB images.
    pub fn imagenet(batch: usize) -> Self {
        Self {
            batch,
            channels: 3,
            height: 224,
            width: 224,
        }
    }

    pub fn elements(&self) -> usize {
        self.batch * self.channels * self.height * self.width
    }

    /// Serialized size in bytes.
    pub fn byte_len(&self) -> usize {
        self.elements() * ELEM_LEN
    }
}

/// Load the payload from a raw bytes file, or synthesize one.
///
/// A file is length-checked against the expected shape so a wrong dump
/// fails here rather than as a confusing server-side error.
pub fn load_payload(path: Option<&Path>, spec: TensorSpec) -> Result<Bytes> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read input file {}", path.display()))?;
            anyhow::ensure!(
                bytes.len() == spec.byte_len(),
                "input file {} holds {} bytes, expected {} for shape {}x{}x{}x{}",
                path.display(),
                bytes.len(),
                spec.byte_len(),
                spec.batch,
                spec.channels,
                spec.height,
                spec.width,
            );
            Ok(Bytes::from(bytes))
        }
        None => Ok(synthetic_batch(spec)),
    }
}

/// Deterministic stand-in for a preprocessed image batch: a triangle wave
/// in roughly the value range of a normalized image, one image replicated
/// across the batch.
pub fn synthetic_batch(spec: TensorSpec) -> Bytes {
    let per_image = spec.channels * spec.height * spec.width;
    let mut buf = BytesMut::with_capacity(spec.byte_len());
    for _ in 0..spec.batch {
        for i in 0..per_image {
            let v = ((i % 512) as f32 / 256.0) - 1.0;
            buf.put_f32_le(v);
        }
    }
    buf.freeze()
}
