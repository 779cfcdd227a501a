//! # Compression
//!
//! Payload compression behind the [`Compressor`] trait. The envelope only ever
//! records whether a payload is compressed, not how, so a reader must be
//! configured with the same algorithm as the writer. Zstd is the default.

use crate::error::{EnvelopeError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Zstd compression level used for payloads
const ZSTD_LEVEL: i32 = 1;

/// Chunk size used while streaming zstd output
const DECOMPRESS_CHUNK_SIZE: usize = 8192;

/// Compress / decompress envelope payloads.
///
/// Implementations must surface every failure; the envelope writer never
/// falls back to an uncompressed payload.
pub trait Compressor: Send + Sync {
    /// Compress `data`
    ///
    /// # Errors
    /// Returns `EnvelopeError::CompressionFailure` if compression fails
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress `data`, producing at most `max_output` bytes
    ///
    /// # Errors
    /// Returns `EnvelopeError::DecompressionFailure` if the data is corrupt or
    /// truncated, or if the output would exceed `max_output`
    fn decompress(&self, data: &[u8], max_output: usize) -> Result<Vec<u8>>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    Lz4,
    #[default]
    Zstd,
}

impl CompressionKind {
    /// Parse a lowercase algorithm name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lz4" => Some(CompressionKind::Lz4),
            "zstd" => Some(CompressionKind::Zstd),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            CompressionKind::Lz4 => "lz4",
            CompressionKind::Zstd => "zstd",
        }
    }
}

impl Compressor for CompressionKind {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress(data, self)
    }

    fn decompress(&self, data: &[u8], max_output: usize) -> Result<Vec<u8>> {
        decompress(data, self, max_output)
    }
}

/// Compresses data using the specified compression algorithm
///
/// # Errors
/// Returns `EnvelopeError::CompressionFailure` if compression fails
pub fn compress(data: &[u8], kind: &CompressionKind) -> Result<Vec<u8>> {
    match kind {
        CompressionKind::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
        CompressionKind::Zstd => {
            let mut out = Vec::new();
            zstd::stream::copy_encode(data, &mut out, ZSTD_LEVEL)
                .map_err(|_| EnvelopeError::CompressionFailure)?;
            Ok(out)
        }
    }
}

/// Decompresses data that was compressed with the specified algorithm
///
/// Output is capped at `max_output` bytes so a corrupt or hostile payload
/// cannot force an unbounded allocation.
///
/// # Errors
/// Returns `EnvelopeError::DecompressionFailure` if:
/// - Decompression fails
/// - Output size exceeds `max_output`
pub fn decompress(data: &[u8], kind: &CompressionKind, max_output: usize) -> Result<Vec<u8>> {
    match *kind {
        CompressionKind::Lz4 => {
            // lz4_flex prepends the uncompressed size as 4 little-endian bytes
            if data.len() < 4 {
                return Err(EnvelopeError::DecompressionFailure);
            }

            let claimed_size = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

            // Reject before lz4_flex allocates the claimed size
            if claimed_size > max_output {
                return Err(EnvelopeError::DecompressionFailure);
            }

            let decompressed = lz4_flex::decompress_size_prepended(data)
                .map_err(|_| EnvelopeError::DecompressionFailure)?;

            if decompressed.len() > max_output {
                return Err(EnvelopeError::DecompressionFailure);
            }
            Ok(decompressed)
        }
        CompressionKind::Zstd => {
            let mut out = Vec::new();
            let mut reader = zstd::stream::Decoder::new(data)
                .map_err(|_| EnvelopeError::DecompressionFailure)?;

            let mut buffer = [0u8; DECOMPRESS_CHUNK_SIZE];
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => {
                        out.extend_from_slice(&buffer[..n]);
                        if out.len() > max_output {
                            return Err(EnvelopeError::DecompressionFailure);
                        }
                    }
                    Err(_) => return Err(EnvelopeError::DecompressionFailure),
                }
            }
            Ok(out)
        }
    }
}
