//! Fixed-size envelope header.
//!
//! ```text
//! [proto_version u32][flags u32][config_version u64][blob_size u64]
//! ```
//!
//! All fields are little-endian and written one by one, so the layout never
//! depends on struct padding or host byte order. This module is a pure bit
//! layout: it does not judge `proto_version` or compare `blob_size` with the
//! bytes that follow.

use crate::config::{CURRENT_PROTO_VERSION, HEADER_SIZE};
use crate::error::{constants, EnvelopeError, Result};

/// Header flag: the payload is compressed
pub const FLAG_COMPRESSED: u32 = 1 << 0;

const PROTO_VERSION_OFFSET: usize = 0;
const FLAGS_OFFSET: usize = 4;
const CONFIG_VERSION_OFFSET: usize = 8;
const BLOB_SIZE_OFFSET: usize = 16;

const _: () = assert!(BLOB_SIZE_OFFSET + 8 == HEADER_SIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub proto_version: u32,
    pub flags: u32,
    pub config_version: u64,
    /// Length of the payload following the header
    pub blob_size: u64,
}

impl Header {
    /// Header for a payload written by this version of the crate
    pub fn new(config_version: u64, blob_size: u64, compressed: bool) -> Self {
        Self {
            proto_version: CURRENT_PROTO_VERSION,
            flags: if compressed { FLAG_COMPRESSED } else { 0 },
            config_version,
            blob_size,
        }
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    /// Serialize the header into its fixed 24-byte representation
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[PROTO_VERSION_OFFSET..FLAGS_OFFSET].copy_from_slice(&self.proto_version.to_le_bytes());
        out[FLAGS_OFFSET..CONFIG_VERSION_OFFSET].copy_from_slice(&self.flags.to_le_bytes());
        out[CONFIG_VERSION_OFFSET..BLOB_SIZE_OFFSET]
            .copy_from_slice(&self.config_version.to_le_bytes());
        out[BLOB_SIZE_OFFSET..HEADER_SIZE].copy_from_slice(&self.blob_size.to_le_bytes());
        out
    }

    /// Parse a header from the first 24 bytes of `buf`.
    /// Extra trailing bytes are ignored.
    ///
    /// # Errors
    /// Returns `EnvelopeError::Framing` if `buf` is shorter than the header
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let raw: &[u8; HEADER_SIZE] = buf
            .get(..HEADER_SIZE)
            .and_then(|head| head.try_into().ok())
            .ok_or_else(|| EnvelopeError::framing(constants::ERR_SHORT_HEADER))?;

        Ok(Self {
            proto_version: u32::from_le_bytes(le_array(raw, PROTO_VERSION_OFFSET)),
            flags: u32::from_le_bytes(le_array(raw, FLAGS_OFFSET)),
            config_version: u64::from_le_bytes(le_array(raw, CONFIG_VERSION_OFFSET)),
            blob_size: u64::from_le_bytes(le_array(raw, BLOB_SIZE_OFFSET)),
        })
    }
}

#[inline]
fn le_array<const N: usize>(raw: &[u8; HEADER_SIZE], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&raw[offset..offset + N]);
    out
}
