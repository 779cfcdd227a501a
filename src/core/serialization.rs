//! # Object Graph Codec
//!
//! Turns a configuration object into an opaque payload and back. The envelope
//! never looks inside the payload; it only needs the configuration's version
//! (via [`Versioned`]) and a codec implementing [`ObjectGraphCodec`].
//!
//! [`SerdeCodec`] is the provided implementation: any nested record that
//! derives `Serialize`/`Deserialize` composes into the configuration's object
//! graph, and the payload is tagged with a one-byte format identifier so an
//! unknown encoding is reported instead of misread.
//!
//! ```text
//! [Format(1)] [Body(N)]
//! ```
//!
//! ## Formats
//! - **Bincode**: compact binary (default)
//! - **JSON**: human-readable, for debugging and interop
//! - **MessagePack**: compact, self-describing binary

use crate::config::MAX_BLOB_SIZE;
use crate::error::{constants, EnvelopeError, Result};
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A configuration that carries a logical version.
///
/// The version is duplicated into the envelope header so it can be read
/// without decoding the payload.
pub trait Versioned {
    fn version(&self) -> u64;
}

/// Encoder/decoder for a configuration's object graph.
pub trait ObjectGraphCodec<C>: Send + Sync {
    /// Encode `config` into an opaque payload
    ///
    /// # Errors
    /// Returns `EnvelopeError::SerializeError` if the object cannot be encoded
    fn encode(&self, config: &C) -> Result<Vec<u8>>;

    /// Rebuild a configuration from a payload produced by [`encode`](Self::encode)
    ///
    /// # Errors
    /// Returns `EnvelopeError::PayloadDecode` if the payload is malformed or
    /// uses an unknown internal format
    fn decode(&self, payload: &[u8]) -> Result<C>;
}

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Binary compact format (default, fastest)
    #[default]
    Bincode,
    /// Human-readable JSON format (debugging, interop)
    Json,
    /// Compact binary format (MessagePack, efficient)
    MessagePack,
}

impl SerializationFormat {
    /// Get the format identifier byte for the payload
    pub fn format_byte(self) -> u8 {
        match self {
            SerializationFormat::Bincode => 0x01,
            SerializationFormat::Json => 0x02,
            SerializationFormat::MessagePack => 0x03,
        }
    }

    /// Detect format from identifier byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(SerializationFormat::Bincode),
            0x02 => Some(SerializationFormat::Json),
            0x03 => Some(SerializationFormat::MessagePack),
            _ => None,
        }
    }

    /// Parse a format name as used in configuration files
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bincode" => Some(SerializationFormat::Bincode),
            "json" => Some(SerializationFormat::Json),
            "messagepack" | "msgpack" => Some(SerializationFormat::MessagePack),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "Bincode",
            SerializationFormat::Json => "JSON",
            SerializationFormat::MessagePack => "MessagePack",
        }
    }
}

/// Serde-driven object graph codec with a format-tagged payload.
#[derive(Debug, Clone, Copy)]
pub struct SerdeCodec {
    format: SerializationFormat,
    limit: u64,
}

impl Default for SerdeCodec {
    fn default() -> Self {
        Self::new(SerializationFormat::default())
    }
}

impl SerdeCodec {
    pub fn new(format: SerializationFormat) -> Self {
        Self {
            format,
            limit: MAX_BLOB_SIZE as u64,
        }
    }

    /// Cap the size bincode may allocate while decoding
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit as u64;
        self
    }

    pub fn format(&self) -> SerializationFormat {
        self.format
    }

    fn bincode(&self) -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_limit(self.limit)
            .reject_trailing_bytes()
    }
}

impl<C> ObjectGraphCodec<C> for SerdeCodec
where
    C: Serialize + DeserializeOwned,
{
    fn encode(&self, config: &C) -> Result<Vec<u8>> {
        let mut data = vec![self.format.format_byte()];
        match self.format {
            SerializationFormat::Bincode => self
                .bincode()
                .serialize_into(&mut data, config)
                .map_err(|e| EnvelopeError::SerializeError(e.to_string()))?,
            SerializationFormat::Json => serde_json::to_writer(&mut data, config)
                .map_err(|e| EnvelopeError::SerializeError(e.to_string()))?,
            SerializationFormat::MessagePack => rmp_serde::encode::write_named(&mut data, config)
                .map_err(|e| EnvelopeError::SerializeError(e.to_string()))?,
        }
        Ok(data)
    }

    /// Decodes using the format recorded in the payload, which may differ
    /// from the format this codec writes.
    fn decode(&self, payload: &[u8]) -> Result<C> {
        let (&tag, body) = payload
            .split_first()
            .ok_or_else(|| EnvelopeError::PayloadDecode(constants::ERR_EMPTY_PAYLOAD.to_string()))?;

        let format = SerializationFormat::from_byte(tag).ok_or_else(|| {
            EnvelopeError::PayloadDecode(format!("{}: {tag:#04x}", constants::ERR_UNKNOWN_FORMAT))
        })?;

        match format {
            SerializationFormat::Bincode => self
                .bincode()
                .deserialize(body)
                .map_err(|e| EnvelopeError::PayloadDecode(e.to_string())),
            SerializationFormat::Json => serde_json::from_slice(body)
                .map_err(|e| EnvelopeError::PayloadDecode(e.to_string())),
            SerializationFormat::MessagePack => rmp_serde::from_slice(body)
                .map_err(|e| EnvelopeError::PayloadDecode(e.to_string())),
        }
    }
}
