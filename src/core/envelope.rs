//! # Configuration Envelope
//!
//! Writes and reads configuration envelopes:
//!
//! ```text
//! [Header(24)] [Payload(blob_size)]
//! ```
//!
//! Writing runs the object graph codec, optionally compresses the result and
//! prepends the header. Reading validates the header, checks the payload
//! length, decompresses if the header says so and decodes. Either the whole
//! configuration comes back or an error does; nothing is retried.
//!
//! [`extract_version`] reads the configuration version straight out of the
//! header. It never touches the payload, so it is O(1) regardless of payload
//! size and unaffected by payload corruption.

use crate::config::{
    is_supported_proto_version, CodecConfig, SerializeOptions, EMPTY_VERSION, HEADER_SIZE,
    MAX_BLOB_SIZE,
};
use crate::core::header::Header;
use crate::core::serialization::{ObjectGraphCodec, SerdeCodec, Versioned};
use crate::core::stream::{ProtocolReader, ProtocolWriter};
use crate::error::{constants, EnvelopeError, Result};
use crate::utils::compression::{CompressionKind, Compressor};
use crate::utils::metrics::{EnvelopeMetrics, Timer};
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::{debug, warn};

/// Envelope writer and reader bound to an object graph codec and a compressor.
///
/// Holds no per-call state, so one instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct ConfigCodec<G = SerdeCodec, Z = CompressionKind> {
    graph: G,
    compressor: Z,
    max_blob_size: usize,
    metrics: Option<Arc<EnvelopeMetrics>>,
}

impl Default for ConfigCodec {
    fn default() -> Self {
        Self::new(SerdeCodec::default(), CompressionKind::default())
    }
}

impl ConfigCodec {
    /// Build the default codec stack from crate configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration fails validation
    pub fn from_config(config: &CodecConfig) -> Result<Self> {
        config.validate_strict()?;
        let envelope = &config.envelope;
        Ok(Self::new(
            SerdeCodec::new(envelope.payload_format).with_limit(envelope.max_blob_size),
            envelope.compression_kind,
        )
        .with_max_blob_size(envelope.max_blob_size))
    }
}

impl<G, Z: Compressor> ConfigCodec<G, Z> {
    pub fn new(graph: G, compressor: Z) -> Self {
        Self {
            graph,
            compressor,
            max_blob_size: MAX_BLOB_SIZE,
            metrics: None,
        }
    }

    /// Largest encoded configuration, before or after compression, that is
    /// written or accepted
    pub fn with_max_blob_size(mut self, max_blob_size: usize) -> Self {
        self.max_blob_size = max_blob_size;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<EnvelopeMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn max_blob_size(&self) -> usize {
        self.max_blob_size
    }

    /// Serialize `config` into a new envelope.
    ///
    /// # Errors
    /// - `SerializeError` if the object graph codec fails
    /// - `CompressionFailure` if compression was requested and failed
    /// - `OversizedBlob` if the encoded configuration or the stored payload
    ///   exceeds the configured maximum
    pub fn serialize<C>(&self, config: &C, options: SerializeOptions) -> Result<Vec<u8>>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
    {
        let _timer = Timer::start("envelope_serialize");
        let (header, payload) = self.encode_envelope(config, options)?;

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&payload);

        if let Some(metrics) = &self.metrics {
            metrics.envelope_encoded(out.len() as u64);
        }
        Ok(out)
    }

    /// Serialize `config` through a sink.
    ///
    /// Header and payload are written in order; an encoding failure or a
    /// failed write leaves the error in the returned writer and skips the
    /// remaining writes.
    pub fn serialize_into<C, W>(
        &self,
        config: &C,
        options: SerializeOptions,
        writer: ProtocolWriter<W>,
    ) -> ProtocolWriter<W>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
        W: Write,
    {
        match self.encode_envelope(config, options) {
            Ok((header, payload)) => {
                let writer = writer.write(&header.encode()).write(&payload);
                if let (true, Some(metrics)) = (writer.is_ok(), &self.metrics) {
                    metrics.envelope_encoded((HEADER_SIZE + payload.len()) as u64);
                }
                writer
            }
            Err(e) => writer.fail(e),
        }
    }

    /// Rebuild a configuration from a complete envelope.
    ///
    /// # Errors
    /// - `Framing` for a short header, a payload whose length differs from
    ///   `blob_size`, or a header version that disagrees with the payload
    /// - `UnsupportedProtoVersion` for an unrecognized envelope version
    /// - `DecompressionFailure` if a compressed payload cannot be inflated
    /// - `PayloadDecode` if the object graph codec rejects the payload
    pub fn deserialize<C>(&self, bytes: &[u8]) -> Result<Arc<C>>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
    {
        let _timer = Timer::start("envelope_deserialize");
        let result: Result<Arc<C>> = Header::decode(bytes)
            .and_then(|header| {
                check_proto_version(&header)?;
                let payload = &bytes[HEADER_SIZE..];
                if payload.len() as u64 != header.blob_size {
                    return Err(EnvelopeError::Framing(format!(
                        "{}: header {} bytes, got {} bytes",
                        constants::ERR_BLOB_SIZE_MISMATCH,
                        header.blob_size,
                        payload.len()
                    )));
                }
                Ok((header, payload))
            })
            .and_then(|(header, payload)| self.decode_payload(&header, payload));

        self.record_decode(&result, bytes.len());
        result
    }

    /// Read one envelope from a source and rebuild the configuration.
    ///
    /// The header is validated before the payload is read, so a hostile
    /// `blob_size` never drives the allocation. Any failure leaves `reader`
    /// in its failed state.
    pub fn deserialize_from<C, R>(&self, reader: &mut ProtocolReader<R>) -> Result<Arc<C>>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
        R: Read,
    {
        let _timer = Timer::start("envelope_deserialize_from");
        let start = reader.bytes_read();
        let result: Result<Arc<C>> = self.read_envelope(reader);
        if result.is_err() {
            reader.mark_failed();
        }
        self.record_decode(&result, reader.bytes_read() - start);
        result
    }

    /// Configuration version recorded in the envelope header.
    /// See [`extract_version`].
    pub fn extract_version(&self, bytes: &[u8]) -> Result<u64> {
        let version = extract_version(bytes)?;
        if let Some(metrics) = &self.metrics {
            metrics.version_extracted();
        }
        Ok(version)
    }

    fn encode_envelope<C>(&self, config: &C, options: SerializeOptions) -> Result<(Header, Vec<u8>)>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
    {
        let result = self.build_envelope(config, options);
        if let Err(e) = &result {
            warn!(error = %e, version = config.version(), "Failed to serialize configuration");
            if let Some(metrics) = &self.metrics {
                metrics.encode_failure();
            }
        }
        result
    }

    fn build_envelope<C>(&self, config: &C, options: SerializeOptions) -> Result<(Header, Vec<u8>)>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
    {
        let raw = self.graph.encode(config)?;
        // Readers cap decompressed output at the same limit
        if raw.len() > self.max_blob_size {
            return Err(EnvelopeError::OversizedBlob(raw.len() as u64));
        }

        let payload = if options.compression {
            if let Some(metrics) = &self.metrics {
                metrics.compression_attempt();
            }
            let compressed = self.compressor.compress(&raw)?;
            if let Some(metrics) = &self.metrics {
                metrics.compression_success();
            }
            compressed
        } else {
            raw
        };

        if payload.len() > self.max_blob_size {
            return Err(EnvelopeError::OversizedBlob(payload.len() as u64));
        }

        let header = Header::new(config.version(), payload.len() as u64, options.compression);
        debug!(
            version = header.config_version,
            blob_size = header.blob_size,
            compressed = options.compression,
            "Serialized configuration envelope"
        );
        Ok((header, payload))
    }

    fn read_envelope<C, R>(&self, reader: &mut ProtocolReader<R>) -> Result<Arc<C>>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
        R: Read,
    {
        let header = Header::decode(&reader.read(HEADER_SIZE)?)?;
        check_proto_version(&header)?;
        if header.blob_size > self.max_blob_size as u64 {
            return Err(EnvelopeError::OversizedBlob(header.blob_size));
        }
        let payload = reader.read(header.blob_size as usize)?;
        self.decode_payload(&header, &payload)
    }

    fn decode_payload<C>(&self, header: &Header, payload: &[u8]) -> Result<Arc<C>>
    where
        C: Versioned,
        G: ObjectGraphCodec<C>,
    {
        let config: C = if header.is_compressed() {
            let raw = self.compressor.decompress(payload, self.max_blob_size)?;
            self.graph.decode(&raw)?
        } else {
            self.graph.decode(payload)?
        };

        if config.version() != header.config_version {
            return Err(EnvelopeError::Framing(format!(
                "{}: header {}, payload {}",
                constants::ERR_VERSION_MISMATCH,
                header.config_version,
                config.version()
            )));
        }

        debug!(
            version = header.config_version,
            blob_size = header.blob_size,
            compressed = header.is_compressed(),
            "Deserialized configuration envelope"
        );
        Ok(Arc::new(config))
    }

    fn record_decode<T>(&self, result: &Result<T>, byte_count: usize) {
        match result {
            Ok(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.envelope_decoded(byte_count as u64);
                }
            }
            Err(e) => {
                warn!(error = %e, len = byte_count, "Rejected configuration envelope");
                if let Some(metrics) = &self.metrics {
                    metrics.decode_failure();
                }
            }
        }
    }
}

/// Reject envelope framing versions this crate does not understand
pub fn check_proto_version(header: &Header) -> Result<()> {
    if is_supported_proto_version(header.proto_version) {
        Ok(())
    } else {
        Err(EnvelopeError::UnsupportedProtoVersion(header.proto_version))
    }
}

/// Configuration version stored in an envelope header.
///
/// Empty input is treated as a default-constructed configuration and yields
/// [`EMPTY_VERSION`]. Only the header is parsed: the payload is never
/// decompressed or decoded.
///
/// # Errors
/// Returns `EnvelopeError::Framing` if `bytes` is non-empty but shorter than
/// the header
pub fn extract_version(bytes: &[u8]) -> Result<u64> {
    if bytes.is_empty() {
        return Ok(EMPTY_VERSION);
    }
    Ok(Header::decode(bytes)?.config_version)
}

/// Serialize `config` with the default codec (bincode payload, zstd)
pub fn serialize<C>(config: &C, options: SerializeOptions) -> Result<Vec<u8>>
where
    C: Versioned + serde::Serialize + serde::de::DeserializeOwned,
{
    ConfigCodec::default().serialize(config, options)
}

/// Deserialize an envelope written with the default codec
pub fn deserialize<C>(bytes: &[u8]) -> Result<Arc<C>>
where
    C: Versioned + serde::Serialize + serde::de::DeserializeOwned,
{
    ConfigCodec::default().deserialize(bytes)
}
