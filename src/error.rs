//! # Error Types
//!
//! Error handling for the configuration envelope.
//!
//! Every failure a caller can observe while writing, reading or inspecting an
//! envelope is a variant of [`EnvelopeError`]. None of them are transient, so
//! nothing in this crate retries: the error is handed back to the caller and
//! the call produces no partial result.
//!
//! ## Error Categories
//! - **Framing Errors**: short header, `blob_size` mismatch, header/payload version mismatch
//! - **Compatibility Errors**: unrecognized envelope protocol version
//! - **Compression Errors**: compression or decompression failures, size limit violations
//! - **Payload Errors**: the object-graph codec rejected the payload
//! - **Stream Errors**: sink/source failures and the sticky failed state
//!
//! ## Example Usage
//! ```rust
//! use config_envelope::error::EnvelopeError;
//! use config_envelope::extract_version;
//! use tracing::{error, info};
//!
//! match extract_version(&[0u8; 10]) {
//!     Ok(version) => info!(version, "Configuration version"),
//!     Err(e @ EnvelopeError::Framing(_)) => error!(error = %e, "Truncated envelope"),
//!     Err(e) => error!(error = %e, "Unreadable envelope"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Framing errors
    pub const ERR_SHORT_HEADER: &str = "envelope shorter than the 24-byte header";
    pub const ERR_BLOB_SIZE_MISMATCH: &str = "payload length does not match header blob_size";
    pub const ERR_VERSION_MISMATCH: &str =
        "header config_version does not match the decoded configuration";
    pub const ERR_TRUNCATED_FRAME: &str = "stream ended inside an envelope";

    /// Payload errors
    pub const ERR_EMPTY_PAYLOAD: &str = "empty payload";
    pub const ERR_UNKNOWN_FORMAT: &str = "unknown payload format tag";

    /// Compression errors
    pub const ERR_COMPRESSION_FAILED: &str = "Compression failed";
    pub const ERR_DECOMPRESSION_FAILED: &str = "Decompression failed";

    /// Stream errors
    pub const ERR_STREAM_FAILED: &str = "Stream is in a failed state";
}

/// EnvelopeError is the error type for all envelope operations
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Framing error: {0}")]
    Framing(String),

    #[error("Unsupported envelope protocol version: {0}")]
    UnsupportedProtoVersion(u32),

    #[error("Compression failed")]
    CompressionFailure,

    #[error("Decompression failed")]
    DecompressionFailure,

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Payload decode error: {0}")]
    PayloadDecode(String),

    #[error("Blob too large: {0} bytes")]
    OversizedBlob(u64),

    #[error("Stream is in a failed state")]
    StreamFailed,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl EnvelopeError {
    /// Build a framing error from a static message
    pub(crate) fn framing(msg: &str) -> Self {
        EnvelopeError::Framing(msg.to_string())
    }

    /// True for errors caused by the envelope's framing (short header,
    /// size mismatch, header/payload version mismatch).
    pub fn is_framing(&self) -> bool {
        matches!(self, EnvelopeError::Framing(_))
    }
}

/// Type alias for Results using EnvelopeError
pub type Result<T> = std::result::Result<T, EnvelopeError>;
