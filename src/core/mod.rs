//! # Core Envelope Components
//!
//! Header layout, payload encoding, envelope reading/writing and stream
//! framing.
//!
//! ## Components
//! - **Header**: fixed 24-byte header codec
//! - **Serialization**: object graph codec trait and the serde implementation
//! - **Envelope**: writer, reader and header-only version extraction
//! - **Stream**: sink/source wrappers that stop at the first failure
//! - **Codec**: Tokio codec for framing envelopes over byte streams
//!
//! ## Wire Format
//! ```text
//! [ProtoVersion(4)] [Flags(4)] [ConfigVersion(8)] [BlobSize(8)] [Payload(BlobSize)]
//! ```
//!
//! ## Security
//! - Maximum blob size: 16MB by default (prevents memory exhaustion)
//! - Unknown envelope versions are rejected before the payload is inspected
//! - Length validation before allocation

pub mod codec;
pub mod envelope;
pub mod header;
pub mod serialization;
pub mod stream;
