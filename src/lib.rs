//! # config-envelope
//!
//! Versioned binary envelope for persisting and transmitting a hierarchical
//! configuration object.
//!
//! An envelope is a fixed 24-byte header followed by the encoded
//! configuration, optionally compressed. The header repeats the
//! configuration's version so [`extract_version`] can answer "how new is this
//! blob?" without decompressing or decoding anything.
//!
//! ## Usage
//! ```rust
//! use config_envelope::{deserialize, extract_version, serialize, SerializeOptions, Versioned};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Topology {
//!     version: u64,
//!     nodes: Vec<String>,
//! }
//!
//! impl Versioned for Topology {
//!     fn version(&self) -> u64 {
//!         self.version
//!     }
//! }
//!
//! # fn main() -> config_envelope::Result<()> {
//! let topology = Topology { version: 7, nodes: vec!["n1".into(), "n2".into()] };
//! let bytes = serialize(&topology, SerializeOptions::default())?;
//!
//! assert_eq!(extract_version(&bytes)?, 7);
//! let decoded = deserialize::<Topology>(&bytes)?;
//! assert_eq!(*decoded, topology);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::config::{SerializeOptions, CURRENT_PROTO_VERSION, EMPTY_VERSION, HEADER_SIZE};
pub use crate::core::codec::EnvelopeFrameCodec;
pub use crate::core::envelope::{deserialize, extract_version, serialize, ConfigCodec};
pub use crate::core::header::Header;
pub use crate::core::serialization::{ObjectGraphCodec, SerdeCodec, SerializationFormat, Versioned};
pub use crate::core::stream::{ProtocolReader, ProtocolWriter};
pub use crate::error::{EnvelopeError, Result};
