//! # Utility Modules
//!
//! Supporting utilities for compression, logging and metrics.
//!
//! ## Components
//! - **Compression**: zstd (default) and LZ4 with output size limits
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe envelope counters and operation timers

pub mod compression;
pub mod logging;
pub mod metrics;

pub use compression::{CompressionKind, Compressor};
pub use metrics::EnvelopeMetrics;
