//! Example: writing and reading configuration envelopes
//!
//! Serializes a small cluster configuration with and without compression,
//! peeks at the version without decoding, then decodes it again.
//!
//! Run with: `cargo run --example envelope_roundtrip`

#![allow(clippy::uninlined_format_args)]

use config_envelope::config::LoggingConfig;
use config_envelope::utils::logging::init_logging;
use config_envelope::utils::metrics::EnvelopeMetrics;
use config_envelope::{ConfigCodec, Header, SerializeOptions, Versioned};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct ClusterConfig {
    version: u64,
    sequencers: Vec<String>,
    storage_nodes: Vec<String>,
    replication_factor: u8,
}

impl Versioned for ClusterConfig {
    fn version(&self) -> u64 {
        self.version
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;

    let config = ClusterConfig {
        version: 7,
        sequencers: (0..4).map(|i| format!("seq-{i}.example.net:4440")).collect(),
        storage_nodes: (0..64).map(|i| format!("store-{i}.example.net:4440")).collect(),
        replication_factor: 3,
    };

    let metrics = Arc::new(EnvelopeMetrics::new());
    let codec = ConfigCodec::default().with_metrics(metrics.clone());

    for compression in [false, true] {
        let bytes = codec.serialize(&config, SerializeOptions { compression })?;
        let header = Header::decode(&bytes)?;
        println!(
            "compression={:<5} envelope={} bytes payload={} bytes",
            compression,
            bytes.len(),
            header.blob_size
        );

        println!("   - version from header: {}", codec.extract_version(&bytes)?);

        let decoded = codec.deserialize::<ClusterConfig>(&bytes)?;
        println!(
            "   - Roundtrip: {}",
            if *decoded == config {
                "✓ Success"
            } else {
                "✗ Failed"
            }
        );
    }

    metrics.log_metrics();
    Ok(())
}
