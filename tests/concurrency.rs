//! Concurrency tests: one codec shared between threads, decoded
//! configurations shared without locks.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{nodes_configuration, NodesConfiguration};
use config_envelope::utils::metrics::EnvelopeMetrics;
use config_envelope::{ConfigCodec, SerializeOptions};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_encode_decode_shared_codec() {
    let metrics = Arc::new(EnvelopeMetrics::new());
    let codec = Arc::new(ConfigCodec::default().with_metrics(metrics.clone()));
    let iterations = 200u64;
    let threads = 8u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let codec = codec.clone();
            thread::spawn(move || {
                for i in 0..iterations {
                    let version = t * iterations + i;
                    let config = nodes_configuration(version, (i % 16) as u16);
                    let options = SerializeOptions {
                        compression: i % 2 == 0,
                    };
                    let bytes = codec.serialize(&config, options).unwrap();
                    assert_eq!(codec.extract_version(&bytes).unwrap(), version);
                    let decoded = codec.deserialize::<NodesConfiguration>(&bytes).unwrap();
                    assert_eq!(*decoded, config);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.envelopes_encoded, threads * iterations);
    assert_eq!(snapshot.envelopes_decoded, threads * iterations);
    assert_eq!(snapshot.version_extractions, threads * iterations);
    assert_eq!(snapshot.decode_failures, 0);
}

#[test]
fn decoded_configuration_shared_across_threads() {
    let codec = ConfigCodec::default();
    let bytes = codec
        .serialize(&nodes_configuration(77, 32), SerializeOptions::default())
        .unwrap();
    let decoded = codec.deserialize::<NodesConfiguration>(&bytes).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&decoded);
            thread::spawn(move || {
                assert_eq!(shared.version, 77);
                shared.storage.len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 32);
    }
    assert_eq!(Arc::strong_count(&decoded), 1);
}
