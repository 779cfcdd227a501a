//! Property-based tests using proptest
//!
//! These tests validate envelope invariants across a wide range of randomly
//! generated inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{nodes_configuration, NodesConfiguration};
use config_envelope::config::{HEADER_SIZE, MAX_BLOB_SIZE};
use config_envelope::utils::compression::{compress, decompress, CompressionKind};
use config_envelope::{deserialize, extract_version, serialize, Header, SerializeOptions};
use proptest::prelude::*;

// Property: any configuration survives a roundtrip with either compression setting
proptest! {
    #[test]
    fn prop_envelope_roundtrip(version in any::<u64>(), nodes in 0u16..64, compression in any::<bool>()) {
        let config = nodes_configuration(version, nodes);
        let bytes = serialize(&config, SerializeOptions { compression }).expect("serialize");
        let decoded = deserialize::<NodesConfiguration>(&bytes).expect("deserialize");
        prop_assert_eq!(&*decoded, &config);
    }
}

// Property: the header always reports the configuration's version and exact payload length
proptest! {
    #[test]
    fn prop_header_matches_payload(version in any::<u64>(), nodes in 0u16..32, compression in any::<bool>()) {
        let bytes = serialize(&nodes_configuration(version, nodes), SerializeOptions { compression }).unwrap();
        let header = Header::decode(&bytes).unwrap();
        prop_assert_eq!(header.config_version, version);
        prop_assert_eq!(header.blob_size as usize, bytes.len() - HEADER_SIZE);
        prop_assert_eq!(header.is_compressed(), compression);
        prop_assert_eq!(extract_version(&bytes).unwrap(), version);
    }
}

// Property: corrupting payload bytes never changes the extracted version
proptest! {
    #[test]
    fn prop_version_independent_of_payload(
        version in any::<u64>(),
        compression in any::<bool>(),
        noise in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut bytes = serialize(&nodes_configuration(version, 8), SerializeOptions { compression }).unwrap();
        for (slot, value) in bytes[HEADER_SIZE..].iter_mut().zip(noise.iter()) {
            *slot = *value;
        }
        prop_assert_eq!(extract_version(&bytes).unwrap(), version);
    }
}

// Property: arbitrary input never panics the reader or the extractor
proptest! {
    #[test]
    fn prop_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = deserialize::<NodesConfiguration>(&data);
        let version = extract_version(&data);
        prop_assert_eq!(version.is_ok(), data.is_empty() || data.len() >= HEADER_SIZE);
    }
}

// Property: header encoding is a fixed-size bijection
proptest! {
    #[test]
    fn prop_header_roundtrip(proto in any::<u32>(), flags in any::<u32>(), version in any::<u64>(), size in any::<u64>()) {
        let header = Header { proto_version: proto, flags, config_version: version, blob_size: size };
        let bytes = header.encode();
        prop_assert_eq!(bytes.len(), HEADER_SIZE);
        prop_assert_eq!(Header::decode(&bytes).unwrap(), header);
    }
}

// Property: both compressors roundtrip arbitrary data within the size limit
proptest! {
    #[test]
    fn prop_compression_roundtrip(data in prop::collection::vec(any::<u8>(), 0..20000)) {
        for kind in [CompressionKind::Lz4, CompressionKind::Zstd] {
            let compressed = compress(&data, &kind).expect("compress");
            let decompressed = decompress(&compressed, &kind, MAX_BLOB_SIZE).expect("decompress");
            prop_assert_eq!(&decompressed, &data);
        }
    }
}

// Property: decompression of invalid data returns error (doesn't panic)
proptest! {
    #[test]
    fn prop_decompression_invalid_data_returns_error(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        let _ = decompress(&data, &CompressionKind::Lz4, MAX_BLOB_SIZE);
        let _ = decompress(&data, &CompressionKind::Zstd, MAX_BLOB_SIZE);
    }
}
