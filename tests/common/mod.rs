//! Shared fixture: a nodes configuration with nested records.

#![allow(dead_code)]

use config_envelope::Versioned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDiscovery {
    pub address: String,
    pub gossip_address: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageAttributes {
    pub capacity: f64,
    pub num_shards: u16,
    pub generation: u32,
    pub exclude_from_nodesets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replication {
    pub scope: String,
    pub factor: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodesConfiguration {
    pub version: u64,
    pub service_discovery: BTreeMap<u16, ServiceDiscovery>,
    pub sequencer_weights: BTreeMap<u16, f64>,
    pub storage: BTreeMap<u16, StorageAttributes>,
    pub metadata_replication: Replication,
    pub last_change_timestamp: u64,
}

impl Versioned for NodesConfiguration {
    fn version(&self) -> u64 {
        self.version
    }
}

pub fn nodes_configuration(version: u64, node_count: u16) -> NodesConfiguration {
    let mut service_discovery = BTreeMap::new();
    let mut sequencer_weights = BTreeMap::new();
    let mut storage = BTreeMap::new();

    for idx in 0..node_count {
        service_discovery.insert(
            idx,
            ServiceDiscovery {
                address: format!("10.0.{}.{}:4440", idx / 256, idx % 256),
                gossip_address: format!("10.0.{}.{}:4441", idx / 256, idx % 256),
                location: Some(format!("region1.dc{}.cl1.row1.rack{}", idx % 3, idx % 7)),
            },
        );
        if idx % 2 == 0 {
            sequencer_weights.insert(idx, 1.0);
        }
        storage.insert(
            idx,
            StorageAttributes {
                capacity: 256.0,
                num_shards: 16,
                generation: 1,
                exclude_from_nodesets: idx % 5 == 0,
            },
        );
    }

    NodesConfiguration {
        version,
        service_discovery,
        sequencer_weights,
        storage,
        metadata_replication: Replication {
            scope: "rack".to_string(),
            factor: 3,
        },
        last_change_timestamp: version.wrapping_add(1_700_000_000_000),
    }
}
