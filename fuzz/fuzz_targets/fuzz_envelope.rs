#![no_main]

use config_envelope::{deserialize, extract_version, Header, Versioned, HEADER_SIZE};
use libfuzzer_sys::fuzz_target;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Target {
    version: u64,
    names: Vec<String>,
    weights: Vec<(u16, f64)>,
}

impl Versioned for Target {
    fn version(&self) -> u64 {
        self.version
    }
}

fuzz_target!(|data: &[u8]| {
    // Header-only inspection must agree with the header codec
    match extract_version(data) {
        Ok(version) if data.len() >= HEADER_SIZE => {
            assert_eq!(Header::decode(data).map(|h| h.config_version).ok(), Some(version));
        }
        Ok(_) => assert!(data.is_empty()),
        Err(e) => assert!(e.is_framing()),
    }

    // Full decode must never panic or over-allocate
    let _ = deserialize::<Target>(data);
});
