#![allow(dead_code)]

use credit_scoring::config::ServiceConfig;
use credit_scoring::{CustomerRecord, FeatureSchema, RecordStore};
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_store() -> RecordStore {
    RecordStore::load(&fixture("credit_records.csv"), &FeatureSchema::default()).unwrap()
}

pub fn fixture_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.data_path = fixture("credit_records.csv");
    config.model.path = fixture("forest.json");
    config
}

pub fn rows<'a>(store: &'a RecordStore, ids: &[&str]) -> Vec<&'a CustomerRecord> {
    ids.iter().flat_map(|id| store.find(id)).collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
