//! Read-only customer record store, loaded once from a CSV snapshot.

mod record;
mod snapshot;

pub use record::{CustomerRecord, FieldValue};
pub use snapshot::StoreError;

use std::collections::HashMap;

/// Lookup seam used by the scoring service.
pub trait RecordLookup: Send + Sync {
    /// Zero or more rows for `customer_id`; zero is a normal outcome.
    fn find(&self, customer_id: &str) -> Vec<&CustomerRecord>;
}

impl RecordLookup for RecordStore {
    fn find(&self, customer_id: &str) -> Vec<&CustomerRecord> {
        RecordStore::find(self, customer_id)
    }
}

/// In-memory table of customer rows, indexed by customer id.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<CustomerRecord>,
    index: HashMap<String, Vec<usize>>,
}

impl RecordStore {
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, r) in records.iter().enumerate() {
            index.entry(r.customer_id().to_string()).or_default().push(i);
        }
        Self { records, index }
    }

    /// All rows for `customer_id`, in snapshot order. Unknown ids yield an empty vec.
    pub fn find(&self, customer_id: &str) -> Vec<&CustomerRecord> {
        self.index
            .get(customer_id)
            .map(|rows| rows.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, customer_id: &str) -> bool {
        self.index.contains_key(customer_id)
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct customer ids
    pub fn customer_count(&self) -> usize {
        self.index.len()
    }
}
