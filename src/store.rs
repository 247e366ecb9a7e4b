use std::collections::HashMap;

use crate::models::JobRecord;

/// Accumulates accepted records across every search in a run, keyed by
/// canonical URL. Only ever touched from the single sequential harvest
/// flow; rebuilt from scratch on every run.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: HashMap<String, JobRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Returns false (and leaves the store untouched) when a record with
    /// the same id is already present.
    pub fn insert_if_absent(&mut self, record: JobRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id.clone(), record);
        true
    }

    pub fn count_by_country(&self, country: &str) -> usize {
        let needle = country.to_lowercase();
        self.records
            .values()
            .filter(|record| record.country.to_lowercase().contains(&needle))
            .count()
    }

    /// Consume the store, sorted by country then title.
    pub fn into_sorted_records(self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self.records.into_values().collect();
        records.sort_by(|a, b| a.country.cmp(&b.country).then_with(|| a.title.cmp(&b.title)));
        records
    }
}
