use std::collections::BTreeSet;

use engine_logging::engine_debug;

use crate::{AnalysisRecord, RecordId};

/// Authoritative collection of analysis records, newest first, plus the ids
/// currently being re-analyzed.
///
/// Ids are unique within the collection. Every mutation goes through the
/// methods below; readers get owned copies via [`RecordStore::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordStore {
    records: Vec<AnalysisRecord>,
    reanalyzing: BTreeSet<RecordId>,
}

/// Read-only copy of the store contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreSnapshot {
    pub records: Vec<AnalysisRecord>,
    pub reanalyzing: BTreeSet<RecordId>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from a persisted collection. Later duplicates of an id
    /// are dropped so the newest occurrence wins.
    pub fn from_records(records: Vec<AnalysisRecord>) -> Self {
        let mut seen = BTreeSet::new();
        let records = records
            .into_iter()
            .filter(|record| seen.insert(record.id))
            .collect();
        Self {
            records,
            reanalyzing: BTreeSet::new(),
        }
    }

    /// Prepends `record`. An existing record with the same id is dropped.
    pub fn add_record(&mut self, record: AnalysisRecord) {
        if let Some(pos) = self.position(record.id) {
            engine_debug!("add_record replacing existing id={} at {}", record.id, pos);
            self.records.remove(pos);
        }
        self.records.insert(0, record);
    }

    /// Replaces the record with `id` in place, keeping its position and
    /// identity. Returns `false` when no such record exists.
    pub fn replace_record(&mut self, id: RecordId, mut new_record: AnalysisRecord) -> bool {
        new_record.id = id;
        match self.position(id) {
            Some(pos) => {
                self.records[pos] = new_record;
                true
            }
            None => {
                engine_debug!("replace_record skipped, id={} not present", id);
                false
            }
        }
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    pub fn remove_record(&mut self, id: RecordId) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.records.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn set_reanalyzing(&mut self, id: RecordId, active: bool) {
        if active {
            self.reanalyzing.insert(id);
        } else {
            self.reanalyzing.remove(&id);
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            records: self.records.clone(),
            reanalyzing: self.reanalyzing.clone(),
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&AnalysisRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_reanalyzing(&self, id: RecordId) -> bool {
        self.reanalyzing.contains(&id)
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn reanalyzing_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.reanalyzing.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}
