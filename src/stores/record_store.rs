use crate::models::record::{StoredRecord, UsageRecord};
use crate::utils::id::new_object_id;
use crate::wal::wal::{Wal, WalOperation};
use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Usage record collection, journaled to its own WAL
pub struct RecordStore {
    records: DashMap<String, Arc<UsageRecord>>,
    wal: Wal<StoredRecord>,
}

impl RecordStore {
    pub fn new(wal: Wal<StoredRecord>) -> Self {
        Self {
            records: DashMap::new(),
            wal,
        }
    }

    /// Apply a replayed journal entry without logging it again
    pub fn apply(&self, op: WalOperation<StoredRecord>) {
        match op {
            WalOperation::Insert(stored) => {
                self.records.insert(stored.id, Arc::new(stored.record));
            }
            WalOperation::Clear => self.records.clear(),
        }
    }

    /// Persist a record and return its assigned id
    pub fn insert(&self, record: UsageRecord) -> Result<String> {
        let stored = StoredRecord {
            id: new_object_id(),
            record,
        };
        self.wal.log_operation(&WalOperation::Insert(stored.clone()))?;

        let id = stored.id.clone();
        self.records.insert(stored.id, Arc::new(stored.record));
        Ok(id)
    }

    /// Delete every record, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        self.wal.log_operation(&WalOperation::Clear)?;
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<Arc<UsageRecord>> {
        self.records.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Collect every record accepted by `predicate`
    pub fn scan<P>(&self, predicate: P) -> Vec<Arc<UsageRecord>>
    where
        P: Fn(&UsageRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(day: u32, age: &str) -> UsageRecord {
        UsageRecord {
            day: NaiveDate::from_ymd_opt(2022, 10, day).unwrap(),
            age: age.to_string(),
            gender: None,
            a: 1.0,
            b: 1.0,
            c: 1.0,
            d: 1.0,
            e: 1.0,
            f: 1.0,
        }
    }

    fn open_store(dir: &TempDir) -> RecordStore {
        let wal = Wal::new(dir.path().join("records.wal")).unwrap();
        let store = RecordStore::new(wal);
        for op in store.wal.replay().unwrap() {
            store.apply(op);
        }
        store
    }

    #[test]
    fn test_insert_and_get() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let id = store.insert(record(4, "15-25")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().age, "15-25");
    }

    #[test]
    fn test_duplicate_records_are_kept() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let first = store.insert(record(4, "15-25")).unwrap();
        let second = store.insert(record(4, "15-25")).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_scan_filters() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.insert(record(4, "15-25")).unwrap();
        store.insert(record(5, ">25")).unwrap();
        store.insert(record(6, "15-25")).unwrap();

        let young = store.scan(|r| r.age == "15-25");
        assert_eq!(young.len(), 2);
        assert!(store.scan(|_| false).is_empty());
    }

    #[test]
    fn test_clear_and_replay() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store.insert(record(4, "15-25")).unwrap();
            store.insert(record(5, "15-25")).unwrap();
            assert_eq!(store.clear().unwrap(), 2);
            store.insert(record(6, ">25")).unwrap();
        }

        let store = open_store(&dir);
        assert_eq!(store.len(), 1);
        assert_eq!(store.scan(|_| true)[0].age, ">25");
    }
}
