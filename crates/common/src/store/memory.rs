use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::provider::{RecordStore, RecordStoreError, StoredRecord};

/// In-memory record store backed by a single mutex-guarded `HashMap`
///
/// Records live for the lifetime of the process. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<Mutex<HashMap<String, StoredRecord>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryRecordStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<
        MutexGuard<'_, HashMap<String, StoredRecord>>,
        RecordStoreError<MemoryRecordStoreError>,
    > {
        self.inner.lock().map_err(|e| {
            RecordStoreError::Provider(MemoryRecordStoreError::Internal(format!(
                "failed to acquire lock: {}",
                e
            )))
        })
    }
}

impl RecordStore for MemoryRecordStore {
    type Error = MemoryRecordStoreError;

    fn insert(&self, record: StoredRecord) -> Result<(), RecordStoreError<Self::Error>> {
        let mut records = self.lock()?;

        match records.entry(record.id.clone()) {
            Entry::Occupied(existing) => Err(RecordStoreError::Duplicate(existing.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn get(&self, id: &str) -> Result<Option<StoredRecord>, RecordStoreError<Self::Error>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn len(&self) -> Result<usize, RecordStoreError<Self::Error>> {
        Ok(self.lock()?.len())
    }
}
