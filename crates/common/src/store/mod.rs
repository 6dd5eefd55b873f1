//! Content-addressed, signature-gated storage of encrypted records

mod memory;
mod provider;

pub use memory::{MemoryRecordStore, MemoryRecordStoreError};
pub use provider::{record_id, RecordStore, RecordStoreError, StoredRecord, ID_PREFIX_SIZE};
