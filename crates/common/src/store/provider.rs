use std::fmt::{Debug, Display};

use crate::crypto::{Digest, EncryptedRecord, PublicKey, Signature, DIGEST_SIZE};

/// Number of digest bytes that make up a record id (hex-encoded to 32 chars)
pub const ID_PREFIX_SIZE: usize = 16;

/// Derive the content address of a record from its digest
///
/// The id depends on the digest alone: two owners uploading byte-identical
/// ciphertext land on the same id, and the second write is refused.
pub fn record_id(digest: &Digest) -> String {
    hex::encode(&digest.as_bytes()[..ID_PREFIX_SIZE])
}

const _: () = assert!(ID_PREFIX_SIZE <= DIGEST_SIZE);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordStoreError<T> {
    /// The backing provider failed
    #[error("unhandled record store provider error: {0}")]
    Provider(#[from] T),
    /// The signature handed to `store` has the wrong length
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// A record with the same content address is already stored
    #[error("gene data with the same hash already exists: {0}")]
    Duplicate(String),
    /// No record is stored under the id
    #[error("gene data not found: {0}")]
    NotFound(String),
}

/// A record as held by a store: the encrypted payload plus everything needed
/// to check who produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: String,
    pub owner_id: u64,
    pub digest: Digest,
    pub signature: Signature,
    pub payload: EncryptedRecord,
}

/// Content-addressed storage of signed, encrypted records
///
/// Records move from absent to stored exactly once; there is no update or
/// delete. Implementors provide the two primitive operations and get the
/// content-addressing and verification logic from the provided methods.
pub trait RecordStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Insert a record if its id is absent
    ///
    /// The presence check and the insert must happen as one atomic step so
    /// concurrent writers of the same id cannot both succeed.
    ///
    /// Should fail with:
    /// * `Err(RecordStoreError::Duplicate)` - a record with this id exists
    fn insert(&self, record: StoredRecord) -> Result<(), RecordStoreError<Self::Error>>;

    /// Look up a complete record by id
    ///
    /// # Returns
    /// * `Ok(Some(record))` - the record as it was inserted
    /// * `Ok(None)` - nothing is stored under `id`
    fn get(&self, id: &str) -> Result<Option<StoredRecord>, RecordStoreError<Self::Error>>;

    /// Number of stored records
    fn len(&self) -> Result<usize, RecordStoreError<Self::Error>>;

    fn is_empty(&self) -> Result<bool, RecordStoreError<Self::Error>> {
        Ok(self.len()? == 0)
    }

    /// Store an encrypted record with its digest and detached signature
    ///
    /// # Arguments
    /// * `owner_id` - The user the record belongs to
    /// * `payload` - The encrypted record
    /// * `signature` - Raw `r || s || v` signature bytes over `digest`
    /// * `digest` - Keccak-256 digest of the serialized payload
    ///
    /// # Returns
    /// * `Ok(id)` - The content address, `hex(digest[..16])`
    /// * `Err(RecordStoreError::InvalidSignature)` - `signature` is not 65 bytes
    /// * `Err(RecordStoreError::Duplicate)` - The id is already taken
    fn store(
        &self,
        owner_id: u64,
        payload: EncryptedRecord,
        signature: &[u8],
        digest: Digest,
    ) -> Result<String, RecordStoreError<Self::Error>> {
        let signature = Signature::from_slice(signature)
            .map_err(|e| RecordStoreError::InvalidSignature(e.to_string()))?;

        let id = record_id(&digest);
        self.insert(StoredRecord {
            id: id.clone(),
            owner_id,
            digest,
            signature,
            payload,
        })?;

        tracing::info!(id = %id, owner_id, "stored gene data");
        Ok(id)
    }

    /// Fetch the encrypted payload stored under `id`
    ///
    /// This does not verify the signature. Callers must run
    /// `verify_signature` first and refuse to decrypt on `false`.
    fn retrieve(&self, id: &str) -> Result<EncryptedRecord, RecordStoreError<Self::Error>> {
        self.get(id)?
            .map(|record| record.payload)
            .ok_or_else(|| RecordStoreError::NotFound(id.to_string()))
    }

    /// Check the stored signature of `id` against `public_key`
    ///
    /// # Returns
    /// * `Ok(true)` - The stored signature was made by `public_key`'s owner
    /// * `Ok(false)` - It was not; this is a trust decision, not a fault
    /// * `Err(RecordStoreError::NotFound)` - Nothing is stored under `id`
    fn verify_signature(
        &self,
        id: &str,
        public_key: &PublicKey,
    ) -> Result<bool, RecordStoreError<Self::Error>> {
        let record = self
            .get(id)?
            .ok_or_else(|| RecordStoreError::NotFound(id.to_string()))?;

        let valid = record.signature.verify(public_key, &record.digest);
        tracing::debug!(id = %id, valid, "verified gene data signature");
        Ok(valid)
    }
}
