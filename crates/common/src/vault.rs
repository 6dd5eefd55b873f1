//! The operations the application layer drives the pipeline through
//!
//! `GeneVault` ties key agreement, encryption, signing and the record store
//! together. The individual steps are exposed so callers can interleave them
//! with their own work (registration, uploads elsewhere); `seal_gene_data` and
//! `open_gene_data` run the full write and read paths in one call.

use crate::crypto::{
    CryptoError, Digest, EncryptedRecord, PublicKey, SecretKey, SharedKey, Signature,
};
use crate::risk;
use crate::store::{MemoryRecordStore, RecordStore, RecordStoreError};

#[derive(Debug, thiserror::Error)]
pub enum VaultError<E> {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Store(#[from] RecordStoreError<E>),
    /// The stored signature does not match the key asking to open the record
    #[error("signature rejected for gene data {0}")]
    SignatureRejected(String),
    #[error("decrypted gene data is not valid UTF-8")]
    InvalidUtf8,
}

/// Pipeline facade over a `RecordStore`
#[derive(Debug, Clone)]
pub struct GeneVault<S: RecordStore> {
    store: S,
}

/// The vault as the binary runs it: records kept in process memory
pub type MemoryGeneVault = GeneVault<MemoryRecordStore>;

impl Default for GeneVault<MemoryRecordStore> {
    fn default() -> Self {
        Self::new(MemoryRecordStore::new())
    }
}

impl<S: RecordStore> GeneVault<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Encrypt gene data for the owner of `public_key` (SEC1 bytes)
    pub fn encrypt_gene_data(
        &self,
        public_key: &[u8],
        gene_data: &str,
    ) -> Result<EncryptedRecord, VaultError<S::Error>> {
        let key = SharedKey::from_public_bytes(public_key)?;
        let record = key.encrypt(gene_data.as_bytes())?;
        tracing::debug!(len = record.encoded_len(), "encrypted gene data");
        Ok(record)
    }

    /// Hash an encrypted record and sign the digest
    pub fn sign_encrypted_gene_data(
        &self,
        secret_key: &SecretKey,
        record: &EncryptedRecord,
    ) -> Result<(Digest, Signature), VaultError<S::Error>> {
        let digest = Digest::of(record);
        let signature = Signature::sign(secret_key, &digest)?;
        tracing::debug!(digest = %digest.to_hex(), "signed encrypted gene data");
        Ok((digest, signature))
    }

    /// Persist a signed record under its content address
    pub fn store_gene_data(
        &self,
        owner_id: u64,
        record: EncryptedRecord,
        signature: &[u8],
        digest: Digest,
    ) -> Result<String, VaultError<S::Error>> {
        Ok(self.store.store(owner_id, record, signature, digest)?)
    }

    /// Check the stored signature of `id` against `public_key` (SEC1 bytes)
    ///
    /// A malformed key is an error; a well-formed key that did not sign the
    /// record is `Ok(false)`.
    pub fn verify_gene_data_signature(
        &self,
        id: &str,
        public_key: &[u8],
    ) -> Result<bool, VaultError<S::Error>> {
        let public_key = PublicKey::from_sec1_bytes(public_key)?;
        Ok(self.store.verify_signature(id, &public_key)?)
    }

    /// Fetch an encrypted record without verifying it
    pub fn retrieve_gene_data(&self, id: &str) -> Result<EncryptedRecord, VaultError<S::Error>> {
        Ok(self.store.retrieve(id)?)
    }

    /// Decrypt a record with the owner's secret key
    pub fn decrypt_gene_data(
        &self,
        secret_key: &SecretKey,
        record: &EncryptedRecord,
    ) -> Result<String, VaultError<S::Error>> {
        let plaintext = SharedKey::from_secret(secret_key).decrypt(record)?;
        String::from_utf8(plaintext).map_err(|_| VaultError::InvalidUtf8)
    }

    pub fn calculate_risk_score(&self, gene_data: &str) -> u32 {
        risk::score(gene_data)
    }

    /// Encrypt, sign and store in one step, returning the record id
    pub fn seal_gene_data(
        &self,
        owner_id: u64,
        secret_key: &SecretKey,
        gene_data: &str,
    ) -> Result<String, VaultError<S::Error>> {
        let record = self.encrypt_gene_data(&secret_key.public().to_bytes(), gene_data)?;
        let (digest, signature) = self.sign_encrypted_gene_data(secret_key, &record)?;
        self.store_gene_data(owner_id, record, &signature.to_bytes(), digest)
    }

    /// Verify, retrieve and decrypt in one step
    ///
    /// The signature is checked against `secret_key`'s public half before any
    /// ciphertext is touched; a mismatch is `VaultError::SignatureRejected`.
    pub fn open_gene_data(
        &self,
        id: &str,
        secret_key: &SecretKey,
    ) -> Result<String, VaultError<S::Error>> {
        if !self.store.verify_signature(id, &secret_key.public())? {
            tracing::warn!(id = %id, "refusing to decrypt gene data with rejected signature");
            return Err(VaultError::SignatureRejected(id.to_string()));
        }

        let record = self.store.retrieve(id)?;
        self.decrypt_gene_data(secret_key, &record)
    }
}
