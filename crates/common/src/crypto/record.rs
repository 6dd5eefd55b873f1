//! Record encryption using AES-256-GCM
//!
//! An `EncryptedRecord` is the unit the rest of the system signs, stores and
//! hands back. On the wire it is `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! No associated data is bound into the tag.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};

use super::shared_key::SharedKey;
use super::CryptoError;

/// Size of AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Output of a single encryption call
///
/// Created once by `SharedKey::encrypt` and never mutated afterwards. The
/// `ciphertext` field carries the authentication tag at its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl EncryptedRecord {
    pub fn new(nonce: [u8; NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext followed by the 16-byte tag
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serialize as `nonce || ciphertext+tag`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse the `nonce || ciphertext+tag` layout
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MalformedInput` if the data is too short to hold a
    /// nonce. A short ciphertext is accepted here and rejected at decryption.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() < NONCE_SIZE {
            return Err(CryptoError::MalformedInput(format!(
                "data too short for nonce, expected at least {}, got {}",
                NONCE_SIZE,
                data.len()
            )));
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&data[..NONCE_SIZE]);
        Ok(Self {
            nonce,
            ciphertext: data[NONCE_SIZE..].to_vec(),
        })
    }

    /// Length of the `to_bytes` encoding
    pub fn encoded_len(&self) -> usize {
        NONCE_SIZE + self.ciphertext.len()
    }
}

impl SharedKey {
    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.bytes()))
    }

    /// Encrypt data using AES-256-GCM
    ///
    /// A random nonce is generated for each encryption operation, so encrypting
    /// the same plaintext twice yields different records.
    ///
    /// # Errors
    ///
    /// Returns an error only if the system RNG fails.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedRecord, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes)
            .map_err(|e| CryptoError::Internal(format!("failed to generate nonce: {}", e)))?;

        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| CryptoError::Internal("encrypt error".into()))?;

        Ok(EncryptedRecord::new(nonce_bytes, ciphertext))
    }

    /// Decrypt a record using AES-256-GCM
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Authentication` if the ciphertext is shorter than
    /// the tag, or if the tag does not verify (tampered data or wrong key).
    pub fn decrypt(&self, record: &EncryptedRecord) -> Result<Vec<u8>, CryptoError> {
        if record.ciphertext().len() < TAG_SIZE {
            return Err(CryptoError::Authentication);
        }

        self.cipher()
            .decrypt(Nonce::from_slice(record.nonce()), record.ciphertext())
            .map_err(|_| CryptoError::Authentication)
    }
}
