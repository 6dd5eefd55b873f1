//! Cryptographic primitives for GeneVault
//!
//! This module provides everything the storage pipeline needs to protect a
//! record before it is handed to a store:
//!
//! - **Identity**: secp256k1 keypairs (`SecretKey`/`PublicKey`)
//! - **Key Agreement**: a 256-bit `SharedKey` derived from either half of a keypair
//! - **Encryption**: AES-256-GCM over the shared key, producing an `EncryptedRecord`
//! - **Signatures**: recoverable ECDSA over the Keccak-256 `Digest` of a record
//!
//! # Key Agreement Caveat
//!
//! The shared key is a hash of the public key's X coordinate. Both the holder of
//! the secret key and anyone holding the public key arrive at the same key, so the
//! encryption only protects against parties who never see the public key. A proper
//! scheme would run ECDH between an ephemeral sender key and the recipient key.
//! Records written by existing deployments depend on this derivation, so it is
//! kept as-is.
//!
//! # Pipeline
//!
//! ```ignore
//! let secret_key = SecretKey::generate();
//! let public_key = secret_key.public();
//!
//! let record = SharedKey::from_public(&public_key).encrypt(b"AGTC")?;
//! let digest = Digest::of(&record);
//! let signature = Signature::sign(&secret_key, &digest)?;
//! assert!(signature.verify(&public_key, &digest));
//!
//! let plaintext = SharedKey::from_secret(&secret_key).decrypt(&record)?;
//! ```

mod keys;
mod record;
mod shared_key;
mod signature;

pub use keys::{
    PublicKey, SecretKey, ADDRESS_SIZE, COMPRESSED_PUBLIC_KEY_SIZE, PRIVATE_KEY_SIZE,
    PUBLIC_KEY_SIZE,
};
pub use record::{EncryptedRecord, NONCE_SIZE, TAG_SIZE};
pub use shared_key::{SharedKey, SHARED_KEY_SIZE};
pub use signature::{Digest, Signature, DIGEST_SIZE, SIGNATURE_SIZE};

/// Errors that can occur during key, cipher and signature operations
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material could not be parsed or is not on the curve
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// The AEAD tag did not verify; no plaintext is released
    #[error("authentication failed")]
    Authentication,
    /// A buffer is too short to hold the expected layout
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// A signature has the wrong length or a bad recovery byte
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// Randomness or a primitive failed internally
    #[error("crypto error: {0}")]
    Internal(String),
}
