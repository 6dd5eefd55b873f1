//! Symmetric key agreement between the two halves of a keypair
//!
//! The key is `sha256(X)` where `X` is the public key's affine X coordinate as a
//! minimal big-endian integer (leading zero bytes dropped). Deployed records were
//! encrypted with exactly this encoding, so the stripping must stay.

use sha2::{Digest as _, Sha256};

use super::keys::{PublicKey, SecretKey};
use super::CryptoError;

/// Size of the AES-256-GCM key in bytes (256 bits)
pub const SHARED_KEY_SIZE: usize = 32;

/// A 256-bit symmetric key derived from a secp256k1 keypair
///
/// `SharedKey::from_public(&pk)` and `SharedKey::from_secret(&sk)` agree whenever
/// `pk == sk.public()`. The key lives only for the duration of one encrypt or
/// decrypt call and is never serialized.
#[derive(PartialEq, Eq, Clone)]
pub struct SharedKey([u8; SHARED_KEY_SIZE]);

impl std::fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedKey").field(&"<redacted>").finish()
    }
}

impl SharedKey {
    /// Derive the key on the recipient side, from the public key alone
    pub fn from_public(public_key: &PublicKey) -> Self {
        let x = public_key.x_coordinate();
        Self(Sha256::digest(strip_leading_zeros(&x)).into())
    }

    /// Derive the key on the holder side, from the secret key
    pub fn from_secret(secret_key: &SecretKey) -> Self {
        Self::from_public(&secret_key.public())
    }

    /// Parse a SEC1 public key and derive the key from it
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` for malformed or off-curve points.
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let public_key = PublicKey::from_sec1_bytes(bytes)?;
        Ok(Self::from_public(&public_key))
    }

    /// Get a reference to the key bytes
    pub(crate) fn bytes(&self) -> &[u8; SHARED_KEY_SIZE] {
        &self.0
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}
