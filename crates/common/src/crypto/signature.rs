//! Detached, recoverable ECDSA signatures over record digests
//!
//! The signed message is always a 32-byte Keccak-256 `Digest` of a serialized
//! `EncryptedRecord`, never the plaintext. Signatures use the Ethereum layout
//! `r (32) || s (32) || v (1)` with `v` the raw recovery id (0 or 1).

use std::fmt;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use sha3::{Digest as _, Keccak256};

use super::keys::{PublicKey, SecretKey};
use super::record::EncryptedRecord;
use super::CryptoError;

/// Size of a Keccak-256 digest in bytes
pub const DIGEST_SIZE: usize = 32;
/// Size of a recoverable signature in bytes (`r || s || v`)
pub const SIGNATURE_SIZE: usize = 65;

const CORE_SIGNATURE_SIZE: usize = 64;

/// Keccak-256 hash of a serialized `EncryptedRecord`
///
/// Doubles as the signed message and as the source of the storage id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = CryptoError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != DIGEST_SIZE {
            return Err(CryptoError::MalformedInput(format!(
                "invalid digest size, expected {}, got {}",
                DIGEST_SIZE,
                bytes.len()
            )));
        }
        let mut buff = [0u8; DIGEST_SIZE];
        buff.copy_from_slice(bytes);
        Ok(Digest(buff))
    }
}

impl Digest {
    /// Hash the `nonce || ciphertext+tag` encoding of a record
    pub fn of(record: &EncryptedRecord) -> Self {
        Self::of_bytes(&record.to_bytes())
    }

    /// Hash arbitrary bytes with Keccak-256
    pub fn of_bytes(data: &[u8]) -> Self {
        Digest(Keccak256::digest(data).into())
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Recoverable secp256k1 signature: `r (32) || s (32) || v (1)`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = CryptoError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Signature {
    /// Parse a signature, checking only its length
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidSignature` unless exactly 65 bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(CryptoError::InvalidSignature(format!(
                "invalid signature length, expected {}, got {}",
                SIGNATURE_SIZE,
                bytes.len()
            )));
        }
        let mut buff = [0u8; SIGNATURE_SIZE];
        buff.copy_from_slice(bytes);
        Ok(Signature(buff))
    }

    /// Sign a digest with RFC 6979 deterministic ECDSA
    ///
    /// The produced `s` is in the lower half of the curve order.
    pub fn sign(secret_key: &SecretKey, digest: &Digest) -> Result<Self, CryptoError> {
        let (signature, recovery_id) = secret_key
            .signing_key()
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| CryptoError::Internal(format!("signing failed: {}", e)))?;

        let mut out = [0u8; SIGNATURE_SIZE];
        out[..CORE_SIGNATURE_SIZE].copy_from_slice(&signature.to_bytes());
        out[CORE_SIGNATURE_SIZE] = recovery_id.to_byte();
        Ok(Signature(out))
    }

    /// Verify the signature against a digest and public key
    ///
    /// Only the 64 `r || s` bytes take part; the recovery byte is ignored.
    /// Any invalid signature (wrong key, wrong digest, out-of-range scalars)
    /// yields `false` rather than an error.
    pub fn verify(&self, public_key: &PublicKey, digest: &Digest) -> bool {
        let Ok(signature) = EcdsaSignature::from_slice(self.core()) else {
            return false;
        };
        VerifyingKey::from(public_key.inner())
            .verify_prehash(digest.as_bytes(), &signature)
            .is_ok()
    }

    /// Recover the signer's public key from the recovery byte
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidSignature` if the recovery byte or scalars
    /// are out of range, or no key recovers.
    pub fn recover(&self, digest: &Digest) -> Result<PublicKey, CryptoError> {
        let recovery_id = RecoveryId::from_byte(self.recovery_byte()).ok_or_else(|| {
            CryptoError::InvalidSignature(format!(
                "invalid recovery id {}",
                self.recovery_byte()
            ))
        })?;
        let signature = EcdsaSignature::from_slice(self.core())
            .map_err(|_| CryptoError::InvalidSignature("malformed r or s".into()))?;
        let verifying_key =
            VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
                .map_err(|_| CryptoError::InvalidSignature("public key recovery failed".into()))?;
        Ok(PublicKey::from(k256::PublicKey::from(&verifying_key)))
    }

    /// The 64-byte `r || s` portion
    pub fn core(&self) -> &[u8] {
        &self.0[..CORE_SIGNATURE_SIZE]
    }

    pub fn recovery_byte(&self) -> u8 {
        self.0[CORE_SIGNATURE_SIZE]
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}
