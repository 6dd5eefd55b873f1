/**
 * Cryptographic types and operations.
 *  - secp256k1 keypairs and account addresses
 *  - Key agreement, AES-256-GCM record encryption
 *  - Recoverable signatures over record digests
 */
pub mod crypto;
/**
 * In-memory registry of users and their
 *  public keys.
 */
pub mod registry;
/**
 * Deterministic risk tier over plaintext.
 *  Not part of the security path.
 */
pub mod risk;
/**
 * Content-addressed storage of signed,
 *  encrypted records.
 */
pub mod store;
/**
 * Facade that drives the full
 *  encrypt / sign / store / verify / decrypt
 *  pipeline over a store.
 */
pub mod vault;

pub mod prelude {
    pub use crate::crypto::{Digest, EncryptedRecord, PublicKey, SecretKey, SharedKey, Signature};
    pub use crate::registry::UserRegistry;
    pub use crate::store::{MemoryRecordStore, RecordStore, RecordStoreError};
    pub use crate::vault::{GeneVault, MemoryGeneVault, VaultError};
}
