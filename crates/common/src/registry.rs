//! In-memory user registry
//!
//! Maps a random `u64` user id to the user's public key, and authenticates a
//! user by comparing the account address derived from that key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;

use crate::crypto::{PublicKey, SecretKey};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("user not found: {0}")]
    UserNotFound(u64),
    #[error("registry error: {0}")]
    Internal(String),
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: u64,
    pub public_key: PublicKey,
}

#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    users: Arc<Mutex<HashMap<u64, User>>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<u64, User>>, RegistryError> {
        self.users
            .lock()
            .map_err(|e| RegistryError::Internal(format!("failed to acquire lock: {}", e)))
    }

    /// Generate a fresh keypair and register its public half under a random id
    ///
    /// Returns the secret key to the caller; the registry keeps only the public key.
    pub fn register_user(&self) -> Result<(SecretKey, u64), RegistryError> {
        let secret_key = SecretKey::generate();
        let user_id = self.register_user_with_pubkey(secret_key.public())?;
        Ok((secret_key, user_id))
    }

    /// Register an existing public key under a fresh random id
    pub fn register_user_with_pubkey(&self, public_key: PublicKey) -> Result<u64, RegistryError> {
        let mut users = self.lock()?;
        let mut rng = rand::rng();
        let user_id = loop {
            let candidate: u64 = rng.random();
            if !users.contains_key(&candidate) {
                break candidate;
            }
        };
        users.insert(
            user_id,
            User {
                user_id,
                public_key,
            },
        );
        tracing::debug!(user_id, "registered user");
        Ok(user_id)
    }

    /// Insert a user under a caller-chosen id, replacing any previous entry
    pub fn add_existing_user(&self, user_id: u64, public_key: PublicKey) -> Result<(), RegistryError> {
        self.lock()?.insert(
            user_id,
            User {
                user_id,
                public_key,
            },
        );
        Ok(())
    }

    /// Check that `address` is the account address of `user_id`'s key
    ///
    /// Returns `false` for malformed addresses and unknown users. The comparison
    /// is against the EIP-55 checksummed form, so case matters.
    pub fn authenticate(&self, user_id: u64, address: &str) -> bool {
        if !is_hex_address(address) {
            return false;
        }

        let Ok(users) = self.lock() else {
            return false;
        };
        let Some(user) = users.get(&user_id) else {
            return false;
        };

        user.public_key.to_address() == address
    }

    /// Return the user id and checksummed account address of a user
    pub fn user_info(&self, user_id: u64) -> Result<(u64, String), RegistryError> {
        let user = self.get(user_id)?;
        Ok((user.user_id, user.public_key.to_address()))
    }

    pub fn get(&self, user_id: u64) -> Result<User, RegistryError> {
        self.lock()?
            .get(&user_id)
            .cloned()
            .ok_or(RegistryError::UserNotFound(user_id))
    }
}

/// `0x`-prefixed (optional) string of exactly 40 hex digits
pub fn is_hex_address(s: &str) -> bool {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}
