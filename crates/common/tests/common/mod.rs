//! Shared test utilities for pipeline integration tests
#![allow(dead_code)]

use ::common::crypto::SecretKey;
use ::common::registry::UserRegistry;
use ::common::vault::MemoryGeneVault;

/// Install a test subscriber once so `RUST_LOG=debug cargo test` shows store logs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Set up a fresh vault, a registry, and one registered owner
pub fn setup_test_env() -> (MemoryGeneVault, UserRegistry, SecretKey, u64) {
    init_tracing();

    let vault = MemoryGeneVault::default();
    let registry = UserRegistry::new();
    let (secret_key, user_id) = registry.register_user().unwrap();

    (vault, registry, secret_key, user_id)
}
