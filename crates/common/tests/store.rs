//! Integration tests for concurrent access to the record store

mod common;

use std::sync::Barrier;

use ::common::crypto::{Digest, SecretKey, Signature};
use ::common::store::{MemoryRecordStore, RecordStore, RecordStoreError};
use ::common::vault::{GeneVault, VaultError};

const WRITERS: usize = 16;

#[test]
fn test_concurrent_store_of_same_digest() {
    common::init_tracing();

    let store = MemoryRecordStore::new();
    let secret_key = SecretKey::generate();
    let vault = GeneVault::new(store.clone());
    let record = vault
        .encrypt_gene_data(&secret_key.public().to_bytes(), "AGTCAGTC")
        .unwrap();
    let digest = Digest::of(&record);
    let signature = Signature::sign(&secret_key, &digest).unwrap().to_bytes();

    let barrier = Barrier::new(WRITERS);
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|owner| {
                let store = store.clone();
                let record = record.clone();
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    store.store(owner as u64, record, &signature, digest)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(RecordStoreError::Duplicate(_))))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(duplicates, WRITERS - 1);
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_concurrent_store_of_distinct_records() {
    common::init_tracing();

    let vault = GeneVault::new(MemoryRecordStore::new());
    let secret_key = SecretKey::generate();

    let ids: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let vault = vault.clone();
                let secret_key = secret_key.clone();
                s.spawn(move || {
                    vault
                        .seal_gene_data(i as u64, &secret_key, &format!("AGTC{}", i))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(vault.store().len().unwrap(), WRITERS);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(vault.open_gene_data(id, &secret_key).unwrap(), format!("AGTC{}", i));
    }
}

#[test]
fn test_store_rejects_short_signature() {
    let vault = GeneVault::new(MemoryRecordStore::new());
    let secret_key = SecretKey::generate();
    let record = vault
        .encrypt_gene_data(&secret_key.public().to_bytes(), "AGTC")
        .unwrap();
    let digest = Digest::of(&record);

    let result = vault.store_gene_data(1, record, &[0u8; 64], digest);
    assert!(matches!(
        result,
        Err(VaultError::Store(RecordStoreError::InvalidSignature(_)))
    ));
    assert!(vault.store().is_empty().unwrap());
}
