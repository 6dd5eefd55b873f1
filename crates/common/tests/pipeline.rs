//! Integration tests for the encrypt / sign / store / verify / decrypt pipeline

mod common;

use ::common::crypto::{CryptoError, EncryptedRecord, SecretKey, SharedKey};
use ::common::store::{RecordStore, RecordStoreError};
use ::common::vault::VaultError;

#[test]
fn test_end_to_end_for_registered_user() {
    let (vault, registry, secret_key, user_id) = common::setup_test_env();

    // authenticate with the address derived from the user's key
    let address = secret_key.public().to_address();
    assert!(registry.authenticate(user_id, &address));

    let public_key = registry.get(user_id).unwrap().public_key.to_bytes();
    let record = vault.encrypt_gene_data(&public_key, "AGTCAGTC").unwrap();
    let (digest, signature) = vault.sign_encrypted_gene_data(&secret_key, &record).unwrap();
    let id = vault
        .store_gene_data(user_id, record.clone(), &signature.to_bytes(), digest)
        .unwrap();

    assert!(vault.verify_gene_data_signature(&id, &public_key).unwrap());
    let retrieved = vault.retrieve_gene_data(&id).unwrap();
    assert_eq!(retrieved, record);
    assert_eq!(
        vault.decrypt_gene_data(&secret_key, &retrieved).unwrap(),
        "AGTCAGTC"
    );

    let stored = vault.store().get(&id).unwrap().unwrap();
    assert_eq!(stored.owner_id, user_id);
    assert_eq!(signature.recover(&stored.digest).unwrap(), secret_key.public());
}

#[test]
fn test_round_trip_many_keys_and_inputs() {
    let samples = ["", "A", "AGTC", "This is a test gene data.", "ÄGTÇ ünïcode"];
    for _ in 0..8 {
        let secret_key = SecretKey::generate();
        for sample in samples {
            let record = SharedKey::from_public(&secret_key.public())
                .encrypt(sample.as_bytes())
                .unwrap();
            let plaintext = SharedKey::from_secret(&secret_key).decrypt(&record).unwrap();
            assert_eq!(plaintext, sample.as_bytes());
        }
    }
}

#[test]
fn test_tampered_stored_record_is_refused() {
    let (vault, _, secret_key, user_id) = common::setup_test_env();

    let record = vault
        .encrypt_gene_data(&secret_key.public().to_bytes(), "AGTCAGTC")
        .unwrap();
    let (digest, signature) = vault.sign_encrypted_gene_data(&secret_key, &record).unwrap();

    // store a flipped ciphertext alongside the digest of the original
    let mut ciphertext = record.ciphertext().to_vec();
    ciphertext[0] ^= 0x01;
    let tampered = EncryptedRecord::new(*record.nonce(), ciphertext);
    let id = vault
        .store_gene_data(user_id, tampered, &signature.to_bytes(), digest)
        .unwrap();

    // the signature still matches the stored digest, but AEAD catches the flip
    assert!(matches!(
        vault.open_gene_data(&id, &secret_key),
        Err(VaultError::Crypto(CryptoError::Authentication))
    ));
}

#[test]
fn test_decrypt_malformed_bytes() {
    assert!(matches!(
        EncryptedRecord::from_bytes(b"short data"),
        Err(CryptoError::MalformedInput(_))
    ));
}

#[test]
fn test_same_ciphertext_different_owners_collides() {
    let (vault, registry, secret_key, user_id) = common::setup_test_env();
    let (_, other_user) = registry.register_user().unwrap();

    let record = vault
        .encrypt_gene_data(&secret_key.public().to_bytes(), "AGTC")
        .unwrap();
    let (digest, signature) = vault.sign_encrypted_gene_data(&secret_key, &record).unwrap();

    let id = vault
        .store_gene_data(user_id, record.clone(), &signature.to_bytes(), digest)
        .unwrap();
    let second = vault.store_gene_data(other_user, record, &signature.to_bytes(), digest);

    assert!(matches!(
        second,
        Err(VaultError::Store(RecordStoreError::Duplicate(dup))) if dup == id
    ));
}

#[test]
fn test_same_plaintext_twice_gets_two_ids() {
    let (vault, _, secret_key, user_id) = common::setup_test_env();

    // fresh nonces make the ciphertexts, and so the digests, differ
    let a = vault.seal_gene_data(user_id, &secret_key, "AGTC").unwrap();
    let b = vault.seal_gene_data(user_id, &secret_key, "AGTC").unwrap();
    assert_ne!(a, b);
    assert_eq!(vault.store().len().unwrap(), 2);
}

#[test]
fn test_verification_gate() {
    let (vault, _, secret_key, user_id) = common::setup_test_env();
    let id = vault.seal_gene_data(user_id, &secret_key, "AGTC").unwrap();

    let wrong = SecretKey::generate().public().to_bytes();
    assert!(!vault.verify_gene_data_signature(&id, &wrong).unwrap());

    let missing = vault.verify_gene_data_signature("00", &wrong);
    assert!(matches!(
        missing,
        Err(VaultError::Store(RecordStoreError::NotFound(_)))
    ));

    let malformed = vault.verify_gene_data_signature(&id, b"junk");
    assert!(matches!(
        malformed,
        Err(VaultError::Crypto(CryptoError::InvalidKey(_)))
    ));
}

#[test]
fn test_risk_score_matches_plaintext_only() {
    let (vault, _, _, _) = common::setup_test_env();
    for sample in ["AGTC", "AGTCAGTC", "GATTACA"] {
        let score = vault.calculate_risk_score(sample);
        assert!((1..=4).contains(&score));
        assert_eq!(score, ::common::risk::score(sample));
    }
}
