use clap::Args;
use rand::distr::Alphanumeric;
use rand::Rng;

use common::crypto::{CryptoError, SecretKey};
use common::registry::{RegistryError, UserRegistry};
use common::store::MemoryRecordStoreError;
use common::vault::{MemoryGeneVault, VaultError};

use crate::state::StateError;

/// Push one sample through the whole pipeline against an in-memory vault
///
/// Registers the owner, authenticates them, then encrypts, signs, stores,
/// verifies, scores, re-verifies, retrieves and decrypts, reporting each step.
#[derive(Args, Debug, Clone)]
pub struct Run {
    /// Gene data to process (random alphanumeric sample if unset)
    #[arg(long)]
    pub data: Option<String>,

    /// Owner secret key as hex (defaults to the state key, then a fresh key)
    #[arg(long)]
    pub key_hex: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("invalid key: {0}")]
    Key(#[from] CryptoError),
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("user authentication failed for user {0}")]
    AuthenticationFailed(u64),
    #[error("gene data signature is invalid for {0}")]
    InvalidSignature(String),
    #[error("decrypted gene data does not match the original")]
    Mismatch,
    #[error(transparent)]
    Vault(#[from] VaultError<MemoryRecordStoreError>),
}

/// Random sample over `[a-zA-Z0-9]` with a length in `min_len..=max_len`
pub fn random_gene_data(min_len: usize, max_len: usize) -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(min_len..=max_len);
    (&mut rng)
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

impl Run {
    fn resolve_key(
        &self,
        ctx: &crate::op::OpContext,
    ) -> Result<(SecretKey, &'static str), RunError> {
        if let Some(key_hex) = &self.key_hex {
            return Ok((SecretKey::from_hex(key_hex)?, "command line"));
        }
        if let Some(state) = ctx.state()? {
            return Ok((state.load_key()?, "state directory"));
        }
        Ok((SecretKey::generate(), "freshly generated"))
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Run {
    type Error = RunError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (secret_key, key_source) = self.resolve_key(ctx)?;
        let public_key = secret_key.public();
        let public_key_bytes = public_key.to_bytes();
        let address = public_key.to_address();

        let registry = UserRegistry::new();
        let vault = MemoryGeneVault::default();
        let mut report = vec![format!("Using {} key for {}", key_source, address)];

        report.push("\nStep 1\nRegistering a new user...".to_string());
        let user_id = registry.register_user_with_pubkey(public_key)?;
        report.push(format!(
            "User registered with UserID: {} and address: {}",
            user_id, address
        ));

        report.push("\nStep 2".to_string());
        if !registry.authenticate(user_id, &address) {
            return Err(RunError::AuthenticationFailed(user_id));
        }
        report.push(format!(
            "User authenticated successfully with address: {}",
            address
        ));

        report.push("\nStep 3".to_string());
        let gene_data = match &self.data {
            Some(data) => data.clone(),
            None => random_gene_data(ctx.config.gene_data_min_len, ctx.config.gene_data_max_len),
        };
        report.push(format!("Original gene data: {}", gene_data));
        let record = vault.encrypt_gene_data(&public_key_bytes, &gene_data)?;
        report.push("Gene data encrypted successfully.".to_string());

        report.push("\nStep 4".to_string());
        let (digest, signature) = vault.sign_encrypted_gene_data(&secret_key, &record)?;
        report.push(format!("Gene data signed successfully. Digest: {}", digest.to_hex()));

        report.push("\nStep 5".to_string());
        let id = vault.store_gene_data(user_id, record, &signature.to_bytes(), digest)?;
        report.push(format!("Gene data stored successfully with FileID: {}", id));

        report.push("\nStep 6".to_string());
        if vault.verify_gene_data_signature(&id, &public_key_bytes)? {
            report.push("Gene data signature is valid.".to_string());
        } else {
            report.push("Gene data signature is invalid.".to_string());
        }

        report.push("\nStep 7".to_string());
        let risk_score = vault.calculate_risk_score(&gene_data);
        report.push(format!("Risk score calculated: {}", risk_score));

        report.push("\nStep 8\nRetrieving and decrypting original gene data...".to_string());
        if !vault.verify_gene_data_signature(&id, &public_key_bytes)? {
            tracing::warn!(id = %id, "signature check failed before decryption");
            return Err(RunError::InvalidSignature(id));
        }
        report.push("Gene data signature is valid.".to_string());

        let retrieved = vault.retrieve_gene_data(&id)?;
        report.push("Encrypted gene data retrieved successfully.".to_string());

        let decrypted = vault.decrypt_gene_data(&secret_key, &retrieved)?;
        if decrypted != gene_data {
            return Err(RunError::Mismatch);
        }
        report.push(format!(
            "Original gene data retrieved and decrypted successfully: {}",
            decrypted
        ));

        Ok(report.join("\n"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::op::{Op, OpContext};
    use crate::state::AppState;
    use tempfile::TempDir;

    const KEY_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn ctx(temp: &TempDir) -> OpContext {
        OpContext::new(Some(temp.path().join("state")))
    }

    #[tokio::test]
    async fn test_run_with_given_key_and_data() {
        let temp = TempDir::new().unwrap();
        let op = Run {
            data: Some("AGTCAGTC".to_string()),
            key_hex: Some(KEY_HEX.to_string()),
        };

        let output = op.execute(&ctx(&temp)).await.unwrap();
        assert!(output.contains("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"));
        assert!(output.contains("Gene data signature is valid."));
        assert!(output.contains("decrypted successfully: AGTCAGTC"));
    }

    #[tokio::test]
    async fn test_run_uses_state_key() {
        let temp = TempDir::new().unwrap();
        let state = AppState::init(Some(temp.path().join("state")), None).unwrap();
        let address = state.load_key().unwrap().public().to_address();

        let op = Run {
            data: None,
            key_hex: None,
        };
        let output = op.execute(&ctx(&temp)).await.unwrap();
        assert!(output.contains(&format!("Using state directory key for {}", address)));
    }

    #[tokio::test]
    async fn test_run_rejects_bad_key_hex() {
        let temp = TempDir::new().unwrap();
        let op = Run {
            data: Some("AGTC".to_string()),
            key_hex: Some("zz".to_string()),
        };
        assert!(matches!(
            op.execute(&ctx(&temp)).await,
            Err(RunError::Key(CryptoError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_random_gene_data_range() {
        for _ in 0..32 {
            let data = random_gene_data(10, 50);
            assert!((10..=50).contains(&data.len()));
            assert!(data.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert_eq!(random_gene_data(5, 5).len(), 5);
    }
}
