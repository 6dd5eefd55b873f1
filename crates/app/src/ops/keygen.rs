use std::convert::Infallible;
use std::fmt;

use clap::Args;
use serde::Serialize;

use common::crypto::SecretKey;

/// Generate a secp256k1 keypair without touching the state directory
#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// Print the keypair as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedKey {
    pub secret_key: String,
    pub public_key: String,
    pub address: String,
    #[serde(skip)]
    json: bool,
}

impl fmt::Display for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.json {
            let rendered = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
            return write!(f, "{}", rendered);
        }
        write!(
            f,
            "Secret key: {}\nPublic key: {}\nAddress: {}",
            self.secret_key, self.public_key, self.address
        )
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Keygen {
    type Error = Infallible;
    type Output = GeneratedKey;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let secret_key = SecretKey::generate();
        let public_key = secret_key.public();

        Ok(GeneratedKey {
            secret_key: secret_key.to_hex(),
            public_key: public_key.to_hex(),
            address: public_key.to_address(),
            json: self.json,
        })
    }
}
