use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest as _, Keccak256};

use super::CryptoError;

/// Size of a secp256k1 private scalar in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of an uncompressed SEC1 public key (`0x04 || X || Y`) in bytes
pub const PUBLIC_KEY_SIZE: usize = 65;
/// Size of a compressed SEC1 public key in bytes
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;
/// Size of an Ethereum-style account address in bytes
pub const ADDRESS_SIZE: usize = 20;

const COORDINATE_SIZE: usize = 32;

/// Public half of a secp256k1 keypair
///
/// Used by the recipient side of the pipeline: it derives the `SharedKey` that
/// encrypts a record, verifies the detached signature over the stored digest,
/// and identifies a registered user through its account address.
///
/// Accepts both SEC1 encodings on input and always emits the uncompressed form.
///
/// # Examples
///
/// ```ignore
/// let public_key = SecretKey::generate().public();
///
/// let hex = public_key.to_hex();
/// let recovered = PublicKey::from_hex(&hex)?;
/// assert_eq!(public_key, recovered);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(k256::PublicKey);

impl From<k256::PublicKey> for PublicKey {
    fn from(key: k256::PublicKey) -> Self {
        PublicKey(key)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = CryptoError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_sec1_bytes(bytes)
    }
}

impl PublicKey {
    /// Parse a public key from its SEC1 encoding (compressed or uncompressed)
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` if the length is wrong or the point
    /// is not on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBLIC_KEY_SIZE && bytes.len() != COMPRESSED_PUBLIC_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "invalid public key size, expected {} or {}, got {}",
                PUBLIC_KEY_SIZE,
                COMPRESSED_PUBLIC_KEY_SIZE,
                bytes.len()
            )));
        }
        k256::PublicKey::from_sec1_bytes(bytes)
            .map(PublicKey)
            .map_err(|_| CryptoError::InvalidKey("public key is not a valid curve point".into()))
    }

    /// Parse a public key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes = hex::decode(hex)
            .map_err(|_| CryptoError::InvalidKey("public key hex decode error".into()))?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Uncompressed SEC1 encoding: `0x04 || X || Y`
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let point = self.0.to_encoded_point(false);
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Compressed SEC1 encoding: `0x02/0x03 || X`
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Convert public key to hexadecimal string (uncompressed encoding)
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Big-endian affine X coordinate, zero-padded to 32 bytes
    pub fn x_coordinate(&self) -> [u8; COORDINATE_SIZE] {
        let mut x = [0u8; COORDINATE_SIZE];
        x.copy_from_slice(&self.to_bytes()[1..1 + COORDINATE_SIZE]);
        x
    }

    /// Ethereum-style account address: the last 20 bytes of
    /// `keccak256(X || Y)`
    pub fn address(&self) -> [u8; ADDRESS_SIZE] {
        let hash = Keccak256::digest(&self.to_bytes()[1..]);
        let mut address = [0u8; ADDRESS_SIZE];
        address.copy_from_slice(&hash[hash.len() - ADDRESS_SIZE..]);
        address
    }

    /// Render the account address as `0x`-prefixed EIP-55 mixed-case hex
    pub fn to_address(&self) -> String {
        let lower = hex::encode(self.address());
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (hash[i / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    pub(crate) fn inner(&self) -> &k256::PublicKey {
        &self.0
    }
}

/// Secret half of a secp256k1 keypair
///
/// Held by the data owner. It signs the digest of every record the owner
/// stores and derives the same `SharedKey` as its public counterpart to
/// decrypt records later.
///
/// # Security Considerations
///
/// - Never log or transmit this key
/// - Store it in the state directory (`~/.genevault/key.pem`) or pass it in
///   explicitly per invocation
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
///
/// let pem = secret_key.to_pem();
/// std::fs::write("key.pem", pem)?;
///
/// let pem = std::fs::read_to_string("key.pem")?;
/// let recovered = SecretKey::from_pem(&pem)?;
/// ```
#[derive(Clone)]
pub struct SecretKey(k256::SecretKey);

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretKey").field(&"<redacted>").finish()
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = CryptoError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "invalid private key size, expected {}, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }
        k256::SecretKey::from_slice(bytes)
            .map(SecretKey)
            .map_err(|_| CryptoError::InvalidKey("private key is not a valid scalar".into()))
    }
}

impl SecretKey {
    /// Generate a new random secret key using a cryptographically secure RNG
    ///
    /// Retries on the (astronomically unlikely) draw of zero or a value
    /// outside the curve order.
    pub fn generate() -> Self {
        loop {
            let mut bytes = [0u8; PRIVATE_KEY_SIZE];
            getrandom::getrandom(&mut bytes).expect("failed to generate random bytes");
            if let Ok(key) = Self::try_from(bytes.as_slice()) {
                return key;
            }
        }
    }

    /// Parse a secret key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; PRIVATE_KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff)
            .map_err(|_| CryptoError::InvalidKey("private key hex decode error".into()))?;
        Self::try_from(buff.as_slice())
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    /// Convert secret key to raw big-endian bytes
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        let mut out = [0u8; PRIVATE_KEY_SIZE];
        out.copy_from_slice(&self.0.to_bytes());
        out
    }

    /// Convert secret key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Encode secret key in PEM format for storage in the state directory
    ///
    /// Returns a PEM-encoded string with tag "PRIVATE KEY".
    pub fn to_pem(&self) -> String {
        let pem = pem::Pem::new("PRIVATE KEY", self.to_bytes());
        pem::encode(&pem)
    }

    /// Parse a secret key from PEM format
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The PEM string is malformed
    /// - The PEM tag is not "PRIVATE KEY"
    /// - The key size is incorrect or the scalar is out of range
    pub fn from_pem(pem_str: &str) -> Result<Self, CryptoError> {
        let pem = pem::parse(pem_str)
            .map_err(|e| CryptoError::InvalidKey(format!("failed to parse PEM: {}", e)))?;

        if pem.tag() != "PRIVATE KEY" {
            return Err(CryptoError::InvalidKey(
                "invalid PEM tag, expected PRIVATE KEY".into(),
            ));
        }

        Self::try_from(pem.contents())
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // secp256k1 generator point, i.e. the public key of scalar 1
    const ONE_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const GENERATOR_X: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_keypair_generation() {
        let private_key = SecretKey::generate();
        let public_key = private_key.public();

        let private_hex = private_key.to_hex();
        let recovered_private = SecretKey::from_hex(&private_hex).unwrap();
        assert_eq!(private_key.to_bytes(), recovered_private.to_bytes());

        let public_hex = public_key.to_hex();
        let recovered_public = PublicKey::from_hex(&format!("0x{}", public_hex)).unwrap();
        assert_eq!(public_key, recovered_public);
    }

    #[test]
    fn test_pem_serialization() {
        let private_key = SecretKey::generate();

        let pem = private_key.to_pem();
        let recovered_private = SecretKey::from_pem(&pem).unwrap();
        assert_eq!(private_key.to_bytes(), recovered_private.to_bytes());
        assert_eq!(private_key.public(), recovered_private.public());
    }

    #[test]
    fn test_pem_wrong_tag() {
        let pem = pem::encode(&pem::Pem::new("PUBLIC KEY", vec![1u8; PRIVATE_KEY_SIZE]));
        assert!(matches!(
            SecretKey::from_pem(&pem),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_compressed_and_uncompressed_agree() {
        let public_key = SecretKey::generate().public();

        let compressed = public_key.to_compressed();
        let from_compressed = PublicKey::from_sec1_bytes(&compressed).unwrap();
        assert_eq!(from_compressed, public_key);
        assert_eq!(public_key.to_bytes()[0], 0x04);
    }

    #[test]
    fn test_invalid_public_key() {
        assert!(PublicKey::from_sec1_bytes(b"invalid public key").is_err());

        // right length, not on the curve
        let mut bogus = [0u8; PUBLIC_KEY_SIZE];
        bogus[0] = 0x04;
        bogus[1] = 0x01;
        assert!(matches!(
            PublicKey::from_sec1_bytes(&bogus),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(SecretKey::try_from([0u8; PRIVATE_KEY_SIZE].as_slice()).is_err());
        assert!(SecretKey::try_from([1u8; 16].as_slice()).is_err());
    }

    #[test]
    fn test_known_vector() {
        let key = SecretKey::from_hex(ONE_HEX).unwrap();
        let public_key = key.public();

        assert_eq!(hex::encode(public_key.x_coordinate()), GENERATOR_X);
        assert_eq!(
            public_key.to_address(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = SecretKey::from_hex(ONE_HEX).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&key.to_hex()));
    }
}
