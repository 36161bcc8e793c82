use std::fmt;

use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::error::{AppError, Result};

pub const SECP256K1_ALGORITHM_NAME: &str = "secp256k1";

/// Signing capability handed to the transaction builder.
///
/// Implementations must be deterministic: the same message signed with the
/// same key always yields the same signature, because header signatures double
/// as transaction and batch identifiers.
pub trait Signer: Send + Sync {
    fn algorithm_name(&self) -> &'static str;

    /// Compressed public key, lowercase hex.
    fn public_key_hex(&self) -> &str;

    /// Hex encoded signature over `data`.
    fn sign(&self, data: &[u8]) -> Result<String>;
}

/// secp256k1 secret key. Never printed.
#[derive(Clone)]
pub struct PrivateKey {
    key: SigningKey,
}

impl PrivateKey {
    pub fn from_hex(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let normalized = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(normalized)
            .map_err(|e| AppError::InvalidKey(format!("private key is not hex: {}", e)))?;
        if bytes.len() != 32 {
            return Err(AppError::InvalidKey(format!(
                "private key must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let key = SigningKey::from_slice(&bytes)
            .map_err(|e| AppError::InvalidKey(format!("private key out of range: {}", e)))?;
        Ok(Self { key })
    }

    pub fn random() -> Self {
        loop {
            let bytes: [u8; 32] = rand::random();
            // Zero and values >= the curve order are rejected; retry.
            if let Ok(key) = SigningKey::from_slice(&bytes) {
                return Self { key };
            }
        }
    }

    pub fn hex(&self) -> String {
        hex::encode(self.key.to_bytes())
    }

    pub fn public_key_hex(&self) -> String {
        let point = self.key.verifying_key().to_encoded_point(true);
        hex::encode(point.as_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// RFC 6979 ECDSA over SHA-256 of the message, compact 64-byte `r || s`.
pub struct Secp256k1Signer {
    key: SigningKey,
    public_key_hex: String,
}

impl Secp256k1Signer {
    pub fn new(private_key: PrivateKey) -> Self {
        let public_key_hex = private_key.public_key_hex();
        Self {
            key: private_key.key,
            public_key_hex,
        }
    }
}

impl Signer for Secp256k1Signer {
    fn algorithm_name(&self) -> &'static str {
        SECP256K1_ALGORITHM_NAME
    }

    fn public_key_hex(&self) -> &str {
        &self.public_key_hex
    }

    fn sign(&self, data: &[u8]) -> Result<String> {
        let signature: Signature = self
            .key
            .try_sign(data)
            .map_err(|e| AppError::Signing(e.to_string()))?;
        Ok(hex::encode(signature.to_bytes()))
    }
}

impl fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Signer")
            .field("public_key", &self.public_key_hex)
            .finish_non_exhaustive()
    }
}

/// Checks a compact hex signature against a compressed hex public key.
pub fn verify(signature_hex: &str, data: &[u8], public_key_hex: &str) -> Result<bool> {
    let public_key_bytes = hex::decode(public_key_hex)
        .map_err(|e| AppError::InvalidKey(format!("public key is not hex: {}", e)))?;
    let verifying_key = VerifyingKey::from_sec1_bytes(&public_key_bytes)
        .map_err(|e| AppError::InvalidKey(format!("public key is not a curve point: {}", e)))?;

    let signature_bytes = hex::decode(signature_hex)
        .map_err(|e| AppError::BadRequest(format!("signature is not hex: {}", e)))?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|e| AppError::BadRequest(format!("signature is malformed: {}", e)))?;

    Ok(verifying_key.verify(data, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Key pair generated by the Python reference signer.
    const PRIVATE_KEY_HEX: &str =
        "80378f103c7f1ea5856d50f2dcdf38b97da5986e9b32297be2de3c8444c38c08";
    const PUBLIC_KEY_HEX: &str =
        "0279b0fbdf73d8656c86ef6fe12c5de883ebb5a07126aa2ab655e6f8321cb4beed";

    fn signer() -> Secp256k1Signer {
        Secp256k1Signer::new(PrivateKey::from_hex(PRIVATE_KEY_HEX).expect("valid key"))
    }

    #[test]
    fn public_key_matches_reference_signer() {
        let signer = signer();
        assert_eq!(signer.public_key_hex(), PUBLIC_KEY_HEX);
        assert_eq!(signer.algorithm_name(), "secp256k1");
    }

    #[test]
    fn signing_is_deterministic() {
        let signer = signer();
        let first = signer.sign(b"header bytes").unwrap();
        let second = signer.sign(b"header bytes").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 128);
        assert_ne!(first, signer.sign(b"other header").unwrap());
    }

    #[test]
    fn signature_verifies_against_public_key() {
        let signer = signer();
        let signature = signer.sign(b"payload").unwrap();
        assert!(verify(&signature, b"payload", PUBLIC_KEY_HEX).unwrap());
        assert!(!verify(&signature, b"tampered", PUBLIC_KEY_HEX).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_key() {
        let signature = signer().sign(b"payload").unwrap();
        match verify(&signature, b"payload", "02deadbeef") {
            Err(AppError::InvalidKey(_)) => {}
            other => panic!("expected InvalidKey, got {other:?}"),
        }
    }

    #[test]
    fn private_key_hex_round_trips() {
        let key = PrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        assert_eq!(key.hex(), PRIVATE_KEY_HEX);
        let prefixed = PrivateKey::from_hex(&format!("0x{PRIVATE_KEY_HEX}")).unwrap();
        assert_eq!(prefixed.public_key_hex(), PUBLIC_KEY_HEX);
    }

    #[test]
    fn private_key_from_hex_rejects_bad_input() {
        assert!(matches!(
            PrivateKey::from_hex("not-hex"),
            Err(AppError::InvalidKey(_))
        ));
        assert!(matches!(
            PrivateKey::from_hex("abcd"),
            Err(AppError::InvalidKey(_))
        ));
        assert!(matches!(
            PrivateKey::from_hex(&"00".repeat(32)),
            Err(AppError::InvalidKey(_))
        ));
    }

    #[test]
    fn random_keys_are_distinct() {
        let a = PrivateKey::random();
        let b = PrivateKey::random();
        assert_ne!(a.hex(), b.hex());
        assert_eq!(a.public_key_hex().len(), 66);
    }

    #[test]
    fn debug_output_hides_secret() {
        let key = PrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains(PRIVATE_KEY_HEX));
        assert!(rendered.contains(PUBLIC_KEY_HEX));
    }
}
