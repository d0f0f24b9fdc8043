//! Key generation helpers for collaborators setting up cabinets.
//!
//! Output is hex-encoded and serialises with the same field names the
//! configuration object accepts.

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::CabinetConfig;
use crate::primitive::{derive_public, KEY_LEN};

/// `keyType` reported for secretbox keys.
pub const SYMMETRIC_KEY_TYPE: &str = "salsa20poly1305";

/// `keyType` reported for box keypairs.
pub const ASYMMETRIC_KEY_TYPE: &str = "curve25519";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetricKey {
    pub key: String,
    pub key_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsymmetricKeypair {
    pub private_key: String,
    pub public_key: String,
    pub key_type: String,
}

impl AsymmetricKeypair {
    /// Configuration for talking to `peer`: our private key, their public key.
    pub fn config_for_peer(&self, peer: &AsymmetricKeypair) -> CabinetConfig {
        CabinetConfig::asymmetric(self.private_key.clone(), peer.public_key.clone())
    }
}

/// Generate a random 256-bit secretbox key.
pub fn generate_symmetric_key() -> SymmetricKey {
    SymmetricKey {
        key: hex::encode(random_key()),
        key_type: SYMMETRIC_KEY_TYPE.into(),
    }
}

/// Generate a random X25519 keypair.
pub fn generate_asymmetric_keypair() -> AsymmetricKeypair {
    let secret = random_key();
    AsymmetricKeypair {
        private_key: hex::encode(secret),
        public_key: hex::encode(derive_public(&secret)),
        key_type: ASYMMETRIC_KEY_TYPE.into(),
    }
}

fn random_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_key_hex(s: &str) -> bool {
        s.len() == 64 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    #[test]
    fn symmetric_key_shape() {
        let k = generate_symmetric_key();
        assert!(is_key_hex(&k.key));
        assert_eq!(k.key_type, "salsa20poly1305");

        let json = serde_json::to_value(&k).unwrap();
        let fields: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(fields, vec!["key", "keyType"]);
    }

    #[test]
    fn asymmetric_keypair_shape() {
        let k = generate_asymmetric_keypair();
        assert!(is_key_hex(&k.private_key));
        assert!(is_key_hex(&k.public_key));
        assert_eq!(k.key_type, "curve25519");

        let json = serde_json::to_value(&k).unwrap();
        let fields: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(fields, vec!["privateKey", "publicKey", "keyType"]);
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(generate_symmetric_key().key, generate_symmetric_key().key);
        let a = generate_asymmetric_keypair();
        let b = generate_asymmetric_keypair();
        assert_ne!(a.private_key, b.private_key);
    }

    #[test]
    fn own_keypair_is_bound() {
        let k = generate_asymmetric_keypair();
        let config = k.config_for_peer(&k);
        assert!(config.asymmetric.unwrap().to_key_material().is_err());
    }
}
