//! Cabinet configuration: the external object callers supply, and the
//! canonical key material it is normalised into.
//!
//! Key aliases (`secretKey`, `sk`, `pk`, snake_case forms) are accepted only
//! here, at the deserialisation boundary. Everything past [`KeyMaterial`] sees
//! one canonical field per key.

use common::ConfigError;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::primitive::{derive_public, KEY_LEN};

/// Configuration object consumed once, at registry construction.
///
/// ```json
/// { "symmetric": { "key": "<64 hex>" },
///   "asymmetric": { "privateKey": "<64 hex>", "publicKey": "<64 hex>" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CabinetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetric: Option<SymmetricConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asymmetric: Option<AsymmetricConfig>,
}

/// `symmetric` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymmetricConfig {
    #[serde(default)]
    pub key: Option<String>,
}

/// `asymmetric` section: our secret key and the peer's public key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsymmetricConfig {
    #[serde(
        rename = "privateKey",
        alias = "secretKey",
        alias = "sk",
        alias = "private_key",
        default
    )]
    pub private_key: Option<String>,
    #[serde(rename = "publicKey", alias = "pk", alias = "public_key", default)]
    pub public_key: Option<String>,
}

impl CabinetConfig {
    /// Configuration with only a symmetric cabinet.
    pub fn symmetric(key_hex: impl Into<String>) -> Self {
        Self::default().with_symmetric(key_hex)
    }

    /// Configuration with only an asymmetric cabinet.
    pub fn asymmetric(private_key_hex: impl Into<String>, public_key_hex: impl Into<String>) -> Self {
        Self::default().with_asymmetric(private_key_hex, public_key_hex)
    }

    pub fn with_symmetric(mut self, key_hex: impl Into<String>) -> Self {
        self.symmetric = Some(SymmetricConfig {
            key: Some(key_hex.into()),
        });
        self
    }

    pub fn with_asymmetric(
        mut self,
        private_key_hex: impl Into<String>,
        public_key_hex: impl Into<String>,
    ) -> Self {
        self.asymmetric = Some(AsymmetricConfig {
            private_key: Some(private_key_hex.into()),
            public_key: Some(public_key_hex.into()),
        });
        self
    }

    /// `true` if neither section is present.
    pub fn is_empty(&self) -> bool {
        self.symmetric.is_none() && self.asymmetric.is_none()
    }
}

impl SymmetricConfig {
    /// Validate and decode into canonical key material.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingSymmetricKey`], [`ConfigError::NotHex`] or
    /// [`ConfigError::InvalidKeyLength`].
    pub fn to_key_material(&self) -> Result<KeyMaterial, ConfigError> {
        let key = present(&self.key).ok_or(ConfigError::MissingSymmetricKey)?;
        Ok(KeyMaterial::Symmetric {
            key: decode_key(key, "symmetric key")?,
        })
    }
}

impl AsymmetricConfig {
    /// Validate and decode into canonical key material.
    ///
    /// Presence of both keys is checked before either is decoded.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingPrivateKey`], [`ConfigError::MissingPublicKey`],
    /// [`ConfigError::NotHex`], [`ConfigError::InvalidKeyLength`] or
    /// [`ConfigError::BoundKeypair`] when the public key is the one derived from
    /// the private key.
    pub fn to_key_material(&self) -> Result<KeyMaterial, ConfigError> {
        let sk = present(&self.private_key).ok_or(ConfigError::MissingPrivateKey)?;
        let pk = present(&self.public_key).ok_or(ConfigError::MissingPublicKey)?;

        let secret_key = decode_key(sk, "private key")?;
        let public_key = decode_key(pk, "public key")?;

        if derive_public(secret_key.as_bytes()) == *public_key.as_bytes() {
            return Err(ConfigError::BoundKeypair);
        }

        Ok(KeyMaterial::Asymmetric {
            secret_key,
            public_key,
        })
    }
}

/// Canonical, validated key material for one cabinet.
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Symmetric {
        key: KeyBytes,
    },
    Asymmetric {
        secret_key: KeyBytes,
        /// The peer's public key.
        public_key: KeyBytes,
    },
}

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// Zeroed on drop; never printed.
#[derive(Clone)]
pub struct KeyBytes(Box<[u8; KEY_LEN]>);

impl KeyBytes {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(Box::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for KeyBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyBytes([REDACTED])")
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn decode_key(hex_str: &str, field: &'static str) -> Result<KeyBytes, ConfigError> {
    let bytes = hex::decode(hex_str).map_err(|_| ConfigError::NotHex)?;
    let key: [u8; KEY_LEN] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ConfigError::InvalidKeyLength {
            field,
            expected: KEY_LEN,
            got: bytes.len(),
        })?;
    Ok(KeyBytes::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hex_key(byte: u8) -> String {
        hex::encode([byte; KEY_LEN])
    }

    #[test]
    fn symmetric_requires_key() {
        let err = SymmetricConfig::default().to_key_material().unwrap_err();
        assert_eq!(err, ConfigError::MissingSymmetricKey);
        assert_eq!(
            err.to_string(),
            "Symmetric key cabinet cannot be used without secret key."
        );
    }

    #[test]
    fn symmetric_rejects_non_hex() {
        let cfg = SymmetricConfig {
            key: Some("nonbase64encodedkey".into()),
        };
        assert_eq!(cfg.to_key_material().unwrap_err(), ConfigError::NotHex);
    }

    #[test]
    fn symmetric_rejects_short_key() {
        let cfg = SymmetricConfig {
            key: Some(hex::encode([1u8; 16])),
        };
        assert_eq!(
            cfg.to_key_material().unwrap_err(),
            ConfigError::InvalidKeyLength {
                field: "symmetric key",
                expected: 32,
                got: 16
            }
        );
    }

    #[test]
    fn asymmetric_checks_presence_before_decoding() {
        let cfg = AsymmetricConfig {
            private_key: None,
            public_key: Some("zz".into()),
        };
        assert_eq!(cfg.to_key_material().unwrap_err(), ConfigError::MissingPrivateKey);

        let cfg = AsymmetricConfig {
            private_key: Some("zz".into()),
            public_key: None,
        };
        assert_eq!(cfg.to_key_material().unwrap_err(), ConfigError::MissingPublicKey);
    }

    #[test]
    fn asymmetric_rejects_non_hex_keys() {
        let cfg = AsymmetricConfig {
            private_key: Some("nonbase64encodedkey".into()),
            public_key: Some(hex_key(2)),
        };
        assert_eq!(cfg.to_key_material().unwrap_err(), ConfigError::NotHex);

        let cfg = AsymmetricConfig {
            private_key: Some(hex_key(1)),
            public_key: Some("nonbase64encodedkey".into()),
        };
        assert_eq!(cfg.to_key_material().unwrap_err(), ConfigError::NotHex);
    }

    #[test]
    fn asymmetric_rejects_bound_keypair() {
        let sk = [9u8; KEY_LEN];
        let cfg = AsymmetricConfig {
            private_key: Some(hex::encode(sk)),
            public_key: Some(hex::encode(derive_public(&sk))),
        };
        assert_eq!(cfg.to_key_material().unwrap_err(), ConfigError::BoundKeypair);
    }

    #[test]
    fn asymmetric_accepts_peer_pair() {
        let peer = derive_public(&[8u8; KEY_LEN]);
        let cfg = AsymmetricConfig {
            private_key: Some(hex_key(9)),
            public_key: Some(hex::encode(peer)),
        };
        assert!(matches!(
            cfg.to_key_material().unwrap(),
            KeyMaterial::Asymmetric { .. }
        ));
    }

    #[test]
    fn key_aliases_deserialise_to_canonical_fields() {
        for (sk_field, pk_field) in [
            ("privateKey", "publicKey"),
            ("secretKey", "publicKey"),
            ("sk", "pk"),
            ("private_key", "public_key"),
        ] {
            let cfg: CabinetConfig = serde_json::from_value(json!({
                "asymmetric": { sk_field: "aa", pk_field: "bb" }
            }))
            .unwrap();
            let asy = cfg.asymmetric.unwrap();
            assert_eq!(asy.private_key.as_deref(), Some("aa"), "alias {sk_field}");
            assert_eq!(asy.public_key.as_deref(), Some("bb"), "alias {pk_field}");
        }
    }

    #[test]
    fn empty_sections_deserialise() {
        let cfg: CabinetConfig = serde_json::from_value(json!({"symmetric": {}})).unwrap();
        assert!(!cfg.is_empty());
        assert!(cfg.symmetric.unwrap().key.is_none());
        assert!(CabinetConfig::default().is_empty());
    }

    #[test]
    fn key_bytes_redacted_in_debug() {
        let key = KeyBytes::new([0xFF; KEY_LEN]);
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
