//! The authenticated-encryption primitives a cabinet binds at construction.
//!
//! - Symmetric: XSalsa20-Poly1305 secretbox (NaCl `crypto_secretbox_easy`).
//! - Asymmetric: X25519 + XSalsa20-Poly1305 box (NaCl `crypto_box_easy`).
//!
//! Both take a 24-byte nonce supplied by the caller. Any authentication
//! failure is reported as [`CabinetError::CryptoFailure`] with no detail.

use common::CabinetError;
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use crypto_secretbox::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    XSalsa20Poly1305,
};

use crate::codec::NONCE_LEN;

/// Byte length of every key (secretbox key, X25519 secret and public keys).
pub const KEY_LEN: usize = 32;

/// Raw nonce bytes.
pub type NonceBytes = [u8; NONCE_LEN];

/// Seal/open capability. Implementations hold their key material and are
/// immutable once built.
#[cfg_attr(test, mockall::automock)]
pub trait Primitive: Send + Sync {
    fn seal(&self, plaintext: &[u8], nonce: &NonceBytes) -> Result<Vec<u8>, CabinetError>;

    fn open(&self, ciphertext: &[u8], nonce: &NonceBytes) -> Result<Vec<u8>, CabinetError>;
}

/// XSalsa20-Poly1305 with a shared secret key.
pub struct SecretBoxPrimitive {
    cipher: XSalsa20Poly1305,
}

impl SecretBoxPrimitive {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: XSalsa20Poly1305::new(GenericArray::from_slice(key)),
        }
    }
}

impl Primitive for SecretBoxPrimitive {
    fn seal(&self, plaintext: &[u8], nonce: &NonceBytes) -> Result<Vec<u8>, CabinetError> {
        self.cipher
            .encrypt(GenericArray::from_slice(nonce), plaintext)
            .map_err(|_| CabinetError::CryptoFailure)
    }

    fn open(&self, ciphertext: &[u8], nonce: &NonceBytes) -> Result<Vec<u8>, CabinetError> {
        self.cipher
            .decrypt(GenericArray::from_slice(nonce), ciphertext)
            .map_err(|_| CabinetError::CryptoFailure)
    }
}

/// Curve25519 box between our secret key and a peer's public key.
pub struct BoxPrimitive {
    salsa_box: SalsaBox,
}

impl BoxPrimitive {
    pub fn new(secret_key: &[u8; KEY_LEN], peer_public_key: &[u8; KEY_LEN]) -> Self {
        let secret = SecretKey::from(*secret_key);
        let public = PublicKey::from(*peer_public_key);
        Self {
            salsa_box: SalsaBox::new(&public, &secret),
        }
    }
}

impl Primitive for BoxPrimitive {
    fn seal(&self, plaintext: &[u8], nonce: &NonceBytes) -> Result<Vec<u8>, CabinetError> {
        self.salsa_box
            .encrypt(GenericArray::from_slice(nonce), plaintext)
            .map_err(|_| CabinetError::CryptoFailure)
    }

    fn open(&self, ciphertext: &[u8], nonce: &NonceBytes) -> Result<Vec<u8>, CabinetError> {
        self.salsa_box
            .decrypt(GenericArray::from_slice(nonce), ciphertext)
            .map_err(|_| CabinetError::CryptoFailure)
    }
}

/// Public key belonging to `secret_key`.
pub fn derive_public(secret_key: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    *SecretKey::from(*secret_key).public_key().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONCE: NonceBytes = [7u8; NONCE_LEN];

    #[test]
    fn secretbox_round_trip() {
        let p = SecretBoxPrimitive::new(&[0x42; KEY_LEN]);
        let sealed = p.seal(b"123-45-6789", &NONCE).unwrap();
        // Poly1305 tag is 16 bytes.
        assert_eq!(sealed.len(), 11 + 16);
        assert_eq!(p.open(&sealed, &NONCE).unwrap(), b"123-45-6789");
    }

    #[test]
    fn secretbox_wrong_key_fails() {
        let sealed = SecretBoxPrimitive::new(&[1; KEY_LEN]).seal(b"secret", &NONCE).unwrap();
        let result = SecretBoxPrimitive::new(&[2; KEY_LEN]).open(&sealed, &NONCE);
        assert!(matches!(result, Err(CabinetError::CryptoFailure)));
    }

    #[test]
    fn secretbox_wrong_nonce_fails() {
        let p = SecretBoxPrimitive::new(&[1; KEY_LEN]);
        let sealed = p.seal(b"secret", &NONCE).unwrap();
        assert!(p.open(&sealed, &[8u8; NONCE_LEN]).is_err());
    }

    #[test]
    fn box_peers_agree() {
        let sk_a = [0x11; KEY_LEN];
        let sk_b = [0x22; KEY_LEN];
        let a = BoxPrimitive::new(&sk_a, &derive_public(&sk_b));
        let b = BoxPrimitive::new(&sk_b, &derive_public(&sk_a));

        let sealed = a.seal(b"hello bob", &NONCE).unwrap();
        assert_eq!(b.open(&sealed, &NONCE).unwrap(), b"hello bob");
    }

    #[test]
    fn box_third_party_cannot_open() {
        let sk_a = [0x11; KEY_LEN];
        let sk_b = [0x22; KEY_LEN];
        let sk_c = [0x33; KEY_LEN];
        let a = BoxPrimitive::new(&sk_a, &derive_public(&sk_b));
        let c = BoxPrimitive::new(&sk_c, &derive_public(&sk_a));

        let sealed = a.seal(b"hello bob", &NONCE).unwrap();
        assert!(c.open(&sealed, &NONCE).is_err());
    }

    #[test]
    fn tampered_box_fails_auth() {
        let sk_a = [0x11; KEY_LEN];
        let sk_b = [0x22; KEY_LEN];
        let a = BoxPrimitive::new(&sk_a, &derive_public(&sk_b));
        let mut sealed = a.seal(b"tamper me", &NONCE).unwrap();
        sealed[0] ^= 0xFF;
        assert!(a.open(&sealed, &NONCE).is_err());
    }

    #[test]
    fn derive_public_is_not_identity() {
        let sk = [0x55; KEY_LEN];
        assert_ne!(derive_public(&sk), sk);
    }
}
