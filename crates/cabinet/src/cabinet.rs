//! A single configured encryption context.

use std::fmt;
use std::str::FromStr;

use common::CabinetError;
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, warn};

use crate::codec::{self, NONCE_LEN};
use crate::config::KeyMaterial;
use crate::message::{Ciphertext, Message, Plaintext};
use crate::primitive::{BoxPrimitive, NonceBytes, Primitive, SecretBoxPrimitive};

/// Cabinet tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CabinetKind {
    /// Secretbox with a shared key.
    Sym,
    /// Box between our secret key and a peer public key.
    Asy,
}

impl CabinetKind {
    pub const ALL: [CabinetKind; 2] = [CabinetKind::Sym, CabinetKind::Asy];

    pub fn as_str(self) -> &'static str {
        match self {
            CabinetKind::Sym => "sym",
            CabinetKind::Asy => "asy",
        }
    }
}

impl fmt::Display for CabinetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CabinetKind {
    type Err = CabinetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sym" => Ok(CabinetKind::Sym),
            "asy" => Ok(CabinetKind::Asy),
            other => Err(CabinetError::UnknownCabinetType(other.to_owned())),
        }
    }
}

/// Ciphertext and the nonce it was sealed under, before token formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedParts {
    pub ciphertext: Vec<u8>,
    pub nonce: NonceBytes,
}

impl SealedParts {
    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }

    pub fn nonce_hex(&self) -> String {
        hex::encode(self.nonce)
    }

    /// Render as `<hex-ciphertext>*<hex-nonce>`.
    pub fn to_token(&self) -> String {
        codec::format(&self.ciphertext_hex(), &self.nonce_hex())
    }
}

/// One encryption context bound to a key or keypair.
///
/// Only exists once its key material has been validated; never mutated
/// afterwards, so it is shared across requests behind an `Arc`.
pub struct Cabinet {
    kind: CabinetKind,
    primitive: Box<dyn Primitive>,
}

impl fmt::Debug for Cabinet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cabinet").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl Cabinet {
    /// Bind the primitive matching `material`.
    pub fn new(material: &KeyMaterial) -> Self {
        let (kind, primitive): (CabinetKind, Box<dyn Primitive>) = match material {
            KeyMaterial::Symmetric { key } => {
                (CabinetKind::Sym, Box::new(SecretBoxPrimitive::new(key.as_bytes())))
            }
            KeyMaterial::Asymmetric {
                secret_key,
                public_key,
            } => (
                CabinetKind::Asy,
                Box::new(BoxPrimitive::new(secret_key.as_bytes(), public_key.as_bytes())),
            ),
        };
        debug!(cabinet = %kind, "cabinet ready");
        Self { kind, primitive }
    }

    /// Build a cabinet around an arbitrary primitive.
    pub fn with_primitive(kind: CabinetKind, primitive: Box<dyn Primitive>) -> Self {
        Self { kind, primitive }
    }

    pub fn kind(&self) -> CabinetKind {
        self.kind
    }

    /// Seal `message` under a fresh random nonce and return the token.
    ///
    /// # Errors
    ///
    /// [`CabinetError::EmptyMessage`] for an empty message.
    pub fn encrypt(&self, message: &Message) -> Result<String, CabinetError> {
        self.seal_to_token(message)
    }

    pub fn seal_to_token(&self, message: &Message) -> Result<String, CabinetError> {
        self.seal_to_parts(message).map(|parts| parts.to_token())
    }

    /// Seal `message` and return ciphertext and nonce separately.
    pub fn seal_to_parts(&self, message: &Message) -> Result<SealedParts, CabinetError> {
        if message.is_empty() {
            return Err(CabinetError::EmptyMessage);
        }
        self.seal(&message.to_bytes()?)
    }

    /// Open `input`.
    ///
    /// An explicit `nonce` (hex) takes precedence: the input is then treated as
    /// bare ciphertext and never parsed for an embedded nonce. Without one, a
    /// textual input must be a full token.
    ///
    /// # Errors
    ///
    /// - [`CabinetError::EmptyMessage`] for empty input.
    /// - [`CabinetError::MissingNonce`] when no nonce is supplied or embedded.
    /// - [`CabinetError::Malformed`] for non-hex ciphertext or a nonce of the
    ///   wrong length.
    /// - [`CabinetError::CryptoFailure`] when authentication fails.
    pub fn decrypt(
        &self,
        input: &Ciphertext,
        nonce: Option<&str>,
    ) -> Result<Plaintext, CabinetError> {
        if input.is_empty() {
            return Err(CabinetError::EmptyMessage);
        }
        let explicit = nonce.filter(|n| !n.is_empty());

        let (ciphertext, nonce_hex) = match (input, explicit) {
            (Ciphertext::Text(text), Some(n)) => (decode_ciphertext(text)?, n),
            (Ciphertext::Text(text), None) => match codec::parse(text) {
                (body, Some(n)) => (decode_ciphertext(body)?, n),
                (_, None) => return Err(CabinetError::MissingNonce),
            },
            (Ciphertext::Bytes(bytes), Some(n)) => (bytes.clone(), n),
            (Ciphertext::Bytes(_), None) => return Err(CabinetError::MissingNonce),
        };

        self.open(&ciphertext, &decode_nonce(nonce_hex)?)
    }

    /// Open ciphertext and nonce produced by [`Cabinet::seal_to_parts`].
    pub fn open_parts(&self, parts: &SealedParts) -> Result<Plaintext, CabinetError> {
        if parts.ciphertext.is_empty() {
            return Err(CabinetError::EmptyMessage);
        }
        self.open(&parts.ciphertext, &parts.nonce)
    }

    fn seal(&self, plaintext: &[u8]) -> Result<SealedParts, CabinetError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let ciphertext = self.primitive.seal(plaintext, &nonce)?;
        Ok(SealedParts { ciphertext, nonce })
    }

    fn open(&self, ciphertext: &[u8], nonce: &NonceBytes) -> Result<Plaintext, CabinetError> {
        self.primitive
            .open(ciphertext, nonce)
            .map(Plaintext::new)
            .map_err(|e| {
                warn!(cabinet = %self.kind, error = %e, "decryption failed");
                e
            })
    }
}

fn decode_ciphertext(hex_str: &str) -> Result<Vec<u8>, CabinetError> {
    hex::decode(hex_str).map_err(|_| CabinetError::Malformed("ciphertext is not hex".into()))
}

fn decode_nonce(hex_str: &str) -> Result<NonceBytes, CabinetError> {
    let mut nonce = [0u8; NONCE_LEN];
    hex::decode_to_slice(hex_str, &mut nonce).map_err(|_| {
        CabinetError::Malformed(format!(
            "nonce must be {} hex characters",
            codec::NONCE_HEX_LEN
        ))
    })?;
    Ok(nonce)
}
