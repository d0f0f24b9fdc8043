//! Values that flow in and out of a cabinet.

use common::CabinetError;
use serde::{de::DeserializeOwned, Serialize};

/// Plaintext handed to `encrypt`.
///
/// Structured values are sealed as compact JSON with their keys in the order
/// they were provided.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Bytes(Vec<u8>),
    Structured(serde_json::Value),
}

impl Message {
    /// Build a structured message from any serialisable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, CabinetError> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| CabinetError::Malformed(format!("unserialisable message: {e}")))
    }

    /// `true` for `""`, no bytes, or JSON `null`.
    pub fn is_empty(&self) -> bool {
        match self {
            Message::Text(s) => s.is_empty(),
            Message::Bytes(b) => b.is_empty(),
            Message::Structured(v) => v.is_null(),
        }
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, CabinetError> {
        match self {
            Message::Text(s) => Ok(s.as_bytes().to_vec()),
            Message::Bytes(b) => Ok(b.clone()),
            Message::Structured(v) => serde_json::to_vec(v)
                .map_err(|e| CabinetError::Malformed(format!("unserialisable message: {e}"))),
        }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_owned())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<Vec<u8>> for Message {
    fn from(b: Vec<u8>) -> Self {
        Message::Bytes(b)
    }
}

impl From<&[u8]> for Message {
    fn from(b: &[u8]) -> Self {
        Message::Bytes(b.to_vec())
    }
}

impl From<serde_json::Value> for Message {
    /// A JSON string is sealed as its raw text, not as a quoted JSON literal.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => Message::Text(s),
            other => Message::Structured(other),
        }
    }
}

/// Input handed to `decrypt`: a token / hex string, or raw ciphertext bytes.
///
/// Raw bytes are never parsed for an embedded nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ciphertext {
    Text(String),
    Bytes(Vec<u8>),
}

impl Ciphertext {
    pub fn is_empty(&self) -> bool {
        match self {
            Ciphertext::Text(s) => s.is_empty(),
            Ciphertext::Bytes(b) => b.is_empty(),
        }
    }
}

impl From<&str> for Ciphertext {
    fn from(s: &str) -> Self {
        Ciphertext::Text(s.to_owned())
    }
}

impl From<String> for Ciphertext {
    fn from(s: String) -> Self {
        Ciphertext::Text(s)
    }
}

impl From<&String> for Ciphertext {
    fn from(s: &String) -> Self {
        Ciphertext::Text(s.clone())
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(b: Vec<u8>) -> Self {
        Ciphertext::Bytes(b)
    }
}

impl From<&[u8]> for Ciphertext {
    fn from(b: &[u8]) -> Self {
        Ciphertext::Bytes(b.to_vec())
    }
}

/// Opened plaintext bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaintext(Vec<u8>);

impl Plaintext {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Borrow as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`CabinetError::Malformed`] if the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Result<&str, CabinetError> {
        std::str::from_utf8(&self.0)
            .map_err(|_| CabinetError::Malformed("plaintext is not valid UTF-8".into()))
    }

    pub fn into_string(self) -> Result<String, CabinetError> {
        String::from_utf8(self.0)
            .map_err(|_| CabinetError::Malformed("plaintext is not valid UTF-8".into()))
    }

    /// Deserialise a plaintext that was sealed from a structured message.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CabinetError> {
        serde_json::from_slice(&self.0)
            .map_err(|e| CabinetError::Malformed(format!("plaintext is not JSON: {e}")))
    }
}
