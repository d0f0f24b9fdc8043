//! Common error types shared across crates.

use thiserror::Error;

/// Reasons a cabinet configuration is rejected at construction time.
///
/// Any of these aborts the whole registry build; no partially-initialised
/// registry is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither a `symmetric` nor an `asymmetric` section was supplied.
    #[error("Configuration objects required for middleware.")]
    Missing,

    #[error("Symmetric key cabinet cannot be used without secret key.")]
    MissingSymmetricKey,

    #[error("Asymmetric key cabinet cannot be used without private (secret) key.")]
    MissingPrivateKey,

    #[error("Asymmetric key cabinet cannot be used without public key.")]
    MissingPublicKey,

    /// A key string is not valid hex.
    #[error("The provided string doesn't look like hex data")]
    NotHex,

    /// A key decoded to the wrong number of bytes.
    #[error("invalid {field} length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// The secret key derives the very public key it was paired with.
    #[error("Invalid asymmetric key cabinet initialization: bound keypair.")]
    BoundKeypair,
}

/// Top-level error type for every cabinet operation.
///
/// Variants map to HTTP status codes returned to callers:
/// - caller mistakes and authentication failures → 400
/// - [`CabinetError::Configuration`] and [`CabinetError::Internal`] → 500
#[derive(Debug, Error)]
pub enum CabinetError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Encrypt or decrypt was invoked without a message.
    #[error("Unable to operate on an empty message.")]
    EmptyMessage,

    /// No cabinet type was given while more than one cabinet is configured.
    #[error("Please specify 'sym' (symmetric) or 'asy' (asymmetric) as the type.")]
    AmbiguousCabinetType,

    /// The given cabinet type is not a recognised tag.
    #[error("unknown cabinet type '{0}': expected 'sym' or 'asy'")]
    UnknownCabinetType(String),

    /// The tag is recognised but no such cabinet was configured.
    #[error("cabinet '{0}' is not configured")]
    CabinetNotConfigured(String),

    /// Neither an explicit nor an embedded nonce was available.
    #[error("Unable to decrypt without nonce.")]
    MissingNonce,

    /// The primitive rejected the operation (wrong key, tampered data, wrong nonce).
    #[error("aead operation failed")]
    CryptoFailure,

    /// Input that the hex/JSON/UTF-8 codecs cannot decode.
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CabinetError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            CabinetError::Configuration(_) | CabinetError::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Short machine-readable code (e.g. `"missing_nonce"`).
    pub fn code(&self) -> &'static str {
        match self {
            CabinetError::Configuration(_) => "configuration_error",
            CabinetError::EmptyMessage => "empty_message",
            CabinetError::AmbiguousCabinetType => "ambiguous_cabinet_type",
            CabinetError::UnknownCabinetType(_) => "unknown_cabinet_type",
            CabinetError::CabinetNotConfigured(_) => "cabinet_not_configured",
            CabinetError::MissingNonce => "missing_nonce",
            CabinetError::CryptoFailure => "crypto_failure",
            CabinetError::Malformed(_) => "malformed_input",
            CabinetError::Internal(_) => "internal_error",
        }
    }
}
