//! Request and response types exchanged with the reference host service.
//!
//! All bodies are JSON. Cabinet selection uses the optional `type` field
//! (`"sym"` or `"asy"`), which may be omitted when only one cabinet is configured.

use serde::{Deserialize, Serialize};

use crate::error::CabinetError;

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
///
/// `message` is either a JSON string (encrypted as-is) or any other JSON value,
/// which is serialised to compact JSON before sealing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    pub message: serde_json::Value,
    /// Explicit cabinet tag.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cabinet: Option<String>,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// `<hex-ciphertext>*<hex-nonce>`
    pub token: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// A full token, or bare hex ciphertext when `nonce` is given.
    pub ciphertext: String,
    /// Hex nonce. When present, any nonce embedded in `ciphertext` is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cabinet: Option<String>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"missing_nonce"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&CabinetError> for ErrorResponse {
    fn from(err: &CabinetError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Tags of the configured cabinets, e.g. `["asy", "sym"]`.
    pub cabinets: Vec<String>,
    /// Whether requests may omit the cabinet type.
    pub direct: bool,
}
