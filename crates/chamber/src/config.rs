//! Configuration loading and validation for the chamber service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.
//! Key material is checked again, in full, when the cabinet registry is built.

use anyhow::{Context, Result};
use cabinet::{AsymmetricConfig, CabinetConfig, SymmetricConfig};
use serde::Deserialize;

/// Validated chamber service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Name the cabinet dispatcher is attached under on each request.
    #[serde(default = "default_attach_name")]
    pub attach_name: String,

    /// Hex secretbox key. Enables the `sym` cabinet.
    #[serde(default)]
    pub symmetric_key: Option<String>,

    /// Hex X25519 secret key. Enables the `asy` cabinet together with
    /// `ASYMMETRIC_PUBLIC_KEY`.
    #[serde(default)]
    pub asymmetric_private_key: Option<String>,

    /// Hex X25519 public key of the peer.
    #[serde(default)]
    pub asymmetric_public_key: Option<String>,

    /// OTLP endpoint. Spans are exported only when set.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_attach_name() -> String {
    cabinet::DEFAULT_NAME.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are never printed.
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("attach_name", &self.attach_name)
            .field("symmetric_key", &self.symmetric_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "asymmetric_private_key",
                &self.asymmetric_private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("asymmetric_public_key", &self.asymmetric_public_key)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or no cabinet key is set.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The cabinet configuration object described by the key variables.
    ///
    /// The asymmetric section is present if either of its keys is set, so a
    /// half-configured keypair is reported rather than silently skipped.
    pub fn cabinet_config(&self) -> CabinetConfig {
        CabinetConfig {
            symmetric: self.symmetric_key.as_ref().map(|key| SymmetricConfig {
                key: Some(key.clone()),
            }),
            asymmetric: (self.asymmetric_private_key.is_some()
                || self.asymmetric_public_key.is_some())
            .then(|| AsymmetricConfig {
                private_key: self.asymmetric_private_key.clone(),
                public_key: self.asymmetric_public_key.clone(),
            }),
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.attach_name, "ATTACH_NAME")?;

        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.cabinet_config().is_empty() {
            anyhow::bail!(
                "at least one of SYMMETRIC_KEY or ASYMMETRIC_PRIVATE_KEY/ASYMMETRIC_PUBLIC_KEY is required"
            );
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            listen_port: default_listen_port(),
            attach_name: default_attach_name(),
            symmetric_key: Some("00".repeat(32)),
            asymmetric_private_key: None,
            asymmetric_public_key: None,
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_attach_name(), "bc");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_symmetric_only() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn validate_rejects_no_keys() {
        let cfg = Config {
            symmetric_key: None,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_attach_name() {
        let cfg = Config {
            attach_name: " ".into(),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn half_keypair_still_produces_asymmetric_section() {
        let cfg = Config {
            symmetric_key: None,
            asymmetric_public_key: Some("ab".into()),
            ..base()
        };
        let cabinets = cfg.cabinet_config();
        assert!(cabinets.symmetric.is_none());
        let asy = cabinets.asymmetric.unwrap();
        assert!(asy.private_key.is_none());
        assert_eq!(asy.public_key.as_deref(), Some("ab"));
    }

    #[test]
    fn debug_redacts_keys() {
        let cfg = Config {
            symmetric_key: Some("deadbeef".into()),
            ..base()
        };
        let out = format!("{cfg:?}");
        assert!(!out.contains("deadbeef"));
        assert!(out.contains("REDACTED"));
    }
}
