//! Common types, protocol definitions, and errors shared across `cabinet-noir` crates.

pub mod error;
pub mod protocol;

pub use error::{CabinetError, ConfigError};
