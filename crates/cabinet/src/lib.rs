//! Cabinet registry and dispatch.
//!
//! A *cabinet* is one configured encryption context: a secretbox key (`sym`)
//! or a box keypair (`asy`). A [`Registry`] holds one or two of them, built and
//! validated from a [`CabinetConfig`]; a [`Dispatcher`] routes each call to the
//! right cabinet; an [`Attachment`] exposes the dispatcher to every request.
//!
//! # Token format
//!
//! ```text
//! <hex(ciphertext)>*<hex(nonce)>      nonce = 24 bytes = 48 hex chars
//! ```
//!
//! # Invariants
//!
//! - Every encrypt call draws a fresh random nonce; callers cannot supply one.
//! - Key material is validated at construction, never at use.
//! - No key material, plaintext or ciphertext is written to logs.

pub mod attach;
pub mod cabinet;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod keygen;
pub mod message;
pub mod primitive;
pub mod registry;

pub use attach::{Attachment, Bindings, DEFAULT_NAME};
pub use cabinet::{Cabinet, CabinetKind, SealedParts};
pub use config::{AsymmetricConfig, CabinetConfig, SymmetricConfig};
pub use dispatch::{CabinetHandle, DispatchCall, Dispatcher, Outcome};
pub use keygen::{generate_asymmetric_keypair, generate_symmetric_key};
pub use message::{Ciphertext, Message, Plaintext};
pub use registry::Registry;

pub use common::{CabinetError, ConfigError};
