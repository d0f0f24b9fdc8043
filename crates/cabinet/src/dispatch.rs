//! Routing encrypt/decrypt calls to a cabinet.
//!
//! Two call shapes are supported:
//!
//! - **Direct**: [`Dispatcher::encrypt`] / [`Dispatcher::decrypt`], valid only
//!   when the registry holds exactly one cabinet.
//! - **Two-phase**: [`Dispatcher::resolve`] selects a cabinet eagerly and
//!   returns a [`CabinetHandle`]; the handle performs the crypto when called.
//!
//! Every call can be delivered three ways over the same validation, selection
//! and execution path: a plain `Result`, a completion callback (`*_then`), or a
//! future (`*_async`) that runs the primitive on the blocking pool.

use std::sync::Arc;

use common::CabinetError;

use crate::cabinet::{Cabinet, CabinetKind, SealedParts};
use crate::message::{Ciphertext, Message, Plaintext};
use crate::registry::Registry;

/// One encrypt or decrypt request, not yet routed.
#[derive(Debug, Clone)]
pub enum DispatchCall {
    Encrypt {
        cabinet: Option<String>,
        message: Message,
    },
    Decrypt {
        cabinet: Option<String>,
        input: Ciphertext,
        nonce: Option<String>,
    },
}

impl DispatchCall {
    pub fn encrypt(message: impl Into<Message>) -> Self {
        DispatchCall::Encrypt {
            cabinet: None,
            message: message.into(),
        }
    }

    pub fn decrypt(input: impl Into<Ciphertext>, nonce: Option<String>) -> Self {
        DispatchCall::Decrypt {
            cabinet: None,
            input: input.into(),
            nonce,
        }
    }

    /// Target an explicit cabinet tag.
    pub fn on(mut self, tag: impl Into<String>) -> Self {
        match &mut self {
            DispatchCall::Encrypt { cabinet, .. } | DispatchCall::Decrypt { cabinet, .. } => {
                *cabinet = Some(tag.into());
            }
        }
        self
    }

    fn cabinet(&self) -> Option<&str> {
        match self {
            DispatchCall::Encrypt { cabinet, .. } | DispatchCall::Decrypt { cabinet, .. } => {
                cabinet.as_deref()
            }
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            DispatchCall::Encrypt { message, .. } => message.is_empty(),
            DispatchCall::Decrypt { input, .. } => input.is_empty(),
        }
    }
}

/// Result of a dispatched call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Token(String),
    Plaintext(Plaintext),
}

impl Outcome {
    pub fn into_token(self) -> Option<String> {
        match self {
            Outcome::Token(t) => Some(t),
            Outcome::Plaintext(_) => None,
        }
    }

    pub fn into_plaintext(self) -> Option<Plaintext> {
        match self {
            Outcome::Plaintext(p) => Some(p),
            Outcome::Token(_) => None,
        }
    }
}

/// A resolved cabinet, ready to execute calls.
#[derive(Debug, Clone)]
pub struct CabinetHandle {
    cabinet: Arc<Cabinet>,
}

impl CabinetHandle {
    fn new(cabinet: Arc<Cabinet>) -> Self {
        Self { cabinet }
    }

    pub fn kind(&self) -> CabinetKind {
        self.cabinet.kind()
    }

    /// Seal `message` into a token.
    pub fn encrypt(&self, message: impl Into<Message>) -> Result<String, CabinetError> {
        self.cabinet.seal_to_token(&message.into())
    }

    /// Seal `message`, returning ciphertext and nonce separately.
    pub fn seal_to_parts(&self, message: impl Into<Message>) -> Result<SealedParts, CabinetError> {
        self.cabinet.seal_to_parts(&message.into())
    }

    /// Open a token, or bare ciphertext with an explicit hex `nonce`.
    pub fn decrypt(
        &self,
        input: impl Into<Ciphertext>,
        nonce: Option<&str>,
    ) -> Result<Plaintext, CabinetError> {
        self.cabinet.decrypt(&input.into(), nonce)
    }

    pub fn open_parts(&self, parts: &SealedParts) -> Result<Plaintext, CabinetError> {
        self.cabinet.open_parts(parts)
    }

    /// Like [`CabinetHandle::encrypt`], delivering the result to `done`.
    pub fn encrypt_then<F>(&self, message: impl Into<Message>, done: F)
    where
        F: FnOnce(Result<String, CabinetError>),
    {
        done(self.encrypt(message))
    }

    pub fn decrypt_then<F>(&self, input: impl Into<Ciphertext>, nonce: Option<&str>, done: F)
    where
        F: FnOnce(Result<Plaintext, CabinetError>),
    {
        done(self.decrypt(input, nonce))
    }

    /// Seal on the blocking pool.
    pub async fn encrypt_async(&self, message: impl Into<Message>) -> Result<String, CabinetError> {
        let cabinet = Arc::clone(&self.cabinet);
        let message = message.into();
        offload(move || cabinet.seal_to_token(&message)).await
    }

    /// Open on the blocking pool.
    pub async fn decrypt_async(
        &self,
        input: impl Into<Ciphertext>,
        nonce: Option<String>,
    ) -> Result<Plaintext, CabinetError> {
        let cabinet = Arc::clone(&self.cabinet);
        let input = input.into();
        offload(move || cabinet.decrypt(&input, nonce.as_deref())).await
    }

    fn execute(&self, call: DispatchCall) -> Result<Outcome, CabinetError> {
        match call {
            DispatchCall::Encrypt { message, .. } => {
                self.cabinet.seal_to_token(&message).map(Outcome::Token)
            }
            DispatchCall::Decrypt { input, nonce, .. } => self
                .cabinet
                .decrypt(&input, nonce.as_deref())
                .map(Outcome::Plaintext),
        }
    }
}

/// Public encrypt/decrypt surface over a [`Registry`].
///
/// Cheap to clone; all clones share the same immutable cabinets.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_direct(&self) -> bool {
        self.registry.is_direct()
    }

    /// Pick the cabinet a call targets.
    ///
    /// # Errors
    ///
    /// - [`CabinetError::UnknownCabinetType`] if `tag` is not `sym` or `asy`.
    /// - [`CabinetError::CabinetNotConfigured`] if `tag` names an absent cabinet.
    /// - [`CabinetError::AmbiguousCabinetType`] if `tag` is omitted outside
    ///   direct mode.
    pub fn select(&self, tag: Option<&str>) -> Result<CabinetHandle, CabinetError> {
        let cabinet = match tag {
            Some(tag) => {
                let kind: CabinetKind = tag.parse()?;
                self.registry
                    .get(kind)
                    .ok_or_else(|| CabinetError::CabinetNotConfigured(kind.to_string()))?
            }
            None => self
                .registry
                .sole()
                .ok_or(CabinetError::AmbiguousCabinetType)?,
        };
        Ok(CabinetHandle::new(Arc::clone(cabinet)))
    }

    /// First phase of an indirect call: resolve `tag` now, execute later.
    pub fn resolve(&self, tag: &str) -> Result<CabinetHandle, CabinetError> {
        self.select(Some(tag))
    }

    /// Direct-mode encrypt.
    pub fn encrypt(&self, message: impl Into<Message>) -> Result<String, CabinetError> {
        self.dispatch(DispatchCall::encrypt(message))
            .and_then(expect_token)
    }

    /// Direct-mode decrypt.
    pub fn decrypt(
        &self,
        input: impl Into<Ciphertext>,
        nonce: Option<&str>,
    ) -> Result<Plaintext, CabinetError> {
        self.dispatch(DispatchCall::decrypt(input, nonce.map(str::to_owned)))
            .and_then(expect_plaintext)
    }

    /// Direct-mode seal returning ciphertext and nonce separately.
    pub fn seal_to_parts(&self, message: impl Into<Message>) -> Result<SealedParts, CabinetError> {
        let message = message.into();
        if message.is_empty() {
            return Err(CabinetError::EmptyMessage);
        }
        self.select(None)?.seal_to_parts(message)
    }

    pub fn encrypt_then<F>(&self, message: impl Into<Message>, done: F)
    where
        F: FnOnce(Result<String, CabinetError>),
    {
        done(self.encrypt(message))
    }

    pub fn decrypt_then<F>(&self, input: impl Into<Ciphertext>, nonce: Option<&str>, done: F)
    where
        F: FnOnce(Result<Plaintext, CabinetError>),
    {
        done(self.decrypt(input, nonce))
    }

    pub async fn encrypt_async(&self, message: impl Into<Message>) -> Result<String, CabinetError> {
        self.dispatch_async(DispatchCall::encrypt(message))
            .await
            .and_then(expect_token)
    }

    pub async fn decrypt_async(
        &self,
        input: impl Into<Ciphertext>,
        nonce: Option<String>,
    ) -> Result<Plaintext, CabinetError> {
        self.dispatch_async(DispatchCall::decrypt(input, nonce))
            .await
            .and_then(expect_plaintext)
    }

    /// Validate, route and execute `call`.
    pub fn dispatch(&self, call: DispatchCall) -> Result<Outcome, CabinetError> {
        let handle = self.route(&call)?;
        handle.execute(call)
    }

    /// [`Dispatcher::dispatch`] with the result, success or failure, handed
    /// to `done` on the calling thread.
    pub fn dispatch_then<F>(&self, call: DispatchCall, done: F)
    where
        F: FnOnce(Result<Outcome, CabinetError>),
    {
        done(self.dispatch(call))
    }

    /// [`Dispatcher::dispatch`] with the primitive call run on the blocking
    /// pool. Validation and routing happen before anything is offloaded.
    pub async fn dispatch_async(&self, call: DispatchCall) -> Result<Outcome, CabinetError> {
        let handle = self.route(&call)?;
        offload(move || handle.execute(call)).await
    }

    fn route(&self, call: &DispatchCall) -> Result<CabinetHandle, CabinetError> {
        if call.is_empty() {
            return Err(CabinetError::EmptyMessage);
        }
        self.select(call.cabinet())
    }
}

fn expect_token(outcome: Outcome) -> Result<String, CabinetError> {
    outcome
        .into_token()
        .ok_or_else(|| CabinetError::Internal("encrypt produced plaintext".into()))
}

fn expect_plaintext(outcome: Outcome) -> Result<Plaintext, CabinetError> {
    outcome
        .into_plaintext()
        .ok_or_else(|| CabinetError::Internal("decrypt produced a token".into()))
}

async fn offload<T, F>(work: F) -> Result<T, CabinetError>
where
    F: FnOnce() -> Result<T, CabinetError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CabinetError::Internal(format!("crypto task failed: {e}")))?
}
