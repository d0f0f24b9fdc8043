//! Shared application state injected into every Axum handler.

use cabinet::{Attachment, Dispatcher};

/// Application state shared across all request handlers.
///
/// Cloned per request; the attachment holds its registry behind an `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Dispatcher and the name handlers look it up under.
    pub attachment: Attachment,
}

impl AppState {
    pub fn new(attachment: Attachment) -> Self {
        Self { attachment }
    }

    /// Name the dispatcher is bound under in request extensions.
    pub fn attach_name(&self) -> &str {
        self.attachment.name()
    }

    /// The dispatcher itself, for routes that do not go through bindings.
    pub fn dispatcher(&self) -> &Dispatcher {
        self.attachment.dispatcher()
    }
}
