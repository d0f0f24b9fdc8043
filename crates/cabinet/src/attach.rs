//! Per-request attachment of dispatchers.
//!
//! Each [`Attachment`] binds one [`Dispatcher`] under a name into the request's
//! extensions. Several attachments stack on the same request, so a handler can
//! encrypt with one peer's cabinet and decrypt with another's:
//!
//! ```ignore
//! let router = Router::new()
//!     .route("/relay", post(relay))
//!     .layer(axum::middleware::from_fn_with_state(outbound, cabinet::attach::middleware))
//!     .layer(axum::middleware::from_fn_with_state(inbound, cabinet::attach::middleware));
//!
//! async fn relay(Extension(bindings): Extension<Bindings>) { /* bindings.get("bc") */ }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Extensions,
    middleware::Next,
    response::Response,
};
use common::CabinetError;
use tracing::trace;

use crate::config::CabinetConfig;
use crate::dispatch::Dispatcher;
use crate::registry::Registry;

/// Name used when an attachment is not given one.
pub const DEFAULT_NAME: &str = "bc";

/// Dispatchers bound to one request, by name.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    by_name: HashMap<Arc<str>, Dispatcher>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Dispatcher> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(|n| &**n)
    }
}

/// A dispatcher plus the name it is exposed under.
#[derive(Debug, Clone)]
pub struct Attachment {
    name: Arc<str>,
    dispatcher: Dispatcher,
}

impl Attachment {
    /// Attach `dispatcher` under `name`, or [`DEFAULT_NAME`].
    pub fn new(dispatcher: Dispatcher, name: Option<&str>) -> Self {
        Self {
            name: Arc::from(name.unwrap_or(DEFAULT_NAME)),
            dispatcher,
        }
    }

    /// Build the registry for `config` and attach it.
    ///
    /// Key material is validated here, before any request is served.
    pub fn from_config(config: &CabinetConfig, name: Option<&str>) -> Result<Self, CabinetError> {
        Ok(Self::new(Dispatcher::new(Registry::build(config)?), name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Install the dispatcher into `extensions`.
    ///
    /// Other names already bound are kept; the same name is replaced.
    pub fn bind(&self, extensions: &mut Extensions) {
        if extensions.get::<Bindings>().is_none() {
            extensions.insert(Bindings::default());
        }
        if let Some(bindings) = extensions.get_mut::<Bindings>() {
            bindings
                .by_name
                .insert(Arc::clone(&self.name), self.dispatcher.clone());
        }
        trace!(name = %self.name, "cabinet attached");
    }
}

/// Axum middleware: bind the attachment to the request and continue.
///
/// Use with [`axum::middleware::from_fn_with_state`].
pub async fn middleware(
    State(attachment): State<Attachment>,
    mut request: Request,
    next: Next,
) -> Response {
    attachment.bind(request.extensions_mut());
    next.run(request).await
}
