//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use cabinet::{
    generate_asymmetric_keypair, generate_symmetric_key, Bindings, CabinetError, DispatchCall,
    Dispatcher, Outcome,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse,
};
use tracing::warn;

use super::state::AppState;

/// `POST /encrypt`: seal `message` into a `hex(ct)*hex(nonce)` token.
///
/// `type` selects the cabinet and is required only when both are configured.
pub async fn encrypt(
    State(state): State<AppState>,
    Extension(bindings): Extension<Bindings>,
    Json(req): Json<EncryptRequest>,
) -> Response {
    let dispatcher = match bound(&state, &bindings) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let mut call = DispatchCall::encrypt(req.message);
    if let Some(tag) = req.cabinet {
        call = call.on(tag);
    }

    match dispatcher.dispatch_async(call).await {
        Ok(Outcome::Token(token)) => (StatusCode::OK, Json(EncryptResponse { token })).into_response(),
        Ok(Outcome::Plaintext(_)) => {
            error_response(&CabinetError::Internal("encrypt produced plaintext".into()))
        }
        Err(e) => error_response(&e),
    }
}

/// `POST /decrypt`: open a token, or a bare ciphertext plus `nonce`.
///
/// The plaintext is returned as UTF-8 text; structured messages come back as
/// their JSON serialisation.
pub async fn decrypt(
    State(state): State<AppState>,
    Extension(bindings): Extension<Bindings>,
    Json(req): Json<DecryptRequest>,
) -> Response {
    let dispatcher = match bound(&state, &bindings) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let mut call = DispatchCall::decrypt(req.ciphertext, req.nonce);
    if let Some(tag) = req.cabinet {
        call = call.on(tag);
    }

    let plaintext = match dispatcher.dispatch_async(call).await {
        Ok(Outcome::Plaintext(p)) => p,
        Ok(Outcome::Token(_)) => {
            return error_response(&CabinetError::Internal("decrypt produced a token".into()))
        }
        Err(e) => return error_response(&e),
    };

    match plaintext.into_string() {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /keys/symmetric`: a fresh secretbox key.
pub async fn symmetric_key() -> impl IntoResponse {
    Json(generate_symmetric_key())
}

/// `POST /keys/asymmetric`: a fresh X25519 keypair.
pub async fn asymmetric_keypair() -> impl IntoResponse {
    Json(generate_asymmetric_keypair())
}

/// `GET /health`: liveness check.
///
/// The registry is validated at startup, so a running process is always `ok`;
/// the body reports which cabinets are loaded.
pub async fn health(State(state): State<AppState>) -> Response {
    let registry = state.dispatcher().registry();
    let body = HealthResponse {
        status: "ok".into(),
        cabinets: registry.kinds().map(|k| k.to_string()).collect(),
        direct: registry.is_direct(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// The dispatcher bound under the configured name on this request.
fn bound(state: &AppState, bindings: &Bindings) -> Result<Dispatcher, Response> {
    bindings.get(state.attach_name()).cloned().ok_or_else(|| {
        warn!(name = state.attach_name(), "no dispatcher bound to request");
        let err = ErrorResponse::new("internal_error", "cabinet not attached");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
    })
}

fn error_response(err: &CabinetError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(code = err.code(), "cabinet operation failed");
    }
    (status, Json(ErrorResponse::from(err))).into_response()
}
