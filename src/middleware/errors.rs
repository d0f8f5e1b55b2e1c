use std::any::Any;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::envelope::{ErrorResponse, Fault};
use crate::error::ApiError;
use crate::state::AppState;

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Normalizes every `/api` error into the envelope and adds recovery links.
///
/// Handler errors arrive with a [`Fault`] extension and keep their message and
/// any links they chose. Anything else (axum rejections, empty 405s) gets the
/// message for its status.
pub async fn translate_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let api = is_api_path(request.uri().path());
    let response = next.run(request).await;
    let status = response.status();

    if !api || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let translated = match response.extensions().get::<Fault>().cloned() {
        Some(Fault(body)) if body.has_links() => return response,
        Some(Fault(body)) => ErrorResponse::from_error_body(state.errors.enrich(body, status), status),
        None => {
            tracing::debug!(status = %status, "Normalizing framework error response");
            state.errors.translate(status, None)
        }
    };

    let mut rebuilt = translated.into_response();
    copy_headers(response.headers(), rebuilt.headers_mut());
    rebuilt
}

/// Carries over headers such as `Allow` or `WWW-Authenticate`; the body
/// headers belong to the new envelope.
fn copy_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            to.insert(name.clone(), value.clone());
        }
    }
}

/// Turns a caught panic into a 500 envelope; the payload is logged only.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    ApiError::internal(format!("Handler panicked: {}", detail)).into_response()
}
