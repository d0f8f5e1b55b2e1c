use axum::http::{Method, StatusCode};

use super::envelope::{ErrorBody, ErrorResponse};
use super::hateoas::LinkBuilder;
use super::link::LinkSet;
use super::routes::RouteError;
use crate::error::INTERNAL_ERROR_MESSAGE;

/// Attaches recovery links to error envelopes according to their status:
///
/// | status | links                                                  |
/// |--------|--------------------------------------------------------|
/// | 401    | `admin_login`, `client_login`                          |
/// | 403    | `api_root`, `client_profile`, `client_users`           |
/// | 404    | `api_root`, `products`, `client_profile`, `client_users` |
/// | 500    | `api_status`                                           |
#[derive(Clone)]
pub struct ErrorTranslator {
    links: LinkBuilder,
}

impl ErrorTranslator {
    pub fn new(links: LinkBuilder) -> Self {
        Self { links }
    }

    pub fn recovery_links(&self, status: StatusCode) -> Result<LinkSet, RouteError> {
        let b = &self.links;
        let mut links = LinkSet::new();
        match status {
            StatusCode::UNAUTHORIZED => {
                links.insert(b.link("admin_login", b.admin_login_url()?, Some(Method::POST), Some("Administrator login")));
                links.insert(b.link("client_login", b.client_login_url()?, Some(Method::POST), Some("Client login")));
            }
            StatusCode::FORBIDDEN => {
                links.insert(b.link("api_root", b.root_url()?, None, Some("API root endpoint")));
                links.insert(b.link("client_profile", b.client_profile_url()?, None, Some("Your client profile")));
                links.insert(b.link("client_users", b.client_users_url()?, None, Some("Your users")));
            }
            StatusCode::NOT_FOUND => {
                links.insert(b.link("api_root", b.root_url()?, None, Some("API root endpoint")));
                links.insert(b.link("products", b.products_list_url()?, None, Some("Product catalog")));
                links.insert(b.link("client_profile", b.client_profile_url()?, None, Some("Your client profile")));
                links.insert(b.link("client_users", b.client_users_url()?, None, Some("Your users")));
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                links.insert(b.link("api_status", b.status_url()?, None, Some("Check API status")));
            }
            _ => {}
        }
        Ok(links)
    }

    /// Fills in recovery links when the body carries none of its own.
    pub fn enrich(&self, mut body: ErrorBody, status: StatusCode) -> ErrorBody {
        if body.has_links() {
            return body;
        }
        match self.recovery_links(status) {
            Ok(links) if !links.is_empty() => body.links = Some(links),
            Ok(_) => {}
            Err(e) => tracing::error!("Failed to build recovery links: {}", e),
        }
        body
    }

    /// Envelope for a fault that reached the boundary without one, such as a
    /// framework rejection or a panic.
    pub fn translate(&self, status: StatusCode, message: Option<&str>) -> ErrorResponse {
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_ERROR_MESSAGE
        } else {
            message.unwrap_or_else(|| default_message(status))
        };
        ErrorResponse::from_error_body(self.enrich(ErrorBody::new(message), status), status)
    }
}

/// Client-facing message for a bare status code.
pub fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::UNAUTHORIZED => "Authentication required",
        StatusCode::FORBIDDEN => "Access denied",
        StatusCode::NOT_FOUND => "Resource not found",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "Payload too large",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type",
        StatusCode::UNPROCESSABLE_ENTITY => "Unprocessable entity",
        StatusCode::INTERNAL_SERVER_ERROR => INTERNAL_ERROR_MESSAGE,
        other => other.canonical_reason().unwrap_or("Request failed"),
    }
}
