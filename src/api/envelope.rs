use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Value};

use super::link::LinkSet;

/// Field name → message, in the order the checks ran.
pub type FieldErrors = IndexMap<String, String>;

/// Body of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
    pub errors: Option<FieldErrors>,
    pub links: Option<LinkSet>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), errors: None, links: None }
    }

    pub fn has_links(&self) -> bool {
        self.links.as_ref().is_some_and(|l| !l.is_empty())
    }
}

/// The uniform response body: `{success: true, data}` or
/// `{success: false, message, errors?, _links?}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Error(ErrorBody),
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success(data) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            Envelope::Error(body) => {
                let errors = body.errors.as_ref().filter(|e| !e.is_empty());
                let links = body.links.as_ref().filter(|l| !l.is_empty());
                let len = 2 + usize::from(errors.is_some()) + usize::from(links.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", &body.message)?;
                if let Some(errors) = errors {
                    map.serialize_entry("errors", errors)?;
                }
                if let Some(links) = links {
                    map.serialize_entry("_links", links)?;
                }
                map.end()
            }
        }
    }
}

/// HTTP caching policy attached to a response by its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheControl {
    /// `public, max-age=<N>, must-revalidate`
    Public { max_age: u64 },
    /// `private, max-age=0`
    Private,
}

impl CacheControl {
    pub fn public(max_age: u64) -> Self {
        CacheControl::Public { max_age }
    }

    pub fn header_value(&self) -> String {
        match self {
            CacheControl::Public { max_age } => format!("public, max-age={}, must-revalidate", max_age),
            CacheControl::Private => "private, max-age=0".to_string(),
        }
    }
}

/// Error body carried in the response extensions so outer layers can enrich it.
#[derive(Debug, Clone)]
pub struct Fault(pub ErrorBody);

/// Envelope plus the transport-level status code and cache policy.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub envelope: Envelope<T>,
    pub status_code: StatusCode,
    pub cache_control: Option<CacheControl>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self::with_status(data, StatusCode::OK)
    }

    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            envelope: Envelope::Success(data),
            status_code,
            cache_control: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn cached(mut self, cache_control: CacheControl) -> Self {
        self.cache_control = Some(cache_control);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.envelope, Envelope::Success(_))
    }

    /// Serialized body and status, without building an HTTP response.
    pub fn into_parts(self) -> Result<(Value, StatusCode), serde_json::Error> {
        Ok((serde_json::to_value(&self.envelope)?, self.status_code))
    }
}

pub type ErrorResponse = ApiResponse<()>;

impl ApiResponse<()> {
    pub fn error(
        message: impl Into<String>,
        status_code: StatusCode,
        errors: Option<FieldErrors>,
        links: Option<LinkSet>,
    ) -> Self {
        Self::from_error_body(
            ErrorBody { message: message.into(), errors, links },
            status_code,
        )
    }

    pub fn from_error_body(body: ErrorBody, status_code: StatusCode) -> Self {
        Self {
            envelope: Envelope::Error(body),
            status_code,
            cache_control: None,
        }
    }

    pub fn bad_request(message: impl Into<String>, errors: Option<FieldErrors>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::BAD_REQUEST, errors, links)
    }

    pub fn unauthorized(message: impl Into<String>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::UNAUTHORIZED, None, links)
    }

    pub fn forbidden(message: impl Into<String>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::FORBIDDEN, None, links)
    }

    pub fn not_found(message: impl Into<String>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::NOT_FOUND, None, links)
    }

    pub fn conflict(message: impl Into<String>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::CONFLICT, None, links)
    }

    pub fn unprocessable(message: impl Into<String>, errors: Option<FieldErrors>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::UNPROCESSABLE_ENTITY, errors, links)
    }

    pub fn internal_server_error(message: impl Into<String>, links: Option<LinkSet>) -> Self {
        Self::error(message, StatusCode::INTERNAL_SERVER_ERROR, None, links)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let fault = match &self.envelope {
            Envelope::Error(body) => Some(Fault(body.clone())),
            Envelope::Success(_) => None,
        };

        let body = match serde_json::to_value(&self.envelope) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "An unexpected error occurred"
                    })),
                )
                    .into_response();
            }
        };

        let mut response = (self.status_code, Json(body)).into_response();
        if let Some(cache_control) = self.cache_control {
            if let Ok(value) = HeaderValue::from_str(&cache_control.header_value()) {
                response.headers_mut().insert(header::CACHE_CONTROL, value);
            }
        }
        if let Some(fault) = fault {
            response.extensions_mut().insert(fault);
        }
        response
    }
}
