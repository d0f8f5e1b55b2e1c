//! Wire-level API building blocks: links, routes, the response envelope,
//! view DTOs, error translation, and the OpenAPI description.

pub mod envelope;
pub mod hateoas;
pub mod link;
pub mod openapi;
pub mod routes;
pub mod translator;
pub mod views;

pub use envelope::{ApiResponse, CacheControl, Envelope, ErrorBody, ErrorResponse, Fault, FieldErrors};
pub use hateoas::{LinkBuilder, Linked, Relation, ResourceKind};
pub use link::{Link, LinkSet};
pub use routes::{names, RouteError, RouteParams, RouteResolver, RouteTable};
pub use translator::ErrorTranslator;

/// Handler result: an envelope on success, an [`ApiError`](crate::error::ApiError) otherwise.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
