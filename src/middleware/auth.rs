use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// JWT authentication middleware that validates tokens and stores the caller's
/// [`Principal`] in the request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(ApiError::unauthorized)?;
    let claims = state.jwt.validate(token)?;

    let principal = Principal::from(claims);
    tracing::debug!(id = principal.id, kind = principal.kind.as_str(), "Authenticated request");
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

/// The authenticated client. Rejects anonymous callers with 401 and
/// administrators with 403.
#[derive(Debug, Clone)]
pub struct CurrentClient(pub Principal);

impl CurrentClient {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentClient {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        if !principal.is_client() {
            tracing::debug!(id = principal.id, "Non-client principal on client route");
            return Err(ApiError::forbidden("Access denied: client account required"));
        }

        Ok(CurrentClient(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(extract_jwt_from_headers(&HeaderMap::new()), Err("Missing Authorization header"));
        assert_eq!(extract_jwt_from_headers(&headers("Bearer  ")), Err("Empty JWT token"));
        assert_eq!(
            extract_jwt_from_headers(&headers("Basic dXNlcjpwYXNz")),
            Err("Authorization header must use Bearer token format")
        );
    }
}
