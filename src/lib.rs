pub mod api;
pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Builds the full application router over `state`.
///
/// Layers, outermost first: error translation for `/api` paths, request
/// tracing, CORS, panic recovery.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(client_routes(state.clone()))
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(state.clone(), middleware::translate_errors))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::*;

    Router::new()
        // Discovery
        .route("/api", get(root_get))
        .route("/api/status", get(status_get))
        .route("/api/doc.json", get(doc_get))
        // Token acquisition
        .route("/api/admin/login", post(admin_login_post))
        .route("/api/client/login", post(client_login_post))
        // Catalog
        .route("/api/products", get(products_get))
        .route("/api/products/:id", get(product_get))
}

fn client_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::*;

    Router::new()
        .route("/api/clients", get(client_get))
        .route("/api/clients/users", get(users_get).post(user_post))
        .route(
            "/api/clients/users/:user_id",
            get(user_get).put(user_put).delete(user_delete),
        )
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}

async fn fallback() -> ApiError {
    ApiError::not_found("Resource not found")
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
