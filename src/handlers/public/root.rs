// handlers/public/root.rs - GET /api and GET /api/status

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::{ApiResponse, ApiResult, CacheControl, Linked};
use crate::state::AppState;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

const ROOT_MAX_AGE: u64 = 86_400;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RootInfo {
    pub message: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusInfo {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// GET /api - discovery document listing every entry point
#[utoipa::path(
    get,
    path = "/api",
    tag = "discovery",
    responses((status = 200, description = "API entry points", body = RootInfo))
)]
pub async fn root_get(State(state): State<AppState>) -> ApiResult<Linked<RootInfo>> {
    let info = RootInfo {
        message: "Welcome to the BileMo API".to_string(),
        version: API_VERSION.to_string(),
        description: "B2B REST API giving access to the BileMo product catalog and to client user management"
            .to_string(),
    };

    let links = state.links.root_links()?;
    Ok(ApiResponse::success(state.links.add_links(info, links)).cached(CacheControl::public(ROOT_MAX_AGE)))
}

/// GET /api/status - liveness check, never cached
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "discovery",
    responses((status = 200, description = "Service status", body = StatusInfo))
)]
pub async fn status_get(State(state): State<AppState>) -> ApiResult<Linked<StatusInfo>> {
    let info = StatusInfo {
        status: "operational".to_string(),
        timestamp: Utc::now(),
        version: API_VERSION.to_string(),
    };

    let links = state.links.status_links()?;
    Ok(ApiResponse::success(state.links.add_links(info, links)).cached(CacheControl::Private))
}
