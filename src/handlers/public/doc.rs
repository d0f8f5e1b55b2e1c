// handlers/public/doc.rs - GET /api/doc.json

use axum::Json;
use utoipa::OpenApi;

use crate::api::openapi::ApiDoc;

/// GET /api/doc.json - OpenAPI 3 description of every route
pub async fn doc_get() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
