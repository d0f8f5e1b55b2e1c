// handlers/public/products/show.rs - GET /api/products/:id

use std::time::Duration;

use axum::extract::{Path, State};

use crate::api::views::ProductView;
use crate::api::{ApiResponse, ApiResult, CacheControl, Linked, ResourceKind};
use crate::cache::keys;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

use super::PRODUCTS_MAX_AGE;

/// GET /api/products/:id - single product with its navigation links
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product details", body = ProductView),
        (status = 404, description = "Product not found")
    )
)]
pub async fn product_get(State(state): State<AppState>, Path(raw_id): Path<String>) -> ApiResult<Linked<ProductView>> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(product_not_found(&state));
    };

    let repos = state.repos.clone();
    let product: Option<ProductView> = state
        .cache
        .get(&keys::product(id), Some(Duration::from_secs(PRODUCTS_MAX_AGE)), || async move {
            Ok::<_, ApiError>(repos.products.find(id).await?.map(ProductView::from))
        })
        .await?;

    let Some(product) = product else {
        tracing::debug!(id, "Product not found");
        return Err(product_not_found(&state));
    };

    let links = state.links.resource_links(ResourceKind::Product, product.id, &product.name, true)?;
    Ok(ApiResponse::success(state.links.add_links(product, links)).cached(CacheControl::public(PRODUCTS_MAX_AGE)))
}

/// 404 pointing back at the catalog.
fn product_not_found(state: &AppState) -> ApiError {
    match state.links.not_found_links(ResourceKind::Product, false) {
        Ok(links) => ApiError::not_found_with_links("Product not found", links),
        Err(e) => e.into(),
    }
}
