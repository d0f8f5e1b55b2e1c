// handlers/public/products/list.rs - GET /api/products

use std::time::Duration;

use axum::extract::{Query, State};

use crate::api::views::{Collection, Pagination, ProductPage, ProductView};
use crate::api::{names, ApiResponse, ApiResult, CacheControl, LinkSet, Linked, RouteParams};
use crate::cache::keys;
use crate::config::{ApiConfig, PAGE_SIZE_LIMIT};
use crate::database::{SortField, SortOrder};
use crate::error::ApiError;
use crate::handlers::QueryParams;
use crate::state::AppState;

use super::PRODUCTS_MAX_AGE;

/// Normalized listing parameters. Out-of-range or unreadable values fall back
/// to their defaults or are clamped; they are never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    pub sort: SortField,
    pub order: SortOrder,
}

impl ListParams {
    pub fn from_query(query: &QueryParams, api: &ApiConfig) -> Self {
        let page = query
            .get("page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(1, |p| p.max(1) as u64);

        let max = api.max_page_size.clamp(1, PAGE_SIZE_LIMIT);
        let limit = query
            .get("limit")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(api.default_page_size, |l| l.max(1).unsigned_abs())
            .clamp(1, max);

        Self {
            page,
            limit,
            sort: query.get("sort").map(|s| SortField::from(s.as_str())).unwrap_or_default(),
            order: query.get("order").map(|o| SortOrder::from(o.as_str())).unwrap_or_default(),
        }
    }

    fn link_params(&self) -> RouteParams {
        RouteParams::new().with("sort", self.sort).with("order", self.order)
    }
}

/// GET /api/products - paginated, sortable product list
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<u64>, Query, description = "Items per page, at most 100"),
        ("sort" = Option<String>, Query, description = "id, name, brand, price or createdAt"),
        ("order" = Option<String>, Query, description = "asc or desc")
    ),
    responses((status = 200, description = "One page of the catalog", body = ProductView))
)]
pub async fn products_get(
    State(state): State<AppState>,
    Query(query): Query<QueryParams>,
) -> ApiResult<Linked<Collection<Linked<ProductView>>>> {
    let params = ListParams::from_query(&query, &state.config.api);
    let key = keys::products_list(params.page, params.limit, params.sort, params.order);

    let repos = state.repos.clone();
    let page: ProductPage = state
        .cache
        .get(&key, Some(Duration::from_secs(PRODUCTS_MAX_AGE)), || async move {
            let pagination = Pagination::new(params.page, params.limit, repos.products.count().await?);
            if pagination.is_past_end() {
                return Ok::<_, ApiError>(ProductPage { items: Vec::new(), pagination });
            }
            let items = repos
                .products
                .find_paginated(pagination.offset(), pagination.limit, params.sort, params.order)
                .await?
                .into_iter()
                .map(ProductView::from)
                .collect();
            Ok(ProductPage { items, pagination })
        })
        .await?;

    let mut items = Vec::with_capacity(page.items.len());
    for product in page.items {
        let params = RouteParams::new().with("id", product.id);
        let link = state.links.resource_link(names::PRODUCTS_SHOW, &params, Some(&product.name))?;
        items.push(state.links.add_links(product, LinkSet::new().with(link)));
    }

    let links = state.links.pagination_links(
        page.pagination.page,
        page.pagination.limit,
        page.pagination.total,
        names::PRODUCTS_LIST,
        &params.link_params(),
    )?;

    tracing::debug!(page = params.page, limit = params.limit, items = items.len(), "Listed products");
    let body = state.links.add_links(Collection::paged(items, page.pagination), links);
    Ok(ApiResponse::success(body).cached(CacheControl::public(PRODUCTS_MAX_AGE)))
}
