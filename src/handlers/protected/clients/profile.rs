// handlers/protected/clients/profile.rs - GET /api/clients

use axum::extract::State;

use crate::api::views::ClientView;
use crate::api::{ApiResponse, ApiResult, CacheControl, Linked};
use crate::cache::keys;
use crate::error::ApiError;
use crate::middleware::CurrentClient;
use crate::state::AppState;

use super::PROFILE_MAX_AGE;

/// GET /api/clients - profile of the authenticated client
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Client profile", body = ClientView),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a client token")
    )
)]
pub async fn client_get(State(state): State<AppState>, client: CurrentClient) -> ApiResult<Linked<ClientView>> {
    let client_id = client.id();
    let repos = state.repos.clone();

    let profile: Option<ClientView> = state
        .cache
        .get(&keys::client(client_id), None, || async move {
            let Some(client) = repos.clients.find(client_id).await? else {
                return Ok::<_, ApiError>(None);
            };
            let users_count = repos.users.count_by_owner(client_id).await?;
            Ok(Some(ClientView::new(client, users_count)))
        })
        .await?;

    let profile = profile.ok_or_else(|| ApiError::not_found("Client not found"))?;
    let links = state.links.client_links(&profile.name)?;
    Ok(ApiResponse::success(state.links.add_links(profile, links)).cached(CacheControl::public(PROFILE_MAX_AGE)))
}
