// handlers/protected/clients/users_list.rs - GET /api/clients/users

use axum::extract::State;

use crate::api::views::{Collection, UserList, UserView};
use crate::api::{ApiResponse, ApiResult, CacheControl, Linked};
use crate::cache::keys;
use crate::error::ApiError;
use crate::middleware::CurrentClient;
use crate::state::AppState;

use super::{linked_user, require_client, USERS_MAX_AGE};

/// GET /api/clients/users - every user registered by the authenticated client
#[utoipa::path(
    get,
    path = "/api/clients/users",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users of the client", body = UserView),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn users_get(
    State(state): State<AppState>,
    client: CurrentClient,
) -> ApiResult<Linked<Collection<Linked<UserView>>>> {
    let client_id = require_client(&state, client.id()).await?.id;
    let repos = state.repos.clone();

    let list: UserList = state
        .cache
        .get(&keys::client_users(client_id), Some(state.config.cache.collection_ttl()), || async move {
            let items: Vec<UserView> = repos
                .users
                .find_by_owner(client_id)
                .await?
                .into_iter()
                .map(UserView::from)
                .collect();
            Ok::<_, ApiError>(UserList { count: items.len(), items })
        })
        .await?;

    let items = list
        .items
        .into_iter()
        .map(|user| linked_user(&state, user, false))
        .collect::<Result<Vec<_>, _>>()?;

    let links = state.links.users_collection_links()?;
    let body = state.links.add_links(Collection::counted(items), links);
    Ok(ApiResponse::success(body).cached(CacheControl::public(USERS_MAX_AGE)))
}
