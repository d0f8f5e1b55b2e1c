// handlers/protected/clients/user_show.rs - GET /api/clients/users/:userId

use axum::extract::{Path, State};

use crate::api::views::UserView;
use crate::api::{ApiResponse, ApiResult, CacheControl, Linked};
use crate::cache::keys;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::CurrentClient;
use crate::state::AppState;

use super::{find_owned_user, linked_user, user_not_found, USERS_MAX_AGE};

/// GET /api/clients/users/:userId - one of the client's users
#[utoipa::path(
    get,
    path = "/api/clients/users/{userId}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User details", body = UserView),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_get(
    State(state): State<AppState>,
    client: CurrentClient,
    Path(raw_id): Path<String>,
) -> ApiResult<Linked<UserView>> {
    let Some(user_id) = parse_id(&raw_id) else {
        return Err(user_not_found(&state, false));
    };

    let cache_state = state.clone();
    let principal = client.0.clone();
    let user: Option<UserView> = state
        .cache
        .get(
            &keys::client_user(client.id(), user_id),
            Some(state.config.cache.collection_ttl()),
            || async move {
                let user = find_owned_user(&cache_state, &principal, user_id).await?;
                Ok::<_, ApiError>(user.map(UserView::from))
            },
        )
        .await?;

    let Some(user) = user else {
        tracing::debug!(client_id = client.id(), user_id, "User not visible to client");
        return Err(user_not_found(&state, false));
    };

    let user = linked_user(&state, user, true)?;
    Ok(ApiResponse::success(user).cached(CacheControl::public(USERS_MAX_AGE)))
}
