// handlers/protected/clients/user_update.rs - PUT /api/clients/users/:userId

use axum::{
    body::Bytes,
    extract::{Path, State},
};

use crate::api::views::{UserInput, UserView};
use crate::api::{ApiResponse, ApiResult, Linked};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::CurrentClient;
use crate::state::AppState;

use super::{find_owned_user, invalidate_user_caches, linked_user, user_not_found};

/// PUT /api/clients/users/:userId - replace every field of one of the client's users
#[utoipa::path(
    put,
    path = "/api/clients/users/{userId}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("userId" = i64, Path, description = "User id")),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_put(
    State(state): State<AppState>,
    client: CurrentClient,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Linked<UserView>> {
    let Some(user_id) = parse_id(&raw_id) else {
        return Err(user_not_found(&state, false));
    };
    if find_owned_user(&state, &client.0, user_id).await?.is_none() {
        return Err(user_not_found(&state, false));
    }

    let changes = UserInput::from_body(&body)
        .validate()
        .map_err(|errors| ApiError::validation_error("Validation failed", errors))?;

    let user = state.repos.users.update(user_id, changes).await?;
    tracing::info!(client_id = client.id(), user_id, "Updated user");

    invalidate_user_caches(&state, client.id(), user_id).await?;

    let user = linked_user(&state, UserView::from(user), true)?;
    Ok(ApiResponse::success(user))
}
