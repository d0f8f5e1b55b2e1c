// handlers/protected/clients/user_delete.rs - DELETE /api/clients/users/:userId

use axum::extract::{Path, State};

use crate::api::views::Deleted;
use crate::api::{ApiResponse, ApiResult, Linked, ResourceKind};
use crate::handlers::parse_id;
use crate::middleware::CurrentClient;
use crate::state::AppState;

use super::{find_owned_user, invalidate_user_caches, user_not_found};

/// DELETE /api/clients/users/:userId - remove one of the client's users
#[utoipa::path(
    delete,
    path = "/api/clients/users/{userId}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = Deleted),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_delete(
    State(state): State<AppState>,
    client: CurrentClient,
    Path(raw_id): Path<String>,
) -> ApiResult<Linked<Deleted>> {
    let Some(user_id) = parse_id(&raw_id) else {
        return Err(user_not_found(&state, false));
    };
    if find_owned_user(&state, &client.0, user_id).await?.is_none() {
        return Err(user_not_found(&state, false));
    }

    if !state.repos.users.delete(user_id).await? {
        return Err(user_not_found(&state, false));
    }
    tracing::info!(client_id = client.id(), user_id, "Deleted user");

    invalidate_user_caches(&state, client.id(), user_id).await?;

    let links = state.links.not_found_links(ResourceKind::User, true)?;
    let body = Deleted { message: "User deleted successfully".to_string() };
    Ok(ApiResponse::success(state.links.add_links(body, links)))
}
