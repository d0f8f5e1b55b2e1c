// handlers/protected/clients/user_create.rs - POST /api/clients/users

use axum::{body::Bytes, extract::State};

use crate::api::views::{UserInput, UserView};
use crate::api::{ApiResponse, ApiResult, Linked};
use crate::error::ApiError;
use crate::middleware::CurrentClient;
use crate::state::AppState;

use super::{invalidate_user_caches, linked_user, require_client};

/// POST /api/clients/users - register a new user for the authenticated client
#[utoipa::path(
    post,
    path = "/api/clients/users",
    tag = "clients",
    security(("bearer_auth" = [])),
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn user_post(State(state): State<AppState>, client: CurrentClient, body: Bytes) -> ApiResult<Linked<UserView>> {
    let client_id = require_client(&state, client.id()).await?.id;

    let new_user = UserInput::from_body(&body)
        .validate()
        .map_err(|errors| ApiError::validation_error("Validation failed", errors))?;

    let user = state.repos.users.create(client_id, new_user).await?;
    tracing::info!(client_id, user_id = user.id, "Created user");

    invalidate_user_caches(&state, client_id, user.id).await?;

    let user = linked_user(&state, UserView::from(user), true)?;
    Ok(ApiResponse::created(user))
}
