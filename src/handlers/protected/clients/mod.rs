// handlers/protected/clients/mod.rs - The authenticated client and its users

pub mod profile;
pub mod user_create;
pub mod user_delete;
pub mod user_show;
pub mod user_update;
pub mod users_list;

pub use profile::client_get;
pub use user_create::user_post;
pub use user_delete::user_delete;
pub use user_show::user_get;
pub use user_update::user_put;
pub use users_list::users_get;

use crate::api::views::UserView;
use crate::api::{Linked, ResourceKind};
use crate::auth::{authorize, Principal};
use crate::cache::keys;
use crate::database::models::{Client, User};
use crate::error::ApiError;
use crate::state::AppState;

/// `max-age` of the client profile.
pub(crate) const PROFILE_MAX_AGE: u64 = 3600;
/// `max-age` of user reads.
pub(crate) const USERS_MAX_AGE: u64 = 1800;

/// The caller's client record, or 404 if it no longer exists.
pub(crate) async fn require_client(state: &AppState, client_id: i64) -> Result<Client, ApiError> {
    state
        .repos
        .clients
        .find(client_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))
}

/// Loads `user_id` if `principal` owns it. Someone else's user is reported
/// exactly like a missing one.
pub(crate) async fn find_owned_user(state: &AppState, principal: &Principal, user_id: i64) -> Result<Option<User>, ApiError> {
    let user = state.repos.users.find(user_id).await?;
    Ok(user.filter(|user| authorize(principal, user)))
}

/// 404 for a user that is missing or not owned by the caller.
pub(crate) fn user_not_found(state: &AppState, include_create: bool) -> ApiError {
    match state.links.not_found_links(ResourceKind::User, include_create) {
        Ok(links) => ApiError::not_found_with_links("User not found", links),
        Err(e) => e.into(),
    }
}

/// A user with its `self`, `update`, `delete` and optionally `list` links.
pub(crate) fn linked_user(state: &AppState, user: UserView, include_list: bool) -> Result<Linked<UserView>, ApiError> {
    let links = state
        .links
        .resource_links(ResourceKind::User, user.id, &user.full_name(), include_list)?;
    Ok(state.links.add_links(user, links))
}

/// Drops every cached payload a user write can change: the client's user
/// list, the single user, and the profile's `usersCount`.
pub(crate) async fn invalidate_user_caches(state: &AppState, client_id: i64, user_id: i64) -> Result<(), ApiError> {
    state.cache.delete(&keys::client_users(client_id)).await?;
    state.cache.delete(&keys::client_user(client_id, user_id)).await?;
    state.cache.delete(&keys::client(client_id)).await?;
    Ok(())
}
