// handlers/public/auth.rs - POST /api/admin/login and POST /api/client/login
//
// Both endpoints check credentials against every account table, then require
// the matching account to be of the endpoint's kind.

use axum::{body::Bytes, extract::State};

use crate::api::views::{AuthenticatedUser, LoginRequest, LoginResponse};
use crate::api::{ApiResponse, ApiResult};
use crate::auth::{verify_any, Principal, PrincipalKind};
use crate::database::models::{Admin, Client};
use crate::error::ApiError;
use crate::state::AppState;

/// An account whose password matched.
enum Account {
    Admin(Admin),
    Client(Client),
}

impl Account {
    fn kind(&self) -> PrincipalKind {
        match self {
            Account::Admin(_) => PrincipalKind::Admin,
            Account::Client(_) => PrincipalKind::Client,
        }
    }

    fn principal(&self) -> Principal {
        let (id, email) = match self {
            Account::Admin(admin) => (admin.id, admin.email.clone()),
            Account::Client(client) => (client.id, client.email.clone()),
        };
        Principal { id, email, kind: self.kind() }
    }

    fn password_hash(&self) -> &str {
        match self {
            Account::Admin(admin) => &admin.password_hash,
            Account::Client(client) => &client.password_hash,
        }
    }

    fn display_name(&self) -> Option<String> {
        match self {
            Account::Admin(_) => None,
            Account::Client(client) => Some(client.name.clone()),
        }
    }
}

/// POST /api/admin/login - exchange administrator credentials for a JWT
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "JWT issued", body = LoginResponse),
        (status = 400, description = "Email and password are required"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn admin_login_post(State(state): State<AppState>, body: Bytes) -> ApiResult<LoginResponse> {
    login(&state, &body, PrincipalKind::Admin).await
}

/// POST /api/client/login - exchange client credentials for a JWT
#[utoipa::path(
    post,
    path = "/api/client/login",
    tag = "authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "JWT issued", body = LoginResponse),
        (status = 400, description = "Email and password are required"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn client_login_post(State(state): State<AppState>, body: Bytes) -> ApiResult<LoginResponse> {
    login(&state, &body, PrincipalKind::Client).await
}

async fn login(state: &AppState, body: &[u8], expected: PrincipalKind) -> ApiResult<LoginResponse> {
    let credentials: LoginRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected login payload: {}", e);
        ApiError::bad_request("Email and password are required")
    })?;

    let account = authenticate(state, &credentials)
        .await?
        .ok_or_else(|| {
            tracing::info!(email = %credentials.email, login = expected.as_str(), "Login failed");
            ApiError::unauthorized("Invalid credentials")
        })?;

    if account.kind() != expected {
        tracing::info!(
            email = %credentials.email,
            login = expected.as_str(),
            account = account.kind().as_str(),
            "Login with wrong account type"
        );
        return Err(ApiError::unauthorized(format!(
            "Invalid credentials for {} login",
            expected.as_str()
        )));
    }

    let principal = account.principal();
    let token = state.jwt.generate(&principal)?;
    tracing::info!(id = principal.id, kind = principal.kind.as_str(), "Issued token");

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: AuthenticatedUser {
            id: principal.id,
            email: principal.email,
            name: account.display_name(),
            kind: principal.kind.as_str().to_string(),
            roles: principal.kind.roles(),
        },
    }))
}

/// Finds the account owning `credentials.email` whose password matches.
/// Administrators are checked before clients.
async fn authenticate(state: &AppState, credentials: &LoginRequest) -> Result<Option<Account>, ApiError> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(admin) = state.repos.admins.find_by_email(&credentials.email).await? {
        candidates.push(Account::Admin(admin));
    }
    if let Some(client) = state.repos.clients.find_by_email(&credentials.email).await? {
        candidates.push(Account::Client(client));
    }

    let hashes = candidates.iter().map(|a| a.password_hash().to_string()).collect();
    let matched = verify_any(&credentials.password, hashes).await?;
    Ok(matched.map(|index| candidates.swap_remove(index)))
}
