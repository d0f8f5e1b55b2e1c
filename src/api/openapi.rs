//! OpenAPI description of every route, served at `/api/doc.json`.
//!
//! Success bodies are documented by the payload found under `data`; the
//! envelope and `_links` block are common to every response.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Components, OpenApi as OpenApiDocument};
use utoipa::{Modify, OpenApi};

use crate::api::views::{
    AuthenticatedUser, ClientView, Deleted, LoginRequest, LoginResponse, Pagination, ProductView, UserInput,
    UserView,
};
use crate::handlers::protected::clients::{profile, user_create, user_delete, user_show, user_update, users_list};
use crate::handlers::public::products::{list, show};
use crate::handlers::public::root::{RootInfo, StatusInfo};
use crate::handlers::public::{auth, root};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "bearer_auth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BileMo API",
        description = "B2B access to the BileMo product catalog and to client user management"
    ),
    paths(
        root::root_get,
        root::status_get,
        auth::admin_login_post,
        auth::client_login_post,
        list::products_get,
        show::product_get,
        profile::client_get,
        users_list::users_get,
        user_show::user_get,
        user_create::user_post,
        user_update::user_put,
        user_delete::user_delete
    ),
    components(schemas(
        RootInfo,
        StatusInfo,
        LoginRequest,
        LoginResponse,
        AuthenticatedUser,
        ProductView,
        Pagination,
        ClientView,
        UserView,
        UserInput,
        Deleted
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "discovery", description = "Entry points and status"),
        (name = "authentication", description = "JWT issuance for administrators and clients"),
        (name = "products", description = "Read-only product catalog"),
        (name = "clients", description = "The authenticated client and its users")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut OpenApiDocument) {
        let components = openapi.components.get_or_insert_with(Components::new);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}
