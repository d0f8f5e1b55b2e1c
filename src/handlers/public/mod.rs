// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Discovery, status and OpenAPI documents, token acquisition for both principal
// types, and the read-only product catalog.

pub mod auth;
pub mod doc;
pub mod products;
pub mod root;

pub use auth::{admin_login_post, client_login_post};
pub use doc::doc_get;
pub use products::{product_get, products_get};
pub use root::{root_get, status_get};
