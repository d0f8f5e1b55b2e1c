// handlers/protected/mod.rs - Protected handlers (client JWT required)
//
// Routes here sit behind `jwt_auth_middleware`; handlers take the caller via
// `CurrentClient`, which turns away anonymous callers (401) and
// administrators (403). Queries are always scoped to the caller's client id.

pub mod clients;

pub use clients::{client_get, user_delete, user_get, user_post, user_put, users_get};
