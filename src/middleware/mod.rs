pub mod auth;
pub mod errors;

pub use auth::{jwt_auth_middleware, CurrentClient};
pub use errors::{panic_response, translate_errors};
