// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (client JWT auth)
//
// Public handlers serve discovery, status, login and the product catalog.
// Protected handlers run behind `jwt_auth_middleware` and take the caller
// through the `CurrentClient` extractor; every query is scoped to that client.
pub mod public;
pub mod protected;

use std::collections::HashMap;

/// Raw query string parameters. Parsing is done per handler so that malformed
/// values are normalized instead of rejected.
pub type QueryParams = HashMap<String, String>;

/// Parses a numeric path segment; anything else is treated as an unknown id.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
    }
}
