//! Cache keys. Every parameter that changes a payload is part of its key.

use std::fmt::Display;

pub fn client(client_id: i64) -> String {
    format!("client_{}", client_id)
}

pub fn client_users(client_id: i64) -> String {
    format!("client_{}_users", client_id)
}

pub fn client_user(client_id: i64, user_id: i64) -> String {
    format!("client_{}_user_{}", client_id, user_id)
}

pub fn product(product_id: i64) -> String {
    format!("product_{}", product_id)
}

pub fn products_list(page: u64, limit: u64, sort: impl Display, order: impl Display) -> String {
    format!("products_list_{}_{}_{}_{}", page, limit, sort, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats() {
        assert_eq!(client(7), "client_7");
        assert_eq!(client_users(7), "client_7_users");
        assert_eq!(client_user(7, 42), "client_7_user_42");
        assert_eq!(product(3), "product_3");
        assert_eq!(products_list(2, 10, "price", "DESC"), "products_list_2_10_price_DESC");
    }
}
