use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::envelope::FieldErrors;
use crate::database::models::{Client, NewUser, Product, User};

/// Public projection of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub model: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            brand: product.brand,
            model: product.model,
            price: product.price,
            description: product.description,
            image_url: product.image_url,
            availability: product.availability,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Profile of the authenticated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub users_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientView {
    pub fn new(client: Client, users_count: u64) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            users_count,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserView {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Pagination block of a paged collection.
///
/// `page` is never clamped to `pages`: a page past the end yields an empty
/// item list with this block still well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }

    /// Row offset of the first item on this page. Saturates for pages far
    /// past the end; check [`Pagination::is_past_end`] before querying.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// True when this page holds no rows: beyond `pages`, or any page of an
    /// empty collection.
    pub fn is_past_end(&self) -> bool {
        self.page > self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// Cached product page, stored without links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<ProductView>,
    pub pagination: Pagination,
}

/// Cached list of a client's users, stored without links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    pub items: Vec<UserView>,
    pub count: usize,
}

/// Collection payload as sent on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Collection<T> {
    pub fn paged(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination: Some(pagination), count: None }
    }

    pub fn counted(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, pagination: None, count: Some(count) }
    }
}

/// Body of a user create or update request.
///
/// Every field is optional at parse time; presence is checked by
/// [`UserInput::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UserInput {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserInput {
    /// Parses a request body. A body that is not a JSON object of the expected
    /// shape is treated as empty so that validation reports every field.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!("Unreadable user payload, treating as empty: {}", e);
                Self::default()
            }
        }
    }

    pub fn validate(self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();
        let firstname = required(&mut errors, "firstname", self.firstname);
        let lastname = required(&mut errors, "lastname", self.lastname);
        let email = required(&mut errors, "email", self.email);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewUser {
            firstname,
            lastname,
            email,
            phone: self.phone,
        })
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => {
            errors.insert(field.to_string(), format!("{} is required", field));
            String::new()
        }
    }
}

/// Credentials posted to either login endpoint.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity block returned with a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Payload returned after a user is deleted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Deleted {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pagination_pages_and_neighbours() {
        let p = Pagination::new(3, 10, 25);
        assert_eq!(p.pages, 3);
        assert_eq!(p.offset(), 20);
        assert!(p.has_previous());
        assert!(!p.has_next());

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_previous());
        assert!(!empty.has_next());

        assert!(empty.is_past_end());

        let past_end = Pagination::new(9, 10, 25);
        assert_eq!(past_end.page, 9);
        assert_eq!(past_end.pages, 3);
        assert!(past_end.is_past_end());
        assert!(!p.is_past_end());
    }

    #[test]
    fn huge_page_offset_saturates() {
        let p = Pagination::new(1_152_921_504_606_846_977, 16, 20);
        assert_eq!(p.offset(), u64::MAX);
        assert!(p.is_past_end());
    }

    #[test]
    fn validation_reports_missing_fields_in_order() {
        let input = UserInput::from_body(br#"{"firstname":"","lastname":"Dupont","email":"a@b.com"}"#);
        let errors = input.validate().unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "firstname": "firstname is required" })
        );

        let errors = UserInput::from_body(b"not json").validate().unwrap_err();
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["firstname", "lastname", "email"]
        );
    }

    #[test]
    fn validation_accepts_complete_input() {
        let input = UserInput::from_body(br#"{"firstname":"Jean","lastname":"Dupont","email":"j@d.fr","phone":"0600"}"#);
        let user = input.validate().unwrap();
        assert_eq!(user.firstname, "Jean");
        assert_eq!(user.phone.as_deref(), Some("0600"));
    }

    #[test]
    fn collection_serializes_only_present_blocks() {
        let counted = Collection::counted(vec![1, 2]);
        assert_eq!(serde_json::to_value(&counted).unwrap(), json!({ "items": [1, 2], "count": 2 }));

        let paged = Collection::paged(Vec::<i32>::new(), Pagination::new(1, 10, 0));
        assert_eq!(
            serde_json::to_value(&paged).unwrap(),
            json!({ "items": [], "pagination": { "page": 1, "limit": 10, "total": 0, "pages": 0 } })
        );
    }

    #[test]
    fn login_user_uses_type_key() {
        let user = AuthenticatedUser {
            id: 1,
            email: "admin@bilemo.com".into(),
            name: None,
            kind: "admin".into(),
            roles: vec!["ROLE_ADMIN".into()],
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({ "id": 1, "email": "admin@bilemo.com", "type": "admin", "roles": ["ROLE_ADMIN"] })
        );
    }
}
