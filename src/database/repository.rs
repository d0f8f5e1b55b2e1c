use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::database::manager::DatabaseError;
use crate::database::models::{Admin, Client, NewUser, Product, User};

/// Product list sort key. Unknown names fall back to `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Price,
    Brand,
    CreatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::Brand => "brand",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// Column name in the `product` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            other => other.as_str(),
        }
    }
}

impl From<&str> for SortField {
    fn from(value: &str) -> Self {
        match value {
            "name" => SortField::Name,
            "price" => SortField::Price,
            "brand" => SortField::Brand,
            "createdAt" => SortField::CreatedAt,
            _ => SortField::Id,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction. Anything other than `DESC` (any case) is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl From<&str> for SortOrder {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError>;

    async fn find_paginated(
        &self,
        offset: u64,
        limit: u64,
        sort: SortField,
        order: SortOrder,
    ) -> Result<Vec<Product>, DatabaseError>;

    async fn count(&self) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<Client>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DatabaseError>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError>;
}

/// End users, always scoped to their owning client.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Users of `client_id`, ordered by id.
    async fn find_by_owner(&self, client_id: i64) -> Result<Vec<User>, DatabaseError>;

    async fn count_by_owner(&self, client_id: i64) -> Result<u64, DatabaseError>;

    /// Fails with [`DatabaseError::UniqueViolation`] when the email is taken.
    async fn create(&self, client_id: i64, user: NewUser) -> Result<User, DatabaseError>;

    /// Full replacement of the writable fields.
    async fn update(&self, id: i64, user: NewUser) -> Result<User, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

/// The repositories a request handler can reach.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// All four repositories served by one store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProductRepository + ClientRepository + AdminRepository + UserRepository + 'static,
    {
        Self {
            products: store.clone(),
            clients: store.clone(),
            admins: store.clone(),
            users: store,
        }
    }
}
