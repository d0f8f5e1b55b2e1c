use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::database::fixtures::Fixtures;
use crate::database::manager::DatabaseError;
use crate::database::models::{Admin, Client, NewUser, Product, User};
use crate::database::repository::{
    AdminRepository, ClientRepository, ProductRepository, SortField, SortOrder, UserRepository,
};

const PRODUCT_COLUMNS: &str =
    "id, name, brand, model, price, description, image_url, availability, created_at, updated_at";
const USER_COLUMNS: &str = "id, firstname, lastname, email, phone, client_id, created_at, updated_at";

/// sqlx-backed store over the schema in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replaces every table's contents with `fixtures`, preserving their ids.
    pub async fn seed(&self, fixtures: &Fixtures) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("TRUNCATE app_user, client, product, admin RESTART IDENTITY CASCADE")
            .execute(&mut *tx)
            .await?;

        for admin in &fixtures.admins {
            sqlx::query(
                "INSERT INTO admin (id, email, password_hash, role, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(admin.id)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(&admin.role)
            .bind(admin.created_at)
            .bind(admin.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        for client in &fixtures.clients {
            sqlx::query(
                "INSERT INTO client (id, name, email, password_hash, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(client.id)
            .bind(&client.name)
            .bind(&client.email)
            .bind(&client.password_hash)
            .bind(client.created_at)
            .bind(client.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        for product in &fixtures.products {
            sqlx::query(&format!(
                "INSERT INTO product ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
                PRODUCT_COLUMNS
            ))
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.brand)
            .bind(&product.model)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(product.availability)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        for user in &fixtures.users {
            sqlx::query(&format!(
                "INSERT INTO app_user ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                USER_COLUMNS
            ))
            .bind(user.id)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.client_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        // Explicit ids leave the sequences behind
        for table in ["admin", "client", "product", "app_user"] {
            sqlx::query(&format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE((SELECT MAX(id) FROM {table}), 1))"
            ))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            "Seeded {} admins, {} clients, {} users, {} products",
            fixtures.admins.len(),
            fixtures.clients.len(),
            fixtures.users.len(),
            fixtures.products.len()
        );
        Ok(())
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn to_bind(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM product WHERE id = $1", PRODUCT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_paginated(
        &self,
        offset: u64,
        limit: u64,
        sort: SortField,
        order: SortOrder,
    ) -> Result<Vec<Product>, DatabaseError> {
        // Column and direction come from closed enums, never from request text
        let sql = format!(
            "SELECT {} FROM product ORDER BY {} {}, id ASC LIMIT $1 OFFSET $2",
            PRODUCT_COLUMNS,
            sort.column(),
            order.as_str()
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(to_bind(limit))
            .bind(to_bind(offset))
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }
}

#[async_trait]
impl ClientRepository for PgStore {
    async fn find(&self, id: i64) -> Result<Option<Client>, DatabaseError> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM client WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DatabaseError> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM client WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash, role, created_at, updated_at FROM admin WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM app_user WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_owner(&self, client_id: i64) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM app_user WHERE client_id = $1 ORDER BY id",
            USER_COLUMNS
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn count_by_owner(&self, client_id: i64) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    async fn create(&self, client_id: i64, user: NewUser) -> Result<User, DatabaseError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO app_user (firstname, lastname, email, phone, client_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(created)
    }

    async fn update(&self, id: i64, user: NewUser) -> Result<User, DatabaseError> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE app_user SET firstname = $1, lastname = $2, email = $3, phone = $4, updated_at = NOW() \
             WHERE id = $5 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        updated.ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
