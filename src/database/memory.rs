use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::fixtures::Fixtures;
use crate::database::manager::DatabaseError;
use crate::database::models::{Admin, Client, NewUser, Product, User};
use crate::database::repository::{
    AdminRepository, ClientRepository, ProductRepository, SortField, SortOrder, UserRepository,
};

#[derive(Default)]
struct Tables {
    admins: Vec<Admin>,
    clients: Vec<Client>,
    products: Vec<Product>,
    users: BTreeMap<i64, User>,
    next_user_id: i64,
}

/// Process-local store used when no database is configured, and by tests.
/// Enforces the same unique-email rule as the `app_user` table.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(fixtures: Fixtures) -> Self {
        let next_user_id = fixtures.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            tables: RwLock::new(Tables {
                admins: fixtures.admins,
                clients: fixtures.clients,
                products: fixtures.products,
                users: fixtures.users.into_iter().map(|u| (u.id, u)).collect(),
                next_user_id,
            }),
        }
    }

    fn email_taken(tables: &Tables, email: &str, except: Option<i64>) -> bool {
        tables
            .users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_paginated(
        &self,
        offset: u64,
        limit: u64,
        sort: SortField,
        order: SortOrder,
    ) -> Result<Vec<Product>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut products = tables.products.clone();
        products.sort_by(|a, b| {
            let ordering = match sort {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => a.name.cmp(&b.name),
                SortField::Price => a.price.cmp(&b.price),
                SortField::Brand => a.brand.cmp(&b.brand),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            }
            .then(a.id.cmp(&b.id));
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(products
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        Ok(self.tables.read().await.products.len() as u64)
    }
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn find(&self, id: i64) -> Result<Option<Client>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().find(|c| c.email == email).cloned())
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_owner(&self, client_id: i64) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| u.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn count_by_owner(&self, client_id: i64) -> Result<u64, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|u| u.client_id == client_id).count() as u64)
    }

    async fn create(&self, client_id: i64, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.clients.iter().any(|c| c.id == client_id) {
            return Err(DatabaseError::NotFound(format!("client {}", client_id)));
        }
        if Self::email_taken(&tables, &user.email, None) {
            return Err(DatabaseError::UniqueViolation("app_user.email".to_string()));
        }

        let id = tables.next_user_id.max(1);
        tables.next_user_id = id + 1;
        let now = Utc::now();
        let created = User {
            id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            phone: user.phone,
            client_id,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if Self::email_taken(&tables, &user.email, Some(id)) {
            return Err(DatabaseError::UniqueViolation("app_user.email".to_string()));
        }

        let existing = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        existing.firstname = user.firstname;
        existing.lastname = user.lastname;
        existing.email = user.email;
        existing.phone = user.phone;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::seeded(Fixtures::generate("hash"))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            firstname: "Jean".into(),
            lastname: "Dupont".into(),
            email: email.into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn pages_and_sorts_products() {
        let store = store();
        let page = store.find_paginated(0, 5, SortField::Price, SortOrder::Desc).await.unwrap();
        assert_eq!(page.len(), 5);
        assert!(page.windows(2).all(|w| w[0].price >= w[1].price));

        let past_end = store.find_paginated(40, 10, SortField::Id, SortOrder::Asc).await.unwrap();
        assert!(past_end.is_empty());
        assert_eq!(ProductRepository::count(&store).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn create_update_delete_user() {
        let store = store();
        let created = store.create(1, new_user("jean.dupont@example.com")).await.unwrap();
        assert_eq!(created.client_id, 1);
        assert_eq!(
            store.count_by_owner(1).await.unwrap(),
            store.find_by_owner(1).await.unwrap().len() as u64
        );

        let updated = store
            .update(created.id, NewUser { phone: Some("0600000000".into()), ..new_user("jean.dupont@example.com") })
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("0600000000"));

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(UserRepository::find(&store, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_emails() {
        let store = store();
        let taken = UserRepository::find(&store, 1).await.unwrap().unwrap().email;

        assert!(matches!(
            store.create(2, new_user(&taken)).await,
            Err(DatabaseError::UniqueViolation(_))
        ));
        assert!(matches!(
            store.update(2, new_user(&taken)).await,
            Err(DatabaseError::UniqueViolation(_))
        ));
        assert!(store.update(1, new_user(&taken)).await.is_ok());
    }

    #[tokio::test]
    async fn finds_accounts_by_email() {
        let store = store();
        assert!(AdminRepository::find_by_email(&store, "admin1@bilemo.com").await.unwrap().is_some());
        assert!(ClientRepository::find_by_email(&store, "client3@bilemo.com").await.unwrap().is_some());
        assert!(ClientRepository::find_by_email(&store, "admin1@bilemo.com").await.unwrap().is_none());
    }
}
