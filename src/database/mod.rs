pub mod fixtures;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use fixtures::Fixtures;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{
    AdminRepository, ClientRepository, ProductRepository, Repositories, SortField, SortOrder, UserRepository,
};
