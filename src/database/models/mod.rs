pub mod admin;
pub mod client;
pub mod product;
pub mod user;

pub use admin::Admin;
pub use client::Client;
pub use product::Product;
pub use user::{NewUser, User};
