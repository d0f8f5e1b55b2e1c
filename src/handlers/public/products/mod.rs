// handlers/public/products/mod.rs - Read-only product catalog

pub mod list;
pub mod show;

pub use list::products_get;
pub use show::product_get;

/// Cache lifetime and `max-age` of catalog responses, in seconds.
pub(crate) const PRODUCTS_MAX_AGE: u64 = 3600;
