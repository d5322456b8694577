//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresRepository;

use crate::core::repository::Repository;
use crate::entities::{Address, Order, Product, ProductGroup, Rating, ShoppingCart, User};
use std::sync::Arc;

/// One repository per resource kind, all on the same backend
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Repository<User>>,
    pub addresses: Arc<dyn Repository<Address>>,
    pub orders: Arc<dyn Repository<Order>>,
    pub products: Arc<dyn Repository<Product>>,
    pub product_groups: Arc<dyn Repository<ProductGroup>>,
    pub ratings: Arc<dyn Repository<Rating>>,
    pub shopping_carts: Arc<dyn Repository<ShoppingCart>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::new()),
            addresses: Arc::new(InMemoryRepository::new()),
            orders: Arc::new(InMemoryRepository::new()),
            products: Arc::new(InMemoryRepository::new()),
            product_groups: Arc::new(InMemoryRepository::new()),
            ratings: Arc::new(InMemoryRepository::new()),
            shopping_carts: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Repositories sharing one pool; call `postgres::ensure_schema` first
    #[cfg(feature = "postgres")]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            users: Arc::new(PostgresRepository::new(pool.clone())),
            addresses: Arc::new(PostgresRepository::new(pool.clone())),
            orders: Arc::new(PostgresRepository::new(pool.clone())),
            products: Arc::new(PostgresRepository::new(pool.clone())),
            product_groups: Arc::new(PostgresRepository::new(pool.clone())),
            ratings: Arc::new(PostgresRepository::new(pool.clone())),
            shopping_carts: Arc::new(PostgresRepository::new(pool)),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::in_memory()
    }
}
