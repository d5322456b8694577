//! # Shopfront
//!
//! An e-commerce REST backend serving seven resource kinds: users,
//! addresses, orders, products, product groups, ratings and shopping carts.
//!
//! ## Features
//!
//! - **Generic resource service**: one `ResourceService<T>` per kind with
//!   create, get, list, update, delete, disable, enable and related listings
//! - **Owner-scoped access**: non-admin callers only see and touch what they own
//! - **Soft lifecycle**: records are disabled and re-enabled rather than
//!   deleted, with the guard and the write applied atomically
//! - **Filtered listings**: JSON filters, sorting and pagination
//! - **Pluggable storage**: in-memory, or PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopfront::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_repositories(Repositories::in_memory())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```
//!
//! Callers identify themselves through the `x-user-id` and `x-user-role`
//! headers, which a gateway in front of the service is trusted to set.

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod service;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::{ConfigError, ShopConfig, StorageConfig};

    pub use crate::core::{
        Access, Caller, CreatePolicy, FieldPatch, FieldValue, Filter, HeaderIdentityProvider,
        Identity, IdentityProvider, LifecycleGuard, LifecycleState, ListQuery, MaybeCaller,
        Operation, PaginatedResponse, QueryParams, Repository, Resource, ResourceKind,
        ResourceMeta, Role, ShopError, ShopResult, StatePrecondition, ValidatedJson,
        ValidationError, has_permission,
    };

    pub use crate::entities::{
        Address, CartItem, Order, OrderItem, OrderStatus, Product, ProductGroup, Rating,
        ShoppingCart, User, UserView,
    };

    pub use crate::service::{RelatedListing, Relation, ResourceService};

    pub use crate::server::{RestExposure, ServerBuilder, ServerHost, Services};

    pub use crate::storage::{InMemoryRepository, Repositories};

    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresRepository;

    pub use async_trait::async_trait;
    pub use axum::Router;
    pub use uuid::Uuid;
}
