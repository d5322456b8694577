//! Server module for building HTTP servers with registered resource routes
//!
//! This module provides a `ServerBuilder` that wires:
//! - one service per resource kind over the configured repositories
//! - CRUD, lifecycle and related-collection routes for every kind
//! - health routes

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use entity_registry::{ResourceDescriptor, ResourceRegistry};
pub use exposure::RestExposure;
pub use handlers::ResourceState;
pub use host::{ServerHost, Services};
