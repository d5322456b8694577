//! Resource registry collecting the route tables of every kind

use super::handlers::ResourceState;
use super::router::resource_routes;
use crate::core::resource::{Resource, ResourceKind};
use axum::Router;
use indexmap::IndexMap;

/// Describes how to build the routes of one resource kind
pub trait ResourceDescriptor: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Build the routes for this kind
    fn build_routes(&self) -> Router;
}

impl<T: Resource> ResourceDescriptor for ResourceState<T> {
    fn kind(&self) -> ResourceKind {
        T::KIND
    }

    fn build_routes(&self) -> Router {
        resource_routes(self.clone())
    }
}

/// Registry of all served resource kinds, in registration order
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: IndexMap<ResourceKind, Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any earlier one for the same kind
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        self.descriptors.insert(descriptor.kind(), descriptor);
    }

    /// Merge the routes of every registered kind
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    pub fn kinds(&self) -> Vec<ResourceKind> {
        self.descriptors.keys().copied().collect()
    }
}
