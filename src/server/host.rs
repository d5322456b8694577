//! Server host holding the wired services
//!
//! Services are constructed explicitly from a set of repositories and hold
//! each other only as `RelatedListing` collaborators:
//!
//! ```text
//! users          -> addresses, orders, ratings, shopping-carts  (owner_id)
//! products       -> ratings                                     (product_id)
//! product-groups -> products                                    (product_group_id)
//! ```

use super::entity_registry::ResourceRegistry;
use super::handlers::ResourceState;
use crate::core::identity::IdentitySource;
use crate::core::query::PageLimits;
use crate::core::resource::Resource;
use crate::entities::{Address, Order, Product, ProductGroup, Rating, ShoppingCart, User};
use crate::service::{Relation, ResourceService};
use crate::storage::Repositories;
use std::sync::Arc;

/// One service per resource kind
#[derive(Clone)]
pub struct Services {
    pub users: Arc<ResourceService<User>>,
    pub addresses: Arc<ResourceService<Address>>,
    pub orders: Arc<ResourceService<Order>>,
    pub products: Arc<ResourceService<Product>>,
    pub product_groups: Arc<ResourceService<ProductGroup>>,
    pub ratings: Arc<ResourceService<Rating>>,
    pub shopping_carts: Arc<ResourceService<ShoppingCart>>,
}

impl Services {
    /// Build every service and its relations, leaves first
    pub fn wire(repositories: Repositories) -> Self {
        let addresses = Arc::new(ResourceService::new(repositories.addresses));
        let orders = Arc::new(ResourceService::new(repositories.orders));
        let ratings = Arc::new(ResourceService::new(repositories.ratings));
        let shopping_carts = Arc::new(ResourceService::new(repositories.shopping_carts));

        let products = Arc::new(
            ResourceService::new(repositories.products)
                .with_relation(Relation::new("product_id", ratings.clone())),
        );
        let product_groups = Arc::new(
            ResourceService::new(repositories.product_groups)
                .with_relation(Relation::new("product_group_id", products.clone())),
        );
        let users = Arc::new(
            ResourceService::new(repositories.users)
                .with_relation(Relation::new("owner_id", addresses.clone()))
                .with_relation(Relation::new("owner_id", orders.clone()))
                .with_relation(Relation::new("owner_id", ratings.clone()))
                .with_relation(Relation::new("owner_id", shopping_carts.clone())),
        );

        Self {
            users,
            addresses,
            orders,
            products,
            product_groups,
            ratings,
            shopping_carts,
        }
    }
}

/// Host context containing all server state
///
/// Transport-agnostic; the REST exposure builds its router from it.
#[derive(Clone)]
pub struct ServerHost {
    pub services: Services,
    pub identity: IdentitySource,
    pub limits: PageLimits,
}

impl ServerHost {
    pub fn new(services: Services, identity: IdentitySource, limits: PageLimits) -> Self {
        Self {
            services,
            identity,
            limits,
        }
    }

    fn state<T: Resource>(&self, service: &Arc<ResourceService<T>>) -> Box<ResourceState<T>> {
        Box::new(ResourceState {
            service: service.clone(),
            identity: self.identity.clone(),
            limits: self.limits,
        })
    }

    /// Registry with the routes of every kind
    pub fn registry(&self) -> ResourceRegistry {
        let services = &self.services;
        let mut registry = ResourceRegistry::new();
        registry.register(self.state(&services.users));
        registry.register(self.state(&services.addresses));
        registry.register(self.state(&services.orders));
        registry.register(self.state(&services.products));
        registry.register(self.state(&services.product_groups));
        registry.register(self.state(&services.ratings));
        registry.register(self.state(&services.shopping_carts));
        registry
    }
}
