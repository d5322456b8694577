//! Route table for one resource kind

use super::handlers::{self, ResourceState};
use crate::core::resource::Resource;
use axum::Router;
use axum::routing::{get, post};

/// Build the routes for a resource kind
///
/// - POST   /{plural}                 - Create
/// - GET    /{plural}                 - List (filter, sort, pagination)
/// - GET    /{plural}/{id}            - Get by id
/// - PATCH  /{plural}/{id}            - Field-level update
/// - DELETE /{plural}/{id}            - Delete
/// - POST   /{plural}/{id}/disable    - Disable
/// - POST   /{plural}/{id}/enable     - Enable
/// - GET    /{plural}/{id}/{related}  - List a related collection
pub fn resource_routes<T: Resource>(state: ResourceState<T>) -> Router {
    let plural = T::KIND.plural();

    Router::new()
        .route(
            &format!("/{plural}"),
            post(handlers::create::<T>).get(handlers::list::<T>),
        )
        .route(
            &format!("/{plural}/{{id}}"),
            get(handlers::get::<T>)
                .patch(handlers::update::<T>)
                .delete(handlers::delete::<T>),
        )
        .route(
            &format!("/{plural}/{{id}}/disable"),
            post(handlers::disable::<T>),
        )
        .route(
            &format!("/{plural}/{{id}}/enable"),
            post(handlers::enable::<T>),
        )
        .route(
            &format!("/{plural}/{{id}}/{{related}}"),
            get(handlers::get_related::<T>),
        )
        .with_state(state)
}
