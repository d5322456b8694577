//! Resource services and the relations between them

pub mod relation;
pub mod resource_service;

pub use relation::{RelatedListing, Relation};
pub use resource_service::ResourceService;
