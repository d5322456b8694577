//! Core module containing the traits and rules shared by every resource kind

pub mod error;
pub mod field;
pub mod identity;
pub mod lifecycle;
pub mod password;
pub mod policy;
pub mod query;
pub mod repository;
pub mod resource;
pub mod validation;

pub use error::{ShopError, ShopResult, ValidationError};
pub use field::FieldValue;
pub use identity::{Caller, HeaderIdentityProvider, Identity, IdentityProvider, MaybeCaller, Role};
pub use lifecycle::{LifecycleGuard, LifecycleState, Operation, StatePrecondition};
pub use policy::{Access, has_permission};
pub use query::{Filter, ListQuery, PaginatedResponse, QueryParams};
pub use repository::Repository;
pub use resource::{CreatePolicy, FieldPatch, Resource, ResourceKind, ResourceMeta};
pub use validation::ValidatedJson;
