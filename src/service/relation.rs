//! Cross-service delegation for related collections

use crate::core::error::ShopResult;
use crate::core::identity::Identity;
use crate::core::query::{ListQuery, PaginatedResponse};
use crate::core::resource::ResourceKind;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A resource service able to list its records that point at a parent
///
/// Services hold each other through this trait so that no service type
/// depends on another at compile time.
#[async_trait]
pub trait RelatedListing: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// List records whose `foreign_key` equals `parent_id`, under the
    /// caller's normal listing rules.
    async fn list_related(
        &self,
        foreign_key: &str,
        parent_id: Uuid,
        caller: &Identity,
        query: ListQuery,
    ) -> ShopResult<PaginatedResponse<serde_json::Value>>;
}

/// Named route from a parent resource to a related collection
#[derive(Clone)]
pub struct Relation {
    /// URL segment, the plural of the related kind
    pub name: &'static str,
    pub foreign_key: &'static str,
    pub listing: Arc<dyn RelatedListing>,
}

impl Relation {
    pub fn new(foreign_key: &'static str, listing: Arc<dyn RelatedListing>) -> Self {
        Self {
            name: listing.kind().plural(),
            foreign_key,
            listing,
        }
    }

    pub fn target(&self) -> ResourceKind {
        self.listing.kind()
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("foreign_key", &self.foreign_key)
            .finish()
    }
}
