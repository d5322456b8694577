//! Storage access contract consumed by resource services

use crate::core::lifecycle::StatePrecondition;
use crate::core::query::Filter;
use crate::core::resource::{FieldPatch, Resource};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for one resource kind
///
/// Implementations are agnostic to ownership and lifecycle rules; they only
/// honour the `StatePrecondition` carried by each write, atomically with the
/// write itself.
#[async_trait]
pub trait Repository<T: Resource>: Send + Sync {
    /// Get a record by id, active or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>>;

    /// All records matching every condition of the filter, in no particular order
    async fn find_many(&self, filter: &Filter) -> Result<Vec<T>>;

    /// Persist a new record
    async fn insert(&self, record: T) -> Result<T>;

    /// Apply a patch if the record exists and its state satisfies the
    /// precondition.
    ///
    /// Returns the updated record, or `None` when nothing was written.
    async fn update_fields(
        &self,
        id: Uuid,
        precondition: StatePrecondition,
        patch: &FieldPatch<T::Patch>,
    ) -> Result<Option<T>>;

    /// Remove a record if its state satisfies the precondition.
    ///
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid, precondition: StatePrecondition) -> Result<bool>;
}
