//! In-memory repository for testing and development

use crate::core::lifecycle::StatePrecondition;
use crate::core::query::Filter;
use crate::core::repository::Repository;
use crate::core::resource::{FieldPatch, Resource};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory repository implementation
///
/// Uses an RwLock for thread-safe access. Conditional writes check their
/// precondition under the write lock, so guard and mutation are atomic.
#[derive(Clone)]
pub struct InMemoryRepository<T> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryRepository<T> {
    /// Create a new, empty in-memory repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Resource> Repository<T> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(&id).cloned())
    }

    async fn find_many(&self, filter: &Filter) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .filter(|record| filter.matches(*record))
            .cloned()
            .collect())
    }

    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.contains_key(&record.id()) {
            return Err(anyhow!("{} '{}' already exists", T::KIND, record.id()));
        }

        records.insert(record.id(), record.clone());

        Ok(record)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        precondition: StatePrecondition,
        patch: &FieldPatch<T::Patch>,
    ) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match records.get_mut(&id) {
            Some(record) if precondition.admits(record.is_active()) => {
                record.apply(patch);
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, precondition: StatePrecondition) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let admitted = records
            .get(&id)
            .is_some_and(|record| precondition.admits(record.is_active()));
        if admitted {
            records.remove(&id);
        }

        Ok(admitted)
    }
}
