//! Generic guarded resource service
//!
//! One `ResourceService<T>` per kind composes the lifecycle guard, the
//! ownership policy and the repository. Every operation on an existing
//! record runs the same sequence:
//!
//! 1. load the record
//! 2. lifecycle guard (`NotFound`, `AlreadyDisabled`, `AlreadyEnabled`)
//! 3. ownership policy (`Forbidden`)
//! 4. conditional write through the repository

use crate::core::error::{ShopError, ShopResult};
use crate::core::identity::Identity;
use crate::core::lifecycle::{GuardFailure, LifecycleGuard, LifecycleState, Operation};
use crate::core::policy::{self, Access};
use crate::core::query::{ListQuery, PaginatedResponse, Sort};
use crate::core::repository::Repository;
use crate::core::resource::{CreatePolicy, FieldPatch, Resource, ResourceKind};
use crate::service::relation::{RelatedListing, Relation};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use uuid::Uuid;

/// Service exposing the guarded operation set of one resource kind
pub struct ResourceService<T: Resource> {
    repository: Arc<dyn Repository<T>>,
    relations: IndexMap<&'static str, Relation>,
}

impl<T: Resource> ResourceService<T> {
    pub fn new(repository: Arc<dyn Repository<T>>) -> Self {
        Self {
            repository,
            relations: IndexMap::new(),
        }
    }

    /// Register a related collection reachable at `/{plural}/{id}/{relation}`
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.insert(relation.name, relation);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        T::KIND
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Create a record owned by the caller, where the kind has an owner.
    #[tracing::instrument(skip_all, fields(kind = %T::KIND))]
    pub async fn create(&self, draft: T::Draft, caller: Option<&Identity>) -> ShopResult<T> {
        let owner_id = match T::create_policy(&draft) {
            CreatePolicy::Open => caller.map(|c| c.id),
            CreatePolicy::Owner => Some(require(caller)?.id),
            CreatePolicy::Catalog => {
                let caller = require(caller)?;
                if !policy::can_manage_catalog(caller) {
                    return Err(Self::forbidden("create"));
                }
                None
            }
            CreatePolicy::AdminOnly => {
                let caller = require(caller)?;
                if !caller.is_admin() {
                    return Err(Self::forbidden("create"));
                }
                Some(caller.id)
            }
        };

        let draft = T::prepare_draft(draft).await?;
        let record = T::build(draft, owner_id)?;
        let record = self.repository.insert(record).await?;

        tracing::info!(id = %record.id(), "created");
        Ok(record)
    }

    #[tracing::instrument(skip(self, caller), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn get(&self, id: Uuid, caller: &Identity) -> ShopResult<T> {
        self.locate(id, caller, Operation::Read).await
    }

    /// List active records visible to the caller.
    ///
    /// Caller conditions are ANDed with `is_active = true` (unless an admin
    /// asks for inactive records) and, for owned kinds and non-admin callers,
    /// `owner_id = caller.id`.
    #[tracing::instrument(skip(self, caller, query), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn list(
        &self,
        caller: &Identity,
        query: ListQuery,
    ) -> ShopResult<PaginatedResponse<T>> {
        query.filter.ensure_fields::<T>()?;
        if let Some(sort) = query.sort.as_ref().filter(|s| !T::has_field(&s.field)) {
            return Err(ShopError::invalid_filter(format!(
                "unknown sort field '{}' for {}",
                sort.field,
                T::KIND
            )));
        }

        if query.include_inactive && !caller.is_admin() {
            return Err(Self::forbidden("list inactive"));
        }

        let mut filter = query.filter;
        if !query.include_inactive {
            filter = filter.and_eq("is_active", true);
        }
        if T::KIND.has_owner() && !caller.is_admin() {
            filter = filter.and_eq("owner_id", caller.id);
        }

        let mut records = self.repository.find_many(&filter).await?;

        // Repositories return no particular order
        records.sort_by_key(|r| r.id());
        let sort = query.sort.unwrap_or(Sort {
            field: "created_at".to_string(),
            descending: false,
        });
        sort.apply(&mut records);

        tracing::debug!(total = records.len(), "listed");
        Ok(PaginatedResponse::paginate(records, query.page, query.limit))
    }

    /// List a related collection of an active, accessible parent.
    #[tracing::instrument(skip(self, caller, query), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn get_related(
        &self,
        id: Uuid,
        related: &str,
        caller: &Identity,
        query: ListQuery,
    ) -> ShopResult<PaginatedResponse<serde_json::Value>> {
        let relation = self
            .relations
            .get(related)
            .ok_or_else(|| ShopError::UnknownRelation {
                kind: T::KIND,
                related: related.to_string(),
            })?;

        self.locate(id, caller, Operation::GetRelated).await?;

        relation
            .listing
            .list_related(relation.foreign_key, id, caller, query)
            .await
    }

    /// Apply a field-level patch and return the updated record.
    #[tracing::instrument(skip(self, caller, patch), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn update(&self, id: Uuid, caller: &Identity, patch: T::Patch) -> ShopResult<T> {
        let record = self.locate(id, caller, Operation::Update).await?;
        let patch = T::prepare_patch(patch).await?;

        let updated = self
            .write(
                id,
                caller,
                Operation::Update,
                record.lifecycle_state(),
                FieldPatch::Fields(patch),
            )
            .await?;

        tracing::info!("updated");
        Ok(updated)
    }

    /// Remove a record permanently.
    #[tracing::instrument(skip(self, caller), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn delete(&self, id: Uuid, caller: &Identity) -> ShopResult<()> {
        let record = self.locate(id, caller, Operation::Delete).await?;
        let precondition =
            LifecycleGuard::precondition(Operation::Delete, record.lifecycle_state());

        if !self.repository.delete(id, precondition).await? {
            return Err(self.lost_race(id, caller, Operation::Delete).await);
        }

        tracing::info!("deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self, caller), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn disable(&self, id: Uuid, caller: &Identity) -> ShopResult<()> {
        self.set_active(id, caller, Operation::Disable, false).await
    }

    #[tracing::instrument(skip(self, caller), fields(kind = %T::KIND, caller = %caller.id))]
    pub async fn enable(&self, id: Uuid, caller: &Identity) -> ShopResult<()> {
        self.set_active(id, caller, Operation::Enable, true).await
    }

    async fn set_active(
        &self,
        id: Uuid,
        caller: &Identity,
        operation: Operation,
        active: bool,
    ) -> ShopResult<()> {
        let record = self.locate(id, caller, operation).await?;
        self.write(
            id,
            caller,
            operation,
            record.lifecycle_state(),
            FieldPatch::Active(active),
        )
        .await?;

        tracing::info!(is_active = active, "lifecycle changed");
        Ok(())
    }

    /// Load, guard and authorize a record for `operation`.
    async fn locate(&self, id: Uuid, caller: &Identity, operation: Operation) -> ShopResult<T> {
        let record = self.repository.find_by_id(id).await?;
        let state = record.as_ref().map(Resource::lifecycle_state);

        LifecycleGuard::check(operation, state, caller.is_admin()).map_err(|failure| {
            tracing::debug!(%id, ?failure, %operation, "lifecycle guard rejected");
            Self::guard_error(failure, id)
        })?;

        let record = record.ok_or_else(|| Self::guard_error(GuardFailure::NotFound, id))?;

        let access = if operation.is_mutation() {
            Access::Write
        } else {
            Access::Read
        };
        if !policy::authorize(record.owner_id(), caller, access) {
            tracing::debug!(%id, %operation, "ownership policy rejected");
            return Err(Self::forbidden(operation.as_str()));
        }

        Ok(record)
    }

    /// Conditional write guarded by the state the guard observed.
    async fn write(
        &self,
        id: Uuid,
        caller: &Identity,
        operation: Operation,
        observed: LifecycleState,
        patch: FieldPatch<T::Patch>,
    ) -> ShopResult<T> {
        let precondition = LifecycleGuard::precondition(operation, observed);
        match self
            .repository
            .update_fields(id, precondition, &patch)
            .await?
        {
            Some(updated) => Ok(updated),
            None => Err(self.lost_race(id, caller, operation).await),
        }
    }

    /// Error for a write whose precondition no longer held.
    ///
    /// The guard runs again against the current record. If the record has
    /// since returned to an admissible state the write still lost, and the
    /// conflict is reported as of the moment it was attempted. A delete that
    /// lost to a lifecycle flip reports the state the record moved to.
    async fn lost_race(&self, id: Uuid, caller: &Identity, operation: Operation) -> ShopError {
        tracing::debug!(%id, %operation, "state changed before write");
        match self.locate(id, caller, operation).await {
            Err(e) => e,
            Ok(current) => match operation {
                Operation::Disable => Self::guard_error(GuardFailure::AlreadyDisabled, id),
                Operation::Enable => Self::guard_error(GuardFailure::AlreadyEnabled, id),
                Operation::Delete => match current.lifecycle_state() {
                    LifecycleState::Inactive => {
                        Self::guard_error(GuardFailure::AlreadyDisabled, id)
                    }
                    LifecycleState::Active => Self::guard_error(GuardFailure::AlreadyEnabled, id),
                },
                _ => Self::guard_error(GuardFailure::NotFound, id),
            },
        }
    }

    fn guard_error(failure: GuardFailure, id: Uuid) -> ShopError {
        let kind = T::KIND;
        match failure {
            GuardFailure::NotFound => ShopError::NotFound { kind, id },
            GuardFailure::AlreadyDisabled => ShopError::AlreadyDisabled { kind, id },
            GuardFailure::AlreadyEnabled => ShopError::AlreadyEnabled { kind, id },
        }
    }

    fn forbidden(action: &'static str) -> ShopError {
        ShopError::Forbidden {
            kind: T::KIND,
            action,
        }
    }
}

fn require(caller: Option<&Identity>) -> ShopResult<&Identity> {
    caller.ok_or(ShopError::Unauthenticated)
}

#[async_trait]
impl<T: Resource> RelatedListing for ResourceService<T> {
    fn kind(&self) -> ResourceKind {
        T::KIND
    }

    async fn list_related(
        &self,
        foreign_key: &str,
        parent_id: Uuid,
        caller: &Identity,
        mut query: ListQuery,
    ) -> ShopResult<PaginatedResponse<serde_json::Value>> {
        query.filter = query.filter.and_eq(foreign_key, parent_id);
        let page = self.list(caller, query).await?;

        let data = page
            .data
            .into_iter()
            .map(|record| serde_json::to_value(record.into_public()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ShopError::Internal(format!("failed to serialize {}: {}", T::KIND, e)))?;

        Ok(PaginatedResponse {
            data,
            pagination: page.pagination,
        })
    }
}
