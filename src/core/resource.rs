//! The resource abstraction shared by every entity kind

use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::lifecycle::LifecycleState;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use uuid::Uuid;
use validator::Validate;

/// Closed set of resource kinds served by shopfront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Address,
    Order,
    Product,
    ProductGroup,
    Rating,
    ShoppingCart,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::User,
        ResourceKind::Address,
        ResourceKind::Order,
        ResourceKind::Product,
        ResourceKind::ProductGroup,
        ResourceKind::Rating,
        ResourceKind::ShoppingCart,
    ];

    /// Singular name, also used as the storage discriminator
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Address => "address",
            ResourceKind::Order => "order",
            ResourceKind::Product => "product",
            ResourceKind::ProductGroup => "product_group",
            ResourceKind::Rating => "rating",
            ResourceKind::ShoppingCart => "shopping_cart",
        }
    }

    /// Plural name used as the URL segment
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::User => "users",
            ResourceKind::Address => "addresses",
            ResourceKind::Order => "orders",
            ResourceKind::Product => "products",
            ResourceKind::ProductGroup => "product-groups",
            ResourceKind::Rating => "ratings",
            ResourceKind::ShoppingCart => "shopping-carts",
        }
    }

    pub fn from_plural(plural: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.plural() == plural)
    }

    /// Catalog kinds have no owner
    pub fn has_owner(&self) -> bool {
        !matches!(self, ResourceKind::Product | ResourceKind::ProductGroup)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

fn default_active() -> bool {
    true
}

/// Fields common to every stored resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeta {
    pub id: Uuid,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceMeta {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ResourceMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A mutation a repository applies to one record
#[derive(Debug, Clone)]
pub enum FieldPatch<P> {
    /// Entity-specific fields from an update
    Fields(P),
    /// Flip of the lifecycle flag
    Active(bool),
}

/// Who may create a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Any authenticated caller, who becomes the owner
    Owner,
    /// Admin or Seller callers
    Catalog,
    /// Anyone, including anonymous callers
    Open,
    /// Admin callers only
    AdminOnly,
}

/// Names accepted in filters and sort keys for every kind
pub const COMMON_FIELDS: &[&str] = &["id", "owner_id", "is_active", "created_at", "updated_at"];

/// A stored resource kind
///
/// Implementors provide the entity-specific hooks; the lifecycle, ownership
/// and listing logic lives once in `ResourceService`.
pub trait Resource: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Creation payload
    type Draft: DeserializeOwned + Validate + Send + 'static;
    /// Update payload; carries no id, owner or lifecycle fields
    type Patch: DeserializeOwned + Validate + Clone + fmt::Debug + Send + Sync + 'static;
    /// Representation returned to callers
    type Public: Serialize + Send + 'static;

    const KIND: ResourceKind;

    /// Entity-specific filterable and sortable fields
    const FIELDS: &'static [&'static str];

    fn meta(&self) -> &ResourceMeta;

    fn meta_mut(&mut self) -> &mut ResourceMeta;

    fn owner_id(&self) -> Option<Uuid>;

    fn create_policy(_draft: &Self::Draft) -> CreatePolicy {
        if Self::KIND.has_owner() {
            CreatePolicy::Owner
        } else {
            CreatePolicy::Catalog
        }
    }

    /// Transform a creation payload before `build`. Slow work such as
    /// password hashing belongs here, off the request thread.
    fn prepare_draft(
        draft: Self::Draft,
    ) -> impl Future<Output = ShopResult<Self::Draft>> + Send {
        async move { Ok(draft) }
    }

    /// Construct a new record. `owner_id` is the creating caller's id, if any.
    fn build(draft: Self::Draft, owner_id: Option<Uuid>) -> ShopResult<Self>;

    /// Transform an update payload before it reaches storage.
    fn prepare_patch(
        patch: Self::Patch,
    ) -> impl Future<Output = ShopResult<Self::Patch>> + Send {
        async move { Ok(patch) }
    }

    fn apply_patch(&mut self, patch: &Self::Patch);

    fn field_value(&self, field: &str) -> Option<FieldValue>;

    fn into_public(self) -> Self::Public;

    fn id(&self) -> Uuid {
        self.meta().id
    }

    fn is_active(&self) -> bool {
        self.meta().is_active
    }

    fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState::from_active(self.is_active())
    }

    fn has_field(field: &str) -> bool {
        COMMON_FIELDS.contains(&field) || Self::FIELDS.contains(&field)
    }

    /// Value of a common or entity-specific field
    fn field(&self, field: &str) -> Option<FieldValue> {
        let meta = self.meta();
        match field {
            "id" => Some(meta.id.into()),
            "owner_id" => Some(self.owner_id().into()),
            "is_active" => Some(meta.is_active.into()),
            "created_at" => Some(meta.created_at.into()),
            "updated_at" => Some(meta.updated_at.into()),
            other => self.field_value(other),
        }
    }

    /// Apply a repository patch and bump `updated_at`.
    fn apply(&mut self, patch: &FieldPatch<Self::Patch>) {
        match patch {
            FieldPatch::Fields(fields) => self.apply_patch(fields),
            FieldPatch::Active(active) => self.meta_mut().is_active = *active,
        }
        self.meta_mut().touch();
    }
}
