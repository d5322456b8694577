use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::resource::{Resource, ResourceKind, ResourceMeta};
use crate::entities::require_owner;
use crate::{apply_fields, resource_meta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CartItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: u32,
}

/// A user's shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCart {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub owner_id: Uuid,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ShoppingCartDraft {
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CartItem>,
}

/// Replaces the whole item list
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ShoppingCartPatch {
    #[validate(nested)]
    pub items: Option<Vec<CartItem>>,
}

impl ShoppingCart {
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

impl Resource for ShoppingCart {
    type Draft = ShoppingCartDraft;
    type Patch = ShoppingCartPatch;
    type Public = Self;

    const KIND: ResourceKind = ResourceKind::ShoppingCart;
    const FIELDS: &'static [&'static str] = &["item_count"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.owner_id)
    }

    fn build(draft: ShoppingCartDraft, owner_id: Option<Uuid>) -> ShopResult<Self> {
        Ok(Self {
            meta: ResourceMeta::new(),
            owner_id: require_owner(owner_id)?,
            items: draft.items,
        })
    }

    fn apply_patch(&mut self, patch: &ShoppingCartPatch) {
        apply_fields!(self, patch; items);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "item_count" => Some(self.item_count().into()),
            _ => None,
        }
    }

    fn into_public(self) -> Self {
        self
    }
}
