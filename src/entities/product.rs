//! Catalog products
//!
//! Products have no owner: any authenticated caller may read them, only
//! admins and sellers may change them.

use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::resource::{Resource, ResourceKind, ResourceMeta};
use crate::{apply_fields, resource_meta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock: i64,
    pub product_group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price_cents: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: i64,
    pub product_group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: Option<i64>,
    pub product_group_id: Option<Uuid>,
}

impl Resource for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;
    type Public = Self;

    const KIND: ResourceKind = ResourceKind::Product;
    const FIELDS: &'static [&'static str] =
        &["name", "description", "price_cents", "stock", "product_group_id"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        None
    }

    fn build(draft: ProductDraft, _owner_id: Option<Uuid>) -> ShopResult<Self> {
        Ok(Self {
            meta: ResourceMeta::new(),
            name: draft.name,
            description: draft.description,
            price_cents: draft.price_cents,
            stock: draft.stock,
            product_group_id: draft.product_group_id,
        })
    }

    fn apply_patch(&mut self, patch: &ProductPatch) {
        apply_fields!(self, patch; name, description, price_cents, stock; product_group_id);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(self.name.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "price_cents" => Some(self.price_cents.into()),
            "stock" => Some(self.stock.into()),
            "product_group_id" => Some(self.product_group_id.into()),
            _ => None,
        }
    }

    fn into_public(self) -> Self {
        self
    }
}
