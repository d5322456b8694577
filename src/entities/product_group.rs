use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::resource::{Resource, ResourceKind, ResourceMeta};
use crate::{apply_fields, resource_meta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Catalog grouping of products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductGroupDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductGroupPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl Resource for ProductGroup {
    type Draft = ProductGroupDraft;
    type Patch = ProductGroupPatch;
    type Public = Self;

    const KIND: ResourceKind = ResourceKind::ProductGroup;
    const FIELDS: &'static [&'static str] = &["name", "description"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        None
    }

    fn build(draft: ProductGroupDraft, _owner_id: Option<Uuid>) -> ShopResult<Self> {
        Ok(Self {
            meta: ResourceMeta::new(),
            name: draft.name,
            description: draft.description,
        })
    }

    fn apply_patch(&mut self, patch: &ProductGroupPatch) {
        apply_fields!(self, patch; name, description);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(self.name.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            _ => None,
        }
    }

    fn into_public(self) -> Self {
        self
    }
}
