//! Product ratings written by users

use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::resource::{Resource, ResourceKind, ResourceMeta};
use crate::entities::require_owner;
use crate::{apply_fields, resource_meta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub owner_id: Uuid,
    pub product_id: Uuid,
    pub score: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RatingDraft {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub score: u8,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RatingPatch {
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub score: Option<u8>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl Resource for Rating {
    type Draft = RatingDraft;
    type Patch = RatingPatch;
    type Public = Self;

    const KIND: ResourceKind = ResourceKind::Rating;
    const FIELDS: &'static [&'static str] = &["product_id", "score", "comment"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.owner_id)
    }

    fn build(draft: RatingDraft, owner_id: Option<Uuid>) -> ShopResult<Self> {
        Ok(Self {
            meta: ResourceMeta::new(),
            owner_id: require_owner(owner_id)?,
            product_id: draft.product_id,
            score: draft.score,
            comment: draft.comment,
        })
    }

    fn apply_patch(&mut self, patch: &RatingPatch) {
        apply_fields!(self, patch; score; comment);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "product_id" => Some(self.product_id.into()),
            "score" => Some(i64::from(self.score).into()),
            "comment" => Some(self.comment.clone().into()),
            _ => None,
        }
    }

    fn into_public(self) -> Self {
        self
    }
}
