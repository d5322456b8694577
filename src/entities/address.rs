//! Postal addresses owned by a user

use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::resource::{Resource, ResourceKind, ResourceMeta};
use crate::entities::require_owner;
use crate::{apply_fields, resource_meta};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

/// ISO 3166-1 alpha-2
static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("country code pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub owner_id: Uuid,
    pub street: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddressDraft {
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
    #[validate(regex(path = *COUNTRY_CODE, message = "must be an ISO 3166-1 alpha-2 code"))]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddressPatch {
    #[validate(length(min = 1, max = 200))]
    pub street: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: Option<String>,
    #[validate(regex(path = *COUNTRY_CODE, message = "must be an ISO 3166-1 alpha-2 code"))]
    pub country: Option<String>,
}

impl Resource for Address {
    type Draft = AddressDraft;
    type Patch = AddressPatch;
    type Public = Self;

    const KIND: ResourceKind = ResourceKind::Address;
    const FIELDS: &'static [&'static str] = &["street", "city", "region", "postal_code", "country"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.owner_id)
    }

    fn build(draft: AddressDraft, owner_id: Option<Uuid>) -> ShopResult<Self> {
        Ok(Self {
            meta: ResourceMeta::new(),
            owner_id: require_owner(owner_id)?,
            street: draft.street,
            city: draft.city,
            region: draft.region,
            postal_code: draft.postal_code,
            country: draft.country,
        })
    }

    fn apply_patch(&mut self, patch: &AddressPatch) {
        apply_fields!(self, patch; street, city, postal_code, country; region);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "street" => Some(self.street.as_str().into()),
            "city" => Some(self.city.as_str().into()),
            "region" => Some(self.region.clone().into()),
            "postal_code" => Some(self.postal_code.as_str().into()),
            "country" => Some(self.country.as_str().into()),
            _ => None,
        }
    }

    fn into_public(self) -> Self {
        self
    }
}
