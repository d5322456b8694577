//! Orders placed by a user

use crate::core::error::ShopResult;
use crate::core::field::FieldValue;
use crate::core::resource::{Resource, ResourceKind, ResourceMeta};
use crate::entities::require_owner;
use crate::{apply_fields, resource_meta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrderItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: u32,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub unit_price_cents: i64,
}

impl OrderItem {
    fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub owner_id: Uuid,
    pub address_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_cents: i64,
    #[serde(default)]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrderDraft {
    pub address_id: Uuid,
    #[validate(length(min = 1, message = "an order needs at least one item"), nested)]
    pub items: Vec<OrderItem>,
}

/// Items and total are fixed at creation
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrderPatch {
    pub address_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

impl Resource for Order {
    type Draft = OrderDraft;
    type Patch = OrderPatch;
    type Public = Self;

    const KIND: ResourceKind = ResourceKind::Order;
    const FIELDS: &'static [&'static str] = &["address_id", "total_cents", "status"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.owner_id)
    }

    fn build(draft: OrderDraft, owner_id: Option<Uuid>) -> ShopResult<Self> {
        let total_cents = draft
            .items
            .iter()
            .map(OrderItem::subtotal_cents)
            .fold(0i64, i64::saturating_add);

        Ok(Self {
            meta: ResourceMeta::new(),
            owner_id: require_owner(owner_id)?,
            address_id: draft.address_id,
            items: draft.items,
            total_cents,
            status: OrderStatus::default(),
        })
    }

    fn apply_patch(&mut self, patch: &OrderPatch) {
        apply_fields!(self, patch; address_id, status);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "address_id" => Some(self.address_id.into()),
            "total_cents" => Some(self.total_cents.into()),
            "status" => Some(self.status.as_str().into()),
            _ => None,
        }
    }

    fn into_public(self) -> Self {
        self
    }
}
