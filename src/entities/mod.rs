//! Resource kinds served by shopfront

pub mod macros;
pub mod address;
pub mod order;
pub mod product;
pub mod product_group;
pub mod rating;
pub mod shopping_cart;
pub mod user;

pub use address::{Address, AddressDraft, AddressPatch};
pub use order::{Order, OrderDraft, OrderItem, OrderPatch, OrderStatus};
pub use product::{Product, ProductDraft, ProductPatch};
pub use product_group::{ProductGroup, ProductGroupDraft, ProductGroupPatch};
pub use rating::{Rating, RatingDraft, RatingPatch};
pub use shopping_cart::{CartItem, ShoppingCart, ShoppingCartDraft, ShoppingCartPatch};
pub use user::{User, UserDraft, UserPatch, UserView};

use crate::core::error::{ShopError, ShopResult};
use uuid::Uuid;

/// Owner of a new owned resource; creation requires a caller.
pub(crate) fn require_owner(owner_id: Option<Uuid>) -> ShopResult<Uuid> {
    owner_id.ok_or(ShopError::Unauthenticated)
}
