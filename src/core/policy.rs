//! Ownership policy
//!
//! A caller may act on a resource it owns; an admin may act on any resource.
//! Resources without an owner (the catalog) are readable by every caller and
//! writable by admins and sellers only.

use crate::core::identity::{Identity, Role};
use uuid::Uuid;

/// Kind of access requested on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Returns true iff the caller owns the resource or is an admin.
pub fn has_permission(resource_owner_id: Uuid, caller: &Identity) -> bool {
    resource_owner_id == caller.id || caller.role == Role::Admin
}

/// Returns true iff the caller may manage catalog resources.
pub fn can_manage_catalog(caller: &Identity) -> bool {
    matches!(caller.role, Role::Admin | Role::Seller)
}

/// Access decision for a resource that may or may not have an owner.
pub fn authorize(owner_id: Option<Uuid>, caller: &Identity, access: Access) -> bool {
    match (owner_id, access) {
        (Some(owner), _) => has_permission(owner, caller),
        (None, Access::Read) => true,
        (None, Access::Write) => can_manage_catalog(caller),
    }
}
